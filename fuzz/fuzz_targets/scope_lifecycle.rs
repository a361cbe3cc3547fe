#![no_main]

use libfuzzer_sys::fuzz_target;
use scoped_inject::{injectable_named, DiError, Provider, Scope};

// Each byte is one operation against a small scope tree. After every step the
// live count of every binding must equal the injections still outstanding.
fuzz_target!(|data: &[u8]| {
    let token = injectable_named("fuzz", || 0u32);
    let root = Scope::root();
    let mut scopes: Vec<(Scope, usize)> = vec![(root.clone(), 0)];

    for byte in data {
        let target = (byte >> 3) as usize % scopes.len();
        match byte & 0b111 {
            0 | 1 => {
                let child = scopes[target].0.child();
                scopes.push((child, 0));
            }
            2 | 3 => {
                let (scope, count) = &mut scopes[target];
                if scope.inject(&token).is_ok() {
                    *count += 1;
                }
            }
            4 => {
                if target != 0 {
                    let (scope, _) = scopes.remove(target);
                    scope.destroy();
                    scopes.retain(|(s, _)| !s.is_destroyed());
                }
            }
            5 => {
                // Fails once the token was implicitly installed at the root
                match root.provide(&token, Provider::value(1)) {
                    Ok(()) | Err(DiError::DuplicateRegistration(_)) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
            _ => {
                let _ = scopes[target].0.inject_lease(&token);
            }
        }

        let outstanding: usize = scopes.iter().map(|(_, n)| n).sum();
        let live: usize = root.bindings().iter().map(|b| b.live_count).sum();
        assert_eq!(live, outstanding);
    }
});
