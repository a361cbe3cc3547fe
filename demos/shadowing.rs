//! A nested scope rebinds a token its ancestors provide, and a token with its
//! own factory is shared across the whole tree without registration.

use std::rc::Rc;

use scoped_inject::{injectable_named, Provider, Scope};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let theme = injectable_named("theme", || String::from("light"));
    let clock = injectable_named("clock", std::time::Instant::now);

    let app = Scope::root_with(scoped_inject::ContainerOptions::new().with_root_label("app"));
    app.provide_token(&theme)?;

    let settings = app.child_labeled("settings");
    settings.provide(&theme, Provider::value(String::from("dark")))?;
    let dialog = settings.child_labeled("dialog");
    let sidebar = app.child_labeled("sidebar");

    for scope in [&dialog, &sidebar] {
        let value = scope.inject(&theme)?;
        let owner = scope.resolve_owner(&theme).unwrap_or_default();
        println!("{} uses theme {:?} from {}", scope.path(), value, owner);
    }

    // Never provided anywhere, so the first inject installs it at the root
    let a = dialog.inject(&clock)?;
    let b = sidebar.inject(&clock)?;
    println!(
        "clock shared across branches: {} (owned by {})",
        Rc::ptr_eq(&a, &b),
        sidebar.resolve_owner(&clock).unwrap_or_default()
    );

    app.destroy();
    Ok(())
}
