//! Ambient API: provide and inject against the currently running scope.
//!
//! Component hosts usually run a component's setup code "inside" its scope.
//! [`with_scope`] marks a scope as current for the duration of a closure so
//! setup code can call [`provide`] and [`inject`] without threading the
//! handle through. Calls nest; the innermost scope wins.
//!
//! # Examples
//!
//! ```
//! use scoped_inject::ambient::{inject, provide, with_scope};
//! use scoped_inject::{Class, Provider, Scope};
//!
//! #[derive(Default)]
//! struct Store {
//!     items: Vec<String>,
//! }
//!
//! let app = Scope::root();
//! with_scope(&app, || provide(&Class::<Store>::new(), Provider::class())).unwrap();
//!
//! let list = app.child_labeled("list");
//! let store = with_scope(&list, || inject(&Class::<Store>::new())).unwrap();
//! assert!(store.items.is_empty());
//! ```

use std::rc::Rc;

use crate::error::{DiError, DiResult};
use crate::internal::current::{self, ActiveGuard};
use crate::provider::Provider;
use crate::scope::Scope;
use crate::token::Dependency;

/// Runs `f` with `scope` as the current scope.
pub fn with_scope<R>(scope: &Scope, f: impl FnOnce() -> R) -> R {
    let _guard = ActiveGuard::enter(scope);
    f()
}

/// The innermost scope entered with [`with_scope`] on this thread.
pub fn current_scope() -> DiResult<Scope> {
    current::active().ok_or(DiError::NoActiveScope)
}

/// [`Scope::provide`] on the current scope.
pub fn provide<T, D>(dependency: &D, provider: Provider<T>) -> DiResult<()>
where
    T: 'static,
    D: Dependency<T> + ?Sized,
{
    current_scope()?.provide(dependency, provider)
}

/// [`Scope::inject`] on the current scope.
pub fn inject<T, D>(dependency: &D) -> DiResult<Rc<T>>
where
    T: 'static,
    D: Dependency<T> + ?Sized,
{
    current_scope()?.inject(dependency)
}

/// [`Scope::on_teardown`] on the current scope.
pub fn on_teardown<F>(callback: F) -> DiResult<()>
where
    F: FnOnce() + 'static,
{
    current_scope()?.on_teardown(callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injectable;

    #[test]
    fn test_no_active_scope() {
        let token = injectable(|| 0u8);
        assert_eq!(inject(&token).unwrap_err(), DiError::NoActiveScope);
        assert!(current_scope().is_err());
    }

    #[test]
    fn test_nested_scopes_restore_outer() {
        let root = Scope::root();
        let child = root.child();

        with_scope(&root, || {
            assert!(current_scope().unwrap().ptr_eq(&root));
            with_scope(&child, || {
                assert!(current_scope().unwrap().ptr_eq(&child));
            });
            assert!(current_scope().unwrap().ptr_eq(&root));
        });
        assert!(current_scope().is_err());
    }

    #[test]
    fn test_ambient_inject_tied_to_current_teardown() {
        let token = injectable(|| 0u8);
        let root = Scope::root();
        root.provide_token(&token).unwrap();
        let child = root.child();

        with_scope(&child, || {
            inject(&token).unwrap();
            on_teardown(|| {}).unwrap();
        });

        assert_eq!(child.pending_teardowns(), 2);
        assert_eq!(root.bindings()[0].live_count, 1);
        child.destroy();
        assert_eq!(root.bindings()[0].live_count, 0);
    }
}
