//! # scoped-inject
//!
//! Scoped, reference-counted dependency injection for tree-structured
//! component runtimes.
//!
//! A token names a dependency. A scope binds a provider to the token, and any
//! descendant scope can inject it. The instance is created lazily on first
//! injection, shared while any consumer holds it, and discarded as soon as the
//! last consuming scope tears down; the next injection builds a fresh one.
//!
//! ## Features
//!
//! - **Two token flavors**: self-sufficient tokens with their own factory, and
//!   types used as their own token
//! - **Closed providers**: value, class (`Default`/constructor) or factory
//! - **Shadowing**: a child scope may rebind a token its ancestors provide
//! - **Teardown-driven eviction**: releases ride on the consuming scope's
//!   teardown, or on an explicit [`Lease`]
//! - **Observability**: `tracing` events plus pluggable [`DiObserver`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use scoped_inject::{injectable, Class, Provider, Scope};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! #[derive(Default)]
//! struct Counter {
//!     value: Cell<i32>,
//! }
//!
//! // A token that carries its own factory needs no registration
//! let theme = injectable(|| String::from("dark"));
//!
//! let app = Scope::root();
//! app.provide(&Class::<Counter>::new(), Provider::class()).unwrap();
//!
//! let page = app.child_labeled("page");
//! let a = page.inject(&Class::<Counter>::new()).unwrap();
//! let b = page.inject(&Class::<Counter>::new()).unwrap();
//! assert!(Rc::ptr_eq(&a, &b));
//! assert_eq!(*page.inject(&theme).unwrap(), "dark");
//!
//! a.value.set(1);
//! page.destroy();
//!
//! // The last consumer is gone, so the next page gets a fresh counter
//! let next = app.child_labeled("page");
//! assert_eq!(next.inject(&Class::<Counter>::new()).unwrap().value.get(), 0);
//! ```
//!
//! ## Errors
//!
//! ```rust
//! use scoped_inject::{Class, DiError, Provider, Scope};
//!
//! #[derive(Default)]
//! struct Counter;
//!
//! let root = Scope::root();
//! assert!(matches!(
//!     root.inject(&Class::<Counter>::new()),
//!     Err(DiError::MissingProvider(_))
//! ));
//!
//! root.provide(&Class::<Counter>::new(), Provider::class()).unwrap();
//! assert!(matches!(
//!     root.provide(&Class::<Counter>::new(), Provider::class()),
//!     Err(DiError::DuplicateRegistration(_))
//! ));
//! ```

pub mod ambient;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod injector;
pub mod key;
pub mod observer;
pub mod provider;
pub mod scope;
pub mod token;
pub mod traits;

// Internal modules
mod internal;

pub use config::{ContainerOptions, ImplicitPolicy, OverReleasePolicy};
pub use descriptors::BindingDescriptor;
pub use error::{DiError, DiResult};
pub use injector::{Injector, Lease};
pub use key::{key_of_type, Key};
pub use observer::{DiObserver, LifecycleMetrics, LoggingObserver, MetricsObserver};
pub use provider::{Provider, ProviderKind};
pub use scope::Scope;
pub use token::{injectable, injectable_named, Class, Dependency, Token};
pub use traits::Dispose;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter {
        value: Cell<i32>,
    }

    impl Counter {
        fn increment(&self) {
            self.value.set(self.value.get() + 1);
        }
    }

    #[test]
    fn test_counter_scenario() {
        const COUNTER: Class<Counter> = Class::new();

        let a = Scope::root_with(ContainerOptions::new().with_root_label("A"));
        a.provide(&COUNTER, Provider::class()).unwrap();

        let b = a.child_labeled("B");
        let first = b.inject(&COUNTER).unwrap();
        let second = b.inject(&COUNTER).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.value.get(), 0);
        first.increment();
        assert_eq!(second.value.get(), 1);

        b.destroy();
        assert!(!a.bindings()[0].materialized);

        let c = a.child_labeled("C");
        let third = c.inject(&COUNTER).unwrap();
        assert!(!Rc::ptr_eq(&first, &third));
        assert_eq!(third.value.get(), 0);
    }

    #[test]
    fn test_implicit_token_installs_at_root() {
        let token = injectable(Counter::default);
        let root = Scope::root();
        let left = root.child();
        let right = root.child();

        let l = left.inject(&token).unwrap();
        let r = right.inject(&token).unwrap();
        assert!(Rc::ptr_eq(&l, &r));
        assert_eq!(left.resolve_owner(&token).as_deref(), Some("root"));
    }

    #[test]
    fn test_implicit_token_required() {
        let token = injectable(|| 0u8);
        let root = Scope::root_with(ContainerOptions::new().with_implicit(ImplicitPolicy::Require));
        assert_eq!(
            root.inject(&token).unwrap_err(),
            DiError::MissingProvider(token.name())
        );

        root.provide_token(&token).unwrap();
        assert_eq!(*root.inject(&token).unwrap(), 0);
    }
}
