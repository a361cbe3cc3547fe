//! Tokens identify dependencies.
//!
//! Two flavors coexist. A [`Token`] made by [`injectable`] carries its own
//! factory and needs no registration step. A [`Class`] token uses the type
//! itself as identity and must be bound with
//! [`Scope::provide`](crate::Scope::provide) before it can be injected.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::key::{key_of_type, Key};
use crate::provider::Provider;

/// Anything that can be resolved to a `T` inside a scope.
pub trait Dependency<T: 'static> {
    /// Identity used as the context slot key.
    fn key(&self) -> Key;

    /// Provider to fall back on when no scope in the chain binds the key.
    fn implicit_provider(&self) -> Option<Provider<T>> {
        None
    }
}

/// Self-sufficient token carrying a default factory.
///
/// Clones share identity with the original.
///
/// # Examples
///
/// ```
/// use scoped_inject::{injectable, Scope};
///
/// struct Settings {
///     dark_mode: bool,
/// }
///
/// let settings = injectable(|| Settings { dark_mode: true });
///
/// let root = Scope::root();
/// let view = root.child();
/// assert!(view.inject(&settings).unwrap().dark_mode);
/// ```
pub struct Token<T: 'static> {
    key: Key,
    factory: Rc<dyn Fn() -> T>,
}

impl<T: 'static> Token<T> {
    /// Identity of this token.
    pub fn key(&self) -> Key {
        self.key
    }

    /// Display name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Provider backed by this token's own factory.
    pub fn provider(&self) -> Provider<T> {
        Provider::Factory(self.factory.clone())
    }
}

impl<T: 'static> Clone for Token<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            factory: self.factory.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token").field("key", &self.key).finish()
    }
}

impl<T: 'static> Dependency<T> for Token<T> {
    fn key(&self) -> Key {
        self.key
    }

    fn implicit_provider(&self) -> Option<Provider<T>> {
        Some(self.provider())
    }
}

/// Creates a self-sufficient token named after the value type.
pub fn injectable<T, F>(factory: F) -> Token<T>
where
    T: 'static,
    F: Fn() -> T + 'static,
{
    injectable_named(std::any::type_name::<T>(), factory)
}

/// Creates a self-sufficient token with an explicit display name.
///
/// ```
/// use scoped_inject::injectable_named;
///
/// let token = injectable_named("theme", || "dark".to_string());
/// assert_eq!(token.name(), "theme");
/// ```
pub fn injectable_named<T, F>(name: &'static str, factory: F) -> Token<T>
where
    T: 'static,
    F: Fn() -> T + 'static,
{
    Token {
        key: Key::next_token(name),
        factory: Rc::new(factory),
    }
}

/// Explicit-class token: the type is its own identity.
///
/// # Examples
///
/// ```
/// use scoped_inject::{Class, Provider, Scope};
///
/// #[derive(Default)]
/// struct Counter;
///
/// const COUNTER: Class<Counter> = Class::new();
///
/// let root = Scope::root();
/// root.provide(&COUNTER, Provider::class()).unwrap();
/// assert!(root.child().inject(&COUNTER).is_ok());
/// ```
pub struct Class<T: 'static>(PhantomData<fn() -> T>);

impl<T: 'static> Class<T> {
    pub const fn new() -> Self {
        Class(PhantomData)
    }
}

impl<T: 'static> Default for Class<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Clone for Class<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Class<T> {}

impl<T: 'static> fmt::Debug for Class<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class<{}>", std::any::type_name::<T>())
    }
}

impl<T: 'static> Dependency<T> for Class<T> {
    fn key(&self) -> Key {
        key_of_type::<T>()
    }
}
