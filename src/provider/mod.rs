//! Providers describe how a binding produces its value.

use std::fmt;
use std::rc::Rc;

/// How to produce the value for a token.
///
/// Exactly one variant is active per provider, and nothing is produced until
/// the owning [`Injector`](crate::Injector) is first acquired.
///
/// # Examples
///
/// ```
/// use scoped_inject::{Provider, ProviderKind};
///
/// #[derive(Default)]
/// struct Counter {
///     value: i32,
/// }
///
/// let by_value = Provider::value(Counter { value: 3 });
/// let by_class = Provider::<Counter>::class();
/// let by_factory = Provider::factory(|| Counter { value: 7 });
///
/// assert_eq!(by_value.kind(), ProviderKind::Value);
/// assert_eq!(by_class.kind(), ProviderKind::Class);
/// assert_eq!(by_factory.kind(), ProviderKind::Factory);
/// assert_eq!(by_factory.materialize().value, 7);
/// ```
pub enum Provider<T: 'static> {
    /// Precomputed value; every materialization shares it
    Value(Rc<T>),
    /// Zero-argument constructor
    Class(fn() -> T),
    /// Zero-argument factory closure
    Factory(Rc<dyn Fn() -> T>),
}

impl<T: 'static> Provider<T> {
    /// Provides a precomputed value.
    pub fn value(value: T) -> Self {
        Provider::Value(Rc::new(value))
    }

    /// Provides an already shared value.
    pub fn shared(value: Rc<T>) -> Self {
        Provider::Value(value)
    }

    /// Constructs the type through its `Default` implementation.
    pub fn class() -> Self
    where
        T: Default,
    {
        Provider::Class(T::default)
    }

    /// Constructs the type through an explicit constructor function.
    pub fn constructor(ctor: fn() -> T) -> Self {
        Provider::Class(ctor)
    }

    /// Produces the value by calling `factory`.
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Provider::Factory(Rc::new(factory))
    }

    /// Reports which variant is active.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Value(_) => ProviderKind::Value,
            Provider::Class(_) => ProviderKind::Class,
            Provider::Factory(_) => ProviderKind::Factory,
        }
    }

    /// Produces a fresh instance (or the shared value for `Value`).
    pub fn materialize(&self) -> Rc<T> {
        match self {
            Provider::Value(value) => value.clone(),
            Provider::Class(ctor) => Rc::new(ctor()),
            Provider::Factory(factory) => Rc::new(factory()),
        }
    }
}

impl<T: 'static> Clone for Provider<T> {
    fn clone(&self) -> Self {
        match self {
            Provider::Value(value) => Provider::Value(value.clone()),
            Provider::Class(ctor) => Provider::Class(*ctor),
            Provider::Factory(factory) => Provider::Factory(factory.clone()),
        }
    }
}

impl<T: 'static> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Provider")
            .field(&self.kind())
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

/// Variant tag of a [`Provider`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Value,
    Class,
    Factory,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Value => "value",
            ProviderKind::Class => "class",
            ProviderKind::Factory => "factory",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter {
        value: Cell<i32>,
    }

    #[test]
    fn test_value_provider_shares_instance() {
        let provider = Provider::value(Counter::default());
        let a = provider.materialize();
        let b = provider.materialize();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_class_provider_constructs_fresh() {
        let provider = Provider::<Counter>::class();
        let a = provider.materialize();
        a.value.set(5);
        let b = provider.materialize();
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(b.value.get(), 0);
    }

    #[test]
    fn test_constructor_provider() {
        fn make() -> Counter {
            Counter { value: Cell::new(9) }
        }
        let provider = Provider::constructor(make);
        assert_eq!(provider.kind(), ProviderKind::Class);
        assert_eq!(provider.materialize().value.get(), 9);
    }

    #[test]
    fn test_factory_provider_runs_each_time() {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let provider = Provider::factory(move || {
            calls_clone.set(calls_clone.get() + 1);
            Counter::default()
        });

        assert_eq!(calls.get(), 0);
        provider.materialize();
        provider.clone().materialize();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ProviderKind::Value.to_string(), "value");
        assert_eq!(ProviderKind::Class.to_string(), "class");
        assert_eq!(ProviderKind::Factory.to_string(), "factory");
    }
}
