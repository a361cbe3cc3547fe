//! Binding descriptors for introspection and diagnostics.

use std::fmt;

use crate::key::Key;
use crate::provider::ProviderKind;

/// Snapshot of one binding owned by a scope.
///
/// # Examples
///
/// ```rust
/// use scoped_inject::{Class, Provider, ProviderKind, Scope};
///
/// #[derive(Default)]
/// struct Counter;
///
/// let root = Scope::root();
/// root.provide(&Class::<Counter>::new(), Provider::class()).unwrap();
///
/// let view = root.child();
/// view.inject(&Class::<Counter>::new()).unwrap();
///
/// let binding = &root.bindings()[0];
/// assert_eq!(binding.provider, ProviderKind::Class);
/// assert_eq!(binding.live_count, 1);
/// assert!(binding.materialized);
/// assert!(binding.type_name().ends_with("Counter"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescriptor {
    /// The token identity
    pub key: Key,
    /// Value type produced by the binding
    pub value_type: &'static str,
    /// Active provider variant
    pub provider: ProviderKind,
    /// Outstanding acquires not yet released
    pub live_count: usize,
    /// Whether an instance is currently held
    pub materialized: bool,
    /// Instances produced so far
    pub materializations: u64,
    /// Instances discarded so far
    pub evictions: u64,
}

impl BindingDescriptor {
    /// Display name of the token.
    pub fn token_name(&self) -> &'static str {
        self.key.display_name()
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type
    }

    /// True while at least one consumer holds the instance.
    pub fn is_live(&self) -> bool {
        self.live_count > 0
    }
}

impl fmt::Display for BindingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) live={} materialized={}",
            self.token_name(),
            self.value_type,
            self.provider,
            self.live_count,
            self.materialized
        )
    }
}
