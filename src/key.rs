//! Binding key types for scope context slots.

use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

/// Key for context slot storage and lookup.
///
/// Keys identify a dependency inside a scope's context. The display name
/// carried next to the identity is only used for diagnostics and error
/// messages; it never takes part in equality or hashing.
///
/// # Key Types
///
/// - **Token**: identity minted for every implicit-factory token
/// - **Type**: a consumer-supplied type used as its own token
/// - **Named**: ad-hoc context entries set by the host
///
/// # Examples
///
/// ```rust
/// use scoped_inject::{injectable, key_of_type, Key};
///
/// let a = injectable(|| 1u32);
/// let b = injectable(|| 1u32);
///
/// // Every token gets its own identity, even with the same value type
/// assert_ne!(a.key(), b.key());
/// assert_eq!(a.key(), a.clone().key());
///
/// assert_eq!(key_of_type::<String>(), key_of_type::<String>());
/// assert_eq!(Key::named("theme").display_name(), "theme");
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Key {
    /// Minted token identity with display name
    Token(u64, &'static str),
    /// Type identity with type name for diagnostics
    Type(TypeId, &'static str),
    /// Host-chosen context key
    Named(&'static str),
}

impl Key {
    /// Mints a fresh token identity that compares unequal to every other key.
    pub fn next_token(name: &'static str) -> Self {
        Key::Token(NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed), name)
    }

    /// Creates a key for a host-chosen context entry.
    pub fn named(name: &'static str) -> Self {
        Key::Named(name)
    }

    /// Get the token or type name for display
    ///
    /// ```rust
    /// use scoped_inject::{key_of_type, Key};
    ///
    /// assert_eq!(key_of_type::<u8>().display_name(), "u8");
    /// assert_eq!(Key::next_token("Counter").display_name(), "Counter");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Token(_, name) => name,
            Key::Type(_, name) => name,
            Key::Named(name) => name,
        }
    }
}

// Identity comparison only; names are diagnostics
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Token(a, _), Key::Token(b, _)) => a == b,
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Named(a), Key::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Token(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Type(id, _) => {
                1u8.hash(state);
                id.hash(state);
            }
            Key::Named(name) => {
                2u8.hash(state);
                name.hash(state);
            }
        }
    }
}

#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}
