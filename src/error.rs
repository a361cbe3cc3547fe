//! Error types for the scoped injection container.

use std::fmt;

/// Dependency injection errors
///
/// Represents the failures that can occur while registering providers,
/// resolving tokens or operating on the scope tree. Every variant is a
/// wiring bug rather than a transient condition: the container never retries
/// and never substitutes a default value.
///
/// # Examples
///
/// ```rust
/// use scoped_inject::{Class, DiError, Scope};
///
/// #[derive(Default)]
/// struct Counter;
///
/// let root = Scope::root();
/// match root.inject(&Class::<Counter>::new()) {
///     Err(DiError::MissingProvider(name)) => assert!(name.ends_with("Counter")),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use scoped_inject::DiError;
///
/// let duplicate = DiError::DuplicateRegistration("Counter");
/// let missing = DiError::MissingProvider("Counter");
///
/// println!("Error: {}", duplicate);
/// println!("Error: {}", missing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// The current scope already owns a binding for the token
    DuplicateRegistration(&'static str),
    /// No scope in the chain has a binding for the token
    MissingProvider(&'static str),
    /// The binding found for the token holds a different value type
    TypeMismatch(&'static str),
    /// Release requested with no live consumers (strict policy only)
    OverRelease(&'static str),
    /// Operation attempted on a scope that was already torn down
    ScopeDestroyed(String),
    /// Ambient API used outside of `with_scope`
    NoActiveScope,
    /// Container options could not be loaded
    Config(String),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::DuplicateRegistration(name) => {
                write!(f, "Dependency already provided in this scope: {}", name)
            }
            DiError::MissingProvider(name) => write!(f, "Dependency was not provided: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::OverRelease(name) => {
                write!(f, "Released more times than injected: {}", name)
            }
            DiError::ScopeDestroyed(path) => write!(f, "Scope already destroyed: {}", path),
            DiError::NoActiveScope => write!(f, "No active scope on this thread"),
            DiError::Config(msg) => write!(f, "Invalid container options: {}", msg),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate.
///
/// # Examples
///
/// ```rust
/// use scoped_inject::{DiError, DiResult};
///
/// fn lookup() -> DiResult<u32> {
///     Err(DiError::MissingProvider("u32"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
