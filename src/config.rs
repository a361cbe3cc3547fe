//! Container options.
//!
//! Options are fixed when a root scope is created and shared by every scope
//! of that tree.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// What a release does when the injector has no live consumers left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum OverReleasePolicy {
    /// Log a warning and leave the counter at zero
    #[default]
    Ignore,
    /// Return `DiError::OverRelease`
    Error,
}

/// How an implicit-factory token resolves when no scope binds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ImplicitPolicy {
    /// Build an injector from the token's factory and install it at the root
    ///
    /// The binding stays on the root until the root is destroyed, so trees
    /// that create tokens on the fly keep one root binding per token.
    #[default]
    InstallAtRoot,
    /// Fail with `DiError::MissingProvider` like class tokens do
    Require,
}

/// Options shared by all scopes of one tree.
///
/// # Examples
///
/// ```
/// use scoped_inject::{ContainerOptions, OverReleasePolicy, Scope};
///
/// let options = ContainerOptions::new()
///     .with_over_release(OverReleasePolicy::Error)
///     .with_root_label("app");
///
/// let root = Scope::root_with(options);
/// assert_eq!(root.path(), "app");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    pub over_release: OverReleasePolicy,
    pub implicit: ImplicitPolicy,
    pub root_label: String,
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_over_release(mut self, policy: OverReleasePolicy) -> Self {
        self.over_release = policy;
        self
    }

    pub fn with_implicit(mut self, policy: ImplicitPolicy) -> Self {
        self.implicit = policy;
        self
    }

    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Loads options from JSON; missing fields keep their defaults.
    ///
    /// ```
    /// use scoped_inject::{ContainerOptions, ImplicitPolicy};
    ///
    /// let options = ContainerOptions::from_json(r#"{ "implicit": "require" }"#).unwrap();
    /// assert_eq!(options.implicit, ImplicitPolicy::Require);
    /// assert_eq!(options.root_label, "root");
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> crate::DiResult<Self> {
        serde_json::from_str(json).map_err(|e| crate::DiError::Config(e.to_string()))
    }

    #[cfg(feature = "config")]
    pub fn to_json(&self) -> crate::DiResult<String> {
        serde_json::to_string(self).map_err(|e| crate::DiError::Config(e.to_string()))
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            over_release: OverReleasePolicy::default(),
            implicit: ImplicitPolicy::default(),
            root_label: "root".to_string(),
        }
    }
}
