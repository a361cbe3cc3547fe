//! Diagnostic observers for injector lifecycle events.
//!
//! Observers see every registration, materialization, acquire, release and
//! eviction in a scope tree, plus scope teardown. They are called
//! synchronously, so keep implementations cheap.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::Key;

/// Observer trait for injector lifecycle events.
///
/// All methods default to no-ops so implementations pick what they need.
///
/// # Examples
///
/// ```
/// use scoped_inject::{DiObserver, Key, Provider, Scope};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// #[derive(Default)]
/// struct EvictionLog {
///     evicted: RefCell<Vec<&'static str>>,
/// }
///
/// impl DiObserver for EvictionLog {
///     fn evicted(&self, key: &Key) {
///         self.evicted.borrow_mut().push(key.display_name());
///     }
/// }
///
/// let log = Rc::new(EvictionLog::default());
/// let root = Scope::root();
/// root.add_observer(log.clone());
///
/// let token = scoped_inject::injectable_named("session", || 1u32);
/// root.provide(&token, Provider::value(1)).unwrap();
///
/// let view = root.child();
/// view.inject(&token).unwrap();
/// view.destroy();
///
/// assert_eq!(*log.evicted.borrow(), vec!["session"]);
/// ```
pub trait DiObserver {
    /// A binding was installed in the scope at `scope_path`.
    fn registered(&self, _key: &Key, _scope_path: &str) {}

    /// An injector produced a new instance.
    fn materialized(&self, _key: &Key, _duration: Duration) {}

    /// A consumer acquired the instance; `live` is the count after the acquire.
    fn acquired(&self, _key: &Key, _live: usize) {}

    /// A consumer released the instance; `live` is the count after the release.
    fn released(&self, _key: &Key, _live: usize) {}

    /// The last consumer released and the instance was discarded.
    fn evicted(&self, _key: &Key) {}

    /// A release arrived with no live consumers.
    fn over_released(&self, _key: &Key) {}

    /// The scope at `scope_path` ran its teardown.
    fn scope_destroyed(&self, _scope_path: &str) {}
}

/// Observers registered on one scope tree.
///
/// Notification iterates a snapshot, so an observer may register further
/// observers without tripping a borrow.
pub(crate) struct Observers {
    observers: RefCell<Rc<[Rc<dyn DiObserver>]>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: RefCell::new(Rc::from(Vec::new())),
        }
    }

    pub(crate) fn add(&self, observer: Rc<dyn DiObserver>) {
        let mut observers = self.observers.borrow_mut();
        let mut next: Vec<_> = observers.iter().cloned().collect();
        next.push(observer);
        *observers = Rc::from(next);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.borrow().is_empty()
    }

    #[inline]
    pub(crate) fn notify(&self, event: impl Fn(&dyn DiObserver)) {
        if !self.has_observers() {
            return;
        }
        let snapshot = self.observers.borrow().clone();
        for observer in snapshot.iter() {
            event(observer.as_ref());
        }
    }
}

/// Built-in observer that forwards events to `tracing` at info level.
///
/// # Examples
///
/// ```
/// use scoped_inject::{LoggingObserver, Scope};
/// use std::rc::Rc;
///
/// let root = Scope::root();
/// root.add_observer(Rc::new(LoggingObserver::with_prefix("[app-di]")));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "[scoped-inject]".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn registered(&self, key: &Key, scope_path: &str) {
        tracing::info!(prefix = %self.prefix, token = key.display_name(), scope = scope_path, "provided");
    }

    fn materialized(&self, key: &Key, duration: Duration) {
        tracing::info!(prefix = %self.prefix, token = key.display_name(), ?duration, "materialized");
    }

    fn acquired(&self, key: &Key, live: usize) {
        tracing::info!(prefix = %self.prefix, token = key.display_name(), live, "acquired");
    }

    fn released(&self, key: &Key, live: usize) {
        tracing::info!(prefix = %self.prefix, token = key.display_name(), live, "released");
    }

    fn evicted(&self, key: &Key) {
        tracing::info!(prefix = %self.prefix, token = key.display_name(), "evicted");
    }

    fn over_released(&self, key: &Key) {
        tracing::warn!(prefix = %self.prefix, token = key.display_name(), "released with no live consumers");
    }

    fn scope_destroyed(&self, scope_path: &str) {
        tracing::info!(prefix = %self.prefix, scope = scope_path, "scope destroyed");
    }
}

/// Point-in-time counters collected by [`MetricsObserver`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleMetrics {
    pub registrations: u64,
    pub materializations: u64,
    pub acquisitions: u64,
    pub releases: u64,
    pub evictions: u64,
    pub over_releases: u64,
    pub scopes_destroyed: u64,
}

/// Observer that counts lifecycle events.
///
/// # Examples
///
/// ```
/// use scoped_inject::{injectable, MetricsObserver, Scope};
/// use std::rc::Rc;
///
/// let metrics = Rc::new(MetricsObserver::new());
/// let root = Scope::root();
/// root.add_observer(metrics.clone());
///
/// let token = injectable(|| 0u64);
/// let view = root.child();
/// view.inject(&token).unwrap();
/// view.inject(&token).unwrap();
/// view.destroy();
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.materializations, 1);
/// assert_eq!(snapshot.acquisitions, 2);
/// assert_eq!(snapshot.releases, 2);
/// assert_eq!(snapshot.evictions, 1);
/// ```
#[derive(Default)]
pub struct MetricsObserver {
    registrations: Cell<u64>,
    materializations: Cell<u64>,
    acquisitions: Cell<u64>,
    releases: Cell<u64>,
    evictions: Cell<u64>,
    over_releases: Cell<u64>,
    scopes_destroyed: Cell<u64>,
}

fn bump(counter: &Cell<u64>) {
    counter.set(counter.get() + 1);
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> LifecycleMetrics {
        LifecycleMetrics {
            registrations: self.registrations.get(),
            materializations: self.materializations.get(),
            acquisitions: self.acquisitions.get(),
            releases: self.releases.get(),
            evictions: self.evictions.get(),
            over_releases: self.over_releases.get(),
            scopes_destroyed: self.scopes_destroyed.get(),
        }
    }
}

impl DiObserver for MetricsObserver {
    fn registered(&self, _key: &Key, _scope_path: &str) {
        bump(&self.registrations);
    }

    fn materialized(&self, _key: &Key, _duration: Duration) {
        bump(&self.materializations);
    }

    fn acquired(&self, _key: &Key, _live: usize) {
        bump(&self.acquisitions);
    }

    fn released(&self, _key: &Key, _live: usize) {
        bump(&self.releases);
    }

    fn evicted(&self, _key: &Key) {
        bump(&self.evictions);
    }

    fn over_released(&self, _key: &Key) {
        bump(&self.over_releases);
    }

    fn scope_destroyed(&self, _scope_path: &str) {
        bump(&self.scopes_destroyed);
    }
}
