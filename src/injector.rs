//! Lazily materialized, reference-counted singleton holder.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use std::time::Instant;

use crate::config::OverReleasePolicy;
use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::internal::Runtime;
use crate::key::Key;
use crate::provider::Provider;

type EvictHook<T> = Box<dyn Fn(&T)>;

/// Per-scope holder of one lazily created instance and its live-consumer count.
///
/// The instance is created on the first [`acquire`](Injector::acquire) after
/// the count was zero and discarded when the matching releases bring the
/// count back to zero; the next acquire then produces a fresh instance.
///
/// Scopes create injectors on [`Scope::provide`](crate::Scope::provide); a
/// standalone injector is handy for driving the lifecycle directly.
///
/// # Examples
///
/// ```
/// use scoped_inject::{Injector, Key, Provider};
/// use std::rc::Rc;
///
/// let injector = Injector::new(Key::named("buffer"), Provider::factory(|| vec![0u8; 4]));
///
/// let a = injector.acquire();
/// let b = injector.acquire();
/// assert!(Rc::ptr_eq(&a, &b));
/// assert_eq!(injector.live_count(), 2);
///
/// injector.release().unwrap();
/// injector.release().unwrap();
/// assert!(!injector.is_materialized());
///
/// let c = injector.acquire();
/// assert!(!Rc::ptr_eq(&a, &c));
/// ```
pub struct Injector<T: 'static> {
    key: Key,
    provider: Provider<T>,
    instance: RefCell<Option<Rc<T>>>,
    live: Cell<usize>,
    materializations: Cell<u64>,
    evictions: Cell<u64>,
    on_evict: Option<EvictHook<T>>,
    runtime: Rc<Runtime>,
}

impl<T: 'static> Injector<T> {
    /// Creates a detached injector using default container options.
    pub fn new(key: Key, provider: Provider<T>) -> Self {
        Self::with_runtime(key, provider, Rc::new(Runtime::default()))
    }

    pub(crate) fn with_runtime(key: Key, provider: Provider<T>, runtime: Rc<Runtime>) -> Self {
        Self {
            key,
            provider,
            instance: RefCell::new(None),
            live: Cell::new(0),
            materializations: Cell::new(0),
            evictions: Cell::new(0),
            on_evict: None,
            runtime,
        }
    }

    /// Runs `hook` on the instance each time it is evicted.
    pub fn on_evict<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        self.on_evict = Some(Box::new(hook));
        self
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Number of acquires not yet matched by a release.
    pub fn live_count(&self) -> usize {
        self.live.get()
    }

    pub fn is_materialized(&self) -> bool {
        self.instance.borrow().is_some()
    }

    /// Returns the shared instance, materializing it if absent, and counts one
    /// more live consumer.
    pub fn acquire(&self) -> Rc<T> {
        let cached = self.instance.borrow().clone();
        let instance = match cached {
            Some(instance) => instance,
            None => self.materialize(),
        };

        let live = self.live.get() + 1;
        self.live.set(live);
        tracing::trace!(token = self.key.display_name(), live, "acquired");
        self.runtime.observers.notify(|o| o.acquired(&self.key, live));
        instance
    }

    fn materialize(&self) -> Rc<T> {
        let started = Instant::now();
        // No borrow is held while the provider runs so it may resolve other
        // dependencies.
        let created = self.provider.materialize();
        let duration = started.elapsed();

        let mut slot = self.instance.borrow_mut();
        if let Some(existing) = slot.as_ref() {
            // The provider re-entered this injector and already stored one.
            return existing.clone();
        }
        *slot = Some(created.clone());
        drop(slot);

        self.live.set(0);
        self.materializations.set(self.materializations.get() + 1);
        tracing::debug!(
            token = self.key.display_name(),
            provider = %self.provider.kind(),
            ?duration,
            "materialized"
        );
        self.runtime.observers.notify(|o| o.materialized(&self.key, duration));
        created
    }

    /// Drops one live consumer; the last one evicts the instance.
    ///
    /// A release with no live consumers never drives the count below zero; it
    /// either is ignored or fails depending on
    /// [`OverReleasePolicy`](crate::OverReleasePolicy).
    pub fn release(&self) -> DiResult<()> {
        match self.live.get() {
            0 => {
                tracing::warn!(token = self.key.display_name(), "released with no live consumers");
                self.runtime.observers.notify(|o| o.over_released(&self.key));
                match self.runtime.options.over_release {
                    OverReleasePolicy::Ignore => Ok(()),
                    OverReleasePolicy::Error => Err(DiError::OverRelease(self.key.display_name())),
                }
            }
            1 => {
                let evicted = self.instance.borrow_mut().take();
                self.live.set(0);
                self.runtime.observers.notify(|o| o.released(&self.key, 0));
                if let Some(instance) = evicted {
                    self.evictions.set(self.evictions.get() + 1);
                    if let Some(hook) = &self.on_evict {
                        hook(&instance);
                    }
                    tracing::debug!(token = self.key.display_name(), "evicted");
                    self.runtime.observers.notify(|o| o.evicted(&self.key));
                }
                Ok(())
            }
            n => {
                self.live.set(n - 1);
                tracing::trace!(token = self.key.display_name(), live = n - 1, "released");
                self.runtime.observers.notify(|o| o.released(&self.key, n - 1));
                Ok(())
            }
        }
    }
}

impl<T: 'static> fmt::Debug for Injector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("key", &self.key)
            .field("provider", &self.provider.kind())
            .field("live", &self.live.get())
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

/// Type-erased view of an injector stored in a scope slot.
pub(crate) trait ErasedInjector {
    fn describe(&self) -> BindingDescriptor;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: 'static> ErasedInjector for Injector<T> {
    fn describe(&self) -> BindingDescriptor {
        BindingDescriptor {
            key: self.key,
            value_type: std::any::type_name::<T>(),
            provider: self.provider.kind(),
            live_count: self.live.get(),
            materialized: self.is_materialized(),
            materializations: self.materializations.get(),
            evictions: self.evictions.get(),
        }
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// An acquired instance with an explicit release capability.
///
/// Unlike [`Scope::inject`](crate::Scope::inject), a lease is not tied to the
/// consuming scope's teardown. It releases exactly once: on
/// [`release`](Lease::release) or, failing that, on drop.
///
/// # Examples
///
/// ```
/// use scoped_inject::{Class, Provider, Scope};
///
/// #[derive(Default)]
/// struct Connection;
///
/// let root = Scope::root();
/// root.provide(&Class::<Connection>::new(), Provider::class()).unwrap();
///
/// let lease = root.inject_lease(&Class::<Connection>::new()).unwrap();
/// assert_eq!(root.bindings()[0].live_count, 1);
/// lease.release().unwrap();
/// assert_eq!(root.bindings()[0].live_count, 0);
/// ```
pub struct Lease<T: 'static> {
    instance: Rc<T>,
    injector: Option<Rc<Injector<T>>>,
}

impl<T: 'static> Lease<T> {
    pub(crate) fn acquire(injector: Rc<Injector<T>>) -> Self {
        let instance = injector.acquire();
        Self {
            instance,
            injector: Some(injector),
        }
    }

    /// Shared handle to the leased instance.
    pub fn shared(&self) -> Rc<T> {
        self.instance.clone()
    }

    /// Releases the lease, surfacing over-release errors.
    pub fn release(mut self) -> DiResult<()> {
        match self.injector.take() {
            Some(injector) => injector.release(),
            None => Ok(()),
        }
    }
}

impl<T: 'static> Deref for Lease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.instance
    }
}

impl<T: 'static> Drop for Lease<T> {
    fn drop(&mut self) {
        if let Some(injector) = self.injector.take() {
            if let Err(e) = injector.release() {
                tracing::warn!(error = %e, "lease release failed");
            }
        }
    }
}

impl<T: 'static> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("type", &std::any::type_name::<T>())
            .field("released", &self.injector.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContainerOptions;

    fn counting_injector(calls: Rc<Cell<u32>>) -> Injector<u32> {
        Injector::new(
            Key::named("counter"),
            Provider::factory(move || {
                calls.set(calls.get() + 1);
                calls.get()
            }),
        )
    }

    #[test]
    fn test_lazy_until_first_acquire() {
        let calls = Rc::new(Cell::new(0));
        let injector = counting_injector(calls.clone());
        assert_eq!(calls.get(), 0);
        assert!(!injector.is_materialized());

        injector.acquire();
        assert_eq!(calls.get(), 1);
        assert!(injector.is_materialized());
    }

    #[test]
    fn test_cached_while_live() {
        let calls = Rc::new(Cell::new(0));
        let injector = counting_injector(calls.clone());

        let a = injector.acquire();
        let b = injector.acquire();
        injector.release().unwrap();
        let c = injector.acquire();

        assert!(Rc::ptr_eq(&a, &b));
        assert!(Rc::ptr_eq(&a, &c));
        assert_eq!(calls.get(), 1);
        assert_eq!(injector.live_count(), 2);
    }

    #[test]
    fn test_recreated_after_eviction() {
        let calls = Rc::new(Cell::new(0));
        let injector = counting_injector(calls.clone());

        let first = injector.acquire();
        injector.release().unwrap();
        assert!(!injector.is_materialized());

        let second = injector.acquire();
        assert_eq!(*first, 1);
        assert_eq!(*second, 2);
        assert_eq!(injector.describe().evictions, 1);
        assert_eq!(injector.describe().materializations, 2);
    }

    #[test]
    fn test_over_release_ignored_by_default() {
        let injector = Injector::new(Key::named("x"), Provider::value(1u8));
        assert!(injector.release().is_ok());
        assert_eq!(injector.live_count(), 0);

        // Counter still returns to zero normally afterwards
        injector.acquire();
        injector.release().unwrap();
        assert!(!injector.is_materialized());
    }

    #[test]
    fn test_over_release_strict() {
        let runtime = Rc::new(Runtime::new(
            ContainerOptions::new().with_over_release(OverReleasePolicy::Error),
        ));
        let injector = Injector::with_runtime(Key::named("x"), Provider::value(1u8), runtime);
        assert_eq!(injector.release(), Err(DiError::OverRelease("x")));
        assert_eq!(injector.live_count(), 0);
    }

    #[test]
    fn test_evict_hook_runs_once_per_eviction() {
        let evicted = Rc::new(Cell::new(0));
        let evicted_clone = evicted.clone();
        let injector = Injector::new(Key::named("x"), Provider::factory(|| 5u8))
            .on_evict(move |v| {
                assert_eq!(*v, 5);
                evicted_clone.set(evicted_clone.get() + 1);
            });

        injector.acquire();
        injector.acquire();
        injector.release().unwrap();
        assert_eq!(evicted.get(), 0);
        injector.release().unwrap();
        assert_eq!(evicted.get(), 1);
    }

    #[test]
    fn test_lease_releases_once() {
        let injector = Rc::new(Injector::new(Key::named("x"), Provider::value(3u8)));
        let lease = Lease::acquire(injector.clone());
        let other = Lease::acquire(injector.clone());
        assert_eq!(*lease, 3);
        assert_eq!(injector.live_count(), 2);

        lease.release().unwrap();
        assert_eq!(injector.live_count(), 1);
        drop(other);
        assert_eq!(injector.live_count(), 0);
        assert!(!injector.is_materialized());
    }
}
