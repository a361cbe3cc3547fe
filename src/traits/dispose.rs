//! Disposal trait for resource cleanup on eviction.

/// Trait for synchronous resource disposal.
///
/// Implement this trait for instances that need structured teardown (e.g.
/// closing a connection or flushing a buffer). When bound with
/// [`Scope::provide_disposable`](crate::Scope::provide_disposable), `dispose`
/// runs each time the last consumer releases the instance.
///
/// # Examples
///
/// ```
/// use scoped_inject::{Class, Dispose, Provider, Scope};
/// use std::cell::Cell;
///
/// #[derive(Default)]
/// struct Socket {
///     open: Cell<bool>,
/// }
///
/// impl Dispose for Socket {
///     fn dispose(&self) {
///         self.open.set(false);
///     }
/// }
///
/// let root = Scope::root();
/// root.provide_disposable(
///     &Class::<Socket>::new(),
///     Provider::factory(|| Socket { open: Cell::new(true) }),
/// )
/// .unwrap();
///
/// let view = root.child();
/// let socket = view.inject(&Class::<Socket>::new()).unwrap();
/// assert!(socket.open.get());
///
/// view.destroy();
/// assert!(!socket.open.get());
/// ```
pub trait Dispose: 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
