//! The scope tree: context inheritance, teardown and the provide/inject API.
//!
//! A [`Scope`] is one node of the host's component tree. It owns context
//! slots that descendants inherit unless they define their own, and a list of
//! teardown callbacks that run exactly once when the scope is destroyed.

mod context;

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{ContainerOptions, ImplicitPolicy};
use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::injector::{ErasedInjector, Injector, Lease};
use crate::internal::{Runtime, TeardownBag};
use crate::key::Key;
use crate::observer::DiObserver;
use crate::provider::{Provider, ProviderKind};
use crate::token::{Dependency, Token};
use crate::traits::Dispose;

use self::context::{Context, Slot};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// A node of the scope tree.
///
/// Handles are cheap to clone and share the same node. The node is destroyed
/// by [`destroy`](Scope::destroy) or when its last handle is dropped,
/// whichever comes first. Destroying a scope destroys its live descendants
/// first (deepest first), then runs its own teardown callbacks in LIFO order.
///
/// # Examples
///
/// ```
/// use scoped_inject::{Class, Provider, Scope};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// #[derive(Default)]
/// struct Counter {
///     value: Cell<i32>,
/// }
///
/// impl Counter {
///     fn increment(&self) {
///         self.value.set(self.value.get() + 1);
///     }
/// }
///
/// const COUNTER: Class<Counter> = Class::new();
///
/// let a = Scope::root();
/// a.provide(&COUNTER, Provider::class()).unwrap();
///
/// let b = a.child();
/// let first = b.inject(&COUNTER).unwrap();
/// let second = b.inject(&COUNTER).unwrap();
/// first.increment();
/// assert!(Rc::ptr_eq(&first, &second));
/// assert_eq!(second.value.get(), 1);
///
/// b.destroy();
///
/// let c = a.child();
/// assert_eq!(c.inject(&COUNTER).unwrap().value.get(), 0);
/// ```
#[derive(Clone)]
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    id: u64,
    label: String,
    depth: usize,
    parent: Option<Scope>,
    runtime: Rc<Runtime>,
    context: RefCell<Context>,
    children: RefCell<Vec<Weak<ScopeInner>>>,
    teardown: RefCell<TeardownBag>,
    destroyed: Cell<bool>,
}

impl Scope {
    /// Creates the root of a new tree with default options.
    pub fn root() -> Self {
        Self::root_with(ContainerOptions::default())
    }

    /// Creates the root of a new tree.
    pub fn root_with(options: ContainerOptions) -> Self {
        let label = options.root_label.clone();
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        Self::new_node(id, label, None, Rc::new(Runtime::new(options)))
    }

    fn new_node(id: u64, label: String, parent: Option<Scope>, runtime: Rc<Runtime>) -> Self {
        let depth = parent.as_ref().map_or(0, |p| p.inner.depth + 1);
        let destroyed = parent.as_ref().is_some_and(|p| p.is_destroyed());
        Self {
            inner: Rc::new(ScopeInner {
                id,
                label,
                depth,
                parent,
                runtime,
                context: RefCell::new(Context::default()),
                children: RefCell::new(Vec::new()),
                teardown: RefCell::new(TeardownBag::default()),
                destroyed: Cell::new(destroyed),
            }),
        }
    }

    /// Creates a child scope labeled after its id.
    ///
    /// A child of a destroyed scope is born destroyed.
    pub fn child(&self) -> Scope {
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        self.child_with_id(id, format!("scope-{id}"))
    }

    /// Creates a child scope with the given label.
    ///
    /// ```
    /// use scoped_inject::Scope;
    ///
    /// let root = Scope::root();
    /// let page = root.child_labeled("page");
    /// let widget = page.child_labeled("widget");
    ///
    /// assert_eq!(widget.depth(), 2);
    /// assert_eq!(widget.path(), "root/page/widget");
    /// ```
    pub fn child_labeled(&self, label: impl Into<String>) -> Scope {
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        self.child_with_id(id, label.into())
    }

    fn child_with_id(&self, id: u64, label: String) -> Scope {
        let child = Self::new_node(id, label, Some(self.clone()), self.inner.runtime.clone());
        let mut children = self.inner.children.borrow_mut();
        children.retain(|c| c.strong_count() > 0);
        children.push(Rc::downgrade(&child.inner));
        child
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Distance from the root (0 for the root itself).
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.inner.parent.as_ref()
    }

    /// The root of this scope's tree.
    pub fn root_scope(&self) -> Scope {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current.clone()
    }

    /// Labels from the root down to this scope, joined with `/`.
    pub fn path(&self) -> String {
        self.inner.path()
    }

    /// Options shared by this tree.
    pub fn options(&self) -> &ContainerOptions {
        &self.inner.runtime.options
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// True when both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Registers an observer for every scope of this tree.
    pub fn add_observer(&self, observer: Rc<dyn DiObserver>) {
        self.inner.runtime.observers.add(observer);
    }

    fn ensure_alive(&self) -> DiResult<()> {
        if self.is_destroyed() {
            Err(DiError::ScopeDestroyed(self.path()))
        } else {
            Ok(())
        }
    }

    // ===== Teardown =====

    /// Attaches a callback that runs exactly once when this scope is destroyed.
    ///
    /// Fails on a scope that was already destroyed, since the callback could
    /// never run.
    pub fn on_teardown<F>(&self, callback: F) -> DiResult<()>
    where
        F: FnOnce() + 'static,
    {
        self.ensure_alive()?;
        self.inner.teardown.borrow_mut().push(Box::new(callback));
        Ok(())
    }

    /// Number of teardown callbacks waiting to run.
    pub fn pending_teardowns(&self) -> usize {
        self.inner.teardown.borrow().len()
    }

    /// Destroys live descendants, then runs this scope's teardown callbacks.
    ///
    /// Calling it again is a no-op.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    // ===== Context =====

    /// Sets a context value on this scope, replacing any own entry under `key`.
    pub fn set_context<V: 'static>(&self, key: Key, value: V) -> DiResult<()> {
        self.ensure_alive()?;
        self.inner
            .context
            .borrow_mut()
            .set(key, Slot::Value(Rc::new(value)));
        Ok(())
    }

    /// Looks up the nearest context value under `key`, walking to the root.
    ///
    /// Returns `None` when the nearest entry holds a different type.
    ///
    /// ```
    /// use scoped_inject::{Key, Scope};
    ///
    /// let root = Scope::root();
    /// root.set_context(Key::named("theme"), "dark").unwrap();
    ///
    /// let child = root.child();
    /// assert_eq!(*child.get_context::<&str>(&Key::named("theme")).unwrap(), "dark");
    ///
    /// child.set_context(Key::named("theme"), "light").unwrap();
    /// assert_eq!(*child.get_context::<&str>(&Key::named("theme")).unwrap(), "light");
    /// assert_eq!(*root.get_context::<&str>(&Key::named("theme")).unwrap(), "dark");
    /// ```
    pub fn get_context<V: 'static>(&self, key: &Key) -> Option<Rc<V>> {
        match self.find_slot(key)?.1 {
            Slot::Value(value) => value.downcast::<V>().ok(),
            Slot::Injector(_) => None,
        }
    }

    /// Looks up a context value set on this scope only.
    pub fn get_own_context<V: 'static>(&self, key: &Key) -> Option<Rc<V>> {
        match self.inner.context.borrow().get(key)? {
            Slot::Value(value) => value.downcast::<V>().ok(),
            Slot::Injector(_) => None,
        }
    }

    /// Nearest slot for `key` and the scope that owns it.
    fn find_slot(&self, key: &Key) -> Option<(Scope, Slot)> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(slot) = scope.inner.context.borrow().get(key) {
                return Some((scope.clone(), slot));
            }
            current = scope.parent();
        }
        None
    }

    // ===== Registration =====

    /// Binds `provider` to `dependency` in this scope.
    ///
    /// Fails with [`DiError::DuplicateRegistration`] when this scope already
    /// has a binding for the same identity. Bindings on ancestors do not
    /// count: a child may shadow them.
    ///
    /// ```
    /// use scoped_inject::{injectable, DiError, Provider, Scope};
    ///
    /// let greeting = injectable(|| "hello");
    /// let root = Scope::root();
    /// root.provide(&greeting, Provider::value("hi")).unwrap();
    ///
    /// assert!(matches!(
    ///     root.provide(&greeting, Provider::value("hey")),
    ///     Err(DiError::DuplicateRegistration(_))
    /// ));
    ///
    /// let child = root.child();
    /// child.provide(&greeting, Provider::value("yo")).unwrap();
    /// assert_eq!(*child.inject(&greeting).unwrap(), "yo");
    /// ```
    pub fn provide<T, D>(&self, dependency: &D, provider: Provider<T>) -> DiResult<()>
    where
        T: 'static,
        D: Dependency<T> + ?Sized,
    {
        let key = dependency.key();
        self.install(Rc::new(Injector::with_runtime(
            key,
            provider,
            self.inner.runtime.clone(),
        )))
        .map(|_| ())
    }

    /// Binds a self-sufficient token to its own factory in this scope.
    ///
    /// Consumers below this scope share one instance from here instead of
    /// the tree-wide one installed at the root.
    pub fn provide_token<T: 'static>(&self, token: &Token<T>) -> DiResult<()> {
        self.provide(token, token.provider())
    }

    /// Like [`provide`](Scope::provide), and disposes each instance when it
    /// is evicted.
    ///
    /// A [`Provider::Value`] hands out the same instance after every
    /// eviction, so it is never disposed.
    pub fn provide_disposable<T, D>(&self, dependency: &D, provider: Provider<T>) -> DiResult<()>
    where
        T: Dispose,
        D: Dependency<T> + ?Sized,
    {
        let key = dependency.key();
        let disposes = provider.kind() != ProviderKind::Value;
        let mut injector = Injector::with_runtime(key, provider, self.inner.runtime.clone());
        if disposes {
            injector = injector.on_evict(|instance: &T| instance.dispose());
        }
        self.install(Rc::new(injector)).map(|_| ())
    }

    fn install<T: 'static>(&self, injector: Rc<Injector<T>>) -> DiResult<Rc<Injector<T>>> {
        self.ensure_alive()?;
        let key = injector.key();
        {
            let mut context = self.inner.context.borrow_mut();
            if context.contains(&key) {
                return Err(DiError::DuplicateRegistration(key.display_name()));
            }
            context.set(key, Slot::Injector(injector.clone()));
        }

        let path = self.path();
        tracing::debug!(token = key.display_name(), scope = %path, "provided");
        self.inner
            .runtime
            .observers
            .notify(|o| o.registered(&key, &path));
        Ok(injector)
    }

    // ===== Resolution =====

    /// Resolves `dependency` to the shared instance of the nearest binding.
    ///
    /// Each call counts one live consumer and registers one release on this
    /// scope's teardown, so destroying a scope that injected a token `k`
    /// times releases it `k` times.
    ///
    /// Fails with [`DiError::MissingProvider`] when no scope in the chain
    /// binds the identity. Self-sufficient tokens fall back to their own
    /// factory under [`ImplicitPolicy::InstallAtRoot`].
    pub fn inject<T, D>(&self, dependency: &D) -> DiResult<Rc<T>>
    where
        T: 'static,
        D: Dependency<T> + ?Sized,
    {
        let injector = self.lookup(dependency)?;
        let instance = injector.acquire();
        self.inner.teardown.borrow_mut().push(Box::new(move || {
            if let Err(e) = injector.release() {
                tracing::warn!(error = %e, "release during teardown failed");
            }
        }));
        Ok(instance)
    }

    /// Like [`inject`](Scope::inject) but maps a missing binding to `None`.
    pub fn try_inject<T, D>(&self, dependency: &D) -> DiResult<Option<Rc<T>>>
    where
        T: 'static,
        D: Dependency<T> + ?Sized,
    {
        match self.inject(dependency) {
            Ok(instance) => Ok(Some(instance)),
            Err(DiError::MissingProvider(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolves `dependency` into a [`Lease`] that is released explicitly
    /// (or on drop) instead of on this scope's teardown.
    pub fn inject_lease<T, D>(&self, dependency: &D) -> DiResult<Lease<T>>
    where
        T: 'static,
        D: Dependency<T> + ?Sized,
    {
        let injector = self.lookup(dependency)?;
        Ok(Lease::acquire(injector))
    }

    /// Path of the scope owning the binding `dependency` resolves to.
    pub fn resolve_owner<T, D>(&self, dependency: &D) -> Option<String>
    where
        T: 'static,
        D: Dependency<T> + ?Sized,
    {
        match self.find_slot(&dependency.key())? {
            (owner, Slot::Injector(_)) => Some(owner.path()),
            (_, Slot::Value(_)) => None,
        }
    }

    fn lookup<T, D>(&self, dependency: &D) -> DiResult<Rc<Injector<T>>>
    where
        T: 'static,
        D: Dependency<T> + ?Sized,
    {
        self.ensure_alive()?;
        let key = dependency.key();
        match self.find_slot(&key) {
            Some((_, Slot::Injector(erased))) => downcast_injector(erased, &key),
            Some((_, Slot::Value(_))) => Err(DiError::TypeMismatch(key.display_name())),
            None => match (dependency.implicit_provider(), self.options().implicit) {
                (Some(provider), ImplicitPolicy::InstallAtRoot) => {
                    let injector = Rc::new(Injector::with_runtime(
                        key,
                        provider,
                        self.inner.runtime.clone(),
                    ));
                    self.root_scope().install(injector)
                }
                _ => Err(DiError::MissingProvider(key.display_name())),
            },
        }
    }

    // ===== Diagnostics =====

    /// Descriptors of the bindings owned by this scope, in registration order.
    pub fn bindings(&self) -> Vec<BindingDescriptor> {
        self.inner
            .context
            .borrow()
            .injectors()
            .map(|injector| injector.describe())
            .collect()
    }
}

fn downcast_injector<T: 'static>(
    erased: Rc<dyn ErasedInjector>,
    key: &Key,
) -> DiResult<Rc<Injector<T>>> {
    let any: Rc<dyn Any> = erased.into_any();
    any.downcast::<Injector<T>>()
        .map_err(|_| DiError::TypeMismatch(key.display_name()))
}

impl ScopeInner {
    fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}/{}", parent.inner.path(), self.label),
            None => self.label.clone(),
        }
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }

        let children: Vec<_> = self.children.borrow_mut().drain(..).collect();
        for child in children.into_iter().rev() {
            if let Some(child) = child.upgrade() {
                child.destroy();
            }
        }

        // Hooks run without the bag borrowed; late registrations are rejected
        // because `destroyed` is already set.
        let mut hooks = self.teardown.borrow_mut().take();
        hooks.run_all_reverse();

        // Injectors owned here go away with the scope
        let slots = self.context.borrow_mut().clear();
        drop(slots);

        let path = self.path();
        tracing::debug!(scope = %path, "scope destroyed");
        self.runtime.observers.notify(|o| o.scope_destroyed(&path));
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.inner.id)
            .field("path", &self.path())
            .field("bindings", &self.inner.context.borrow().len())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
