//! Thread-local stack of active scopes for the ambient API.

use std::cell::RefCell;

use crate::scope::Scope;

thread_local! {
    static ACTIVE_SCOPES: RefCell<Vec<Scope>> = const { RefCell::new(Vec::new()) };
}

/// Guard that keeps a scope active until dropped.
pub(crate) struct ActiveGuard {
    depth: usize,
}

impl ActiveGuard {
    pub(crate) fn enter(scope: &Scope) -> Self {
        let depth = ACTIVE_SCOPES.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(scope.clone());
            stack.len()
        });
        Self { depth }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        // Pop outside the borrow: the popped handle may be the last one and
        // its teardown can call back into `active()`.
        let popped = ACTIVE_SCOPES.with(|stack| {
            let mut stack = stack.borrow_mut();
            debug_assert_eq!(stack.len(), self.depth);
            stack.pop()
        });
        drop(popped);
    }
}

/// Innermost active scope, if any.
pub(crate) fn active() -> Option<Scope> {
    ACTIVE_SCOPES.with(|stack| stack.borrow().last().cloned())
}
