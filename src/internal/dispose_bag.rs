//! Internal teardown bag for scope teardown callbacks.

/// Teardown callbacks with LIFO execution order.
#[derive(Default)]
pub(crate) struct TeardownBag {
    hooks: Vec<Box<dyn FnOnce()>>,
}

impl TeardownBag {
    pub(crate) fn push(&mut self, f: Box<dyn FnOnce()>) {
        self.hooks.push(f);
    }

    /// Takes every pending hook, leaving the bag empty.
    ///
    /// Callers run the returned hooks after releasing their borrow on the bag,
    /// because a hook may register further hooks on the same scope.
    pub(crate) fn take(&mut self) -> TeardownBag {
        std::mem::take(self)
    }

    /// Execute all hooks in reverse order (LIFO).
    pub(crate) fn run_all_reverse(&mut self) {
        while let Some(f) = self.hooks.pop() {
            (f)();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.hooks.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
