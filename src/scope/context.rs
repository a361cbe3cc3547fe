//! Context slots: the per-scope key/value store with ancestor inheritance.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use crate::injector::ErasedInjector;
use crate::key::Key;

/// One entry of a scope's context.
#[derive(Clone)]
pub(crate) enum Slot {
    /// Host-provided value set with `set_context`
    Value(Rc<dyn Any>),
    /// Binding installed by `provide` or the implicit-token flow
    Injector(Rc<dyn ErasedInjector>),
}

#[derive(Default)]
pub(crate) struct Context {
    slots: HashMap<Key, Slot>,
    // Insertion order, for stable diagnostics
    order: Vec<Key>,
}

impl Context {
    pub(crate) fn get(&self, key: &Key) -> Option<Slot> {
        self.slots.get(key).cloned()
    }

    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.slots.contains_key(key)
    }

    pub(crate) fn set(&mut self, key: Key, slot: Slot) {
        if self.slots.insert(key, slot).is_none() {
            self.order.push(key);
        }
    }

    pub(crate) fn injectors(&self) -> impl Iterator<Item = &Rc<dyn ErasedInjector>> {
        self.order.iter().filter_map(|key| match self.slots.get(key) {
            Some(Slot::Injector(injector)) => Some(injector),
            _ => None,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) -> Vec<Slot> {
        self.order.clear();
        self.slots.drain().map(|(_, slot)| slot).collect()
    }
}
