//! State shared by every scope and injector of one tree.

use crate::config::ContainerOptions;
use crate::observer::Observers;

pub(crate) struct Runtime {
    pub(crate) options: ContainerOptions,
    pub(crate) observers: Observers,
}

impl Runtime {
    pub(crate) fn new(options: ContainerOptions) -> Self {
        Self {
            options,
            observers: Observers::new(),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(ContainerOptions::default())
    }
}
