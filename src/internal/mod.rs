//! Internal implementation details.

pub(crate) mod current;
pub(crate) mod dispose_bag;
pub(crate) mod runtime;

pub(crate) use dispose_bag::TeardownBag;
pub(crate) use runtime::Runtime;
