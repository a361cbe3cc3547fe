//! Core traits for the scoped injection container.

mod dispose;

pub use dispose::Dispose;
