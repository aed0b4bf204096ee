//! Concurrent collections and synchronization helpers used by the Spider actor runtime.

pub mod collections;
pub mod concurrent;
