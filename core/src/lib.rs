//! Core functionality for the Spider actor runtime.

pub mod actor;

pub use actor::*;
