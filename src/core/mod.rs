//! Core framework pieces: the singleton registry backing the `#[service]`
//! and `#[repository]` macros.

pub mod registry;

pub use registry::*;
