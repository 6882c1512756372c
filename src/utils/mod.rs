//! Shared utility helpers.

pub mod token_gen;
