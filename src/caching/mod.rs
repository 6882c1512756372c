//! Caching layer: Redis-backed JSON cache with TTL support.

pub mod redis;
