//! Business logic singletons, one service per feature area.

pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod commerce;
pub mod courses;
pub mod messaging;
pub mod notifications;
pub mod payments;
pub mod storage;
pub mod students;
