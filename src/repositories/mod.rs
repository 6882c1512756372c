//! Data access layer.
//!
//! Repositories are registered as singletons through the `#[repository]`
//! macro, with MongoDB as the primary store and Redis as a read-through
//! cache for the hot single-document lookups.
//!
//! ```rust,ignore
//! use crate::repositories::students::student_repo::StudentRepository;
//!
//! let repo = StudentRepository::instance();
//! let student = repo.find_by_email("chi@example.com").await?;
//! ```

pub mod accounts;
pub mod banking;
pub mod commerce;
pub mod courses;
pub mod messaging;
pub mod students;
