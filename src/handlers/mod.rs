//! HTTP endpoint handlers, one module per feature area.
//!
//! Handlers stay thin: validate the payload, resolve the service singleton,
//! call it and wrap the result in the response envelope. Identity always
//! comes from the [`AuthenticatedUser`] extractor that the auth middleware
//! feeds, never from the request body or path.
//!
//! [`AuthenticatedUser`]: crate::domain::models::auth::authenticated_user::AuthenticatedUser

pub mod accounts;
pub mod admin;
pub mod banking;
pub mod cart;
pub mod courses;
pub mod messaging;
pub mod progress;
pub mod students;
pub mod tutor;
pub mod uploads;
pub mod webhooks;
