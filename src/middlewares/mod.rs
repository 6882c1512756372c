//! Request pipeline middleware.
//!
//! [`AuthMiddleware`] verifies bearer tokens and enforces per-scope role
//! requirements. Attach it to a scope:
//!
//! ```rust,ignore
//! web::scope("/api/v1/tutor")
//!     .wrap(AuthMiddleware::any_role(&["tutor", "admin"]))
//!     .service(dashboard)
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
