//! LearnSphere backend: a multi-tenant e-learning platform API.
//!
//! Students sign up, buy courses through Paystack, track their learning
//! progress and message their tutors; tutors author courses, follow their
//! sales and withdraw earnings; admins moderate submitted courses and watch
//! platform-wide numbers.
//!
//! # Architecture
//!
//! Requests flow through four layers:
//!
//! ```text
//! Routes ──▶ Handlers ──▶ Services ──▶ Repositories ──▶ MongoDB + Redis
//! ```
//!
//! Services and repositories are singletons wired by `singleton_macro`;
//! handlers resolve them with `Service::instance()` and never hold state of
//! their own. MongoDB is the system of record, Redis caches hot documents,
//! and completed purchases are only ever written by the Paystack webhook.
//!
//! # Examples
//!
//! ```rust,ignore
//! use learnsphere_backend::services::courses::course_service::CourseService;
//!
//! let course = CourseService::instance().get_detail(&course_id).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
