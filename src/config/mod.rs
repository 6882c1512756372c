//! Environment-variable-backed configuration.
//!
//! Settings are grouped into zero-sized structs with associated functions so
//! call sites read as `JwtConfig::secret()`. Values come from the process
//! environment, loaded from the profile `.env` file at startup.

pub mod auth_config;
pub mod data_config;
pub mod gateway_config;
pub mod notification_config;
pub mod storage_config;

pub use auth_config::*;
pub use data_config::*;
pub use gateway_config::*;
pub use notification_config::*;
pub use storage_config::*;
