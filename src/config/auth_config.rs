//! Authentication settings: JWT signing and the bootstrap admin account.

use std::env;

use super::data_config::Environment;

/// JSON Web Token settings.
///
/// Access tokens are long-lived (30 days by default) because the frontend
/// has no refresh flow; sessions end by token expiry or explicit logout.
pub struct JwtConfig;

impl JwtConfig {
    /// HS256 signing secret.
    ///
    /// Falls back to a development-only default; production deployments must
    /// set `JWT_SECRET`.
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            if Environment::current() == Environment::Production {
                log::warn!("JWT_SECRET not set, using insecure default");
            }
            "your-secret-key".to_string()
        })
    }

    /// Token lifetime in days. `JWT_EXPIRATION_DAYS`, default 30.
    pub fn expiration_days() -> i64 {
        env::var("JWT_EXPIRATION_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30)
    }
}

/// Bootstrap admin account created on startup when no admin exists.
pub struct SeedConfig;

impl SeedConfig {
    pub fn admin_email() -> String {
        env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@learnsphere.io".to_string())
    }

    pub fn admin_password() -> Option<String> {
        env::var("ADMIN_PASSWORD").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiration_defaults_to_thirty_days() {
        if env::var("JWT_EXPIRATION_DAYS").is_err() {
            assert_eq!(JwtConfig::expiration_days(), 30);
        }
    }
}
