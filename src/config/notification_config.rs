//! Transactional email (SMTP) and frontend link settings.

use std::env;

pub struct EmailConfig;

impl EmailConfig {
    pub fn smtp_server() -> String {
        env::var("EMAIL_SERVER").unwrap_or_else(|_| "smtp.gmail.com".to_string())
    }

    pub fn smtp_port() -> u16 {
        env::var("EMAIL_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .unwrap_or(587)
    }

    pub fn username() -> String {
        env::var("EMAIL_USER").unwrap_or_default()
    }

    pub fn password() -> String {
        env::var("EMAIL_PASSWORD").unwrap_or_default()
    }

    /// From address on outgoing mail, defaults to the SMTP username.
    pub fn from_address() -> String {
        env::var("EMAIL_FROM").unwrap_or_else(|_| Self::username())
    }
}

/// Base URLs used when composing links in emails.
pub struct FrontendConfig;

impl FrontendConfig {
    /// Student-facing frontend (email verification, password reset).
    pub fn student_base_url() -> String {
        env::var("FRONTEND_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
    }

    /// Back-office frontend (staff set-password links).
    pub fn admin_base_url() -> String {
        env::var("ADMIN_FRONTEND_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
    }
}
