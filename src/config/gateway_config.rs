//! Payment gateway (Paystack) settings.

use std::env;

pub struct PaystackConfig;

impl PaystackConfig {
    /// REST base URL, `PAYSTACK_BASE_URL`, default the public API.
    pub fn base_url() -> String {
        env::var("PAYSTACK_BASE_URL").unwrap_or_else(|_| "https://api.paystack.co".to_string())
    }

    /// Secret key used as a bearer token on every gateway call and as the
    /// HMAC key for webhook signature verification.
    pub fn secret_key() -> String {
        env::var("PAYSTACK_SECRET_KEY").unwrap_or_default()
    }

    /// Settlement currency, `PAYSTACK_CURRENCY`, default NGN.
    pub fn currency() -> String {
        env::var("PAYSTACK_CURRENCY").unwrap_or_else(|_| "NGN".to_string())
    }

    /// Platform share of tutor revenue, fixed at 10 percent.
    pub const PLATFORM_CHARGE_RATE: f64 = 0.10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_has_public_default() {
        if env::var("PAYSTACK_BASE_URL").is_err() {
            assert_eq!(PaystackConfig::base_url(), "https://api.paystack.co");
        }
    }
}
