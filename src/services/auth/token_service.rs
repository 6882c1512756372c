//! JWT issuing and verification.
//!
//! Tokens are HS256, signed with the shared secret from [`JwtConfig`], and
//! live for thirty days. Both students and back-office accounts go through
//! the same service; the role list inside the claims tells them apart.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use singleton_macro::service;

use crate::config::JwtConfig;
use crate::domain::models::token::token::TokenClaims;
use crate::errors::errors::AppError;

#[service(name = "token")]
pub struct TokenService {
    // No external dependencies.
}

impl TokenService {
    pub fn generate_token(
        &self,
        subject: &str,
        roles: Vec<String>,
        email: &str,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::days(JwtConfig::expiration_days());

        let claims = TokenClaims {
            sub: subject.to_string(),
            roles,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let secret = JwtConfig::secret();
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to sign token: {}", e)))
    }

    /// Seconds until a freshly issued token expires.
    pub fn expires_in(&self) -> i64 {
        JwtConfig::expiration_days() * 24 * 3600
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        let secret = JwtConfig::secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<TokenClaims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("Token has expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::AuthenticationError("Invalid token".to_string())
                }
                _ => AppError::AuthenticationError(format!("Token verification failed: {}", e)),
            })
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::AuthenticationError("Invalid authorization header format".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService {}
    }

    #[test]
    fn issued_token_round_trips() {
        let svc = service();
        let token = svc
            .generate_token(
                "507f1f77bcf86cd799439011",
                vec!["student".to_string()],
                "chi@example.com",
            )
            .unwrap();

        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "507f1f77bcf86cd799439011");
        assert_eq!(claims.roles, vec!["student".to_string()]);
        assert_eq!(claims.email, "chi@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let svc = service();
        assert!(matches!(
            svc.verify_token("not-a-jwt"),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn bearer_prefix_is_required() {
        let svc = service();
        assert_eq!(svc.extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(svc.extract_bearer_token("Token abc").is_err());
    }
}
