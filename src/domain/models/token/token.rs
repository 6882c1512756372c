//! JWT claim payloads.

use serde::{Deserialize, Serialize};

/// Claims carried by access tokens. `sub` holds the document id hex of the
/// student or back-office account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub roles: Vec<String>,
    pub email: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl TokenClaims {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_inclusive_of_boundary() {
        let claims = TokenClaims {
            sub: "abc".into(),
            roles: vec!["student".into()],
            email: "s@example.com".into(),
            iat: 0,
            exp: 100,
        };
        assert!(!claims.is_expired(99));
        assert!(claims.is_expired(100));
    }
}
