//! Request-scoped identity extracted from a verified JWT.

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};

/// Identity placed into request extensions by the auth middleware and pulled
/// out by handlers through `FromRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// ObjectId hex of the student or account document.
    pub user_id: String,
    /// Role names: "student" for learners, "admin"/"tutor"/"staff" for
    /// back-office accounts.
    pub roles: Vec<String>,
    pub email: String,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|&role| self.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }

    pub fn is_tutor(&self) -> bool {
        self.has_role("tutor")
    }

    pub fn is_student(&self) -> bool {
        self.has_role("student")
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "Authentication required",
            ))),
        }
    }
}

/// Extractor for routes where authentication is optional.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "507f1f77bcf86cd799439011".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            email: "x@example.com".to_string(),
        }
    }

    #[test]
    fn role_checks() {
        let tutor = user(&["tutor"]);
        assert!(tutor.is_tutor());
        assert!(!tutor.is_admin());
        assert!(tutor.has_any_role(&["admin", "tutor"]));
        assert!(!tutor.has_any_role(&["admin", "staff"]));
    }
}
