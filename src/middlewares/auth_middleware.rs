//! JWT authentication middleware.
//!
//! Verifies the bearer token on the way in and stores the resulting
//! [`AuthenticatedUser`] in the request extensions for extractors and
//! handlers downstream.

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::{
    Error, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};

use crate::domain::models::auth::authentication_request::{AuthMode, RequiredRole};
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware {
    mode: AuthMode,
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    /// Requires a valid token; any role is accepted.
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// Records the identity when a valid token is present, lets the
    /// request through either way.
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    /// Requires a valid token carrying exactly this role.
    pub fn role(role: &'static str) -> Self {
        Self {
            mode: AuthMode::Required,
            required_role: Some(RequiredRole::Single(role)),
        }
    }

    /// Requires a valid token carrying at least one of these roles.
    pub fn any_role(roles: &'static [&'static str]) -> Self {
        Self {
            mode: AuthMode::Required,
            required_role: Some(RequiredRole::Any(roles)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode,
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_constructor_sets_requirement() {
        let mw = AuthMiddleware::role("admin");
        assert_eq!(mw.mode, AuthMode::Required);
        assert!(matches!(mw.required_role, Some(RequiredRole::Single("admin"))));
    }

    #[test]
    fn optional_constructor_has_no_role_requirement() {
        let mw = AuthMiddleware::optional();
        assert_eq!(mw.mode, AuthMode::Optional);
        assert!(mw.required_role.is_none());
    }
}
