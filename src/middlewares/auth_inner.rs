//! The service half of [`AuthMiddleware`]: token extraction, verification
//! and role enforcement.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, forward_ready};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::auth::authentication_request::{AuthMode, RequiredRole};
use crate::errors::errors::AppError;
use crate::services::auth::token_service::TokenService;

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let auth_result = authenticate(&req);

            match (mode, auth_result) {
                (AuthMode::Required, Err(err)) => {
                    log::warn!("authentication failed: {}", err);
                    return Ok(reject(req, 401, "A valid access token is required"));
                }
                (AuthMode::Required, Ok(user)) => {
                    if let Some(ref required) = required_role {
                        if !required.is_satisfied(&user.roles) {
                            log::warn!(
                                "insufficient role for user {}: has {:?}, needs {:?}",
                                user.user_id,
                                user.roles,
                                required
                            );
                            return Ok(reject(
                                req,
                                403,
                                "You do not have permission to access this resource",
                            ));
                        }
                    }

                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Ok(user)) => {
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Err(_)) => {}
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let token_service = TokenService::instance();

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Missing Authorization header".to_string()))?;

    let token = token_service.extract_bearer_token(auth_header)?;
    let claims = token_service.verify_token(token)?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        roles: claims.roles,
        email: claims.email,
    })
}

/// Short-circuits the pipeline with the uniform failure envelope.
fn reject<B>(req: ServiceRequest, status: u16, message: &str) -> ServiceResponse<EitherBody<B>> {
    let response = match status {
        401 => HttpResponse::Unauthorized(),
        _ => HttpResponse::Forbidden(),
    }
    .json(serde_json::json!({
        "status": "failure",
        "message": message,
        "statusCode": status,
        "data": serde_json::Value::Null,
    }));

    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}
