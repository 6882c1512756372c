//! Application-wide error type.
//!
//! Every fallible path in the crate returns `Result<T, AppError>`. `AppError`
//! implements `actix_web::ResponseError`, so handlers propagate with `?` and
//! the framework renders the failure envelope
//! `{status, message, statusCode, data}` that the API uses for success and
//! failure alike.

use thiserror::Error;

/// All error categories the service can produce, each mapped to an HTTP
/// status code when it reaches the handler boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// MongoDB operation failure (500).
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis cache failure (500).
    #[error("Redis error: {0}")]
    RedisError(String),

    /// Request payload or business-rule validation failure (400).
    #[error("{0}")]
    ValidationError(String),

    /// Missing resource (404).
    #[error("{0}")]
    NotFound(String),

    /// Duplicate or state-conflicting write (409).
    #[error("{0}")]
    ConflictError(String),

    /// Failed login, bad or expired token (401).
    #[error("{0}")]
    AuthenticationError(String),

    /// Authenticated but not allowed (403).
    #[error("{0}")]
    AuthorizationError(String),

    /// Payment gateway, SMTP or object-storage failure (500).
    #[error("{0}")]
    ExternalServiceError(String),

    /// Anything unexpected (500).
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl actix_web::ResponseError for AppError {
    /// Renders the uniform failure envelope. Internal detail for 5xx errors
    /// goes to the log, not to the client.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();

        let message = if status.is_server_error() {
            log::error!("request failed: {}", self);
            match self {
                AppError::ExternalServiceError(msg) => msg.clone(),
                _ => "Something went wrong".to_string(),
            }
        } else {
            self.to_string()
        };

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "status": "failure",
            "message": message,
            "statusCode": status.as_u16(),
            "data": serde_json::Value::Null,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn validation_error_maps_to_400() {
        let error = AppError::ValidationError("Email already exists".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let error = AppError::NotFound("Course not found".to_string());
        assert_eq!(error.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn authentication_error_maps_to_401() {
        let error = AppError::AuthenticationError("Invalid token".to_string());
        assert_eq!(error.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn authorization_error_maps_to_403() {
        let error = AppError::AuthorizationError("Only tutors can create courses".to_string());
        assert_eq!(error.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn conflict_error_maps_to_409() {
        let error = AppError::ConflictError("Already enrolled".to_string());
        assert_eq!(error.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn infrastructure_errors_map_to_500() {
        for error in [
            AppError::DatabaseError("boom".to_string()),
            AppError::RedisError("boom".to_string()),
            AppError::InternalError("boom".to_string()),
        ] {
            assert_eq!(
                error.error_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn external_service_errors_keep_their_message() {
        let error = AppError::ExternalServiceError("Gateway timed out".to_string());
        assert_eq!(
            error.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
