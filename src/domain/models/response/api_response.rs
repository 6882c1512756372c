//! Uniform success envelope returned by every handler.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};

/// Success payload shape: `{ status, message, statusCode, data }`.
/// Failures are rendered by `AppError::error_response` with the same shape
/// and `data: null`.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: Value,
}

impl ApiResponse {
    pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
        Self::build(StatusCode::OK, message, data)
    }

    pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
        Self::build(StatusCode::CREATED, message, data)
    }

    pub fn build<T: Serialize>(
        code: StatusCode,
        message: impl Into<String>,
        data: T,
    ) -> HttpResponse {
        let body = ApiResponse {
            status: "success",
            message: message.into(),
            status_code: code.as_u16(),
            data: json!(data),
        };
        HttpResponse::build(code).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_with_camel_case_status_code() {
        let body = ApiResponse {
            status: "success",
            message: "ok".into(),
            status_code: 200,
            data: json!({"id": 1}),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["data"]["id"], 1);
    }
}
