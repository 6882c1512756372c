//! Back-office account request DTOs (admin, tutor, staff).

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::dto::students::request::validate_password_strength;
use crate::domain::entities::accounts::account::Role;

/// Admin-initiated registration of a tutor, staff member or fellow admin.
/// The new account receives a set-password email; no password is taken here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterAccountRequest {
    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    pub role: Role,

    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
}

/// Completes registration using the token from the set-password email.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(min = 1, message = "Registration token is required"))]
    pub token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AccountLoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,

    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub profile_picture: Option<String>,
    pub description: Option<String>,
}

/// Admin decision on a submitted course.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_moderation"))]
pub struct ModerateCourseRequest {
    /// "approved" or "rejected".
    pub status: String,

    /// Required when rejecting.
    pub rejection_reason: Option<String>,
}

fn validate_moderation(req: &ModerateCourseRequest) -> Result<(), ValidationError> {
    match req.status.as_str() {
        "approved" => Ok(()),
        "rejected" => {
            if req
                .rejection_reason
                .as_deref()
                .is_none_or(|reason| reason.trim().is_empty())
            {
                Err(ValidationError::new("missing_reason")
                    .with_message("A rejection reason is required".into()))
            } else {
                Ok(())
            }
        }
        _ => Err(ValidationError::new("invalid_status")
            .with_message("Status must be approved or rejected".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_requires_a_reason() {
        let req = ModerateCourseRequest {
            status: "rejected".into(),
            rejection_reason: None,
        };
        assert!(req.validate().is_err());

        let req = ModerateCourseRequest {
            status: "rejected".into(),
            rejection_reason: Some("Audio quality too low".into()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn approval_needs_no_reason() {
        let req = ModerateCourseRequest {
            status: "approved".into(),
            rejection_reason: None,
        };
        assert!(req.validate().is_ok());
    }
}
