//! Student-facing request DTOs.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_passwords_match"))]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    pub confirm_password: String,
}

fn validate_passwords_match(req: &SignupRequest) -> Result<(), ValidationError> {
    if req.password != req.confirm_password {
        return Err(ValidationError::new("passwords_mismatch")
            .with_message("Passwords do not match".into()));
    }
    Ok(())
}

/// Requires at least one uppercase letter, one lowercase letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_uppercase && has_lowercase && has_digit) {
        return Err(ValidationError::new("weak_password").with_message(
            "Password must contain uppercase, lowercase and a digit".into(),
        ));
    }
    Ok(())
}

/// Query string of the emailed verification link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[serde(rename = "verificationToken")]
    #[validate(length(min = 1, message = "Verification token is required"))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyResetPinRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Reset PIN must be 6 digits"))]
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Reset PIN must be 6 digits"))]
    pub pin: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

/// Profile update. Every field optional; only supplied fields change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStudentProfileRequest {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePrivacyRequest {
    pub show_profile: Option<bool>,
    pub show_courses: Option<bool>,
    pub block_popups: Option<bool>,
    pub store_activity_history: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

/// Query string for `GET /recommendations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationQuery {
    /// random | related | different | sameTutor. Defaults to random.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

impl RecommendationQuery {
    pub fn pagination(&self) -> (u64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        ((page - 1) * limit as u64, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_pagination_defaults_and_clamps() {
        assert_eq!(RecommendationQuery::default().pagination(), (0, 20));

        let q = RecommendationQuery {
            kind: None,
            page: Some(3),
            limit: Some(500),
        };
        assert_eq!(q.pagination(), (200, 100));
    }

    #[test]
    fn signup_rejects_mismatched_passwords() {
        let req = SignupRequest {
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            email: "ada@example.com".into(),
            password: "Password1".into(),
            confirm_password: "Password2".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn signup_rejects_weak_password() {
        let req = SignupRequest {
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            email: "ada@example.com".into(),
            password: "alllowercase1".into(),
            confirm_password: "alllowercase1".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn signup_accepts_valid_payload() {
        let req = SignupRequest {
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            email: "ada@example.com".into(),
            password: "Password1".into(),
            confirm_password: "Password1".into(),
        };
        assert!(req.validate().is_ok());
    }
}
