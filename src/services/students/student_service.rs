//! Student account lifecycle: signup, email verification, login, password
//! reset and profile management.

use bcrypt::hash;
use chrono::{Duration, Utc};
use mongodb::bson::{DateTime, doc};
use singleton_macro::service;
use std::sync::Arc;

use crate::config::PasswordConfig;
use crate::domain::dto::students::request::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
    SignupRequest, UpdatePrivacyRequest, UpdateStudentProfileRequest, VerifyResetPinRequest,
};
use crate::domain::dto::students::response::{StudentLoginResponse, StudentResponse};
use crate::domain::entities::students::student::Student;
use crate::errors::errors::AppError;
use crate::repositories::commerce::payment_repo::PaymentRepository;
use crate::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use crate::repositories::courses::comment_repo::CommentRepository;
use crate::repositories::courses::review_repo::ReviewRepository;
use crate::repositories::messaging::chat_repo::ChatRepository;
use crate::repositories::messaging::message_repo::MessageRepository;
use crate::repositories::students::student_repo::StudentRepository;
use crate::services::auth::token_service::TokenService;
use crate::services::notifications::mail_service::MailService;
use crate::utils::token_gen::{generate_hex_token, generate_reset_pin};

const VERIFICATION_TOKEN_HOURS: i64 = 1;
const RESET_PIN_MINUTES: i64 = 10;

#[service(name = "student")]
pub struct StudentService {
    student_repo: Arc<StudentRepository>,
    purchasedcourse_repo: Arc<PurchasedCourseRepository>,
    review_repo: Arc<ReviewRepository>,
    comment_repo: Arc<CommentRepository>,
    chat_repo: Arc<ChatRepository>,
    message_repo: Arc<MessageRepository>,
    payment_repo: Arc<PaymentRepository>,
}

impl StudentService {
    /// Creates the account unverified and sends the verification email.
    /// Mail failure does not roll back the signup; the client can request a
    /// resend.
    pub async fn signup(&self, request: SignupRequest) -> Result<StudentResponse, AppError> {
        let password_hash = hash(&request.password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

        let mut student = Student::new(
            request.first_name,
            request.last_name,
            request.email.to_lowercase(),
            password_hash,
        );

        let token = generate_hex_token();
        student.verification_token = Some(token.clone());
        student.verification_token_expires_at =
            Some(bson_in(Duration::hours(VERIFICATION_TOKEN_HOURS)));

        let created = self.student_repo.create(student).await?;

        if let Err(e) = MailService::instance()
            .send_verification_email(&created.email, &created.first_name, &token)
            .await
        {
            log::error!("verification email to {} failed: {}", created.email, e);
        }

        Ok(StudentResponse::from(created))
    }

    /// Consumes the verification token, activating the account.
    pub async fn verify_email(&self, token: &str) -> Result<StudentResponse, AppError> {
        let student = self
            .student_repo
            .find_by_verification_token(token)
            .await?
            .ok_or_else(|| {
                AppError::ValidationError("Invalid or expired verification token".to_string())
            })?;

        if let Some(expires_at) = student.verification_token_expires_at {
            if expires_at < DateTime::now() {
                return Err(AppError::ValidationError(
                    "Invalid or expired verification token".to_string(),
                ));
            }
        }

        let id = student
            .id_string()
            .ok_or_else(|| AppError::InternalError("Student has no id".to_string()))?;

        let updated = self
            .student_repo
            .update_with_unset(
                &id,
                doc! {
                    "is_verified": true,
                    "is_active": true,
                    "updated_at": DateTime::now(),
                },
                &["verification_token", "verification_token_expires_at"],
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        Ok(StudentResponse::from(updated))
    }

    pub async fn resend_verification(&self, email: &str) -> Result<(), AppError> {
        let student = self
            .student_repo
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| AppError::NotFound("No account with this email".to_string()))?;

        if student.is_verified {
            return Err(AppError::ValidationError(
                "This account is already verified".to_string(),
            ));
        }

        let id = student
            .id_string()
            .ok_or_else(|| AppError::InternalError("Student has no id".to_string()))?;

        let token = generate_hex_token();
        self.student_repo
            .update(
                &id,
                doc! {
                    "verification_token": &token,
                    "verification_token_expires_at": bson_in(Duration::hours(VERIFICATION_TOKEN_HOURS)),
                    "updated_at": DateTime::now(),
                },
            )
            .await?;

        MailService::instance()
            .send_verification_email(&student.email, &student.first_name, &token)
            .await
    }

    pub async fn login(&self, request: LoginRequest) -> Result<StudentLoginResponse, AppError> {
        let student = self
            .student_repo
            .find_by_email(&request.email.to_lowercase())
            .await?
            .ok_or_else(|| AppError::NotFound("No account found for this email".to_string()))?;

        login_gate(&student)?;

        let password_hash = student.password_hash.as_ref().ok_or_else(|| {
            AppError::AuthenticationError("Invalid email or password".to_string())
        })?;

        let valid = bcrypt::verify(&request.password, password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        let id = student
            .id_string()
            .ok_or_else(|| AppError::InternalError("Student has no id".to_string()))?;

        let token_service = TokenService::instance();
        let access_token =
            token_service.generate_token(&id, vec!["student".to_string()], &student.email)?;

        Ok(StudentLoginResponse {
            student: StudentResponse::from(student),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: token_service.expires_in(),
        })
    }

    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<(), AppError> {
        let student = self
            .student_repo
            .find_by_email(&request.email.to_lowercase())
            .await?
            .ok_or_else(|| {
                AppError::ValidationError("No account found for this email".to_string())
            })?;

        let id = student
            .id_string()
            .ok_or_else(|| AppError::InternalError("Student has no id".to_string()))?;

        let pin = generate_reset_pin();
        self.student_repo
            .update(
                &id,
                doc! {
                    "reset_pin": &pin,
                    "reset_pin_expires_at": bson_in(Duration::minutes(RESET_PIN_MINUTES)),
                    "updated_at": DateTime::now(),
                },
            )
            .await?;

        MailService::instance()
            .send_reset_pin_email(&student.email, &student.first_name, &pin)
            .await
    }

    pub async fn verify_reset_pin(&self, request: VerifyResetPinRequest) -> Result<(), AppError> {
        self.check_reset_pin(&request.email, &request.pin)
            .await
            .map(|_| ())
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AppError> {
        let student = self.check_reset_pin(&request.email, &request.pin).await?;

        let id = student
            .id_string()
            .ok_or_else(|| AppError::InternalError("Student has no id".to_string()))?;

        let password_hash = hash(&request.new_password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

        self.student_repo
            .update_with_unset(
                &id,
                doc! {
                    "password_hash": password_hash,
                    "updated_at": DateTime::now(),
                },
                &["reset_pin", "reset_pin_expires_at"],
            )
            .await?;

        Ok(())
    }

    async fn check_reset_pin(&self, email: &str, pin: &str) -> Result<Student, AppError> {
        let student = self
            .student_repo
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| AppError::ValidationError("Invalid or expired PIN".to_string()))?;

        let stored = student
            .reset_pin
            .as_deref()
            .ok_or_else(|| AppError::ValidationError("Invalid or expired PIN".to_string()))?;

        let expired = student
            .reset_pin_expires_at
            .is_none_or(|at| at < DateTime::now());

        if stored != pin || expired {
            return Err(AppError::ValidationError(
                "Invalid or expired PIN".to_string(),
            ));
        }

        Ok(student)
    }

    pub async fn get_profile(&self, id: &str) -> Result<StudentResponse, AppError> {
        let student = self
            .student_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        Ok(StudentResponse::from(student))
    }

    pub async fn update_profile(
        &self,
        id: &str,
        request: UpdateStudentProfileRequest,
    ) -> Result<StudentResponse, AppError> {
        let mut update = doc! { "updated_at": DateTime::now() };

        if let Some(v) = request.first_name {
            update.insert("first_name", v);
        }
        if let Some(v) = request.last_name {
            update.insert("last_name", v);
        }
        if let Some(v) = request.phone_number {
            update.insert("phone_number", v);
        }
        if let Some(v) = request.country {
            update.insert("country", v);
        }
        if let Some(v) = request.state {
            update.insert("state", v);
        }
        if let Some(v) = request.address {
            update.insert("address", v);
        }
        if let Some(v) = request.postal_code {
            update.insert("postal_code", v);
        }
        if let Some(v) = request.profile_picture {
            update.insert("profile_picture", v);
        }
        if let Some(v) = request.description {
            update.insert("description", v);
        }

        let updated = self
            .student_repo
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        Ok(StudentResponse::from(updated))
    }

    pub async fn update_privacy(
        &self,
        id: &str,
        request: UpdatePrivacyRequest,
    ) -> Result<StudentResponse, AppError> {
        let mut update = doc! { "updated_at": DateTime::now() };

        if let Some(v) = request.show_profile {
            update.insert("privacy.show_profile", v);
        }
        if let Some(v) = request.show_courses {
            update.insert("privacy.show_courses", v);
        }
        if let Some(v) = request.block_popups {
            update.insert("privacy.block_popups", v);
        }
        if let Some(v) = request.store_activity_history {
            update.insert("privacy.store_activity_history", v);
        }

        let updated = self
            .student_repo
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        Ok(StudentResponse::from(updated))
    }

    pub async fn change_password(
        &self,
        id: &str,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let student = self
            .student_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        let current_hash = student
            .password_hash
            .as_ref()
            .ok_or_else(|| AppError::InternalError("Account has no password".to_string()))?;

        let valid = bcrypt::verify(&request.current_password, current_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::AuthenticationError(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash(&request.new_password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

        self.student_repo
            .update(
                id,
                doc! { "password_hash": new_hash, "updated_at": DateTime::now() },
            )
            .await?;

        Ok(())
    }

    /// Soft delete: the document stays for the money trail, the account
    /// stops authenticating. Everything the student produced goes dormant
    /// with it; payments lose the student reference but keep their rows.
    pub async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        let student = self
            .student_repo
            .update(
                id,
                doc! {
                    "is_active": false,
                    "deleted_at": DateTime::now(),
                    "updated_at": DateTime::now(),
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        let student_oid = student
            .id
            .ok_or_else(|| AppError::InternalError("Student has no id".to_string()))?;

        self.purchasedcourse_repo
            .deactivate_by_student(&student_oid)
            .await?;
        self.review_repo.deactivate_by_student(&student_oid).await?;
        self.comment_repo.deactivate_by_student(&student_oid).await?;
        self.chat_repo.deactivate_by_student(&student_oid).await?;
        self.message_repo.deactivate_by_sender(&student_oid).await?;
        self.payment_repo.detach_student(&student_oid).await?;

        Ok(())
    }
}

/// Account checks that run before the password is even looked at. An
/// unverified student is told to verify; a soft-deleted or deactivated
/// account reads as missing.
fn login_gate(student: &Student) -> Result<(), AppError> {
    if !student.is_verified {
        return Err(AppError::ValidationError(
            "Please verify your email before logging in".to_string(),
        ));
    }
    if !student.is_active || student.deleted_at.is_some() {
        return Err(AppError::NotFound(
            "No account found for this email".to_string(),
        ));
    }
    Ok(())
}

/// bson datetime `duration` from now.
fn bson_in(duration: Duration) -> DateTime {
    DateTime::from_millis((Utc::now() + duration).timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        Student::new(
            "Ada".to_string(),
            "Obi".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
        )
    }

    #[test]
    fn unverified_accounts_are_told_to_verify_first() {
        // Fresh signups are unverified and inactive; the verification
        // message must win over the missing-account one.
        let fresh = student();
        assert!(matches!(
            login_gate(&fresh),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn deactivated_accounts_read_as_missing() {
        let mut s = student();
        s.is_verified = true;
        s.is_active = false;
        assert!(matches!(login_gate(&s), Err(AppError::NotFound(_))));

        s.is_active = true;
        s.deleted_at = Some(DateTime::now());
        assert!(matches!(login_gate(&s), Err(AppError::NotFound(_))));
    }

    #[test]
    fn verified_active_accounts_pass_the_gate() {
        let mut s = student();
        s.is_verified = true;
        s.is_active = true;
        assert!(login_gate(&s).is_ok());
    }
}
