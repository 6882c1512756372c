//! Back-office account lifecycle: admin-driven registration, set-password,
//! login and profile management for admins, tutors and staff.

use bcrypt::hash;
use chrono::{Duration, Utc};
use mongodb::bson::{DateTime, doc};
use singleton_macro::service;
use std::sync::Arc;

use crate::config::{PasswordConfig, SeedConfig};
use crate::domain::dto::accounts::request::{
    AccountLoginRequest, RegisterAccountRequest, SetPasswordRequest, UpdateAccountRequest,
};
use crate::domain::dto::students::request::ChangePasswordRequest;
use crate::domain::dto::accounts::response::{AccountLoginResponse, AccountResponse};
use crate::domain::entities::accounts::account::{Account, Role};
use crate::errors::errors::AppError;
use crate::repositories::accounts::account_repo::AccountRepository;
use crate::services::auth::token_service::TokenService;
use crate::services::notifications::mail_service::MailService;
use crate::utils::token_gen::generate_hex_token;

const REGISTRATION_TOKEN_HOURS: i64 = 48;

#[service(name = "account")]
pub struct AccountService {
    account_repo: Arc<AccountRepository>,
}

impl AccountService {
    /// Admin registers a tutor, staff member or another admin. The account
    /// starts without a password; the holder sets one through the emailed
    /// link.
    pub async fn register(
        &self,
        request: RegisterAccountRequest,
    ) -> Result<AccountResponse, AppError> {
        let mut account = Account::new(
            request.first_name,
            request.last_name,
            request.email.to_lowercase(),
            request.role,
        );
        account.phone_number = request.phone_number;
        account.country = request.country;
        account.description = request.description;

        let token = generate_hex_token();
        account.registration_token = Some(token.clone());
        account.registration_token_expires_at =
            Some(bson_in(Duration::hours(REGISTRATION_TOKEN_HOURS)));

        let created = self.account_repo.create(account).await?;

        if let Err(e) = MailService::instance()
            .send_set_password_email(
                &created.email,
                &created.first_name,
                created.role.label(),
                &token,
            )
            .await
        {
            log::error!("set-password email to {} failed: {}", created.email, e);
        }

        Ok(AccountResponse::from(created))
    }

    /// Completes registration by consuming the emailed token.
    pub async fn set_password(&self, request: SetPasswordRequest) -> Result<(), AppError> {
        let account = self
            .account_repo
            .find_by_registration_token(&request.token)
            .await?
            .ok_or_else(|| {
                AppError::ValidationError("Invalid or expired registration token".to_string())
            })?;

        if let Some(expires_at) = account.registration_token_expires_at {
            if expires_at < DateTime::now() {
                return Err(AppError::ValidationError(
                    "Invalid or expired registration token".to_string(),
                ));
            }
        }

        let id = account
            .id_string()
            .ok_or_else(|| AppError::InternalError("Account has no id".to_string()))?;

        let password_hash = hash(&request.password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

        self.account_repo
            .update_with_unset(
                &id,
                doc! { "password_hash": password_hash, "updated_at": DateTime::now() },
                &["registration_token", "registration_token_expires_at"],
            )
            .await?;

        Ok(())
    }

    pub async fn login(&self, request: AccountLoginRequest) -> Result<AccountLoginResponse, AppError> {
        let account = self
            .account_repo
            .find_by_email(&request.email.to_lowercase())
            .await?
            .ok_or_else(|| {
                AppError::AuthenticationError("Invalid email or password".to_string())
            })?;

        let password_hash = account.password_hash.as_ref().ok_or_else(|| {
            AppError::AuthenticationError(
                "Please set your password using the link in your email".to_string(),
            )
        })?;

        let valid = bcrypt::verify(&request.password, password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        if !account.is_active || account.deleted_at.is_some() {
            return Err(AppError::AuthenticationError(
                "This account has been deactivated".to_string(),
            ));
        }

        let id = account
            .id_string()
            .ok_or_else(|| AppError::InternalError("Account has no id".to_string()))?;

        let role = account.role.label().to_lowercase();

        let token_service = TokenService::instance();
        let access_token = token_service.generate_token(&id, vec![role], &account.email)?;

        Ok(AccountLoginResponse {
            account: AccountResponse::from(account),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: token_service.expires_in(),
        })
    }

    pub async fn get(&self, id: &str) -> Result<AccountResponse, AppError> {
        let account = self
            .account_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        Ok(AccountResponse::from(account))
    }

    pub async fn list_by_role(
        &self,
        role: Role,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<AccountResponse>, AppError> {
        let accounts = self.account_repo.find_by_role(role, skip, limit).await?;
        Ok(accounts.into_iter().map(AccountResponse::from).collect())
    }

    pub async fn update_profile(
        &self,
        id: &str,
        request: UpdateAccountRequest,
    ) -> Result<AccountResponse, AppError> {
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
            .account_repo
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        Ok(AccountResponse::from(updated))
    }

    pub async fn change_password(
        &self,
        id: &str,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let account = self
            .account_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        let password_hash = account.password_hash.as_ref().ok_or_else(|| {
            AppError::ValidationError("This account has not set a password yet".to_string())
        })?;

        let valid = bcrypt::verify(&request.current_password, password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::AuthenticationError(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash(&request.new_password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

        self.account_repo
            .update(id, doc! { "password_hash": new_hash, "updated_at": DateTime::now() })
            .await?;

        Ok(())
    }

    pub async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        self.account_repo
            .update(
                id,
                doc! {
                    "is_active": false,
                    "deleted_at": DateTime::now(),
                    "updated_at": DateTime::now(),
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        Ok(())
    }

    /// Ensures a bootstrap admin exists. Runs once at startup; does nothing
    /// when the admin email is already registered or no seed password is
    /// configured.
    pub async fn seed_admin(&self) -> Result<(), AppError> {
        let email = SeedConfig::admin_email();

        if self.account_repo.find_by_email(&email).await?.is_some() {
            return Ok(());
        }

        let Some(password) = SeedConfig::admin_password() else {
            log::warn!("no seed admin password configured, skipping admin seeding");
            return Ok(());
        };

        let password_hash = hash(&password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

        let mut admin = Account::new(
            "Platform".to_string(),
            "Admin".to_string(),
            email.clone(),
            Role::Admin,
        );
        admin.password_hash = Some(password_hash);

        self.account_repo.create(admin).await?;
        log::info!("seeded bootstrap admin {}", email);

        Ok(())
    }
}

fn bson_in(duration: Duration) -> DateTime {
    DateTime::from_millis((Utc::now() + duration).timestamp_millis())
}
