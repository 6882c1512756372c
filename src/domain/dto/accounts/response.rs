use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::accounts::account::{Account, Role};

/// Public view of a back-office account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub profile_picture: Option<String>,
    pub description: Option<String>,
    pub role: Role,
    pub role_label: String,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            phone_number: account.phone_number,
            country: account.country,
            state: account.state,
            address: account.address,
            postal_code: account.postal_code,
            profile_picture: account.profile_picture,
            description: account.description,
            role_label: account.role.label().to_string(),
            role: account.role,
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLoginResponse {
    pub account: AccountResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
