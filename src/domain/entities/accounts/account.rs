//! Back-office account entity: admins, tutors and staff share one
//! collection, distinguished by a role code.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Role codes persisted as strings, matching what the frontend sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "0")]
    Admin,
    #[serde(rename = "1")]
    Tutor,
    #[serde(rename = "2")]
    Staff,
}

impl Role {
    pub fn as_code(&self) -> &'static str {
        match self {
            Role::Admin => "0",
            Role::Tutor => "1",
            Role::Staff => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Role::Admin),
            "1" => Some(Role::Tutor),
            "2" => Some(Role::Staff),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Tutor => "Tutor",
            Role::Staff => "Staff",
        }
    }
}

/// Admin, tutor or staff account.
///
/// Created without a password; the holder sets one through the emailed
/// registration link before first login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Unique across the collection.
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// None until the set-password flow completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub role: Role,
    /// One-shot token for the set-password email link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_token_expires_at: Option<DateTime>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Account {
    pub fn new(first_name: String, last_name: String, email: String, role: Role) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            first_name,
            last_name,
            middle_name: None,
            email,
            phone_number: None,
            country: None,
            state: None,
            address: None,
            postal_code: None,
            profile_picture: None,
            description: None,
            password_hash: None,
            role,
            registration_token: None,
            registration_token_expires_at: None,
            is_active: true,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_tutor(&self) -> bool {
        self.role == Role::Tutor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_round_trip() {
        for role in [Role::Admin, Role::Tutor, Role::Staff] {
            assert_eq!(Role::from_code(role.as_code()), Some(role));
        }
        assert_eq!(Role::from_code("3"), None);
    }

    #[test]
    fn new_account_has_no_password() {
        let account = Account::new(
            "Ada".to_string(),
            "Obi".to_string(),
            "ada@example.com".to_string(),
            Role::Tutor,
        );
        assert!(account.password_hash.is_none());
        assert!(account.is_active);
        assert!(account.is_tutor());
    }
}
