//! Student account entity.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Per-student privacy toggles, all on by default except popup blocking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub show_profile: bool,
    pub show_courses: bool,
    pub block_popups: bool,
    pub store_activity_history: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            show_profile: true,
            show_courses: true,
            block_popups: false,
            store_activity_history: true,
        }
    }
}

/// Learner account. Signup leaves the account unverified and inactive until
/// the emailed verification link is followed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    /// Unique across the collection.
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
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
    /// Hex token from the verification email, cleared once used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token_expires_at: Option<DateTime>,
    pub is_verified: bool,
    /// Six-digit PIN for the forgot-password flow, 10 minute lifetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_pin_expires_at: Option<DateTime>,
    pub is_active: bool,
    /// Soft-delete marker; deactivated accounts keep their documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
    #[serde(default)]
    pub privacy: PrivacySettings,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Student {
    pub fn new(first_name: String, last_name: String, email: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            first_name,
            last_name,
            email,
            password_hash: Some(password_hash),
            phone_number: None,
            country: None,
            state: None,
            address: None,
            postal_code: None,
            profile_picture: None,
            description: None,
            verification_token: None,
            verification_token_expires_at: None,
            is_verified: false,
            reset_pin: None,
            reset_pin_expires_at: None,
            is_active: false,
            deleted_at: None,
            privacy: PrivacySettings::default(),
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_student_starts_unverified_and_inactive() {
        let student = Student::new(
            "Chi".to_string(),
            "Ike".to_string(),
            "chi@example.com".to_string(),
            "hash".to_string(),
        );
        assert!(!student.is_verified);
        assert!(!student.is_active);
        assert!(student.deleted_at.is_none());
        assert!(student.privacy.show_profile);
        assert!(!student.privacy.block_popups);
    }
}
