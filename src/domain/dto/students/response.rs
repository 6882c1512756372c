use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::students::student::{PrivacySettings, Student};

/// Public view of a student document. Never exposes password hashes or
/// verification material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentResponse {
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
    pub is_verified: bool,
    pub is_active: bool,
    pub privacy: PrivacySettings,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email,
            phone_number: student.phone_number,
            country: student.country,
            state: student.state,
            address: student.address,
            postal_code: student.postal_code,
            profile_picture: student.profile_picture,
            description: student.description,
            is_verified: student.is_verified,
            is_active: student.is_active,
            privacy: student.privacy,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoginResponse {
    pub student: StudentResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Where playback should resume: the most recently touched incomplete video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumePointer {
    pub lecture_id: String,
    pub video_id: String,
    pub timestamp: f64,
}

/// One card on the student dashboard: the course joined with the
/// student's watch state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardCourse {
    pub course: crate::domain::dto::courses::response::CourseSummary,
    pub watched_videos: usize,
    pub total_videos: usize,
    /// `"3/12"` style fraction shown on the card.
    pub progress_count: String,
    pub percentage: f64,
    pub is_completed: bool,
    pub minutes_spent: f64,
    pub resume: Option<ResumePointer>,
    pub purchased_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentOverviewResponse {
    pub enrolled_courses: u64,
    pub completed_courses: u64,
    pub completion_rate: f64,
    pub watch_hours: f64,
}
