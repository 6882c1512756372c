//! Course review entity: one rating per (course, student) pair.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub course_id: ObjectId,
    pub student_id: ObjectId,
    /// Whole-star rating, validated to 1..=5 before it reaches here.
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Review {
    pub fn new(course_id: ObjectId, student_id: ObjectId, rating: u8, review: Option<String>) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            course_id,
            student_id,
            rating,
            review,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
