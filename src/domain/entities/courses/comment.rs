//! Course comment entity.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub course_id: ObjectId,
    pub student_id: ObjectId,
    pub text: String,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Comment {
    pub fn new(course_id: ObjectId, student_id: ObjectId, text: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            course_id,
            student_id,
            text,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
