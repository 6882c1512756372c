//! Watch-progress tracking on purchased courses.
//!
//! Every report rewrites the affected progress entry and recomputes the
//! completion state from the full arrays, so replays and out-of-order
//! reports converge on the same answer.

use mongodb::bson::{DateTime, doc, oid::ObjectId};
use singleton_macro::service;
use std::sync::Arc;

use crate::domain::dto::commerce::request::{LectureProgressRequest, VideoProgressRequest};
use crate::domain::dto::commerce::response::PurchasedCourseResponse;
use crate::domain::entities::commerce::purchased_course::{
    LectureProgress, PurchasedCourse, VideoProgress, clamp_percentage, course_completed,
    video_completed, watch_minutes_delta,
};
use crate::domain::entities::courses::course::Course;
use crate::errors::errors::AppError;
use crate::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use crate::repositories::courses::course_repo::CourseRepository;

#[service(name = "progress")]
pub struct ProgressService {
    purchasedcourse_repo: Arc<PurchasedCourseRepository>,
    course_repo: Arc<CourseRepository>,
}

impl ProgressService {
    pub async fn report_video(
        &self,
        student_id: &str,
        request: VideoProgressRequest,
    ) -> Result<PurchasedCourseResponse, AppError> {
        let (mut purchase, course) = self.load(student_id, &request.course_id).await?;

        let lecture_oid = ObjectId::parse_str(&request.lecture_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        let video_oid = ObjectId::parse_str(&request.video_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        // The authoritative duration is the course's, not the client's.
        let duration = course
            .lectures
            .iter()
            .find(|l| l.lecture_id == lecture_oid)
            .and_then(|l| l.videos.iter().find(|v| v.video_id == video_oid))
            .map(|v| v.duration)
            .ok_or_else(|| AppError::NotFound("Video not found in this course".to_string()))?;

        let completed = video_completed(request.timestamp, duration);
        let now = DateTime::now();

        match purchase
            .progress
            .iter_mut()
            .find(|p| p.video_id == video_oid)
        {
            Some(entry) => {
                purchase.minutes_spent += watch_minutes_delta(Some(entry.timestamp), request.timestamp);
                entry.timestamp = request.timestamp;
                // Completion latches; rewinding does not un-complete.
                entry.completed = entry.completed || completed;
                entry.updated_at = now;
            }
            None => {
                purchase.minutes_spent += watch_minutes_delta(None, request.timestamp);
                purchase.progress.push(VideoProgress {
                    lecture_id: lecture_oid,
                    video_id: video_oid,
                    timestamp: request.timestamp,
                    completed,
                    updated_at: now,
                });
            }
        }

        self.persist(purchase, &course).await
    }

    pub async fn report_lecture(
        &self,
        student_id: &str,
        request: LectureProgressRequest,
    ) -> Result<PurchasedCourseResponse, AppError> {
        let (mut purchase, course) = self.load(student_id, &request.course_id).await?;

        let lecture_oid = ObjectId::parse_str(&request.lecture_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        if !course.lectures.iter().any(|l| l.lecture_id == lecture_oid) {
            return Err(AppError::NotFound(
                "Lecture not found in this course".to_string(),
            ));
        }

        let percentage = clamp_percentage(request.percentage);

        match purchase
            .lecture_progress
            .iter_mut()
            .find(|p| p.lecture_id == lecture_oid)
        {
            Some(entry) => entry.percentage = percentage,
            None => purchase.lecture_progress.push(LectureProgress {
                lecture_id: lecture_oid,
                percentage,
            }),
        }

        self.persist(purchase, &course).await
    }

    pub async fn get(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<PurchasedCourseResponse, AppError> {
        let (purchase, _) = self.load(student_id, course_id).await?;
        Ok(PurchasedCourseResponse::from(purchase))
    }

    pub async fn list_enrollments(
        &self,
        student_id: &str,
    ) -> Result<Vec<PurchasedCourseResponse>, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let purchases = self.purchasedcourse_repo.find_by_student(&student_oid).await?;
        Ok(purchases
            .into_iter()
            .map(PurchasedCourseResponse::from)
            .collect())
    }

    async fn load(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<(PurchasedCourse, Course), AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        let course_oid = ObjectId::parse_str(course_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let purchase = self
            .purchasedcourse_repo
            .find_enrollment(&student_oid, &course_oid)
            .await?
            .ok_or_else(|| {
                AppError::AuthorizationError("You must purchase this course first".to_string())
            })?;

        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok((purchase, course))
    }

    /// Writes both arrays and the recomputed completion flag in one `$set`.
    async fn persist(
        &self,
        purchase: PurchasedCourse,
        course: &Course,
    ) -> Result<PurchasedCourseResponse, AppError> {
        let all_video_ids: Vec<ObjectId> = course
            .lectures
            .iter()
            .flat_map(|l| l.videos.iter().map(|v| v.video_id))
            .collect();

        let completed_ids: Vec<ObjectId> = purchase
            .progress
            .iter()
            .filter(|p| p.completed)
            .map(|p| p.video_id)
            .collect();

        let is_completed: u8 = if course_completed(&completed_ids, &all_video_ids) {
            1
        } else {
            0
        };

        let id = purchase
            .id
            .ok_or_else(|| AppError::InternalError("Enrollment has no id".to_string()))?;

        let progress_bson = mongodb::bson::to_bson(&purchase.progress)
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        let lecture_bson = mongodb::bson::to_bson(&purchase.lecture_progress)
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let updated = self
            .purchasedcourse_repo
            .update(
                &id,
                doc! {
                    "progress": progress_bson,
                    "lecture_progress": lecture_bson,
                    "is_completed": is_completed as i32,
                    "minutes_spent": purchase.minutes_spent,
                    "updated_at": DateTime::now(),
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

        Ok(PurchasedCourseResponse::from(updated))
    }
}
