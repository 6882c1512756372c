//! Student dashboard: enrollments joined with their courses, watch
//! overview and catalogue recommendations.

use mongodb::bson::{doc, oid::ObjectId};
use singleton_macro::service;
use std::sync::Arc;

use crate::domain::dto::courses::response::{CourseSummary, PagedResponse};
use crate::domain::dto::students::request::RecommendationQuery;
use crate::domain::dto::students::response::{
    DashboardCourse, ResumePointer, StudentOverviewResponse,
};
use crate::domain::entities::commerce::purchased_course::PurchasedCourse;
use crate::domain::entities::courses::course::Course;
use crate::errors::errors::AppError;
use crate::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use crate::repositories::courses::course_repo::CourseRepository;

#[service(name = "dashboard")]
pub struct DashboardService {
    purchasedcourse_repo: Arc<PurchasedCourseRepository>,
    course_repo: Arc<CourseRepository>,
}

impl DashboardService {
    /// Every active enrollment joined with its course document. Enrollments
    /// whose course has since been deleted are skipped.
    pub async fn dashboard(&self, student_id: &str) -> Result<Vec<DashboardCourse>, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let enrollments = self.purchasedcourse_repo.find_by_student(&student_oid).await?;

        let mut cards = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            let course = self
                .course_repo
                .find_by_id(&enrollment.course_id.to_hex())
                .await?;

            if let Some(course) = course {
                cards.push(build_card(&enrollment, course));
            }
        }

        Ok(cards)
    }

    pub async fn dashboard_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<DashboardCourse, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        let course_oid = ObjectId::parse_str(course_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let enrollment = self
            .purchasedcourse_repo
            .find_enrollment(&student_oid, &course_oid)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found in your library".to_string()))?;

        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(build_card(&enrollment, course))
    }

    pub async fn overview(&self, student_id: &str) -> Result<StudentOverviewResponse, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let enrollments = self.purchasedcourse_repo.find_by_student(&student_oid).await?;

        let enrolled = enrollments.len() as u64;
        let completed = enrollments.iter().filter(|e| e.is_completed == 1).count() as u64;
        let minutes: f64 = enrollments.iter().map(|e| e.minutes_spent).sum();

        let completion_rate = if enrolled > 0 {
            (completed as f64 / enrolled as f64) * 100.0
        } else {
            0.0
        };

        Ok(StudentOverviewResponse {
            enrolled_courses: enrolled,
            completed_courses: completed,
            completion_rate,
            watch_hours: minutes / 60.0,
        })
    }

    /// Catalogue suggestions. `related` shares a category with something
    /// the student owns, `different` avoids all of them, `sameTutor` keeps
    /// to tutors the student already bought from. Owned courses are always
    /// excluded.
    pub async fn recommendations(
        &self,
        student_id: &str,
        query: &RecommendationQuery,
    ) -> Result<PagedResponse<CourseSummary>, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        let (skip, limit) = query.pagination();
        let page = query.page.unwrap_or(1).max(1);

        let enrollments = self.purchasedcourse_repo.find_by_student(&student_oid).await?;
        let owned_ids: Vec<ObjectId> = enrollments.iter().map(|e| e.course_id).collect();

        let mut categories: Vec<String> = Vec::new();
        let mut tutor_ids: Vec<ObjectId> = Vec::new();
        for id in &owned_ids {
            if let Some(course) = self.course_repo.find_by_id(&id.to_hex()).await? {
                for category in course.basic_information.categories {
                    if !categories.contains(&category) {
                        categories.push(category);
                    }
                }
                if !tutor_ids.contains(&course.tutor_id) {
                    tutor_ids.push(course.tutor_id);
                }
            }
        }

        let kind = query.kind.as_deref().unwrap_or("random");
        let extra = match kind {
            "random" => None,
            "related" => Some(doc! {
                "basic_information.categories": { "$in": &categories },
                "_id": { "$nin": &owned_ids },
            }),
            "different" => Some(doc! {
                "basic_information.categories": { "$nin": &categories },
                "_id": { "$nin": &owned_ids },
            }),
            "sameTutor" => Some(doc! {
                "tutor_id": { "$in": &tutor_ids },
                "_id": { "$nin": &owned_ids },
            }),
            _ => {
                return Err(AppError::ValidationError(
                    "Unknown recommendation type".to_string(),
                ));
            }
        };

        let (courses, total) = match extra {
            Some(filter) => {
                let total = self.course_repo.count_published_where(filter.clone()).await?;
                let courses = self
                    .course_repo
                    .find_published_where(filter, skip, limit)
                    .await?;
                (courses, total)
            }
            None => {
                let filter = doc! { "_id": { "$nin": &owned_ids } };
                let total = self.course_repo.count_published_where(filter).await?;
                let sampled = self.course_repo.sample_published(limit).await?;
                let courses: Vec<Course> = sampled
                    .into_iter()
                    .filter(|c| c.id.map(|id| !owned_ids.contains(&id)).unwrap_or(false))
                    .collect();
                (courses, total)
            }
        };

        Ok(PagedResponse {
            items: courses.into_iter().map(CourseSummary::from).collect(),
            total,
            page,
            limit,
        })
    }
}

fn build_card(enrollment: &PurchasedCourse, course: Course) -> DashboardCourse {
    let total_videos = course.total_videos();
    let watched = enrollment.completed_video_count();
    let percentage = enrollment.overall_percentage(total_videos);

    // Resume at the most recently touched video that is not yet complete.
    let resume = enrollment
        .progress
        .iter()
        .filter(|p| !p.completed)
        .max_by_key(|p| p.updated_at)
        .map(|p| ResumePointer {
            lecture_id: p.lecture_id.to_hex(),
            video_id: p.video_id.to_hex(),
            timestamp: p.timestamp,
        });

    DashboardCourse {
        course: CourseSummary::from(course),
        watched_videos: watched,
        total_videos,
        progress_count: format!("{}/{}", watched, total_videos),
        percentage,
        is_completed: enrollment.is_completed == 1,
        minutes_spent: enrollment.minutes_spent,
        resume,
        purchased_at: enrollment.purchased_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    use crate::domain::entities::commerce::purchased_course::VideoProgress;
    use crate::domain::entities::courses::course::{Lecture, VideoFile};

    fn course_with_videos(count: usize) -> (Course, Vec<ObjectId>) {
        let mut course = Course::new(
            "Intro to Baking".to_string(),
            4000.0,
            ObjectId::new(),
            "Ada Obi".to_string(),
            "ada@example.com".to_string(),
        );
        course.id = Some(ObjectId::new());

        let video_ids: Vec<ObjectId> = (0..count).map(|_| ObjectId::new()).collect();
        course.lectures.push(Lecture {
            lecture_id: ObjectId::new(),
            title: "Basics".to_string(),
            description: None,
            lecture_number: 1,
            videos: video_ids
                .iter()
                .map(|id| VideoFile {
                    video_id: *id,
                    url: "https://cdn/v.mp4".to_string(),
                    file_name: "v.mp4".to_string(),
                    duration: 60.0,
                })
                .collect(),
        });

        (course, video_ids)
    }

    #[test]
    fn card_reports_fraction_and_resume_pointer() {
        let (course, video_ids) = course_with_videos(3);
        let lecture_id = course.lectures[0].lecture_id;

        let mut enrollment =
            PurchasedCourse::new(ObjectId::new(), course.id.unwrap(), ObjectId::new());
        enrollment.progress.push(VideoProgress {
            lecture_id,
            video_id: video_ids[0],
            timestamp: 60.0,
            completed: true,
            updated_at: DateTime::from_millis(1_000),
        });
        enrollment.progress.push(VideoProgress {
            lecture_id,
            video_id: video_ids[1],
            timestamp: 22.5,
            completed: false,
            updated_at: DateTime::from_millis(2_000),
        });

        let card = build_card(&enrollment, course);
        assert_eq!(card.progress_count, "1/3");
        assert_eq!(card.watched_videos, 1);
        assert!(!card.is_completed);

        let resume = card.resume.expect("resume pointer");
        assert_eq!(resume.video_id, video_ids[1].to_hex());
        assert_eq!(resume.timestamp, 22.5);
    }

    #[test]
    fn fully_watched_card_has_no_resume_pointer() {
        let (course, video_ids) = course_with_videos(1);
        let lecture_id = course.lectures[0].lecture_id;

        let mut enrollment =
            PurchasedCourse::new(ObjectId::new(), course.id.unwrap(), ObjectId::new());
        enrollment.is_completed = 1;
        enrollment.progress.push(VideoProgress {
            lecture_id,
            video_id: video_ids[0],
            timestamp: 60.0,
            completed: true,
            updated_at: DateTime::from_millis(1_000),
        });

        let card = build_card(&enrollment, course);
        assert_eq!(card.progress_count, "1/1");
        assert!(card.is_completed);
        assert!(card.resume.is_none());
    }
}
