//! Course catalogue: authoring, moderation, discovery, ratings and
//! comments.

use mongodb::bson::{DateTime, doc, oid::ObjectId};
use singleton_macro::service;
use std::sync::Arc;

use crate::domain::dto::accounts::request::ModerateCourseRequest;
use crate::domain::dto::courses::request::{
    AddLectureRequest, CommentRequest, CourseListQuery, CreateCourseRequest, RateCourseRequest,
    UpdateCourseRequest,
};
use crate::domain::dto::courses::response::{
    CommentResponse, CourseResponse, CourseReviewsResponse, CourseSummary, PagedResponse,
    ReviewWithReviewer,
};
use crate::domain::entities::courses::comment::Comment;
use crate::domain::entities::courses::course::{Course, CourseStatus, Lecture, VideoFile};
use crate::domain::entities::courses::review::Review;
use crate::errors::errors::AppError;
use crate::repositories::accounts::account_repo::AccountRepository;
use crate::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use crate::repositories::courses::comment_repo::CommentRepository;
use crate::repositories::courses::course_repo::CourseRepository;
use crate::repositories::courses::review_repo::ReviewRepository;
use crate::repositories::students::student_repo::StudentRepository;

#[service(name = "course")]
pub struct CourseService {
    course_repo: Arc<CourseRepository>,
    review_repo: Arc<ReviewRepository>,
    comment_repo: Arc<CommentRepository>,
    account_repo: Arc<AccountRepository>,
    purchasedcourse_repo: Arc<PurchasedCourseRepository>,
    student_repo: Arc<StudentRepository>,
}

impl CourseService {
    pub async fn create(
        &self,
        tutor_id: &str,
        request: CreateCourseRequest,
    ) -> Result<CourseResponse, AppError> {
        let tutor = self
            .account_repo
            .find_by_id(tutor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tutor not found".to_string()))?;

        if !tutor.is_tutor() {
            return Err(AppError::AuthorizationError(
                "Only tutors can create courses".to_string(),
            ));
        }

        let tutor_oid = tutor
            .id
            .ok_or_else(|| AppError::InternalError("Tutor has no id".to_string()))?;

        let mut course = Course::new(
            request.title,
            request.price,
            tutor_oid,
            tutor.full_name(),
            tutor.email.clone(),
        );
        course.description = Some(request.description);
        course.what_you_will_learn = request.what_you_will_learn;
        course.basic_information = request.basic_information;

        let created = self.course_repo.create(course).await?;
        Ok(CourseResponse::from(created))
    }

    /// Editing sends the course back through moderation.
    pub async fn update(
        &self,
        tutor_id: &str,
        course_id: &str,
        request: UpdateCourseRequest,
    ) -> Result<CourseResponse, AppError> {
        let course = self.owned_course(tutor_id, course_id).await?;

        let mut update = doc! {
            "status": "pending",
            "updated_at": DateTime::now(),
        };

        if let Some(v) = request.title {
            update.insert("title", v);
        }
        if let Some(v) = request.description {
            update.insert("description", v);
        }
        if let Some(v) = request.price {
            update.insert("price", v);
        }
        if let Some(v) = request.what_you_will_learn {
            update.insert("what_you_will_learn", v);
        }
        if let Some(v) = request.basic_information {
            let bson = mongodb::bson::to_bson(&v)
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            update.insert("basic_information", bson);
        }
        if let Some(publish) = request.is_published {
            if publish && !course.is_publishable() {
                return Err(AppError::ValidationError(
                    "A course needs a title, a description and at least one lecture before publishing"
                        .to_string(),
                ));
            }
            update.insert("is_published", publish);
        }

        let updated = self
            .course_repo
            .update(course_id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(CourseResponse::from(updated))
    }

    pub async fn add_lecture(
        &self,
        tutor_id: &str,
        course_id: &str,
        request: AddLectureRequest,
    ) -> Result<CourseResponse, AppError> {
        self.owned_course(tutor_id, course_id).await?;

        let lecture = Lecture {
            lecture_id: ObjectId::new(),
            title: request.title,
            description: request.description,
            lecture_number: request.lecture_number,
            videos: Vec::new(),
        };

        let lecture_bson =
            mongodb::bson::to_bson(&lecture).map_err(|e| AppError::InternalError(e.to_string()))?;

        let updated = self
            .course_repo
            .update_raw(
                course_id,
                doc! {
                    "$push": { "lectures": lecture_bson },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(CourseResponse::from(updated))
    }

    /// Attaches an uploaded video to a lecture. The upload itself has
    /// already happened through the storage service.
    pub async fn add_video(
        &self,
        tutor_id: &str,
        course_id: &str,
        lecture_id: &str,
        url: String,
        file_name: String,
        duration: f64,
    ) -> Result<CourseResponse, AppError> {
        let course = self.owned_course(tutor_id, course_id).await?;
        let course_oid = course
            .id
            .ok_or_else(|| AppError::InternalError("Course has no id".to_string()))?;

        let lecture_oid = ObjectId::parse_str(lecture_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let video = VideoFile {
            video_id: ObjectId::new(),
            url,
            file_name,
            duration,
        };
        let video_bson =
            mongodb::bson::to_bson(&video).map_err(|e| AppError::InternalError(e.to_string()))?;

        let pushed = self
            .course_repo
            .push_video(&course_oid, &lecture_oid, video_bson)
            .await?;

        if !pushed {
            return Err(AppError::NotFound("Lecture not found".to_string()));
        }

        let refreshed = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(CourseResponse::from(refreshed))
    }

    pub async fn get_detail(&self, course_id: &str) -> Result<CourseResponse, AppError> {
        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(CourseResponse::from(course))
    }

    /// The client reports a card impression separately from the detail
    /// fetch so cached reads do not distort the counter.
    pub async fn record_view(&self, course_id: &str) -> Result<u64, AppError> {
        let course = self
            .course_repo
            .update_raw(course_id, doc! { "$inc": { "views": 1 } })
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(course.views)
    }

    /// Flips a draft live. Publishing has stricter requirements than
    /// saving: the course needs a description and at least one lecture.
    pub async fn publish(
        &self,
        tutor_id: &str,
        course_id: &str,
    ) -> Result<CourseResponse, AppError> {
        let course = self.owned_course(tutor_id, course_id).await?;

        if course.is_published {
            return Err(AppError::ValidationError(
                "This course is already published".to_string(),
            ));
        }
        if !course.is_publishable() {
            return Err(AppError::ValidationError(
                "A course needs a title, a description and at least one lecture before publishing"
                    .to_string(),
            ));
        }

        let updated = self
            .course_repo
            .update(
                course_id,
                doc! { "is_published": true, "updated_at": DateTime::now() },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(CourseResponse::from(updated))
    }

    pub async fn update_what_you_will_learn(
        &self,
        tutor_id: &str,
        course_id: &str,
        items: Vec<String>,
    ) -> Result<CourseResponse, AppError> {
        self.owned_course(tutor_id, course_id).await?;

        let updated = self
            .course_repo
            .update(
                course_id,
                doc! { "what_you_will_learn": items, "updated_at": DateTime::now() },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(CourseResponse::from(updated))
    }

    /// Catalogue search. A missing or blank query is a client error and an
    /// empty result set maps to 404 rather than an empty page.
    pub async fn search(
        &self,
        query: CourseListQuery,
    ) -> Result<PagedResponse<CourseSummary>, AppError> {
        if query.search.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            return Err(AppError::ValidationError(
                "A search query is required".to_string(),
            ));
        }

        let result = self.list_published(query).await?;
        if result.items.is_empty() {
            return Err(AppError::NotFound(
                "No courses matched your search".to_string(),
            ));
        }

        Ok(result)
    }

    pub async fn list_published(
        &self,
        query: CourseListQuery,
    ) -> Result<PagedResponse<CourseSummary>, AppError> {
        let courses = self.course_repo.find_published(&query).await?;
        let total = self.course_repo.count_published(&query).await?;
        let (_, limit) = query.pagination();

        Ok(PagedResponse {
            items: courses.into_iter().map(CourseSummary::from).collect(),
            total,
            page: query.page.unwrap_or(1).max(1),
            limit,
        })
    }

    pub async fn list_by_tutor(&self, tutor_id: &str) -> Result<Vec<CourseResponse>, AppError> {
        let tutor_oid = ObjectId::parse_str(tutor_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let courses = self.course_repo.find_by_tutor(&tutor_oid).await?;
        Ok(courses.into_iter().map(CourseResponse::from).collect())
    }

    pub async fn moderation_queue(
        &self,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<CourseResponse>, AppError> {
        let courses = self
            .course_repo
            .find_by_status(CourseStatus::Pending, skip, limit)
            .await?;
        Ok(courses.into_iter().map(CourseResponse::from).collect())
    }

    /// Admin approves or rejects a submitted course.
    pub async fn moderate(
        &self,
        admin_id: &str,
        course_id: &str,
        request: ModerateCourseRequest,
    ) -> Result<CourseResponse, AppError> {
        let admin_oid = ObjectId::parse_str(admin_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        self.course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let mut update = doc! {
            "status": request.status.as_str(),
            "reviewed_by": admin_oid,
            "reviewed_at": DateTime::now(),
            "updated_at": DateTime::now(),
        };

        if request.status == "rejected" {
            update.insert(
                "rejection_reason",
                request.rejection_reason.unwrap_or_default(),
            );
            // A rejected course cannot stay live.
            update.insert("is_published", false);
        }

        let updated = self
            .course_repo
            .update(course_id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(CourseResponse::from(updated))
    }

    pub async fn delete(&self, tutor_id: &str, course_id: &str) -> Result<(), AppError> {
        self.owned_course(tutor_id, course_id).await?;

        if !self.course_repo.delete(course_id).await? {
            return Err(AppError::NotFound("Course not found".to_string()));
        }

        Ok(())
    }

    /// Rating requires enrollment. Re-rating replaces the previous rating
    /// and the course aggregate is recomputed from all active reviews.
    pub async fn rate(
        &self,
        student_id: &str,
        course_id: &str,
        request: RateCourseRequest,
    ) -> Result<(), AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        let course_oid = ObjectId::parse_str(course_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        self.require_enrollment(&student_oid, &course_oid).await?;

        self.review_repo
            .upsert(Review::new(
                course_oid,
                student_oid,
                request.rating,
                request.review,
            ))
            .await?;

        let (sum, count) = self.review_repo.rating_stats(&course_oid).await?;
        let average = if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        };

        self.course_repo
            .update_raw(
                course_id,
                doc! { "$set": {
                    "rating": average,
                    "review_count": count as i64,
                    "updated_at": DateTime::now(),
                } },
            )
            .await?;

        Ok(())
    }

    /// Reviews with average, total and reviewer names resolved.
    pub async fn list_reviews(&self, course_id: &str) -> Result<CourseReviewsResponse, AppError> {
        let course_oid = ObjectId::parse_str(course_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let reviews = self.review_repo.find_by_course(&course_oid).await?;
        if reviews.is_empty() {
            return Ok(CourseReviewsResponse {
                average: 0.0,
                total: 0,
                reviews: Vec::new(),
            });
        }

        let reviewer_ids: Vec<ObjectId> = reviews.iter().map(|r| r.student_id).collect();
        let students = self.student_repo.find_by_ids(&reviewer_ids).await?;

        let total = reviews.len() as u64;
        let average = reviews.iter().map(|r| r.rating as f64).sum::<f64>() / total as f64;

        let reviews = reviews
            .into_iter()
            .map(|r| {
                let student_name = students
                    .iter()
                    .find(|s| s.id == Some(r.student_id))
                    .map(|s| format!("{} {}", s.first_name, s.last_name))
                    .unwrap_or_else(|| "Anonymous".to_string());

                ReviewWithReviewer {
                    id: r.id.map(|id| id.to_hex()).unwrap_or_default(),
                    rating: r.rating,
                    review: r.review,
                    student_name,
                    created_at: r.created_at,
                }
            })
            .collect();

        Ok(CourseReviewsResponse {
            average,
            total,
            reviews,
        })
    }

    pub async fn comment(
        &self,
        student_id: &str,
        course_id: &str,
        request: CommentRequest,
    ) -> Result<CommentResponse, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        let course_oid = ObjectId::parse_str(course_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        self.require_enrollment(&student_oid, &course_oid).await?;

        let created = self
            .comment_repo
            .create(Comment::new(course_oid, student_oid, request.text))
            .await?;

        Ok(CommentResponse::from(created))
    }

    pub async fn list_comments(
        &self,
        course_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<CommentResponse>, AppError> {
        let course_oid = ObjectId::parse_str(course_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let comments = self
            .comment_repo
            .find_by_course(&course_oid, skip, limit)
            .await?;
        Ok(comments.into_iter().map(CommentResponse::from).collect())
    }

    /// Only the author may remove their comment.
    pub async fn delete_comment(&self, student_id: &str, comment_id: &str) -> Result<(), AppError> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        if comment.student_id.to_hex() != student_id {
            return Err(AppError::AuthorizationError(
                "You can only delete your own comments".to_string(),
            ));
        }

        if !self.comment_repo.deactivate(comment_id).await? {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }

        Ok(())
    }

    async fn require_enrollment(
        &self,
        student_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<(), AppError> {
        self.purchasedcourse_repo
            .find_enrollment(student_id, course_id)
            .await?
            .ok_or_else(|| {
                AppError::AuthorizationError(
                    "You must purchase this course first".to_string(),
                )
            })?;

        Ok(())
    }

    /// Loads a course and checks the caller owns it.
    async fn owned_course(&self, tutor_id: &str, course_id: &str) -> Result<Course, AppError> {
        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        if course.tutor_id.to_hex() != tutor_id {
            return Err(AppError::AuthorizationError(
                "You do not own this course".to_string(),
            ));
        }

        Ok(course)
    }
}
