//! Course catalogue data access.
//!
//! Detail reads are cached; listing queries always hit MongoDB because the
//! filter space is too wide to cache usefully.

use futures_util::TryStreamExt;
use mongodb::{
    IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
};
use singleton_macro::repository;
use std::sync::Arc;

use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::dto::courses::request::CourseListQuery,
    domain::entities::courses::course::{Course, CourseStatus},
};
use crate::errors::errors::AppError;

#[repository(name = "course", collection = "courses")]
pub struct CourseRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl CourseRepository {
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Course>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<Course>(&cache_key).await {
            return Ok(Some(cached));
        }

        let course = self
            .collection::<Course>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref course) = course {
            let _ = self.redis.set_with_expiry(&cache_key, course, 600).await;
        }

        Ok(course)
    }

    pub async fn create(&self, mut course: Course) -> Result<Course, AppError> {
        let result = self
            .collection::<Course>()
            .insert_one(&course)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        course.id = result.inserted_id.as_object_id();

        let _ = self.invalidate_collection_cache(None).await;

        Ok(course)
    }

    pub async fn update(&self, id: &str, update_doc: Document) -> Result<Option<Course>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection::<Course>()
            .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": update_doc })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if updated.is_some() {
            let _ = self.invalidate_cache(id).await;
            let _ = self.invalidate_collection_cache(None).await;
        }

        Ok(updated)
    }

    /// Arbitrary update document, used for `$push`/`$inc` on embedded
    /// lectures and counters.
    pub async fn update_raw(
        &self,
        id: &str,
        update_doc: Document,
    ) -> Result<Option<Course>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection::<Course>()
            .find_one_and_update(doc! { "_id": object_id }, update_doc)
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if updated.is_some() {
            let _ = self.invalidate_cache(id).await;
        }

        Ok(updated)
    }

    /// Pushes a video onto one embedded lecture via the positional
    /// operator. Returns false when the lecture does not exist.
    pub async fn push_video(
        &self,
        course_id: &ObjectId,
        lecture_id: &ObjectId,
        video: mongodb::bson::Bson,
    ) -> Result<bool, AppError> {
        let result = self
            .collection::<Course>()
            .update_one(
                doc! { "_id": course_id, "lectures.lecture_id": lecture_id },
                doc! {
                    "$push": { "lectures.$.videos": video },
                    "$set": { "updated_at": mongodb::bson::DateTime::now() },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.modified_count > 0 {
            let _ = self.invalidate_cache(&course_id.to_hex()).await;
        }

        Ok(result.modified_count > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let result = self
            .collection::<Course>()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.deleted_count > 0 {
            let _ = self.invalidate_cache(id).await;
            let _ = self.invalidate_collection_cache(None).await;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Public catalogue: approved and published courses only, newest first,
    /// with optional text search and card filters.
    pub async fn find_published(&self, query: &CourseListQuery) -> Result<Vec<Course>, AppError> {
        let filter = Self::published_filter(query);
        let (skip, limit) = query.pagination();

        self.collection::<Course>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count_published(&self, query: &CourseListQuery) -> Result<u64, AppError> {
        self.collection::<Course>()
            .count_documents(Self::published_filter(query))
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    fn published_filter(query: &CourseListQuery) -> Document {
        let mut filter = doc! { "is_published": true, "status": "approved" };

        if let Some(ref search) = query.search {
            let pattern = regex_escape(search);
            filter.insert(
                "$or",
                vec![
                    doc! { "title": { "$regex": &pattern, "$options": "i" } },
                    doc! { "description": { "$regex": &pattern, "$options": "i" } },
                    doc! { "tutor_name": { "$regex": &pattern, "$options": "i" } },
                ],
            );
        }
        if let Some(ref category) = query.category {
            filter.insert("basic_information.categories", category);
        }
        if let Some(ref level) = query.level {
            filter.insert("basic_information.level", level);
        }

        filter
    }

    /// Published catalogue slice matching an extra filter, used by the
    /// recommendation queries.
    pub async fn find_published_where(
        &self,
        extra: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Course>, AppError> {
        let mut filter = doc! { "is_published": true, "status": "approved" };
        filter.extend(extra);

        self.collection::<Course>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count_published_where(&self, extra: Document) -> Result<u64, AppError> {
        let mut filter = doc! { "is_published": true, "status": "approved" };
        filter.extend(extra);

        self.collection::<Course>()
            .count_documents(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Random sample of the published catalogue via `$sample`.
    pub async fn sample_published(&self, size: i64) -> Result<Vec<Course>, AppError> {
        let pipeline = vec![
            doc! { "$match": { "is_published": true, "status": "approved" } },
            doc! { "$sample": { "size": size } },
        ];

        let mut cursor = self
            .collection::<Course>()
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut courses = Vec::new();
        while let Some(row) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
        {
            let course: Course = mongodb::bson::from_document(row)
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            courses.push(course);
        }

        Ok(courses)
    }

    pub async fn find_top_by_purchases(&self, limit: i64) -> Result<Vec<Course>, AppError> {
        self.collection::<Course>()
            .find(doc! { "is_published": true, "status": "approved" })
            .sort(doc! { "purchase_count": -1 })
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_tutor(&self, tutor_id: &ObjectId) -> Result<Vec<Course>, AppError> {
        self.collection::<Course>()
            .find(doc! { "tutor_id": tutor_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Moderation queue, oldest submission first.
    pub async fn find_by_status(
        &self,
        status: CourseStatus,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Course>, AppError> {
        let status_value = mongodb::bson::to_bson(&status)
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        self.collection::<Course>()
            .find(doc! { "status": status_value })
            .sort(doc! { "created_at": 1 })
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.collection::<Course>()
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<Course>();

        let tutor_index = IndexModel::builder()
            .keys(doc! { "tutor_id": 1 })
            .options(IndexOptions::builder().name("tutor_id".to_string()).build())
            .build();

        let listing_index = IndexModel::builder()
            .keys(doc! { "is_published": 1, "status": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("listing".to_string()).build())
            .build();

        collection
            .create_indexes(vec![tutor_index, listing_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

/// Escapes regex metacharacters so user search terms match literally.
fn regex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_escape_neutralizes_metacharacters() {
        assert_eq!(regex_escape("c++ (basics)"), "c\\+\\+ \\(basics\\)");
        assert_eq!(regex_escape("plain words"), "plain words");
    }

    #[test]
    fn published_filter_includes_search_and_level() {
        let query = CourseListQuery {
            search: Some("rust".into()),
            level: Some("beginner".into()),
            ..Default::default()
        };
        let filter = CourseRepository::published_filter(&query);
        assert_eq!(filter.get_bool("is_published").unwrap(), true);
        assert!(filter.contains_key("$or"));
        assert_eq!(
            filter.get_str("basic_information.level").unwrap(),
            "beginner"
        );
    }
}
