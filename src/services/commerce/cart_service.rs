//! Cart management and checkout.
//!
//! Checkout snapshots every open cart row under one payment reference,
//! initializes the gateway transaction and returns the redirect URL. The
//! webhook completes the purchase later; nothing is owned until then.

use mongodb::bson::oid::ObjectId;
use singleton_macro::service;
use std::sync::Arc;

use crate::domain::dto::commerce::request::{AddToCartRequest, RemoveFromCartRequest};
use crate::domain::dto::commerce::response::{CartItemResponse, CartResponse, CheckoutResponse};
use crate::domain::entities::commerce::cart_item::{CartItem, CartStatus, cart_total};
use crate::domain::entities::commerce::payment::Payment;
use crate::errors::errors::AppError;
use crate::repositories::commerce::cart_repo::CartRepository;
use crate::repositories::commerce::payment_repo::PaymentRepository;
use crate::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use crate::repositories::courses::course_repo::CourseRepository;
use crate::repositories::students::student_repo::StudentRepository;
use crate::services::payments::paystack_service::PaystackService;
use crate::utils::token_gen::generate_payment_reference;

#[service(name = "cart")]
pub struct CartService {
    cart_repo: Arc<CartRepository>,
    payment_repo: Arc<PaymentRepository>,
    course_repo: Arc<CourseRepository>,
    student_repo: Arc<StudentRepository>,
    purchasedcourse_repo: Arc<PurchasedCourseRepository>,
}

impl CartService {
    pub async fn add(
        &self,
        student_id: &str,
        request: AddToCartRequest,
    ) -> Result<CartItemResponse, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let course = self
            .course_repo
            .find_by_id(&request.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        if !course.is_published {
            return Err(AppError::ValidationError(
                "This course is not available for purchase".to_string(),
            ));
        }

        let course_oid = course
            .id
            .ok_or_else(|| AppError::InternalError("Course has no id".to_string()))?;

        if self
            .purchasedcourse_repo
            .find_enrollment(&student_oid, &course_oid)
            .await?
            .is_some()
        {
            return Err(AppError::ConflictError(
                "You already own this course".to_string(),
            ));
        }

        // A repeat add bumps the quantity on the existing open row.
        if let Some(mut existing) = self
            .cart_repo
            .find_open_item(&student_oid, &course_oid)
            .await?
        {
            let id = existing
                .id
                .ok_or_else(|| AppError::InternalError("Cart item has no id".to_string()))?;
            self.cart_repo.adjust_quantity(&id, 1).await?;
            existing.quantity += 1;
            return Ok(CartItemResponse::from(existing));
        }

        let item = self
            .cart_repo
            .create(CartItem::new(student_oid, course_oid, course.price))
            .await?;

        Ok(CartItemResponse::from(item))
    }

    pub async fn view(&self, student_id: &str) -> Result<CartResponse, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let items = self.cart_repo.find_open_by_student(&student_oid).await?;
        let total = cart_total(&items);

        Ok(CartResponse {
            items: items.into_iter().map(CartItemResponse::from).collect(),
            total,
        })
    }

    /// Decrements multi-quantity rows, deletes single-quantity ones.
    /// Rows already settled by the webhook are dropped outright.
    pub async fn remove(
        &self,
        student_id: &str,
        request: RemoveFromCartRequest,
    ) -> Result<CartResponse, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        for course_id in &request.course_ids {
            let course_oid = ObjectId::parse_str(course_id)
                .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

            let item = self
                .cart_repo
                .find_item(&student_oid, &course_oid)
                .await?
                .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

            let id = item
                .id
                .ok_or_else(|| AppError::InternalError("Cart item has no id".to_string()))?;

            if item.status != CartStatus::Success && item.quantity > 1 {
                self.cart_repo.adjust_quantity(&id, -1).await?;
            } else {
                self.cart_repo.delete_by_id(&id).await?;
            }
        }

        self.view(student_id).await
    }

    /// Initializes a gateway transaction for everything currently in the
    /// cart and records a pending payment keyed by the generated reference.
    pub async fn checkout(
        &self,
        student_id: &str,
        email_override: Option<String>,
    ) -> Result<CheckoutResponse, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let student = self
            .student_repo
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        let items = self.cart_repo.find_open_by_student(&student_oid).await?;
        if items.is_empty() {
            return Err(AppError::ValidationError("Your cart is empty".to_string()));
        }

        let amount = cart_total(&items);
        let reference = generate_payment_reference();
        let email = email_override.unwrap_or_else(|| student.email.clone());

        let cart_ids: Vec<ObjectId> = items.iter().filter_map(|i| i.id).collect();

        let initialized = PaystackService::instance()
            .initialize_transaction(&email, amount, &reference)
            .await?;

        self.payment_repo
            .create(Payment::new(
                email,
                amount,
                reference.clone(),
                student_oid,
                cart_ids.clone(),
            ))
            .await?;

        self.cart_repo.mark_initiated(&cart_ids, &reference).await?;

        Ok(CheckoutResponse {
            authorization_url: initialized.authorization_url,
            access_code: initialized.access_code,
            reference,
            amount,
        })
    }
}
