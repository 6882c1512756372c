//! Shopping cart and checkout endpoints. All of them act on the
//! authenticated student's own cart.

use actix_web::{HttpResponse, get, post, web};
use validator::Validate;

use crate::domain::dto::commerce::request::{
    AddToCartRequest, CheckoutRequest, RemoveFromCartRequest,
};
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::commerce::cart_service::CartService;

#[post("/add")]
pub async fn add_to_cart(
    user: AuthenticatedUser,
    payload: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let item = CartService::instance()
        .add(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::created("Course added to cart", item))
}

#[post("/remove")]
pub async fn remove_from_cart(
    user: AuthenticatedUser,
    payload: web::Json<RemoveFromCartRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let cart = CartService::instance()
        .remove(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Cart updated", cart))
}

#[get("")]
pub async fn view_cart(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let cart = CartService::instance().view(&user.user_id).await?;
    if cart.items.is_empty() {
        return Err(AppError::NotFound("Your cart is empty".to_string()));
    }
    Ok(ApiResponse::success("Cart retrieved", cart))
}

/// Starts a Paystack transaction for the pending cart. The response carries
/// the gateway authorization URL; enrollment happens when the webhook
/// confirms the charge.
#[post("/checkout")]
pub async fn checkout(
    user: AuthenticatedUser,
    payload: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let checkout = CartService::instance()
        .checkout(&user.user_id, payload.into_inner().email)
        .await?;
    Ok(ApiResponse::success("Checkout initialized", checkout))
}
