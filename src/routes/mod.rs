//! API route configuration.
//!
//! Routes are grouped into scopes by audience and each scope carries its
//! own auth level:
//!
//! - `/api/v1/users`, `/api/v1/accounts`, `/api/v1/tutors`, `/api/v1/courses`
//!   and the Paystack webhook are public.
//! - `/api/v1/me`, `/api/v1/cart` and `/api/v1/progress` require the
//!   `student` role.
//! - `/api/v1/tutor` requires `tutor` (admins may impersonate for support).
//! - `/api/v1/admin` requires `admin`.
//! - `/api/v1/messages` and `/api/v1/uploads` accept any authenticated user.

use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use serde_json::json;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_public_routes(cfg);
    configure_student_routes(cfg);
    configure_tutor_routes(cfg);
    configure_admin_routes(cfg);
    configure_shared_routes(cfg);
}

fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    // Student signup and session management.
    cfg.service(
        web::scope("/api/v1/users")
            .service(handlers::students::signup)
            .service(handlers::students::verify_email)
            .service(handlers::students::resend_verification)
            .service(handlers::students::login)
            .service(handlers::students::forgot_password)
            .service(handlers::students::verify_pin)
            .service(handlers::students::reset_password),
    );

    // Back-office login; accounts themselves are created from the admin scope.
    cfg.service(
        web::scope("/api/v1/accounts")
            .service(handlers::accounts::set_password)
            .service(handlers::accounts::login),
    );

    // Public tutor directory.
    cfg.service(
        web::scope("/api/v1/tutors")
            .service(handlers::accounts::tutor_detail)
            .service(handlers::accounts::list_tutors),
    );

    // Storefront catalogue. Literal segments before the catch-all detail route.
    cfg.service(
        web::scope("/api/v1/courses")
            .service(handlers::courses::search_courses)
            .service(handlers::courses::list_courses)
            .service(handlers::courses::record_view)
            .service(handlers::courses::list_reviews)
            .service(handlers::courses::list_comments)
            .service(handlers::courses::course_detail),
    );

    // Signature-verified, so no auth middleware.
    cfg.service(web::scope("/api/v1/webhooks").service(handlers::webhooks::paystack));
}

fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/me")
            .wrap(AuthMiddleware::role("student"))
            .service(handlers::students::get_profile)
            .service(handlers::students::update_profile)
            .service(handlers::students::update_password)
            .service(handlers::students::update_privacy)
            .service(handlers::students::delete_account)
            .service(handlers::students::dashboard)
            .service(handlers::students::dashboard_course)
            .service(handlers::students::overview)
            .service(handlers::students::recommendations)
            .service(handlers::courses::rate_course)
            .service(handlers::courses::add_comment)
            .service(handlers::courses::delete_comment),
    );

    cfg.service(
        web::scope("/api/v1/cart")
            .wrap(AuthMiddleware::role("student"))
            .service(handlers::cart::add_to_cart)
            .service(handlers::cart::remove_from_cart)
            .service(handlers::cart::checkout)
            .service(handlers::cart::view_cart),
    );

    cfg.service(
        web::scope("/api/v1/progress")
            .wrap(AuthMiddleware::role("student"))
            .service(handlers::progress::report_video)
            .service(handlers::progress::report_lecture)
            .service(handlers::progress::get_progress),
    );
}

fn configure_tutor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tutor")
            .wrap(AuthMiddleware::any_role(&["tutor", "admin"]))
            // Analytics
            .service(handlers::tutor::dashboard)
            .service(handlers::tutor::my_courses)
            .service(handlers::tutor::transactions)
            .service(handlers::tutor::students)
            .service(handlers::tutor::conversions)
            // Profile
            .service(handlers::accounts::get_profile)
            .service(handlers::accounts::update_profile)
            .service(handlers::accounts::change_password)
            .service(handlers::accounts::delete_account)
            // Authoring
            .service(handlers::courses::create_course)
            .service(handlers::courses::my_course_list)
            .service(handlers::courses::publish_course)
            .service(handlers::courses::update_what_you_will_learn)
            .service(handlers::courses::add_lecture)
            .service(handlers::courses::add_video)
            .service(handlers::courses::update_course)
            .service(handlers::courses::delete_course)
            // Payouts
            .service(handlers::banking::list_banks)
            .service(handlers::banking::add_bank_account)
            .service(handlers::banking::list_bank_accounts)
            .service(handlers::banking::remove_bank_account)
            .service(handlers::banking::earnings)
            .service(handlers::banking::withdraw)
            .service(handlers::banking::list_withdrawals),
    );
}

fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(AuthMiddleware::role("admin"))
            .service(handlers::admin::register_account)
            .service(handlers::admin::overview)
            .service(handlers::admin::moderation_queue)
            .service(handlers::admin::moderate_course),
    );
}

fn configure_shared_routes(cfg: &mut web::ServiceConfig) {
    // Students and tutors share the same messaging surface; the handlers
    // branch on the caller's role.
    cfg.service(
        web::scope("/api/v1/messages")
            .wrap(AuthMiddleware::required())
            .service(handlers::messaging::contacts)
            .service(handlers::messaging::open_chat)
            .service(handlers::messaging::history)
            .service(handlers::messaging::list_chats)
            .service(handlers::messaging::send_message)
            .service(handlers::messaging::chat_socket),
    );

    cfg.service(
        web::scope("/api/v1/uploads")
            .wrap(AuthMiddleware::required())
            .service(handlers::uploads::upload),
    );
}

/// Liveness endpoint for load balancers and uptime checks.
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "learnsphere_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
