//! Application entry point: loads configuration, connects the data stores,
//! wires the singleton services and starts the HTTP server.

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use learnsphere_backend::caching::redis::RedisClient;
use learnsphere_backend::config::ServerConfig;
use learnsphere_backend::core::registry::ServiceLocator;
use learnsphere_backend::db::Database;
use learnsphere_backend::repositories::accounts::account_repo::AccountRepository;
use learnsphere_backend::repositories::banking::bank_account_repo::BankAccountRepository;
use learnsphere_backend::repositories::banking::withdrawal_repo::WithdrawalRepository;
use learnsphere_backend::repositories::commerce::cart_repo::CartRepository;
use learnsphere_backend::repositories::commerce::payment_repo::PaymentRepository;
use learnsphere_backend::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use learnsphere_backend::repositories::courses::comment_repo::CommentRepository;
use learnsphere_backend::repositories::courses::course_repo::CourseRepository;
use learnsphere_backend::repositories::courses::review_repo::ReviewRepository;
use learnsphere_backend::repositories::messaging::chat_repo::ChatRepository;
use learnsphere_backend::repositories::messaging::message_repo::MessageRepository;
use learnsphere_backend::repositories::students::student_repo::StudentRepository;
use learnsphere_backend::routes::configure_all_routes;
use learnsphere_backend::services::accounts::account_service::AccountService;

#[derive(Debug)]
struct RateLimitConfig {
    per_second: u64,
    burst_size: u32,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("Starting LearnSphere backend...");

    let (database, redis_client) = initialize_data_stores().await;

    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    ServiceLocator::initialize_all()
        .await
        .expect("Service initialization failed");

    create_indexes().await;

    // First boot of a fresh database gets the admin account from env vars.
    if let Err(e) = AccountService::instance().seed_admin().await {
        error!("Admin seeding failed: {}", e);
    }

    info!("All services initialized");

    start_http_server().await
}

async fn start_http_server() -> std::io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("Server running at http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    let rate_limit_config = load_rate_limit_config();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .unwrap();

    info!(
        "Rate limiting: {} req/s, burst {}",
        rate_limit_config.per_second, rate_limit_config.burst_size
    );

    HttpServer::new(move || {
        let cors = configure_cors();

        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(4)
    .run()
    .await
}

/// Loads `.env.dev` or `.env.prod` depending on `PROFILE`, falling back to
/// the plain `.env` file.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod loaded"),
            Err(e) => error!("Failed to load .env.prod: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev loaded"),
            Err(e) => error!("Failed to load .env.dev: {}", e),
        },
        _ => {
            dotenv().ok();
            info!(".env loaded");
        }
    }
}

fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

async fn initialize_data_stores() -> (Arc<Database>, Arc<RedisClient>) {
    info!("Connecting to data stores...");

    let database = Arc::new(Database::new().await.expect("MongoDB connection failed"));
    info!("MongoDB connected");

    let redis_client = Arc::new(RedisClient::new().await.expect("Redis connection failed"));
    info!("Redis connected");

    (database, redis_client)
}

/// Index creation is idempotent; a failure is logged but does not stop the
/// boot, since every query still works without the indexes.
async fn create_indexes() {
    let results = [
        ("students", StudentRepository::instance().create_indexes().await),
        ("accounts", AccountRepository::instance().create_indexes().await),
        ("courses", CourseRepository::instance().create_indexes().await),
        ("reviews", ReviewRepository::instance().create_indexes().await),
        ("comments", CommentRepository::instance().create_indexes().await),
        ("cart_items", CartRepository::instance().create_indexes().await),
        ("payments", PaymentRepository::instance().create_indexes().await),
        (
            "purchased_courses",
            PurchasedCourseRepository::instance().create_indexes().await,
        ),
        ("chats", ChatRepository::instance().create_indexes().await),
        ("messages", MessageRepository::instance().create_indexes().await),
        (
            "bank_accounts",
            BankAccountRepository::instance().create_indexes().await,
        ),
        ("withdrawals", WithdrawalRepository::instance().create_indexes().await),
    ];

    for (collection, result) in results {
        if let Err(e) = result {
            error!("Index creation for {} failed: {}", collection, e);
        }
    }
}

fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}

/// Reads `RATE_LIMIT_PER_SECOND` (default 100) and `RATE_LIMIT_BURST_SIZE`
/// (default 200) from the environment.
fn load_rate_limit_config() -> RateLimitConfig {
    let per_second = std::env::var("RATE_LIMIT_PER_SECOND")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(100);
    let burst_size = std::env::var("RATE_LIMIT_BURST_SIZE")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(200);

    RateLimitConfig {
        per_second,
        burst_size,
    }
}
