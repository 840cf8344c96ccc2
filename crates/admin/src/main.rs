//! Washboard Admin - multi-tenant administrative backend.
//!
//! # Architecture
//!
//! - Axum web framework serving JSON REST endpoints
//! - `PostgreSQL` behind sqlx, one schema per tenant
//! - Background worker for fire-and-forget email delivery
//!
//! Requests name their tenant with the `x-tenant-schema` header; the data
//! access layer binds each request's database session to that schema before
//! any query runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use washboard_admin::config::{AppConfig, Environment};
use washboard_admin::db::{TenantDb, create_pool};
use washboard_admin::routes;
use washboard_admin::services::email::EmailService;
use washboard_admin::services::tasks::{DEFAULT_QUEUE_CAPACITY, spawn_email_worker};
use washboard_admin::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(std::borrow::Cow::Borrowed(config.environment.as_str())),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter; defaults to info level for our
    // crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "washboard_admin=info,tower_http=debug".into());

    // JSON logs in production for structured parsing, text locally
    let is_production = config.environment == Environment::Production;
    let json_layer = is_production.then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!is_production).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    let db = TenantDb::new(pool);

    let email_service = EmailService::new(&config.email).expect("Failed to configure SMTP relay");
    let tasks = spawn_email_worker(
        email_service,
        format!("{}/login", config.admin_app_base_url),
        DEFAULT_QUEUE_CAPACITY,
    );

    let addr = config.socket_addr();
    let state = AppState::new(config, db, tasks);

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(%addr, "washboard-admin listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
