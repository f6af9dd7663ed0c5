//! Libris Server - Book Catalog Management System
//!
//! A Rust REST API server for managing a book catalog.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{covers::MAX_COVER_BYTES, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("libris_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Libris Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // The cover storage directory is created once here; handlers only see
    // it through the injected storage configuration.
    tokio::fs::create_dir_all(&config.storage.covers_dir)
        .await
        .expect("Failed to create cover storage directory");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.storage.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.storage.static_dir.clone();

    let api_routes = Router::new()
        // Health
        .route("/", get(api::health::root))
        .route("/health", get(api::health::health_check))
        // Authors
        .route("/author", get(api::authors::list_authors))
        .route("/author", post(api::authors::create_author))
        .route("/author/:id", get(api::authors::get_author))
        .route("/author/:id", put(api::authors::update_author))
        .route("/author/:id", delete(api::authors::delete_author))
        // Categories
        .route("/category", get(api::categories::list_categories))
        .route("/category", post(api::categories::create_category))
        .route("/category/:id", get(api::categories::get_category))
        .route("/category/:id", put(api::categories::update_category))
        .route("/category/:id", delete(api::categories::delete_category))
        // Books
        .route("/book", get(api::books::list_books))
        .route("/book", post(api::books::create_book))
        .route("/book/:id", get(api::books::get_book))
        .route("/book/:id", put(api::books::update_book))
        .route("/book/:id", delete(api::books::delete_book))
        // Cover upload; body limit leaves slack above the 2 MiB cover cap
        // for multipart framing, the service enforces the cap itself
        .route(
            "/book/:id/cover",
            post(api::books::upload_cover)
                .layer(DefaultBodyLimit::max(MAX_COVER_BYTES + 64 * 1024)),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(api_routes)
        .merge(openapi)
        // Uploaded covers are exposed under the same prefix stored in
        // Book.cover_image
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
