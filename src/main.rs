use divvy::api::openapi::ApiDoc;
use divvy::api::{AppService, handlers};
use divvy::config::CONFIG;
use divvy::infrastructure::notify::{Notifier, email::EmailNotifier, sms::SmsNotifier};
use divvy::{InMemoryBroadcast, InMemoryLogging, InMemoryStorage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(CONFIG.log_level.as_str())
        .init();

    // Initialize storage, logging, realtime fan-out and notification channels
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let realtime = InMemoryBroadcast::new();
    let notifiers: Vec<Box<dyn Notifier>> =
        vec![Box::new(EmailNotifier::from_config()), Box::new(SmsNotifier::new())];
    let service: Arc<AppService> = Arc::new(AppService::new(
        storage,
        logging,
        realtime,
        notifiers,
        CONFIG.jwt_secret.clone(),
    ));

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "API is running..." }))
        .nest("/api", handlers::api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30))) // 30-second timeout
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http()); // Request tracing

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
