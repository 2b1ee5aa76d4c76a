use axum::{Router, http::header, routing::get};
use sendit::{
    ParcelService, SqlStorage,
    api::{handlers::api_routes, middleware::security_headers, openapi::ApiDoc},
    config::CONFIG,
};
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
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&CONFIG.log_level)))
        .init();
    info!("Starting with {:?}", *CONFIG);

    let storage = SqlStorage::connect(&CONFIG.database_url, CONFIG.db_max_connections).await?;
    let service = Arc::new(ParcelService::new(
        Arc::new(storage),
        CONFIG.jwt_secret.clone(),
        CONFIG.jwt_expire_secs,
        CONFIG.bcrypt_cost,
    )
    .with_admin_signup(CONFIG.allow_admin_signup));

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .merge(api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    let app = security_headers(app)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
