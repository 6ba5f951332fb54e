//! Route configuration and setup.
//!
//! API routes are nested under [`API_PREFIX`]; thumbnails are served as static files
//! under [`ASSETS_PREFIX`]; health checks live in [health](health).

pub(crate) mod health;

use crate::constants::{API_PREFIX, ASSETS_PREFIX};
use crate::error::expose_error_details;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use reelhouse_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit(),
        "HTTP concurrency limit layer enabled"
    );

    let api = api_routes(config).layer(axum::middleware::from_fn_with_state(
        state.clone(),
        expose_error_details,
    ));

    let app = Router::new()
        .nest(API_PREFIX, api)
        .nest_service(ASSETS_PREFIX, ServeDir::new(config.assets_root()))
        .merge(RapiDoc::new(format!("{}/openapi.json", API_PREFIX)).path("/docs"))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn api_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(health::liveness_check))
        .route("/openapi.json", get(openapi_json))
        .route(
            "/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route(
            "/videos/{video_id}",
            get(handlers::videos::get_video).delete(handlers::videos::delete_video),
        )
        .route(
            "/thumbnail_upload/{video_id}",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(config.max_thumbnail_size_bytes())),
        )
        .route(
            "/video_upload/{video_id}",
            post(handlers::video_upload::upload_video)
                .layer(DefaultBodyLimit::max(config.max_video_size_bytes())),
        )
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(crate::api_doc::openapi())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
