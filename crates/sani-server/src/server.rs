use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use sani_config::Config;
use sani_engine::Pipeline;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, config: Config) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        }
    }
}

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let processed = ServeDir::new(state.pipeline.uploads().processed_dir());
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        .route("/api/docs", get(handlers::docs))
        .route("/api/upload", post(handlers::upload))
        .route("/api/process", post(handlers::process))
        .route("/analyze/", post(handlers::analyze))
        .nest_service("/processed", processed)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Build the pipeline from `config` and serve until the process exits.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(&config)?;
    if !pipeline.ocr_available() {
        tracing::warn!("No OCR engine available; image requests will fail with 503");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = router(AppState::new(pipeline, config));

    let listener = TcpListener::bind(&addr).await?;
    info!("sani listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
