//! REST API and demo page

mod page;

use crate::pipeline::{self, RunResponse};
use crate::Config;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub use page::INDEX_HTML;

/// API state
pub struct ApiState {
    pub config: Config,
}

impl ApiState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

/// Query string of `/run`
#[derive(Debug, Deserialize)]
pub struct RunQuery {
    /// Notation to analyse; missing means empty
    #[serde(default)]
    pub input: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create the API router
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/run", get(run_input))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Demo page
async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Tokenise, parse and render the `input` query parameter
async fn run_input(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<RunQuery>,
) -> Result<Json<RunResponse>, (StatusCode, String)> {
    match pipeline::run(&query.input, &state.config) {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            debug!(input = %query.input, error = %e, "Rejected input");
            Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        }
    }
}
