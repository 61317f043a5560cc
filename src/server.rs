//! The HTTP backend: a thin relay in front of the model plus the summary endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{info, warn};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::aggregator::{aggregate, Dashboard};
use crate::error::{Result, StatementError};
use crate::llm::StatementExtractor;
use crate::schema::ParseRequest;

/// Request bodies above this are rejected before they reach a handler.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub extractor: StatementExtractor,
}

impl AppState {
    pub fn new(extractor: StatementExtractor) -> Self {
        Self { extractor }
    }
}

/// Error body for every failed request: `{"error": "..."}`.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<StatementError> for AppError {
    fn from(err: StatementError) -> Self {
        let status = match &err {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            StatementError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/parse", post(parse_statement))
        .route("/api/summary", post(summarize))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Backend running on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "Backend is running successfully"
}

/// POST /api/parse - statement text or document in, CSV out
async fn parse_statement(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ParseRequest>, JsonRejection>,
) -> std::result::Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected parse request body: {}", e.body_text());
        AppError::bad_request(e.body_text())
    })?;

    let input = request.into_input().map_err(|e| {
        warn!("Rejected parse request: {}", e);
        AppError::from(e)
    })?;

    let csv = state.extractor.extract(&input).await?;

    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv).into_response())
}

/// POST /api/summary - CSV text in, dashboard figures out (`null` when there is nothing to show)
async fn summarize(body: String) -> Json<Option<Dashboard>> {
    let dashboard = aggregate(&body);
    info!(
        "Summarized {} bytes of CSV ({} lines counted)",
        body.len(),
        dashboard.as_ref().map_or(0, |d| d.summary.count)
    );
    Json(dashboard)
}
