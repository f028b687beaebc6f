//! HTTP front end.

pub mod pagination;
pub mod routes;

use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::AppError;
use crate::llm::LlmClient;
use crate::store::SqliteStore;

/// Everything a handler needs. Built once at startup and shared.
pub struct AppState {
    pub client: Arc<dyn LlmClient>,
    pub store: Arc<SqliteStore>,
}

impl AppState {
    pub fn new(client: Arc<dyn LlmClient>, store: SqliteStore) -> Self {
        Self {
            client,
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    routes::api_routes()
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn run(state: AppState, addr: &str) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "errors": errors}),
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "error": message}),
            ),
            AppError::Configuration(_) | AppError::RemoteCall(_) | AppError::Internal(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"success": false, "error": self.to_string()}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
