use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::pagination::Page;
use super::AppState;
use crate::error::AppError;
use crate::llm::{generate, prompts};
use crate::records::{
    FeedbackRecord, FeedbackRequest, InteractionRecord, NewInteraction, QueryRequest,
};
use crate::stats::{compute_stats, FeedbackStats, NO_DATA_MESSAGE};
use crate::store::SqliteStore;

type AppStateArc = Arc<AppState>;

pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/health/", get(health_check))
        .route("/query/", post(handle_query))
        .route("/feedback/", post(handle_feedback))
        .route("/feedback-stats/", get(feedback_stats))
        .route("/styles/:function_type/", get(available_styles))
        .route("/history/", get(query_history))
}

/// Run a store operation off the async executor.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&SqliteStore) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || f(&store)).await?
}

fn rejected(rejection: JsonRejection) -> AppError {
    AppError::invalid("non_field_errors", rejection.body_text())
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub framework_version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "AI Assistant API is running",
        version: env!("CARGO_PKG_VERSION"),
        framework_version: "axum 0.7",
    })
}

// ============================================================================
// Query
// ============================================================================

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    pub response: String,
    pub data: InteractionRecord,
}

/// Validate, compose the prompt, call the model, persist on success only.
async fn handle_query(
    State(state): State<AppStateArc>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let Json(request) = payload.map_err(rejected)?;
    let query = request.validate()?;

    let prompt = prompts::resolve(query.function_type.as_str(), &query.style, &query.query);
    let generation = generate(state.client.as_ref(), &prompt).await;
    let content = generation.outcome?;

    let new = NewInteraction {
        function_type: query.function_type.as_str().to_string(),
        style: query.style,
        query: query.query,
        response: content,
        processing_time: Some(generation.processing_time),
    };
    let record = with_store(&state, move |store| store.insert_interaction(&new)).await?;

    info!(
        "Answered {} query {} in {:.2}s",
        record.function_type, record.id, generation.processing_time
    );

    Ok(Json(QueryResponse {
        success: true,
        response: record.response.clone(),
        data: record,
    }))
}

// ============================================================================
// Feedback
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: FeedbackRecord,
}

async fn handle_feedback(
    State(state): State<AppStateArc>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let Json(request) = payload.map_err(rejected)?;
    let feedback = request.validate()?;

    let record = with_store(&state, move |store| {
        if let Some(id) = feedback.query_id {
            if store.get_interaction(id)?.is_none() {
                return Err(AppError::invalid(
                    "query_id",
                    format!("Invalid pk \"{}\" - object does not exist.", id),
                ));
            }
        }
        store.insert_feedback(&feedback)
    })
    .await?;

    info!("Feedback {} recorded (rating {})", record.id, record.rating);

    Ok(Json(FeedbackResponse {
        success: true,
        message: "Feedback submitted successfully",
        data: record,
    }))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatsData {
    Stats(FeedbackStats),
    Empty { message: &'static str },
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: StatsData,
}

async fn feedback_stats(State(state): State<AppStateArc>) -> Result<Json<StatsResponse>, AppError> {
    let feedback = with_store(&state, |store| store.all_feedback()).await?;

    let data = match compute_stats(&feedback) {
        Some(stats) => StatsData::Stats(stats),
        None => StatsData::Empty {
            message: NO_DATA_MESSAGE,
        },
    };

    Ok(Json(StatsResponse {
        success: true,
        data,
    }))
}

// ============================================================================
// Styles
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StylesResponse {
    pub success: bool,
    pub styles: &'static [prompts::Style],
}

async fn available_styles(
    Path(function_type): Path<String>,
) -> Result<Json<StylesResponse>, AppError> {
    let styles = prompts::available_styles(&function_type);
    if styles.is_empty() {
        return Err(AppError::BadRequest("Invalid function type".to_string()));
    }

    Ok(Json(StylesResponse {
        success: true,
        styles,
    }))
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HistoryPage {
    pub results: Vec<InteractionRecord>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub data: HistoryPage,
}

async fn query_history(
    State(state): State<AppStateArc>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<HistoryResponse>, AppError> {
    let page = Page::from_params(
        params.get("page").map(String::as_str),
        params.get("page_size").map(String::as_str),
    );

    let (results, total_count) = with_store(&state, move |store| {
        let total = store.count_interactions()?;
        let results = store.list_interactions(page.offset(), page.page_size)?;
        Ok((results, total))
    })
    .await?;

    Ok(Json(HistoryResponse {
        success: true,
        data: HistoryPage {
            has_next: page.has_next(total_count),
            has_previous: page.has_previous(),
            results,
            total_count,
            page: page.page,
            page_size: page.page_size,
        },
    }))
}
