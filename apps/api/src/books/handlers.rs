//! Axum route handlers for the book API.

use anyhow::anyhow;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::books::export::{content_disposition, render_plan_pdf};
use crate::books::models::{
    AnalyzeBookRequest, BookInfo, GeneratePdfRequest, GeneratePlanRequest, PlanResponse,
    Recommendation, RecommendBooksRequest,
};
use crate::books::service;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request helpers
// ────────────────────────────────────────────────────────────────────────────

/// Unwraps a JSON body, turning extractor rejections into 400s.
fn json_body<T: DeserializeOwned>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// Requires a field to be present and non-blank. Returns it untrimmed.
fn require_field(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-book
///
/// Returns a short description, typical reader goals and examples for a book.
pub async fn handle_analyze_book(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeBookRequest>, JsonRejection>,
) -> Result<Json<BookInfo>, AppError> {
    let request = json_body(payload)?;
    let book_title = require_field(request.book_title, "bookTitle")?;

    let info = service::analyze_book(state.llm.as_ref(), &state.config.llm_model, &book_title).await?;
    Ok(Json(info))
}

/// POST /api/generate-plan
///
/// Generates a personalised action plan as plain text.
pub async fn handle_generate_plan(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePlanRequest>, JsonRejection>,
) -> Result<Json<PlanResponse>, AppError> {
    let request = json_body(payload)?;
    let book_title = require_field(request.book_title, "bookTitle")?;
    let user_context = require_field(request.user_context, "userContext")?;

    let plan = service::generate_plan(
        state.llm.as_ref(),
        &state.config.llm_model,
        &book_title,
        &user_context,
    )
    .await?;
    Ok(Json(PlanResponse { plan }))
}

/// POST /api/recommend-books
///
/// Suggests books for a goal. Falls back to a fixed list rather than failing.
pub async fn handle_recommend_books(
    State(state): State<AppState>,
    payload: Result<Json<RecommendBooksRequest>, JsonRejection>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    let request = json_body(payload)?;
    let query = require_field(request.query, "query")?;

    let books = service::recommend_books(state.llm.as_ref(), &state.config.llm_model, &query).await;
    Ok(Json(books))
}

/// POST /api/generate-pdf
///
/// Lays out plan text on A4 pages and returns it as a PDF attachment.
/// Text is drawn with the builtin Helvetica fonts, so characters outside
/// printable ASCII (Cyrillic included) come out as `?`.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePdfRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_body(payload)?;
    let content = require_field(request.content, "content")?;
    let book_title = require_field(request.book_title, "bookTitle")?;

    let rules = state.style_rules.clone();
    let config = state.layout_config;
    let title = book_title.clone();
    let bytes = tokio::task::spawn_blocking(move || render_plan_pdf(&content, &title, &rules, config))
        .await
        .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed rendering PDF: {e}")))??;

    info!(book_title = %book_title, bytes = bytes.len(), "Plan PDF generated");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, content_disposition(&book_title))
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(anyhow!("failed to build PDF response: {e}")))
}

/// Fallback for non-POST methods on API routes.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
