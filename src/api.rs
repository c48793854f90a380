//! HTTP API: router, shared state, and request handlers

use crate::analysis;
use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use crate::export;
use crate::github::GitHubClient;
use crate::llm::{CompletionClient, DEFAULT_MAX_RETRIES};
use crate::prompts;
use crate::schema::{AnalysisResult, AnalyzeRepoRequest, AnalyzeRepoResponse, ChatRequest, ChatResponse};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Application state shared across handlers
///
/// Holds only the immutable config; fetcher and completion clients are
/// constructed per request from it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/health", get(health_check))
        .route("/api/analyze-repo", post(analyze_repo))
        .route("/api/chat", post(chat))
        .route("/api/export-docx", post(export_docx))
        .route("/api/export-pdf", post(export_pdf))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint - basic service information
async fn index() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "GitHub Repository Analyzer API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Detailed health check
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "components": {
            "api": "operational",
            "github_service": "operational",
            "llm_service": "operational",
        }
    }))
}

/// Analyze a GitHub repository and generate interview/resume materials
async fn analyze_repo(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRepoRequest>,
) -> Result<Json<AnalyzeRepoResponse>> {
    request.validate()?;
    info!("starting analysis for repository: {}", request.repo_url);

    let github = GitHubClient::new(&state.config)?;
    let snapshot = github.analyze_repository(&request.repo_url).await?;
    info!(
        "repository data fetched: {}/{} ({} files)",
        snapshot.owner, snapshot.repo_name, snapshot.total_files
    );

    let completion = CompletionClient::new(&state.config)?;
    let raw = completion
        .generate(
            prompts::system_prompt(),
            &prompts::analysis_prompt(&snapshot),
            DEFAULT_MAX_RETRIES,
        )
        .await?;

    let result = analysis::assemble(raw, &snapshot)?;
    info!("analysis completed for {}/{}", result.repo_owner, result.repo_name);

    Ok(Json(AnalyzeRepoResponse {
        success: true,
        data: Some(result),
        message: "Repository analyzed successfully".to_string(),
        error: None,
    }))
}

/// Answer a follow-up question against previously generated context
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if request.question.trim().is_empty() {
        return Err(AnalyzerError::InvalidRequest("Question is required".into()));
    }
    info!("chat question received ({} chars)", request.question.len());

    let completion = CompletionClient::new(&state.config)?;
    let reply = completion
        .generate(
            prompts::chat_system_prompt(),
            &prompts::chat_prompt(&request.context, &request.question),
            DEFAULT_MAX_RETRIES,
        )
        .await?;

    let answer = reply
        .get("answer")
        .and_then(Value::as_str)
        .or_else(|| reply.get("text").and_then(Value::as_str))
        .unwrap_or("Sorry, I could not generate an answer.")
        .to_string();

    Ok(Json(ChatResponse { answer }))
}

/// Export analysis as a DOCX attachment
async fn export_docx(Json(data): Json<AnalysisResult>) -> Result<impl IntoResponse> {
    let bytes = export::render_docx(&data)?;
    Ok(attachment_response(&data, "docx", DOCX_MIME, bytes))
}

/// Export analysis as a PDF attachment
async fn export_pdf(Json(data): Json<AnalysisResult>) -> Result<impl IntoResponse> {
    let bytes = export::render_pdf(&data)?;
    Ok(attachment_response(&data, "pdf", "application/pdf", bytes))
}

fn attachment_response(
    data: &AnalysisResult,
    extension: &str,
    mime: &'static str,
    bytes: Vec<u8>,
) -> impl IntoResponse {
    let filename = format!(
        "{}-{}-analysis.{extension}",
        data.repo_owner, data.repo_name
    );
    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        bytes,
    )
}
