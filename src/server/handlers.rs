//! Route handlers.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dream_types::{Analysis, JournalEntry};

use super::auth::request_host;
use super::AppState;
use crate::error::JournalError;
use crate::report;

type ApiError = (StatusCode, String);

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub lexicon_hash: String,
    pub packs: Vec<String>,
    pub symbols: usize,
    pub rules: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagResponse {
    pub ok: bool,
    pub hostname: String,
    pub path: String,
    pub auth: DiagAuth,
    pub env: DiagEnv,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagAuth {
    pub present: bool,
    pub scheme: Option<String>,
}

/// Auth settings without secrets: only lengths are reported.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagEnv {
    pub enable: bool,
    pub user_len: usize,
    pub pass_len: usize,
}

// ============================================================================
// Public Routes
// ============================================================================

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.analyzer.store().stats();
    Json(HealthResponse {
        status: "ok".to_string(),
        lexicon_hash: stats.hash,
        packs: stats.packs,
        symbols: stats.symbol_count,
        rules: stats.rule_count,
    })
}

pub async fn diag(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Json<DiagResponse> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let scheme = authorization
        .split(' ')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Json(DiagResponse {
        ok: true,
        hostname: request_host(&headers),
        path: uri.path().to_string(),
        auth: DiagAuth {
            present: !authorization.is_empty(),
            scheme,
        },
        env: DiagEnv {
            enable: state.auth.enabled,
            user_len: state.auth.user.chars().count(),
            pass_len: state.auth.pass.chars().count(),
        },
    })
}

// ============================================================================
// Protected Routes (/app)
// ============================================================================

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Analysis>, ApiError> {
    check_length(&state, &request.text)?;
    Ok(Json(state.analyzer.analyze(&request.text)))
}

pub async fn list_journal(State(state): State<AppState>) -> Json<Vec<JournalEntry>> {
    let journal = state.journal.read().await;
    Json(journal.list().to_vec())
}

pub async fn add_journal(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    check_length(&state, &request.text)?;
    let analysis = state.analyzer.analyze(&request.text);
    let entry = state
        .journal
        .write()
        .await
        .add(request.text, analysis)
        .map_err(journal_error)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_journal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .journal
        .write()
        .await
        .delete(id)
        .map_err(journal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn journal_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let journal = state.journal.read().await;
    let entry = journal
        .get(id)
        .ok_or_else(|| journal_error(JournalError::NotFound(id)))?;

    let disposition = format!("attachment; filename=\"{}\"", report::file_name(entry));
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report::to_markdown(entry),
    ))
}

// ============================================================================
// Helpers
// ============================================================================

fn check_length(state: &AppState, text: &str) -> Result<(), ApiError> {
    if text.trim().chars().count() < state.min_text_chars {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "Dream text must be at least {} characters",
                state.min_text_chars
            ),
        ));
    }
    Ok(())
}

fn journal_error(err: JournalError) -> ApiError {
    match err {
        JournalError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        JournalError::QuotaExceeded { .. } => (StatusCode::CONFLICT, err.to_string()),
        JournalError::Io { .. } | JournalError::Serialization(_) => {
            tracing::error!("Journal error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Journal storage error".to_string(),
            )
        }
    }
}
