use crate::{AppError, AppResult, AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

/// `GET /stats` — the most recent snapshot by `recorded_at`.
pub async fn current_stats_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let Some(snapshot) = state.repo.latest_snapshot().await? else {
        return Err(AppError::not_found("No statistics available"));
    };

    Ok(Json(json!({ "status": "success", "stats": snapshot })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// `GET /stats/history` — newest first; the log is append-only so this is
/// the full audit trail of past totals.
pub async fn stats_history_handler(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<Value>> {
    let limit = params
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = state.repo.snapshot_history(limit).await?;

    Ok(Json(json!({
        "status": "success",
        "count": history.len(),
        "history": history,
    })))
}

/// `POST /stats/refresh` — recompute on demand and append the result.
pub async fn refresh_stats_handler(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let snapshot = state.refresh_stats().await?;
    info!("Stats snapshot refreshed on demand");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "stats": snapshot })),
    ))
}
