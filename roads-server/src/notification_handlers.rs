use crate::{AppError, AppResult, AppState};
use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use crate::user_handlers::ADMIN_EMAIL;

/// `GET /notifications` — unread items for the signed-in engineer.
pub async fn list_notifications_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let Some(user) = state.repo.user_by_email(ADMIN_EMAIL).await? else {
        return Err(AppError::not_found("User not found"));
    };

    let notifications = state.repo.unread_notifications(&user.id).await?;

    Ok(Json(json!({
        "status": "success",
        "count": notifications.len(),
        "notifications": notifications,
    })))
}
