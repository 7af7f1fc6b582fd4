use crate::{AppError, AppResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use roads_model::{User, UserID};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

/// Account the single-tenant deployment treats as the signed-in engineer.
// TODO: resolve the caller from a session once authentication lands.
pub const ADMIN_EMAIL: &str = "admin@meruroads.go.ke";

/// `GET /users`
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let users = state.repo.list_users().await?;

    Ok(Json(json!({
        "status": "success",
        "count": users.len(),
        "users": users,
    })))
}

/// `GET /users/me`
pub async fn current_user_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let Some(user) = state.repo.user_by_email(ADMIN_EMAIL).await? else {
        return Err(AppError::not_found("User not found"));
    };

    Ok(Json(json!({ "status": "success", "user": user })))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar_url: Option<String>,
}

/// `POST /users`
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    if state.repo.user_by_email(&request.email).await?.is_some() {
        return Err(AppError::conflict(
            "User with that email already exists",
        ));
    }

    let user = User {
        id: UserID::new(),
        name: request.name,
        email: request.email,
        role: request.role,
        avatar_url: request.avatar_url,
        last_login: None,
    };
    state.repo.store_user(&user).await?;

    info!("Created user {}", user.email);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "user": user })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub avatar_url: Option<String>,
}

/// `PATCH /users/{id}` — partial update; absent fields keep their value.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> AppResult<Json<Value>> {
    let id = UserID(id);

    let Some(mut user) = state.repo.get_user(&id).await? else {
        return Err(AppError::not_found(format!("user {id}")));
    };

    if let Some(name) = request.name {
        user.name = name;
    }
    if let Some(email) = request.email {
        user.email = email;
    }
    if let Some(role) = request.role {
        user.role = role;
    }
    if let Some(avatar_url) = request.avatar_url {
        user.avatar_url = Some(avatar_url);
    }
    state.repo.update_user(&user).await?;

    Ok(Json(json!({ "status": "success", "user": user })))
}

/// `DELETE /users/{id}`
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let id = UserID(id);
    state.repo.delete_user(&id).await?;

    info!("Deleted user {id}");
    Ok(Json(json!({ "status": "success", "message": "User deleted" })))
}
