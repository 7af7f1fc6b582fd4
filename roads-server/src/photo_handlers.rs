use crate::{AppError, AppResult, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use roads_model::{Photo, PhotoID, RoadID};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AddPhotoRequest {
    pub url: String,
    pub caption: Option<String>,
}

/// `POST /roads/{id}/photos`
pub async fn add_road_photo_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddPhotoRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let road_id = RoadID(id);

    if state.repo.get_road(&road_id).await?.is_none() {
        return Err(AppError::not_found(format!("road {road_id}")));
    }
    if request.url.trim().is_empty() {
        return Err(AppError::bad_request("Photo URL required"));
    }

    let photo = Photo {
        id: PhotoID::new(),
        url: request.url,
        caption: request.caption,
        date_taken: Utc::now(),
        road_id,
    };
    state.repo.store_photo(&photo).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "photo": photo })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct PhotoListParams {
    pub road_id: Option<Uuid>,
}

/// `GET /photos?road_id=` — a road's photos, or a recent sample without one.
pub async fn list_photos_handler(
    State(state): State<AppState>,
    Query(params): Query<PhotoListParams>,
) -> AppResult<Json<Value>> {
    let road_id = params.road_id.map(RoadID);
    let photos = state.repo.list_photos(road_id.as_ref()).await?;

    Ok(Json(json!({
        "status": "success",
        "count": photos.len(),
        "photos": photos,
    })))
}
