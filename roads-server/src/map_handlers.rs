use crate::{AppResult, AppState};
use axum::{extract::State, response::Json};
use serde_json::{Value, json};

/// `GET /map/roads` — the full register as a GeoJSON FeatureCollection.
///
/// Geometry comes straight from each road's stored coordinate path; the
/// engine never interprets it.
pub async fn map_roads_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let roads = state.repo.list_roads().await?;

    let features: Vec<Value> = roads
        .iter()
        .map(|road| {
            json!({
                "type": "Feature",
                "properties": {
                    "id": road.id,
                    "name": road.name,
                    "status": road.status,
                    "progress": road.progress,
                },
                "geometry": {
                    "type": "LineString",
                    "coordinates": road.map_path,
                },
            })
        })
        .collect();

    Ok(Json(json!({
        "type": "FeatureCollection",
        "features": features,
    })))
}
