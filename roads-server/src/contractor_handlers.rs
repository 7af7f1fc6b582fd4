use crate::{AppError, AppResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use roads_model::{Contractor, ContractorID};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

/// `GET /contractors`
pub async fn list_contractors_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let contractors = state.repo.list_contractors().await?;

    Ok(Json(json!({
        "status": "success",
        "count": contractors.len(),
        "contractors": contractors,
    })))
}

/// `GET /contractors/{id}`
pub async fn contractor_details_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let id = ContractorID(id);

    let Some(contractor) = state.repo.get_contractor(&id).await? else {
        return Err(AppError::not_found(format!("contractor {id}")));
    };

    Ok(Json(json!({ "status": "success", "contractor": contractor })))
}

#[derive(Debug, Deserialize)]
pub struct CreateContractorRequest {
    pub name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
}

/// `POST /contractors` — firm names are unique; duplicates are a conflict.
pub async fn create_contractor_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateContractorRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    if request.name.trim().is_empty() || request.contact_email.trim().is_empty()
    {
        return Err(AppError::bad_request(
            "Name and contact_email are required",
        ));
    }

    if state
        .repo
        .contractor_by_name(&request.name)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(
            "Contractor with that name already exists",
        ));
    }

    let contractor = Contractor {
        id: ContractorID::new(),
        name: request.name,
        contact_email: request.contact_email,
        contact_phone: request.contact_phone,
    };
    state.repo.store_contractor(&contractor).await?;

    info!("Registered contractor {}", contractor.name);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "contractor": contractor })),
    ))
}
