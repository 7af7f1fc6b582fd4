use crate::{AppError, AppResult, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use roads_core::{RoadQuery, SearchMode, SortField, SortOrder};
use roads_model::{ContractorID, MilestoneID, Road, RoadID, RoadStatus};
use serde::Deserialize;
use serde_json::{Value, json};
use std::str::FromStr;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RoadListParams {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
    pub mode: Option<SearchMode>,
}

impl RoadListParams {
    fn into_query(self) -> AppResult<RoadQuery> {
        let sort = match self.sort.as_deref() {
            Some(name) => SortField::from_str(name)?,
            None => SortField::default(),
        };
        let order = match self.order.as_deref() {
            Some("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        };

        Ok(RoadQuery {
            sort,
            order,
            search: self.search,
            mode: self.mode,
        })
    }
}

/// `GET /roads?sort&order&search&mode`
///
/// Runs the full engine path: sort, then optionally narrow. An exact-match
/// search serializes as a zero- or one-element `roads` array so the
/// response shape stays stable for clients.
pub async fn list_roads_handler(
    State(state): State<AppState>,
    Query(params): Query<RoadListParams>,
) -> AppResult<Json<Value>> {
    let query = params.into_query()?;
    info!(sort = %query.sort, "Listing roads");

    let roads = state.repo.list_roads().await?;
    let result = state.engine.execute(&roads, &query)?.into_roads();

    Ok(Json(json!({
        "status": "success",
        "count": result.len(),
        "roads": result,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CreateRoadRequest {
    pub name: String,
    pub length: f64,
    pub budget: i64,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub progress: i32,
    pub description: String,
    #[serde(default)]
    pub map_path: Vec<[f64; 2]>,
    #[serde(default)]
    pub contractor_ids: Vec<Uuid>,
    #[serde(default)]
    pub milestone_ids: Vec<Uuid>,
}

/// `POST /roads` — store a new road and append a fresh stats snapshot.
pub async fn create_road_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateRoadRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    if !(0..=100).contains(&request.progress) {
        return Err(AppError::bad_request(
            "Progress must be between 0 and 100",
        ));
    }

    let road = Road {
        id: RoadID::new(),
        name: request.name,
        length: request.length,
        budget: request.budget,
        status: RoadStatus::parse(&request.status),
        start_date: request.start_date,
        end_date: request.end_date,
        progress: request.progress,
        description: request.description,
        map_path: request.map_path,
        contractors: request
            .contractor_ids
            .into_iter()
            .map(ContractorID)
            .collect(),
        milestones: request
            .milestone_ids
            .into_iter()
            .map(MilestoneID)
            .collect(),
    };
    road.validate()?;

    state.repo.store_road(&road).await?;
    state.refresh_stats().await?;

    info!("Created road {}", road.name);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "road": road })),
    ))
}

/// `GET /roads/{id}` — road with its associated records embedded.
pub async fn road_details_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let id = RoadID(id);

    let Some(road) = state.repo.get_road(&id).await? else {
        warn!("Road not found: {id}");
        return Err(AppError::not_found(format!("road {id}")));
    };

    let milestones = state.repo.road_milestones(&id).await?;
    let photos = state.repo.list_photos(Some(&id)).await?;
    let mut contractors = Vec::new();
    for contractor_id in &road.contractors {
        if let Some(contractor) =
            state.repo.get_contractor(contractor_id).await?
        {
            contractors.push(contractor);
        }
    }

    Ok(Json(json!({
        "status": "success",
        "road": road,
        "contractors": contractors,
        "milestones": milestones,
        "photos": photos,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub progress: i32,
}

/// `PATCH /roads/{id}/progress`
///
/// The range check lives here, not in the engine: the aggregator assumes
/// well-formed progress values and this endpoint is the boundary that
/// mutates them.
pub async fn update_progress_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProgressRequest>,
) -> AppResult<Json<Value>> {
    if !(0..=100).contains(&request.progress) {
        return Err(AppError::bad_request(
            "Progress must be between 0 and 100",
        ));
    }

    let id = RoadID(id);
    let Some(road) =
        state.repo.update_progress(&id, request.progress).await?
    else {
        warn!("Road not found: {id}");
        return Err(AppError::not_found(format!("road {id}")));
    };

    state.refresh_stats().await?;

    Ok(Json(json!({ "status": "success", "road": road })))
}

/// `GET /roads/{id}/milestones`
pub async fn road_milestones_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let id = RoadID(id);

    if state.repo.get_road(&id).await?.is_none() {
        return Err(AppError::not_found(format!("road {id}")));
    }

    let milestones = state.repo.road_milestones(&id).await?;
    Ok(Json(json!({ "milestones": milestones })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::{
        Config, ConfigMetadata, CorsConfig, DatabaseConfig, ServerConfig,
    };
    use async_trait::async_trait;
    use roads_core::{Result as CoreResult, RoadsRepository};
    use roads_model::{
        Contractor, Milestone, Notification, Photo, StatsSnapshot, User,
        UserID,
    };
    use std::sync::{Arc, Mutex};

    /// Minimal repository double backed by in-memory vectors.
    struct InMemoryRepository {
        roads: Mutex<Vec<Road>>,
        snapshots: Mutex<Vec<StatsSnapshot>>,
    }

    impl InMemoryRepository {
        fn with_roads(roads: Vec<Road>) -> Arc<Self> {
            Arc::new(Self {
                roads: Mutex::new(roads),
                snapshots: Mutex::new(Vec::new()),
            })
        }

        fn snapshot_count(&self) -> usize {
            self.snapshots.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RoadsRepository for InMemoryRepository {
        async fn initialize_schema(&self) -> CoreResult<()> {
            Ok(())
        }

        async fn list_roads(&self) -> CoreResult<Vec<Road>> {
            Ok(self.roads.lock().unwrap().clone())
        }

        async fn get_road(&self, id: &RoadID) -> CoreResult<Option<Road>> {
            Ok(self
                .roads
                .lock()
                .unwrap()
                .iter()
                .find(|road| road.id == *id)
                .cloned())
        }

        async fn store_road(&self, road: &Road) -> CoreResult<()> {
            self.roads.lock().unwrap().push(road.clone());
            Ok(())
        }

        async fn update_progress(
            &self,
            id: &RoadID,
            progress: i32,
        ) -> CoreResult<Option<Road>> {
            let mut roads = self.roads.lock().unwrap();
            let Some(road) =
                roads.iter_mut().find(|road| road.id == *id)
            else {
                return Ok(None);
            };
            road.progress = progress;
            Ok(Some(road.clone()))
        }

        async fn road_milestones(
            &self,
            _id: &RoadID,
        ) -> CoreResult<Vec<Milestone>> {
            Ok(Vec::new())
        }

        async fn list_contractors(&self) -> CoreResult<Vec<Contractor>> {
            Ok(Vec::new())
        }

        async fn get_contractor(
            &self,
            _id: &ContractorID,
        ) -> CoreResult<Option<Contractor>> {
            Ok(None)
        }

        async fn contractor_by_name(
            &self,
            _name: &str,
        ) -> CoreResult<Option<Contractor>> {
            Ok(None)
        }

        async fn store_contractor(
            &self,
            _contractor: &Contractor,
        ) -> CoreResult<()> {
            Ok(())
        }

        async fn store_photo(&self, _photo: &Photo) -> CoreResult<()> {
            Ok(())
        }

        async fn list_photos(
            &self,
            _road_id: Option<&RoadID>,
        ) -> CoreResult<Vec<Photo>> {
            Ok(Vec::new())
        }

        async fn list_users(&self) -> CoreResult<Vec<User>> {
            Ok(Vec::new())
        }

        async fn get_user(&self, _id: &UserID) -> CoreResult<Option<User>> {
            Ok(None)
        }

        async fn user_by_email(
            &self,
            _email: &str,
        ) -> CoreResult<Option<User>> {
            Ok(None)
        }

        async fn store_user(&self, _user: &User) -> CoreResult<()> {
            Ok(())
        }

        async fn update_user(&self, _user: &User) -> CoreResult<()> {
            Ok(())
        }

        async fn delete_user(&self, _id: &UserID) -> CoreResult<()> {
            Ok(())
        }

        async fn store_notification(
            &self,
            _notification: &Notification,
        ) -> CoreResult<()> {
            Ok(())
        }

        async fn unread_notifications(
            &self,
            _user_id: &UserID,
        ) -> CoreResult<Vec<Notification>> {
            Ok(Vec::new())
        }

        async fn insert_snapshot(
            &self,
            snapshot: &StatsSnapshot,
        ) -> CoreResult<()> {
            self.snapshots.lock().unwrap().push(snapshot.clone());
            Ok(())
        }

        async fn latest_snapshot(
            &self,
        ) -> CoreResult<Option<StatsSnapshot>> {
            Ok(self.snapshots.lock().unwrap().last().cloned())
        }

        async fn snapshot_history(
            &self,
            _limit: i64,
        ) -> CoreResult<Vec<StatsSnapshot>> {
            let mut history = self.snapshots.lock().unwrap().clone();
            history.reverse();
            Ok(history)
        }
    }

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig { url: None },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_string()],
            },
            metadata: ConfigMetadata::default(),
        })
    }

    fn test_road(name: &str, length: f64, progress: i32) -> Road {
        Road {
            id: RoadID::new(),
            name: name.to_string(),
            length,
            budget: 100_000,
            status: RoadStatus::Ongoing,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 10, 30).unwrap(),
            progress,
            description: format!("{name} works"),
            map_path: Vec::new(),
            contractors: Vec::new(),
            milestones: Vec::new(),
        }
    }

    fn test_state(roads: Vec<Road>) -> (AppState, Arc<InMemoryRepository>) {
        let repo = InMemoryRepository::with_roads(roads);
        let state = AppState::new(repo.clone(), test_config());
        (state, repo)
    }

    #[tokio::test]
    async fn listing_returns_sorted_roads() {
        let (state, _) = test_state(vec![
            test_road("Nkubu Bypass", 7.2, 45),
            test_road("Maua Highway", 18.5, 65),
        ]);

        let params = RoadListParams {
            sort: Some("name".to_string()),
            order: None,
            search: None,
            mode: None,
        };
        let Json(body) =
            list_roads_handler(State(state), Query(params)).await.unwrap();

        assert_eq!(body["status"], "success");
        assert_eq!(body["count"], 2);
        assert_eq!(body["roads"][0]["name"], "Maua Highway");
        assert_eq!(body["roads"][1]["name"], "Nkubu Bypass");
    }

    #[tokio::test]
    async fn numeric_search_yields_single_element_array() {
        let (state, _) = test_state(vec![
            test_road("Nkubu Bypass", 7.2, 45),
            test_road("Maua Highway", 18.5, 65),
        ]);

        let params = RoadListParams {
            sort: Some("length".to_string()),
            order: None,
            search: Some("7.2".to_string()),
            mode: None,
        };
        let Json(body) =
            list_roads_handler(State(state), Query(params)).await.unwrap();

        assert_eq!(body["count"], 1);
        assert_eq!(body["roads"][0]["name"], "Nkubu Bypass");
    }

    #[tokio::test]
    async fn unknown_sort_field_is_a_request_error() {
        let (state, _) = test_state(Vec::new());

        let params = RoadListParams {
            sort: Some("color".to_string()),
            order: None,
            search: None,
            mode: None,
        };
        let err = list_roads_handler(State(state), Query(params))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn out_of_range_progress_is_rejected_before_storage() {
        let road = test_road("Maua Highway", 18.5, 65);
        let id = road.id.to_uuid();
        let (state, repo) = test_state(vec![road]);

        let err = update_progress_handler(
            State(state),
            Path(id),
            Json(UpdateProgressRequest { progress: 150 }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(repo.snapshot_count(), 0);
    }

    #[tokio::test]
    async fn progress_update_appends_a_snapshot() {
        let road = test_road("Maua Highway", 18.5, 65);
        let id = road.id.to_uuid();
        let (state, repo) = test_state(vec![road]);

        let Json(body) = update_progress_handler(
            State(state),
            Path(id),
            Json(UpdateProgressRequest { progress: 80 }),
        )
        .await
        .unwrap();

        assert_eq!(body["road"]["progress"], 80);
        assert_eq!(repo.snapshot_count(), 1);
    }

    #[tokio::test]
    async fn create_road_appends_a_snapshot() {
        let (state, repo) = test_state(Vec::new());

        let request = CreateRoadRequest {
            name: "Kianjai Spur".to_string(),
            length: 12.0,
            budget: 600_000_000,
            status: "planned".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            progress: 0,
            description: "Northern corridor spur".to_string(),
            map_path: Vec::new(),
            contractor_ids: Vec::new(),
            milestone_ids: Vec::new(),
        };
        let (status, Json(body)) =
            create_road_handler(State(state), Json(request)).await.unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["road"]["name"], "Kianjai Spur");
        assert_eq!(repo.snapshot_count(), 1);
    }
}
