use crate::Result;
use async_trait::async_trait;
use roads_model::{
    Contractor, ContractorID, Milestone, Notification, Photo, Road, RoadID,
    StatsSnapshot, User, UserID,
};

/// Storage operations the service needs.
///
/// The road listing endpoint fetches the full collection and hands it to the
/// query engine; filtering and ordering are not pushed into SQL. Statistics
/// snapshots are append-only: `insert_snapshot` never updates a prior row
/// and `latest_snapshot` reads the newest one by `recorded_at`.
#[async_trait]
pub trait RoadsRepository: Send + Sync {
    async fn initialize_schema(&self) -> Result<()>;

    async fn list_roads(&self) -> Result<Vec<Road>>;
    async fn get_road(&self, id: &RoadID) -> Result<Option<Road>>;
    async fn store_road(&self, road: &Road) -> Result<()>;
    /// Persist a new progress value; returns the updated road, or `None`
    /// when the id is unknown.
    async fn update_progress(
        &self,
        id: &RoadID,
        progress: i32,
    ) -> Result<Option<Road>>;
    async fn road_milestones(&self, id: &RoadID) -> Result<Vec<Milestone>>;

    async fn list_contractors(&self) -> Result<Vec<Contractor>>;
    async fn get_contractor(
        &self,
        id: &ContractorID,
    ) -> Result<Option<Contractor>>;
    async fn contractor_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Contractor>>;
    async fn store_contractor(&self, contractor: &Contractor) -> Result<()>;

    async fn store_photo(&self, photo: &Photo) -> Result<()>;
    /// Photos for one road, or the most recent few across all roads when no
    /// road is given.
    async fn list_photos(&self, road_id: Option<&RoadID>)
    -> Result<Vec<Photo>>;

    async fn list_users(&self) -> Result<Vec<User>>;
    async fn get_user(&self, id: &UserID) -> Result<Option<User>>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn store_user(&self, user: &User) -> Result<()>;
    async fn update_user(&self, user: &User) -> Result<()>;
    async fn delete_user(&self, id: &UserID) -> Result<()>;

    async fn store_notification(
        &self,
        notification: &Notification,
    ) -> Result<()>;
    async fn unread_notifications(
        &self,
        user_id: &UserID,
    ) -> Result<Vec<Notification>>;

    async fn insert_snapshot(&self, snapshot: &StatsSnapshot) -> Result<()>;
    async fn latest_snapshot(&self) -> Result<Option<StatsSnapshot>>;
    async fn snapshot_history(&self, limit: i64)
    -> Result<Vec<StatsSnapshot>>;
}
