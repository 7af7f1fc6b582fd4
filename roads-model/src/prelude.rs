//! Curated snapshot of the model surface.
//! Prefer importing from this module instead of individual tree nodes when
//! working in the server or other presentation layers.

pub use super::contractor::Contractor;
pub use super::error::{ModelError, Result as ModelResult};
pub use super::ids::{
    ContractorID, MilestoneID, NotificationID, PhotoID, RoadID, SnapshotID,
    UserID,
};
pub use super::milestone::Milestone;
pub use super::notification::Notification;
pub use super::photo::Photo;
pub use super::road::{Road, RoadStatus};
pub use super::stats::StatsSnapshot;
pub use super::user::User;
