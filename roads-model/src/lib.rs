//! Core data model definitions shared across Meru Roads crates.
#![allow(missing_docs)]

pub mod contractor;
pub mod error;
pub mod ids;
pub mod milestone;
pub mod notification;
pub mod photo;
pub mod prelude;
pub mod road;
pub mod stats;
pub mod user;

// Intentionally curated re-exports for downstream consumers.
pub use contractor::Contractor;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{
    ContractorID, MilestoneID, NotificationID, PhotoID, RoadID, SnapshotID,
    UserID,
};
pub use milestone::Milestone;
pub use notification::Notification;
pub use photo::Photo;
pub use road::{Road, RoadStatus};
pub use stats::StatsSnapshot;
pub use user::User;
