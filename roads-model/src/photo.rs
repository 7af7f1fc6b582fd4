use crate::ids::{PhotoID, RoadID};
use chrono::{DateTime, Utc};

/// A progress photo attached to a road project.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Photo {
    pub id: PhotoID,
    pub url: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub caption: Option<String>,
    pub date_taken: DateTime<Utc>,
    pub road_id: RoadID,
}
