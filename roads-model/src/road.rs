use crate::error::ModelError;
use crate::ids::{ContractorID, MilestoneID, RoadID};
use chrono::NaiveDate;
use std::fmt;

/// Construction status of a road project.
///
/// `planned`, `ongoing` and `completed` are the recognized lifecycle values.
/// Anything else read from storage is carried verbatim in `Other` so that
/// round-trips are lossless; such roads are excluded from the per-status
/// statistics buckets (a known data-quality gap, pending cleanup).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum RoadStatus {
    Planned,
    Ongoing,
    Completed,
    Other(String),
}

impl RoadStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "planned" => RoadStatus::Planned,
            "ongoing" => RoadStatus::Ongoing,
            "completed" => RoadStatus::Completed,
            other => RoadStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoadStatus::Planned => "planned",
            RoadStatus::Ongoing => "ongoing",
            RoadStatus::Completed => "completed",
            RoadStatus::Other(raw) => raw,
        }
    }

    /// Whether this is one of the three recognized lifecycle values.
    pub fn is_known(&self) -> bool {
        !matches!(self, RoadStatus::Other(_))
    }
}

impl From<String> for RoadStatus {
    fn from(value: String) -> Self {
        RoadStatus::parse(&value)
    }
}

impl From<RoadStatus> for String {
    fn from(status: RoadStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A road-construction project record.
///
/// `progress` is a percentage in `[0, 100]`; the boundary that mutates it is
/// responsible for range-checking, downstream consumers assume well-formed
/// values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Road {
    pub id: RoadID,
    pub name: String,
    /// Length in kilometres.
    pub length: f64,
    /// Allocated budget in whole KES.
    pub budget: i64,
    pub status: RoadStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Completion percentage, 0-100.
    pub progress: i32,
    pub description: String,
    /// Ordered `[lon, lat]` pairs tracing the road on the county map.
    #[cfg_attr(feature = "serde", serde(default))]
    pub map_path: Vec<[f64; 2]>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub contractors: Vec<ContractorID>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub milestones: Vec<MilestoneID>,
}

impl Road {
    /// Validate the fields the storage schema marks non-null/unique.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::InvalidRecord(
                "road name cannot be empty".to_string(),
            ));
        }
        if self.length < 0.0 {
            return Err(ModelError::InvalidRecord(
                "road length cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_unrecognized_values() {
        let status = RoadStatus::parse("planning");
        assert_eq!(status, RoadStatus::Other("planning".to_string()));
        assert_eq!(status.as_str(), "planning");
        assert!(!status.is_known());
    }

    #[test]
    fn status_recognizes_lifecycle_values() {
        assert_eq!(RoadStatus::parse("planned"), RoadStatus::Planned);
        assert_eq!(RoadStatus::parse("ongoing"), RoadStatus::Ongoing);
        assert_eq!(RoadStatus::parse("completed"), RoadStatus::Completed);
        assert!(RoadStatus::parse("completed").is_known());
    }
}
