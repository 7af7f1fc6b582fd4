use crate::ids::SnapshotID;
use chrono::{DateTime, Utc};

/// An immutable point-in-time summary of the road portfolio.
///
/// Snapshots are append-only: every recomputation produces a fresh row and
/// the persistence layer keeps the full history, with "latest by
/// `recorded_at`" as the externally visible read path.
///
/// `budget_spent` keeps the fractional per-road product unrounded; currency
/// rounding policy is left to callers that need exact financial figures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    pub id: SnapshotID,
    pub total_roads: i64,
    pub completed_roads: i64,
    pub in_progress_roads: i64,
    pub planned_roads: i64,
    /// Sum of allocated budgets, whole KES.
    pub budget_allocated: i64,
    /// Sum of `budget * progress / 100` per road, unrounded.
    pub budget_spent: f64,
    pub recorded_at: DateTime<Utc>,
}
