//! Portfolio statistics aggregation.
//!
//! One linear pass over the road collection, no intermediate sort. Each
//! recomputation yields a fresh [`StatsSnapshot`]; persistence appends it
//! to the history log rather than updating any prior row.

use chrono::Utc;
use roads_model::{Road, RoadStatus, SnapshotID, StatsSnapshot};

/// Compute a snapshot of the current road portfolio.
///
/// Roads whose status is not one of the three recognized lifecycle values
/// contribute to `total_roads` and the budget totals but to none of the
/// per-status buckets. `budget_spent` accumulates the fractional per-road
/// product without rounding.
pub fn aggregate(roads: &[Road]) -> StatsSnapshot {
    let mut snapshot = StatsSnapshot {
        id: SnapshotID::new(),
        total_roads: roads.len() as i64,
        completed_roads: 0,
        in_progress_roads: 0,
        planned_roads: 0,
        budget_allocated: 0,
        budget_spent: 0.0,
        recorded_at: Utc::now(),
    };

    for road in roads {
        snapshot.budget_allocated += road.budget;
        snapshot.budget_spent +=
            road.budget as f64 * (road.progress as f64 / 100.0);

        match road.status {
            RoadStatus::Completed => snapshot.completed_roads += 1,
            RoadStatus::Ongoing => snapshot.in_progress_roads += 1,
            RoadStatus::Planned => snapshot.planned_roads += 1,
            // Unrecognized statuses stay uncounted, see RoadStatus docs.
            RoadStatus::Other(_) => {}
        }
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roads_model::RoadID;

    fn test_road(
        name: &str,
        budget: i64,
        status: &str,
        progress: i32,
    ) -> Road {
        Road {
            id: RoadID::new(),
            name: name.to_string(),
            length: 10.0,
            budget,
            status: RoadStatus::parse(status),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 10, 30).unwrap(),
            progress,
            description: "test road".to_string(),
            map_path: Vec::new(),
            contractors: Vec::new(),
            milestones: Vec::new(),
        }
    }

    #[test]
    fn aggregates_counts_and_budgets() {
        let roads = vec![
            test_road("Makutano Junction", 100, "completed", 100),
            test_road("Maua Highway", 200, "ongoing", 50),
            test_road("Nkubu Bypass", 300, "planned", 0),
        ];

        let snapshot = aggregate(&roads);

        assert_eq!(snapshot.total_roads, 3);
        assert_eq!(snapshot.completed_roads, 1);
        assert_eq!(snapshot.in_progress_roads, 1);
        assert_eq!(snapshot.planned_roads, 1);
        assert_eq!(snapshot.budget_allocated, 600);
        assert_eq!(snapshot.budget_spent, 200.0);
    }

    #[test]
    fn unrecognized_status_counts_in_total_only() {
        let roads = vec![
            test_road("Mikinduri Link", 500, "planning", 20),
            test_road("Maua Highway", 200, "ongoing", 50),
        ];

        let snapshot = aggregate(&roads);

        assert_eq!(snapshot.total_roads, 2);
        assert_eq!(snapshot.completed_roads, 0);
        assert_eq!(snapshot.in_progress_roads, 1);
        assert_eq!(snapshot.planned_roads, 0);
        // Budget totals still include the unbucketed road.
        assert_eq!(snapshot.budget_allocated, 700);
        assert_eq!(snapshot.budget_spent, 200.0);
        assert!(
            snapshot.completed_roads
                + snapshot.in_progress_roads
                + snapshot.planned_roads
                < snapshot.total_roads
        );
    }

    #[test]
    fn empty_collection_yields_zeroed_snapshot() {
        let snapshot = aggregate(&[]);

        assert_eq!(snapshot.total_roads, 0);
        assert_eq!(snapshot.budget_allocated, 0);
        assert_eq!(snapshot.budget_spent, 0.0);
    }

    #[test]
    fn spent_keeps_fractional_precision() {
        let roads = vec![test_road("Kianjai Spur", 333, "ongoing", 33)];

        let snapshot = aggregate(&roads);

        assert_eq!(snapshot.budget_spent, 333.0 * 0.33);
    }
}
