//! Tests for the road query engine.

#[cfg(test)]
mod tests {
    use crate::query::engine::RoadQueryEngine;
    use crate::query::fields::SortField;
    use crate::query::keys::SortKey;
    use crate::query::ordering::sort_roads;
    use crate::query::search::{binary_search_exact, filter_contains};
    use crate::query::types::{
        QueryError, QueryOutcome, RoadQuery, SearchMode, SortOrder,
    };
    use chrono::NaiveDate;
    use roads_model::{Road, RoadID, RoadStatus};
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn test_road(
        name: &str,
        length: f64,
        budget: i64,
        status: &str,
        progress: i32,
    ) -> Road {
        Road {
            id: RoadID::new(),
            name: name.to_string(),
            length,
            budget,
            status: RoadStatus::parse(status),
            start_date: NaiveDate::from_ymd_opt(2023, 3, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            progress,
            description: format!("{name} corridor works"),
            map_path: vec![[37.60, 0.08], [37.65, 0.06]],
            contractors: Vec::new(),
            milestones: Vec::new(),
        }
    }

    fn sample_roads() -> Vec<Road> {
        vec![
            test_road("Maua Highway", 18.5, 2_400_000_000, "ongoing", 65),
            test_road("Nkubu Bypass", 7.2, 850_000_000, "ongoing", 45),
            test_road("Makutano Junction", 3.8, 420_000_000, "completed", 100),
            test_road("Kianjai Spur", 12.0, 600_000_000, "planned", 0),
        ]
    }

    fn names(roads: &[Road]) -> Vec<&str> {
        roads.iter().map(|road| road.name.as_str()).collect()
    }

    fn id_set(roads: &[Road]) -> BTreeSet<RoadID> {
        roads.iter().map(|road| road.id).collect()
    }

    #[test]
    fn sort_by_name_is_case_insensitive() {
        let roads = vec![
            test_road("B", 1.0, 10, "planned", 0),
            test_road("a", 1.0, 10, "planned", 0),
            test_road("C", 1.0, 10, "planned", 0),
        ];

        let sorted = sort_roads(&roads, SortField::Name, false);

        assert_eq!(names(&sorted), vec!["a", "B", "C"]);
    }

    #[test]
    fn sort_descending_reverses_direction() {
        let sorted = sample_roads();
        let sorted = sort_roads(&sorted, SortField::Length, true);

        assert_eq!(
            names(&sorted),
            vec![
                "Maua Highway",
                "Kianjai Spur",
                "Nkubu Bypass",
                "Makutano Junction"
            ]
        );
    }

    #[test]
    fn sort_output_is_a_permutation_of_input() {
        let roads = sample_roads();

        for field in SortField::ALL {
            for descending in [false, true] {
                let sorted = sort_roads(&roads, field, descending);
                assert_eq!(sorted.len(), roads.len());
                assert_eq!(id_set(&sorted), id_set(&roads));
            }
        }
    }

    #[test]
    fn sorted_adjacent_keys_are_ordered() {
        let roads = sample_roads();

        for field in SortField::ALL {
            for descending in [false, true] {
                let sorted = sort_roads(&roads, field, descending);
                for pair in sorted.windows(2) {
                    let a = SortKey::extract(&pair[0], field);
                    let b = SortKey::extract(&pair[1], field);
                    if descending {
                        assert!(a >= b, "descending order broken on {field}");
                    } else {
                        assert!(a <= b, "ascending order broken on {field}");
                    }
                }
            }
        }
    }

    #[test]
    fn sorting_is_idempotent() {
        let roads = sample_roads();

        let once = sort_roads(&roads, SortField::Budget, false);
        let twice = sort_roads(&once, SortField::Budget, false);

        assert_eq!(once, twice);
    }

    #[test]
    fn sort_handles_empty_and_single_inputs() {
        let empty: Vec<Road> = Vec::new();
        assert!(sort_roads(&empty, SortField::Name, false).is_empty());

        let single = vec![test_road("Solo Road", 1.0, 10, "planned", 0)];
        let sorted = sort_roads(&single, SortField::Name, true);
        assert_eq!(names(&sorted), vec!["Solo Road"]);
    }

    #[test]
    fn equal_keys_keep_input_relative_order() {
        let roads = vec![
            test_road("first", 5.0, 100, "ongoing", 10),
            test_road("second", 5.0, 100, "ongoing", 20),
            test_road("third", 5.0, 100, "ongoing", 30),
        ];

        let sorted = sort_roads(&roads, SortField::Budget, false);

        assert_eq!(names(&sorted), vec!["first", "second", "third"]);
    }

    #[test]
    fn contains_search_matches_normalized_substring() {
        let roads = sort_roads(&sample_roads(), SortField::Name, false);

        let hits = filter_contains(&roads, SortField::Name, "MA");

        // Sorted order is preserved in the narrowed listing.
        assert_eq!(names(&hits), vec!["Makutano Junction", "Maua Highway"]);
    }

    #[test]
    fn contains_search_on_status_field() {
        let roads = sort_roads(&sample_roads(), SortField::Status, false);

        let hits = filter_contains(&roads, SortField::Status, "ongo");

        assert_eq!(hits.len(), 2);
        assert!(
            hits.iter()
                .all(|road| road.status == RoadStatus::Ongoing)
        );
    }

    #[test]
    fn contains_search_with_no_matches_is_empty() {
        let roads = sort_roads(&sample_roads(), SortField::Name, false);

        let hits = filter_contains(&roads, SortField::Name, "expressway");

        assert!(hits.is_empty());
    }

    #[test]
    fn exact_search_finds_unique_length() {
        let engine = RoadQueryEngine::new();
        let query = RoadQuery {
            sort: SortField::Length,
            order: SortOrder::Ascending,
            search: Some("7.2".to_string()),
            mode: None,
        };

        let outcome = engine.execute(&sample_roads(), &query).unwrap();

        match outcome {
            QueryOutcome::Exact(Some(road)) => {
                assert_eq!(road.name, "Nkubu Bypass")
            }
            other => panic!("expected exact hit, got {other:?}"),
        }
    }

    #[test]
    fn exact_search_misses_absent_value() {
        let engine = RoadQueryEngine::new();
        let query = RoadQuery {
            sort: SortField::Length,
            order: SortOrder::Ascending,
            search: Some("99.9".to_string()),
            mode: None,
        };

        let outcome = engine.execute(&sample_roads(), &query).unwrap();

        assert_eq!(outcome, QueryOutcome::Exact(None));
    }

    #[test]
    fn exact_search_honors_descending_order() {
        let roads = sort_roads(&sample_roads(), SortField::Length, true);

        let needle = SortKey::parse_term(SortField::Length, "3.8").unwrap();
        let hit =
            binary_search_exact(&roads, SortField::Length, &needle, true);

        assert_eq!(hit.map(|road| road.name.as_str()), Some("Makutano Junction"));
    }

    #[test]
    fn exact_search_on_duplicates_returns_a_matching_record() {
        let mut roads = sample_roads();
        roads.push(test_road("Twin Spur", 7.2, 10, "planned", 0));
        let sorted = sort_roads(&roads, SortField::Length, false);

        let needle = SortKey::parse_term(SortField::Length, "7.2").unwrap();
        let hit =
            binary_search_exact(&sorted, SortField::Length, &needle, false)
                .expect("duplicate key should still match");

        assert_eq!(SortKey::extract(hit, SortField::Length), needle);
    }

    #[test]
    fn exact_search_on_unsorted_input_does_not_panic() {
        // Out of contract: result is unspecified but must not crash.
        let roads = sample_roads();
        let needle = SortKey::parse_term(SortField::Length, "18.5").unwrap();

        let _ = binary_search_exact(&roads, SortField::Length, &needle, false);
    }

    #[test]
    fn blank_search_term_returns_full_listing() {
        let engine = RoadQueryEngine::new();
        let query = RoadQuery {
            sort: SortField::Name,
            order: SortOrder::Ascending,
            search: Some("   ".to_string()),
            mode: None,
        };

        let outcome = engine.execute(&sample_roads(), &query).unwrap();

        match outcome {
            QueryOutcome::Listing(roads) => assert_eq!(roads.len(), 4),
            other => panic!("expected listing, got {other:?}"),
        }
    }

    #[test]
    fn missing_search_term_returns_sorted_listing() {
        let engine = RoadQueryEngine::new();
        let query = RoadQuery {
            sort: SortField::Budget,
            order: SortOrder::Descending,
            search: None,
            mode: None,
        };

        let outcome = engine.execute(&sample_roads(), &query).unwrap();

        match outcome {
            QueryOutcome::Listing(roads) => {
                assert_eq!(roads[0].name, "Maua Highway");
                assert_eq!(roads[3].name, "Makutano Junction");
            }
            other => panic!("expected listing, got {other:?}"),
        }
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let err = SortField::from_str("bogus").unwrap_err();

        assert_eq!(err, QueryError::InvalidSortField("bogus".to_string()));
    }

    #[test]
    fn numeric_term_mismatch_is_rejected() {
        let engine = RoadQueryEngine::new();
        let query = RoadQuery {
            sort: SortField::Length,
            order: SortOrder::Ascending,
            search: Some("wide".to_string()),
            mode: None,
        };

        let err = engine.execute(&sample_roads(), &query).unwrap_err();

        assert!(matches!(err, QueryError::TypeMismatch { field: "length", .. }));
    }

    #[test]
    fn fractional_term_on_integer_field_is_rejected() {
        let err = SortKey::parse_term(SortField::Budget, "7.2").unwrap_err();

        assert!(matches!(err, QueryError::TypeMismatch { field: "budget", .. }));
    }

    #[test]
    fn explicit_contains_mode_overrides_numeric_default() {
        let engine = RoadQueryEngine::new();
        let query = RoadQuery {
            sort: SortField::Progress,
            order: SortOrder::Ascending,
            search: Some("5".to_string()),
            mode: Some(SearchMode::Contains),
        };

        let outcome = engine.execute(&sample_roads(), &query).unwrap();

        match outcome {
            // 65 and 45 contain "5"; 0 and 100 do not.
            QueryOutcome::Listing(roads) => assert_eq!(roads.len(), 2),
            other => panic!("expected listing, got {other:?}"),
        }
    }

    #[test]
    fn explicit_exact_mode_on_text_field() {
        let engine = RoadQueryEngine::new();
        let query = RoadQuery {
            sort: SortField::Name,
            order: SortOrder::Ascending,
            search: Some("maua highway".to_string()),
            mode: Some(SearchMode::Exact),
        };

        let outcome = engine.execute(&sample_roads(), &query).unwrap();

        match outcome {
            QueryOutcome::Exact(Some(road)) => {
                assert_eq!(road.name, "Maua Highway")
            }
            other => panic!("expected exact hit, got {other:?}"),
        }
    }
}
