//! Search strategies over a sorted road listing.

use crate::query::fields::SortField;
use crate::query::keys::SortKey;
use roads_model::Road;
use std::cmp::Ordering;

/// Case-insensitive substring filter over the sorted listing.
///
/// The caller passes a term that is already trimmed and non-empty; matching
/// records keep their sorted relative order.
pub fn filter_contains(
    roads: &[Road],
    field: SortField,
    term: &str,
) -> Vec<Road> {
    let needle = term.to_lowercase();
    roads
        .iter()
        .filter(|road| {
            SortKey::extract(road, field).into_text().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Binary search for a record whose key equals `needle`.
///
/// Precondition: `roads` is sorted by `field` in the direction given —
/// i.e. it is the ordering engine's output for that field. Unsorted input
/// yields an unspecified (but non-panicking) result. When several records
/// share the key, which one is returned is unspecified.
pub fn binary_search_exact<'a>(
    roads: &'a [Road],
    field: SortField,
    needle: &SortKey,
    descending: bool,
) -> Option<&'a Road> {
    let mut low = 0usize;
    let mut high = roads.len();

    while low < high {
        let mid = low + (high - low) / 2;
        let mut ord = SortKey::extract(&roads[mid], field).cmp(needle);
        if descending {
            ord = ord.reverse();
        }
        match ord {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return Some(&roads[mid]),
        }
    }

    None
}
