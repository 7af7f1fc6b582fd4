//! Recursive three-way partition sort.
//!
//! Partitions around the middle element into strictly-less / equal /
//! strictly-greater runs (direction flipped when descending), recurses on
//! the outer runs, and concatenates. Equal-key records land in the output
//! contiguously, in their input relative order.
//!
//! Expected O(n log n); the fixed middle pivot degrades to O(n^2) on
//! adversarial orderings, and recursion depth is bounded by the collection
//! size in that worst case. Acceptable for county-sized road registers.

use crate::query::fields::SortField;
use crate::query::keys::SortKey;
use roads_model::Road;
use std::cmp::Ordering;

/// Sort a road collection by the requested field and direction.
///
/// The input is never mutated; the output is a permutation of it.
pub fn sort_roads(
    roads: &[Road],
    field: SortField,
    descending: bool,
) -> Vec<Road> {
    sort_by_key(roads, &|road| SortKey::extract(road, field), descending)
}

/// Generic partition sort over any cloneable record and key projection.
pub fn sort_by_key<T, K, F>(items: &[T], key_fn: &F, descending: bool) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let pivot = key_fn(&items[items.len() / 2]);
    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();

    for item in items {
        let mut ord = key_fn(item).cmp(&pivot);
        if descending {
            ord = ord.reverse();
        }
        match ord {
            Ordering::Less => less.push(item.clone()),
            Ordering::Equal => equal.push(item.clone()),
            Ordering::Greater => greater.push(item.clone()),
        }
    }

    let mut sorted = sort_by_key(&less, key_fn, descending);
    sorted.extend(equal);
    sorted.extend(sort_by_key(&greater, key_fn, descending));
    sorted
}
