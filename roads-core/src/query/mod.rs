//! Road query engine
//!
//! This module provides:
//! - Sort field resolution with case-normalized text keys
//! - A recursive three-way partition sort over road records
//! - Contains / exact search strategies layered on the sorted output
//! - The `RoadQueryEngine` entry point used by the listing endpoint

pub mod engine;
pub mod fields;
pub mod keys;
pub mod ordering;
pub mod search;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::RoadQueryEngine;
pub use fields::{FieldKind, SortField};
pub use keys::SortKey;
pub use types::{QueryError, QueryOutcome, RoadQuery, SearchMode, SortOrder};
