use crate::query::fields::SortField;
use roads_model::Road;
use serde::{Deserialize, Serialize};

/// A single listing request against the in-memory road collection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoadQuery {
    pub sort: SortField,
    pub order: SortOrder,
    /// Optional search term; whitespace-only terms are treated as absent.
    pub search: Option<String>,
    /// Explicit match strategy. `None` falls back to the field's default:
    /// substring containment for text fields, exact match for numeric ones.
    pub mode: Option<SearchMode>,
}

/// Sort direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn is_descending(&self) -> bool {
        matches!(self, SortOrder::Descending)
    }
}

/// How a search term is matched against the sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring containment; narrows the listing.
    Contains,
    /// Binary search for key equality; yields at most one record.
    Exact,
}

/// What a query produced: a (possibly narrowed) listing, or the outcome of
/// an exact lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryOutcome {
    Listing(Vec<Road>),
    Exact(Option<Road>),
}

impl QueryOutcome {
    /// Flatten into a plain record sequence; an exact miss becomes empty.
    pub fn into_roads(self) -> Vec<Road> {
        match self {
            QueryOutcome::Listing(roads) => roads,
            QueryOutcome::Exact(road) => road.into_iter().collect(),
        }
    }
}

/// Query execution error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("unsupported sort field `{0}`")]
    InvalidSortField(String),

    #[error("search term `{term}` cannot be coerced for numeric field `{field}`")]
    TypeMismatch {
        field: &'static str,
        term: String,
    },
}
