//! Sort key extraction.
//!
//! Keys wrap the comparable value projected out of a road record. Text keys
//! are case-folded before comparison; reals ride on `OrderedFloat` so the
//! whole key type carries a total order.

use crate::query::fields::{FieldKind, SortField};
use crate::query::types::QueryError;
use ordered_float::OrderedFloat;
use roads_model::Road;

/// A single comparable key for one road under one sort field.
///
/// A given sort only ever produces one variant, so the derived cross-variant
/// ordering is never observed in practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Text(String),
    Integer(i64),
    Real(OrderedFloat<f64>),
}

impl SortKey {
    /// Project the key `field` compares by out of `road`.
    pub fn extract(road: &Road, field: SortField) -> SortKey {
        match field {
            SortField::Name => SortKey::Text(road.name.to_lowercase()),
            SortField::Status => {
                SortKey::Text(road.status.as_str().to_lowercase())
            }
            SortField::Length => SortKey::Real(OrderedFloat(road.length)),
            SortField::Budget => SortKey::Integer(road.budget),
            SortField::Progress => SortKey::Integer(road.progress as i64),
        }
    }

    /// Parse a search term into the key shape `field` compares by.
    ///
    /// Terms for numeric fields that fail to coerce are a request error,
    /// not a zero-match search.
    pub fn parse_term(
        field: SortField,
        term: &str,
    ) -> Result<SortKey, QueryError> {
        match field.kind() {
            FieldKind::Text => Ok(SortKey::Text(term.to_lowercase())),
            FieldKind::Integer => {
                term.parse::<i64>().map(SortKey::Integer).map_err(|_| {
                    QueryError::TypeMismatch {
                        field: field.id(),
                        term: term.to_string(),
                    }
                })
            }
            FieldKind::Real => term
                .parse::<f64>()
                .map(|value| SortKey::Real(OrderedFloat(value)))
                .map_err(|_| QueryError::TypeMismatch {
                    field: field.id(),
                    term: term.to_string(),
                }),
        }
    }

    /// Normalized textual form used by containment matching.
    pub fn into_text(self) -> String {
        match self {
            SortKey::Text(value) => value,
            SortKey::Integer(value) => value.to_string(),
            SortKey::Real(value) => value.to_string(),
        }
    }
}
