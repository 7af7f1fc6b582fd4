//! Sort field resolution.
//!
//! The supported set is fixed; an unrecognized field name is a caller error
//! surfaced as [`QueryError::InvalidSortField`], never a silent default.

use crate::query::types::{QueryError, SearchMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fields a road listing can be ordered and searched by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Status,
    Length,
    Budget,
    Progress,
}

/// Underlying comparison type of a sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Compared case-insensitively.
    Text,
    Integer,
    Real,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::Status,
        SortField::Length,
        SortField::Budget,
        SortField::Progress,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Status => "status",
            SortField::Length => "length",
            SortField::Budget => "budget",
            SortField::Progress => "progress",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            SortField::Name | SortField::Status => FieldKind::Text,
            SortField::Length => FieldKind::Real,
            SortField::Budget | SortField::Progress => FieldKind::Integer,
        }
    }

    /// The match strategy the original listing behavior ties to the field
    /// type: substring containment for text, exact lookup for numeric.
    pub fn default_search_mode(&self) -> SearchMode {
        match self.kind() {
            FieldKind::Text => SearchMode::Contains,
            FieldKind::Integer | FieldKind::Real => SearchMode::Exact,
        }
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .iter()
            .find(|field| field.id() == name)
            .copied()
            .ok_or_else(|| QueryError::InvalidSortField(name.to_string()))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
