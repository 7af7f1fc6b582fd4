//! Core library for the Meru Roads service.
//!
//! Hosts the road query engine (ordering, search), the statistics
//! aggregator, and the PostgreSQL persistence layer. The HTTP surface lives
//! in `roads-server`; this crate is purely computational apart from the
//! `database` module.

pub mod database;
pub mod error;
pub mod query;
pub mod stats;

pub use database::{PostgresRepository, RoadsRepository};
pub use error::{CoreError, Result};
pub use query::{
    QueryError, QueryOutcome, RoadQuery, RoadQueryEngine, SearchMode,
    SortField, SortOrder,
};
pub use stats::aggregate;
