//! The query engine entry point used by the road-listing endpoint.

use crate::query::fields::SortField;
use crate::query::keys::SortKey;
use crate::query::types::{QueryError, QueryOutcome, RoadQuery, SearchMode};
use crate::query::{ordering, search};
use roads_model::Road;
use tracing::debug;

/// Stateless facade tying field resolution, ordering, and search together.
///
/// Every call only reads its input and allocates fresh output, so the
/// engine can be shared freely across concurrent request handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadQueryEngine;

impl RoadQueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Sort `roads` by the requested field and direction, then optionally
    /// narrow the result by the search term.
    ///
    /// Without a term the sorted listing is returned as-is. With one, the
    /// effective [`SearchMode`] decides between a contains-filtered listing
    /// and an exact binary-search lookup over the sorted sequence.
    pub fn execute(
        &self,
        roads: &[Road],
        query: &RoadQuery,
    ) -> Result<QueryOutcome, QueryError> {
        let descending = query.order.is_descending();
        let sorted = ordering::sort_roads(roads, query.sort, descending);

        let term = match query.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term,
            _ => return Ok(QueryOutcome::Listing(sorted)),
        };

        let mode = query
            .mode
            .unwrap_or_else(|| query.sort.default_search_mode());
        debug!(
            field = %query.sort,
            ?mode,
            term,
            "narrowing road listing"
        );

        match mode {
            SearchMode::Contains => Ok(QueryOutcome::Listing(
                search::filter_contains(&sorted, query.sort, term),
            )),
            SearchMode::Exact => {
                let needle = SortKey::parse_term(query.sort, term)?;
                let hit = search::binary_search_exact(
                    &sorted, query.sort, &needle, descending,
                )
                .cloned();
                Ok(QueryOutcome::Exact(hit))
            }
        }
    }
}
