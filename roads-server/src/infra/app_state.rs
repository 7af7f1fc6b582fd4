use std::{fmt, sync::Arc};

use tracing::info;

use crate::infra::config::Config;
use roads_core::{RoadQueryEngine, RoadsRepository, aggregate};
use roads_model::StatsSnapshot;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn RoadsRepository>,
    pub engine: RoadQueryEngine,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(repo: Arc<dyn RoadsRepository>, config: Arc<Config>) -> Self {
        Self {
            repo,
            engine: RoadQueryEngine::new(),
            config,
        }
    }

    /// Recompute portfolio statistics and append a fresh snapshot row.
    ///
    /// Called after every road creation or progress update, and by the
    /// on-demand refresh endpoint. History accumulates; the latest row is
    /// what `/stats` serves.
    pub async fn refresh_stats(
        &self,
    ) -> roads_core::Result<StatsSnapshot> {
        let roads = self.repo.list_roads().await?;
        let snapshot = aggregate(&roads);
        self.repo.insert_snapshot(&snapshot).await?;

        info!(
            total = snapshot.total_roads,
            allocated = snapshot.budget_allocated,
            "stats snapshot appended"
        );
        Ok(snapshot)
    }
}
