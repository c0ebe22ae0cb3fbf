use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Settings;
use crate::services::polling::JobRegistry;
use crate::services::roat::StatsSource;
use crate::services::tracking::service::PgBaselineStore;

/// Shared data available to all commands and handlers
pub struct Data {
    pub pool: PgPool,
    pub settings: Settings,
    /// Upstream hiscore API
    pub stats: Arc<dyn StatsSource>,
    pub baselines: PgBaselineStore,
    /// Background jobs currently running
    pub jobs: Arc<JobRegistry>,
}

impl Data {
    pub fn new(pool: PgPool, settings: Settings, stats: Arc<dyn StatsSource>) -> Self {
        Self {
            baselines: PgBaselineStore::new(pool.clone()),
            pool,
            settings,
            stats,
            jobs: Arc::new(JobRegistry::new()),
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("clan_name", &self.settings.clan_name)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

pub type Context<'a> = poise::Context<'a, Arc<Data>, crate::bot::error::Error>;
