use serenity::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::progress::{compute_progress, ProgressReport};
use super::username_key;
use crate::bot::error::Error;
use crate::db::models::TrackedPlayer;
use crate::db::queries::tracked_player;
use crate::services::roat::{PlayerStats, StatsSource};

/// Storage of tracked-player baselines. Lookups are case-insensitive and
/// a second baseline for the same player is refused with `AlreadyExists`.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    /// `username` is the name the player is looked up by; `display_name`
    /// is only the label shown back to users
    async fn create(
        &self,
        username: &str,
        display_name: &str,
        stats: &PlayerStats,
        approver: &str,
    ) -> Result<TrackedPlayer, Error>;

    async fn find(&self, username: &str) -> Result<Option<TrackedPlayer>, Error>;
}

#[derive(Debug, Clone)]
pub struct PgBaselineStore {
    pool: PgPool,
}

impl PgBaselineStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaselineStore for PgBaselineStore {
    async fn create(
        &self,
        username: &str,
        display_name: &str,
        stats: &PlayerStats,
        approver: &str,
    ) -> Result<TrackedPlayer, Error> {
        tracked_player::create(&self.pool, &username_key(username), display_name, stats, approver)
            .await
            .map_err(|e| Error::from_insert(e, username))
    }

    async fn find(&self, username: &str) -> Result<Option<TrackedPlayer>, Error> {
        Ok(tracked_player::find(&self.pool, &username_key(username)).await?)
    }
}

/// Record a player's current stats as their baseline
pub async fn start_tracking(
    store: &dyn BaselineStore,
    source: &dyn StatsSource,
    username: &str,
    approver: &str,
) -> Result<TrackedPlayer, Error> {
    let username = username.trim();

    if store.find(username).await?.is_some() {
        return Err(Error::AlreadyExists(username.to_string()));
    }

    let stats = source.fetch_player_stats(username).await?;
    let display_name = if stats.display_name.is_empty() {
        username
    } else {
        stats.display_name.as_str()
    };

    let player = store.create(username, display_name, &stats, approver).await?;
    info!(
        "Started tracking {} at {} kills / {} deaths (approved by {})",
        player.username, player.kills, player.deaths, approver
    );

    Ok(player)
}

/// Compare a tracked player's live stats against their baseline
pub async fn check_progress(
    store: &dyn BaselineStore,
    source: &dyn StatsSource,
    username: &str,
) -> Result<(TrackedPlayer, ProgressReport), Error> {
    let username = username.trim();

    let baseline = store
        .find(username)
        .await?
        .ok_or_else(|| Error::NotFound(username.to_string()))?;

    let live = source.fetch_player_stats(username).await?;
    let report = compute_progress(&baseline, &live);

    Ok((baseline, report))
}
