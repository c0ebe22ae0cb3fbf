//! Upstream RoatPkz stats API: player hiscores, clan bans, warfare and roster.

pub mod client;
pub mod models;

use serenity::async_trait;
use thiserror::Error;

pub use client::RoatClient;
pub use models::{BanRecord, PlayerStats, RosterEntry, WarfareResult};

/// The only two failure shapes callers need to distinguish
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("player {0} not found")]
    NotFound(String),

    #[error("{0}")]
    Transient(String),
}

/// Read-only access to the clan's external data source
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_player_stats(&self, username: &str) -> Result<PlayerStats, StatsError>;

    async fn fetch_ban_list(&self) -> Result<Vec<BanRecord>, StatsError>;

    /// `None` when the clan has no warfare result yet
    async fn fetch_warfare_result(&self) -> Result<Option<WarfareResult>, StatsError>;

    async fn fetch_clan_roster(&self) -> Result<Vec<RosterEntry>, StatsError>;
}
