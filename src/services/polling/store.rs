use std::collections::HashMap;

use serenity::async_trait;
use sqlx::PgPool;

use crate::bot::error::Error;
use crate::db::queries::{ban_link, clan_member, watermark, weekly_kill};
use crate::services::roat::PlayerStats;
use crate::services::tracking::username_key;

/// Persistence the ban and warfare feeds need
#[async_trait]
pub trait FeedStore: Send + Sync {
    async fn watermark(&self, name: &str) -> Result<Option<String>, Error>;

    async fn set_watermark(&self, name: &str, value: &str) -> Result<(), Error>;

    /// Discord ids linked to the given in-game names, keyed by normalised name
    async fn linked_discord_ids(&self, names: &[String]) -> Result<HashMap<String, u64>, Error>;
}

/// Persistence the roster refresh needs
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn upsert_member(&self, stats: &PlayerStats) -> Result<(), Error>;

    async fn apply_live_total(&self, username: &str, live_total: i64) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct PgFeedStore {
    pool: PgPool,
}

impl PgFeedStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedStore for PgFeedStore {
    async fn watermark(&self, name: &str) -> Result<Option<String>, Error> {
        Ok(watermark::get(&self.pool, name).await?)
    }

    async fn set_watermark(&self, name: &str, value: &str) -> Result<(), Error> {
        Ok(watermark::set(&self.pool, name, value).await?)
    }

    async fn linked_discord_ids(&self, names: &[String]) -> Result<HashMap<String, u64>, Error> {
        let keys: Vec<String> = names.iter().map(|n| username_key(n)).collect();
        let links = ban_link::find_by_in_game_keys(&self.pool, &keys).await?;

        Ok(links
            .into_iter()
            .map(|link| (link.in_game_key, link.discord_id as u64))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct PgMemberStore {
    pool: PgPool,
}

impl PgMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for PgMemberStore {
    async fn upsert_member(&self, stats: &PlayerStats) -> Result<(), Error> {
        clan_member::upsert(&self.pool, &username_key(&stats.username), stats).await?;
        Ok(())
    }

    async fn apply_live_total(&self, username: &str, live_total: i64) -> Result<(), Error> {
        weekly_kill::apply_live_total(&self.pool, &username_key(username), username, live_total)
            .await?;
        Ok(())
    }
}
