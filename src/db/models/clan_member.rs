use chrono::{DateTime, Utc};

/// Denormalised copy of a clan member's latest stats, refreshed by the roster job
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClanMember {
    pub username_key: String,
    pub username: String,
    pub rank_name: Option<String>,
    pub kills: i64,
    pub deaths: i64,
    pub elo: f64,
    pub donator_rank: i32,
    pub game_mode: String,
    pub last_seen: String,
    pub updated_at: DateTime<Utc>,
}
