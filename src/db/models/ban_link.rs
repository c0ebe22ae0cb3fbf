use chrono::{DateTime, Utc};

/// Discord user linked to an in-game staff name, mentioned in ban notifications
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BanLink {
    pub discord_id: i64,
    pub in_game_name: String,
    pub in_game_key: String,
    pub created_at: DateTime<Utc>,
}
