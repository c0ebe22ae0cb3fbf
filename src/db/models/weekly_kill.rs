use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct WeeklyKillRecord {
    pub username_key: String,
    pub username: String,
    pub weekly_kills: i64,
    pub last_total_kills_seen: i64,
    pub last_updated: DateTime<Utc>,
}
