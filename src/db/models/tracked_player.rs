use chrono::{DateTime, Utc};
use uuid::Uuid;

/// First-recorded stats of a tracked player. Written once, never updated.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TrackedPlayer {
    pub id: Uuid,
    pub username: String,
    pub username_key: String,
    pub kills: i64,
    pub deaths: i64,
    pub elo: f64,
    pub jad_kills: i64,
    pub skotizo_kills: i64,
    pub approver: String,
    pub tracked_since: DateTime<Utc>,
}

impl TrackedPlayer {
    /// Tracking start date as shown to users (YYYY-MM-DD)
    pub fn tracked_since_date(&self) -> String {
        self.tracked_since.format("%Y-%m-%d").to_string()
    }
}
