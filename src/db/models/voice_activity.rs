use chrono::{DateTime, Utc};

/// Session state of one user in one guild
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct VoiceActivity {
    pub user_id: i64,
    pub guild_id: i64,
    /// Set iff the user is in an open session in a tracked channel
    pub joined_at: Option<DateTime<Utc>>,
    pub last_event_at: Option<DateTime<Utc>>,
}
