use std::time::Duration;

/// Polling intervals (defaults, can be overridden via env vars)
pub const DEFAULT_BAN_POLL_SECONDS: u64 = 60;
pub const DEFAULT_WARFARE_POLL_SECONDS: u64 = 60;
pub const DEFAULT_ROSTER_POLL_SECONDS: u64 = 5 * 60;
pub const DEFAULT_VOICE_CHECKPOINT_SECONDS: u64 = 15 * 60;

/// Upper bound for any single upstream API call
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 5;

/// Attempts for a rate-limited notification before giving up
pub const DEFAULT_NOTIFY_MAX_RETRIES: u32 = 3;

/// Base delay between rate-limited notification attempts, multiplied by the attempt number
pub const NOTIFY_RETRY_BASE_DELAY: Duration = Duration::from_millis(750);

/// Ban entries shown in a single notification before collapsing the rest
pub const DEFAULT_BAN_DISPLAY_LIMIT: usize = 10;

/// Leaderboard sizes
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
pub const MAX_LEADERBOARD_LIMIT: i64 = 25;
pub const TOP_VOICE_LIMIT: usize = 10;

/// Delay after ready before reconciling voice sessions (lets the cache fill)
pub const VOICE_RECONCILE_DELAY_SECONDS: u64 = 5;

/// Clamp a user-supplied leaderboard size
pub fn leaderboard_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT)
}

/// Format a duration in milliseconds as `Xh Ym`
pub fn format_duration_ms(millis: i64) -> String {
    let total_minutes = millis.max(0) / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours == 0 {
        format!("{}m", minutes)
    } else {
        format!("{}h {}m", hours, minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaderboard_limit() {
        assert_eq!(leaderboard_limit(None), 10);
        assert_eq!(leaderboard_limit(Some(3)), 3);
        assert_eq!(leaderboard_limit(Some(0)), 1);
        assert_eq!(leaderboard_limit(Some(-5)), 1);
        assert_eq!(leaderboard_limit(Some(500)), 25);
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(0), "0m");
        assert_eq!(format_duration_ms(59_999), "0m");
        assert_eq!(format_duration_ms(25 * 60_000), "25m");
        assert_eq!(format_duration_ms(3 * 3_600_000 + 7 * 60_000), "3h 7m");
        assert_eq!(format_duration_ms(-10), "0m");
    }
}
