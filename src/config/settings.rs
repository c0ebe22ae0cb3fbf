use std::collections::HashSet;
use std::env;
use std::time::Duration;

use crate::constants::timeouts::{
    DEFAULT_BAN_DISPLAY_LIMIT, DEFAULT_BAN_POLL_SECONDS, DEFAULT_HTTP_TIMEOUT_SECONDS,
    DEFAULT_NOTIFY_MAX_RETRIES, DEFAULT_ROSTER_POLL_SECONDS, DEFAULT_VOICE_CHECKPOINT_SECONDS,
    DEFAULT_WARFARE_POLL_SECONDS,
};

const DEFAULT_API_BASE_URL: &str = "https://api.roatpkz.ps/api/v1";
const DEFAULT_CLAN_NAME: &str = "Swab";

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub database_url: String,
    pub guild_id: Option<u64>,
    pub api_base_url: String,
    pub api_key: String,
    pub clan_name: String,
    /// Channel that receives ban notifications (job disabled when unset)
    pub ban_channel_id: Option<u64>,
    /// Channel that receives clan warfare results (job disabled when unset)
    pub warfare_channel_id: Option<u64>,
    /// Voice channels whose time never counts (AFK and similar)
    pub voice_ignored_channels: HashSet<u64>,
    pub ban_poll_interval: Duration,
    pub warfare_poll_interval: Duration,
    pub roster_poll_interval: Duration,
    pub voice_checkpoint_interval: Duration,
    pub http_timeout: Duration,
    pub notify_max_retries: u32,
    pub ban_display_limit: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| "DISCORD_TOKEN environment variable not set")?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable not set")?;

        let api_key = env::var("ROAT_API_KEY")
            .map_err(|_| "ROAT_API_KEY environment variable not set")?;

        let guild_id = parse_var("GUILD_ID");

        let api_base_url = env::var("ROAT_API_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let clan_name = env::var("CLAN_NAME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CLAN_NAME.to_string());

        let voice_ignored_channels = env::var("VOICE_IGNORED_CHANNEL_IDS")
            .map(|raw| parse_id_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            discord_token,
            database_url,
            guild_id,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key,
            clan_name,
            ban_channel_id: parse_var("BAN_CHANNEL_ID"),
            warfare_channel_id: parse_var("WARFARE_CHANNEL_ID"),
            voice_ignored_channels,
            ban_poll_interval: seconds_var("BAN_POLL_SECONDS", DEFAULT_BAN_POLL_SECONDS),
            warfare_poll_interval: seconds_var("WARFARE_POLL_SECONDS", DEFAULT_WARFARE_POLL_SECONDS),
            roster_poll_interval: seconds_var("ROSTER_POLL_SECONDS", DEFAULT_ROSTER_POLL_SECONDS),
            voice_checkpoint_interval: seconds_var(
                "VOICE_CHECKPOINT_SECONDS",
                DEFAULT_VOICE_CHECKPOINT_SECONDS,
            ),
            http_timeout: seconds_var("HTTP_TIMEOUT_SECONDS", DEFAULT_HTTP_TIMEOUT_SECONDS),
            notify_max_retries: parse_var("NOTIFY_MAX_RETRIES")
                .unwrap_or(DEFAULT_NOTIFY_MAX_RETRIES)
                .max(1),
            ban_display_limit: parse_var("BAN_DISPLAY_LIMIT")
                .unwrap_or(DEFAULT_BAN_DISPLAY_LIMIT)
                .max(1),
        })
    }

    /// Whether time spent in this voice channel counts toward weekly activity
    pub fn is_tracked_voice_channel(&self, channel_id: u64) -> bool {
        !self.voice_ignored_channels.contains(&channel_id)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn seconds_var(name: &str, default: u64) -> Duration {
    let secs = parse_var::<u64>(name).filter(|s| *s > 0).unwrap_or(default);
    Duration::from_secs(secs)
}

/// Parse a comma separated list of snowflakes, skipping anything malformed
fn parse_id_list(raw: &str) -> HashSet<u64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<u64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        let ids = parse_id_list("123, 456,,abc, 789 ");
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&123));
        assert!(ids.contains(&456));
        assert!(ids.contains(&789));
        assert!(parse_id_list("").is_empty());
    }
}
