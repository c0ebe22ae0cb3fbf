use reqwest::{header::HeaderValue, StatusCode, Url};
use serde::de::DeserializeOwned;
use serenity::async_trait;
use tracing::debug;

use super::models::{ApiPlayer, BanRecord, PlayerStats, RosterEntry, WarfareResult};
use super::{StatsError, StatsSource};
use crate::config::Settings;

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the RoatPkz API. Every request carries the configured timeout.
#[derive(Debug, Clone)]
pub struct RoatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    clan_name: String,
}

impl RoatClient {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .user_agent(concat!("swab-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.clone(),
            api_key: settings.api_key.clone(),
            clan_name: settings.clan_name.clone(),
        })
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StatsError> {
        build_endpoint(&self.base_url, segments)
    }

    /// GET a JSON document; `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, StatsError> {
        debug!("GET {}", url);

        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| StatsError::Transient("API key is not a valid header value".to_string()))?;

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(transient)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status().map_err(transient)?;
        let body = response.json::<Option<T>>().await.map_err(transient)?;

        Ok(body)
    }
}

#[async_trait]
impl StatsSource for RoatClient {
    async fn fetch_player_stats(&self, username: &str) -> Result<PlayerStats, StatsError> {
        let url = self.endpoint(&["player", username])?;

        self.get_json::<ApiPlayer>(url)
            .await?
            .and_then(ApiPlayer::into_stats)
            .ok_or_else(|| StatsError::NotFound(username.to_string()))
    }

    async fn fetch_ban_list(&self) -> Result<Vec<BanRecord>, StatsError> {
        let url = self.endpoint(&["clan", &self.clan_name, "bans"])?;
        Ok(self.get_json(url).await?.unwrap_or_default())
    }

    async fn fetch_warfare_result(&self) -> Result<Option<WarfareResult>, StatsError> {
        let url = self.endpoint(&["clan", &self.clan_name, "warfare", "latest"])?;
        self.get_json(url).await
    }

    async fn fetch_clan_roster(&self) -> Result<Vec<RosterEntry>, StatsError> {
        let url = self.endpoint(&["clan", &self.clan_name, "members"])?;
        Ok(self.get_json(url).await?.unwrap_or_default())
    }
}

fn build_endpoint(base_url: &str, segments: &[&str]) -> Result<Url, StatsError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| StatsError::Transient(format!("invalid API base url: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| StatsError::Transient("API base url cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

fn transient(err: reqwest::Error) -> StatsError {
    if err.is_timeout() {
        StatsError::Transient("request timed out".to_string())
    } else {
        StatsError::Transient(err.to_string())
    }
}
