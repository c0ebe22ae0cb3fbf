use std::sync::Arc;

use serenity::all::{ChannelId, CreateMessage, Http};
use serenity::async_trait;
use serenity::http::HttpError;
use tracing::{error, warn};

use super::retry::send_with_retry;
use super::{Notice, Notifier, NotifyError};
use crate::constants::timeouts::NOTIFY_RETRY_BASE_DELAY;

const FALLBACK_MESSAGE: &str =
    "Discord is rate limiting this bot right now. The update will be posted again later.";

/// Posts notices through the bot's REST client
pub struct DiscordNotifier {
    http: Arc<Http>,
    max_attempts: u32,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>, max_attempts: u32) -> Self {
        Self { http, max_attempts }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, channel_id: u64, notice: &Notice) -> Result<(), NotifyError> {
        let channel = ChannelId::new(channel_id);
        let http: &Http = &self.http;

        let result = send_with_retry(self.max_attempts, NOTIFY_RETRY_BASE_DELAY, || {
            let message = CreateMessage::new().embed(notice.to_embed());
            async move {
                channel
                    .send_message(http, message)
                    .await
                    .map(|_| ())
                    .map_err(classify_error)
            }
        })
        .await;

        match &result {
            Ok(()) => {}
            Err(NotifyError::RateLimited) => {
                warn!(
                    "Giving up on '{}' in channel {} after {} rate-limited attempts",
                    notice.title, channel_id, self.max_attempts
                );
                if let Err(e) = channel.say(http, FALLBACK_MESSAGE).await {
                    warn!("Could not post fallback message to {}: {:?}", channel_id, e);
                }
            }
            Err(e) => {
                error!("Failed to post '{}' to channel {}: {}", notice.title, channel_id, e);
            }
        }

        result
    }
}

fn classify_error(err: serenity::Error) -> NotifyError {
    if is_rate_limited(&err) {
        NotifyError::RateLimited
    } else {
        NotifyError::Failed(err.to_string())
    }
}

fn is_rate_limited(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 429
    )
}
