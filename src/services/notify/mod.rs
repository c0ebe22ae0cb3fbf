//! Posting feed messages to Discord channels.

pub mod discord;
pub mod retry;

use serenity::all::{Colour, CreateEmbed};
use serenity::async_trait;
use thiserror::Error;

pub use discord::DiscordNotifier;

/// A feed message, rendered as a single embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub colour: Colour,
}

impl Notice {
    pub fn to_embed(&self) -> CreateEmbed {
        CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .color(self.colour)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("rate limited")]
    RateLimited,

    #[error("send failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, channel_id: u64, notice: &Notice) -> Result<(), NotifyError>;
}
