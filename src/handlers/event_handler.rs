use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, FullEvent};
use tracing::{debug, error, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::handlers::voice_state;

/// Gateway events the bot reacts to besides slash commands
pub async fn event_handler(
    _ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Arc<Data>, Error>,
    data: &Arc<Data>,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot } => {
            info!(
                "Gateway ready as {} in {} guilds",
                data_about_bot.user.name,
                data_about_bot.guilds.len()
            );
        }

        FullEvent::Resume { .. } => {
            info!("Gateway session resumed");
        }

        FullEvent::VoiceStateUpdate { old, new } => {
            if let Err(e) = voice_state::handle_voice_state_update(data, old.as_ref(), new).await {
                error!("Voice tracking failed for user {}: {:?}", new.user_id, e);
            }
        }

        FullEvent::GuildDelete { incomplete, .. } => {
            debug!("Removed from guild {}", incomplete.id);
        }

        _ => {}
    }

    Ok(())
}
