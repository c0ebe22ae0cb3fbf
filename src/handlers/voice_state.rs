use std::collections::HashMap;
use std::sync::Arc;

use serenity::all::{Context, GuildId, VoiceState};
use tracing::{debug, info, warn};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::services::voice::session::Outcome;
use crate::services::voice::tracker::{classify_channel, reconcile_guild, record_event};
use crate::services::voice::{ChannelKind, VoiceEvent};

pub async fn handle_voice_state_update(
    data: &Arc<Data>,
    old: Option<&VoiceState>,
    new: &VoiceState,
) -> Result<(), Error> {
    let guild_id = match new.guild_id {
        Some(id) => id,
        None => return Ok(()), // DM voice states are not supported
    };

    if new.member.as_ref().is_some_and(|m| m.user.bot) {
        return Ok(());
    }

    let old_channel = old.and_then(|o| o.channel_id).map(|c| c.get());
    let new_channel = new.channel_id.map(|c| c.get());

    // Mute/deafen/stream toggles arrive as updates within the same channel
    if old_channel == new_channel {
        return Ok(());
    }

    let settings = &data.settings;
    let event = VoiceEvent::Move {
        from: classify_channel(settings, old_channel),
        to: classify_channel(settings, new_channel),
    };

    let outcome = record_event(&data.pool, new.user_id.get(), guild_id.get(), event).await?;

    match outcome {
        Outcome::Applied(Some(credit)) => debug!(
            "User {} left {:?} after {}ms ({})",
            new.user_id, old_channel, credit.millis, credit.week
        ),
        Outcome::Applied(None) => debug!(
            "User {} moved {:?} -> {:?}",
            new.user_id, old_channel, new_channel
        ),
        Outcome::Stale => debug!("Stale voice update for user {}", new.user_id),
    }

    Ok(())
}

/// Align stored voice sessions with who is in voice right now, read from the
/// gateway cache. Run once the cache has been populated after startup.
pub async fn reconcile_from_cache(ctx: &Context, data: &Arc<Data>) -> Result<usize, Error> {
    let guild_ids: Vec<GuildId> = match data.settings.guild_id {
        Some(id) => vec![GuildId::new(id)],
        None => ctx.cache.guilds(),
    };

    let mut touched = 0;
    for guild_id in guild_ids {
        let Some(present) = voice_presence(ctx, data, guild_id) else {
            warn!("Guild {} not in cache, skipping voice reconcile", guild_id);
            continue;
        };

        touched += reconcile_guild(&data.pool, guild_id.get(), &present).await?;
    }

    info!("Voice reconcile touched {} sessions", touched);
    Ok(touched)
}

/// Non-bot users currently in voice, by channel kind
fn voice_presence(
    ctx: &Context,
    data: &Data,
    guild_id: GuildId,
) -> Option<HashMap<u64, ChannelKind>> {
    let guild = ctx.cache.guild(guild_id)?;

    let present = guild
        .voice_states
        .values()
        .filter(|state| {
            !guild
                .members
                .get(&state.user_id)
                .is_some_and(|member| member.user.bot)
        })
        .filter_map(|state| {
            let channel = state.channel_id.map(|c| c.get());
            classify_channel(&data.settings, channel).map(|kind| (state.user_id.get(), kind))
        })
        .collect();

    Some(present)
}
