pub mod leaderboard;
pub mod links;
pub mod tracking;
pub mod voice;
pub mod warfare;

use std::sync::Arc;

use crate::bot::data::{Context, Data};
use crate::bot::error::Error;
use crate::constants::embeds;
use crate::services::roat::{PlayerStats, StatsError};

/// Every slash command the bot registers
pub fn all() -> Vec<poise::Command<Arc<Data>, Error>> {
    vec![
        tracking::add(),
        tracking::check(),
        tracking::lookup(),
        tracking::player(),
        tracking::jadandskotizo(),
        leaderboard::weekly(),
        leaderboard::resetweekly(),
        leaderboard::topkillers(),
        voice::checkvoice(),
        voice::topvoice(),
        links::linkusername(),
        links::removelink(),
        warfare::testwarfare(),
    ]
}

/// Reply with a red embed
pub(crate) async fn reply_error(
    ctx: Context<'_>,
    title: &str,
    description: impl Into<String>,
) -> Result<(), Error> {
    let embed = embeds::error_embed()
        .title(title)
        .description(description.into());
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Fetch live stats; an unknown player is answered here and yields `None`
pub(crate) async fn fetch_player_or_reply(
    ctx: Context<'_>,
    username: &str,
) -> Result<Option<PlayerStats>, Error> {
    match ctx.data().stats.fetch_player_stats(username.trim()).await {
        Ok(stats) => Ok(Some(stats)),
        Err(StatsError::NotFound(_)) => {
            reply_error(
                ctx,
                "Player Not Found",
                format!("No hiscore entry for **{}**.", username.trim()),
            )
            .await?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
