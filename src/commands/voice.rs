use chrono::Utc;
use poise::serenity_prelude::{User, UserId};

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::embeds::{self, ranked_list};
use crate::constants::timeouts::{format_duration_ms, TOP_VOICE_LIMIT};
use crate::services::voice::tracker::{current_weekly_ms, top_voice};
use crate::services::voice::WeekKey;
use crate::utils::formatting::mention_user;

/// Voice time of a member this week
#[poise::command(slash_command, guild_only)]
pub async fn checkvoice(
    ctx: Context<'_>,
    #[description = "Member to check (defaults to yourself)"] user: Option<User>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;
    let target = user.as_ref().unwrap_or_else(|| ctx.author());
    let now = Utc::now();

    let millis = current_weekly_ms(&ctx.data().pool, target.id.get(), guild_id.get(), now).await?;

    let embed = embeds::clan_embed(&ctx.data().settings.clan_name)
        .title(format!("Voice activity {}", WeekKey::of(now)))
        .description(format!(
            "{} has spent **{}** in voice this week.",
            mention_user(target.id),
            format_duration_ms(millis)
        ));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Most active voice members this week
#[poise::command(slash_command, guild_only)]
pub async fn topvoice(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;
    let now = Utc::now();

    let ranked = top_voice(&ctx.data().pool, guild_id.get(), now, TOP_VOICE_LIMIT).await?;

    let description = if ranked.is_empty() {
        "Nobody has been in voice this week.".to_string()
    } else {
        let rows: Vec<(String, String)> = ranked
            .into_iter()
            .map(|(user_id, millis)| (mention_user(UserId::new(user_id)), format_duration_ms(millis)))
            .collect();
        ranked_list(&rows)
    };

    let embed = embeds::clan_embed(&ctx.data().settings.clan_name)
        .title(format!("Top voice {}", WeekKey::of(now)))
        .description(description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
