use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::embeds::{self, ranked_list};
use crate::services::weekly::service::{
    killer_rows, reset_weekly, top_killers, weekly_rows, weekly_standings,
};

/// Kills gained this week by clan members
#[poise::command(slash_command, guild_only)]
pub async fn weekly(
    ctx: Context<'_>,
    #[description = "How many players to show (1-25, default 10)"] limit: Option<i64>,
) -> Result<(), Error> {
    let data = ctx.data();
    let records = weekly_standings(&data.pool, limit).await?;

    let description = if records.is_empty() {
        "No weekly kills recorded yet.".to_string()
    } else {
        ranked_list(&weekly_rows(&records))
    };

    let embed = embeds::clan_embed(&data.settings.clan_name)
        .title("Weekly Kills")
        .description(description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Reset everyone's weekly kill counter to zero
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn resetweekly(ctx: Context<'_>) -> Result<(), Error> {
    let changed = reset_weekly(&ctx.data().pool).await?;

    let description = if changed == 0 {
        "Weekly kills were already reset.".to_string()
    } else {
        format!("Weekly kills reset for **{}** players.", changed)
    };

    let embed = embeds::success_embed()
        .title("Weekly Reset")
        .description(description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Clan members with the most lifetime kills
#[poise::command(slash_command, guild_only)]
pub async fn topkillers(
    ctx: Context<'_>,
    #[description = "How many players to show (1-25, default 10)"] limit: Option<i64>,
) -> Result<(), Error> {
    let data = ctx.data();
    let members = top_killers(&data.pool, limit).await?;

    let description = if members.is_empty() {
        "The clan roster has not been loaded yet.".to_string()
    } else {
        ranked_list(&killer_rows(&members))
    };

    let embed = embeds::clan_embed(&data.settings.clan_name)
        .title("Top Killers")
        .description(description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
