use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::{fetch_player_or_reply, reply_error};
use crate::constants::embeds::{self, BULLET, DIVIDER};
use crate::services::tracking::progress::MetricProgress;
use crate::services::tracking::service::{check_progress, start_tracking};
use crate::utils::formatting::{format_elo, format_number};

/// Start tracking a player's progress from their current stats
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "In-game username"] username: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let data = ctx.data();

    let approver = ctx.author().name.clone();
    let player = match start_tracking(&data.baselines, data.stats.as_ref(), &username, &approver).await {
        Ok(player) => player,
        Err(Error::AlreadyExists(_)) => {
            return reply_error(
                ctx,
                "Already Tracked",
                format!("**{}** is already being tracked. Use `/check` to see their progress.", username.trim()),
            )
            .await;
        }
        Err(Error::NotFound(_)) => {
            return reply_error(
                ctx,
                "Player Not Found",
                format!("No hiscore entry for **{}**.", username.trim()),
            )
            .await;
        }
        Err(e) => return Err(e),
    };

    let description = format!(
        "{} Kills: **{}**\n\
        {} Deaths: **{}**\n\
        {} Elo: **{}**\n\
        {} Jad kills: **{}**\n\
        {} Skotizo kills: **{}**\n\n\
        Tracking since **{}**, approved by **{}**",
        BULLET, format_number(player.kills),
        BULLET, format_number(player.deaths),
        BULLET, format_elo(player.elo),
        BULLET, format_number(player.jad_kills),
        BULLET, format_number(player.skotizo_kills),
        player.tracked_since_date(),
        player.approver
    );

    let embed = embeds::success_embed()
        .title(format!("Now tracking {}", player.username))
        .description(description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Show a tracked player's progress since tracking started
#[poise::command(slash_command, guild_only)]
pub async fn check(
    ctx: Context<'_>,
    #[description = "In-game username"] username: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let data = ctx.data();

    let (baseline, report) = match check_progress(&data.baselines, data.stats.as_ref(), &username).await {
        Ok(found) => found,
        Err(Error::NotFound(_)) => {
            return reply_error(
                ctx,
                "Not Tracked",
                format!(
                    "**{}** is not tracked or has no hiscore entry. Ask a moderator to `/add` them.",
                    username.trim()
                ),
            )
            .await;
        }
        Err(e) => return Err(e),
    };

    let description = format!(
        "Tracking since **{}**\n{}\n{}\n{}\n{}\n{}",
        baseline.tracked_since_date(),
        DIVIDER,
        metric_line("Kills", &report.kills),
        metric_line("Deaths", &report.deaths),
        metric_line("Jad kills", &report.jad_kills),
        metric_line("Skotizo kills", &report.skotizo_kills),
    );

    let embed = embeds::clan_embed(&data.settings.clan_name)
        .title(format!("Progress for {}", report.username))
        .description(description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

fn metric_line(label: &str, metric: &MetricProgress) -> String {
    format!(
        "{} {}: {} → {} (**{}**)",
        BULLET,
        label,
        format_number(metric.baseline),
        format_number(metric.live),
        metric.formatted_delta()
    )
}

/// Quick look at a player's kills, deaths and elo
#[poise::command(slash_command, guild_only)]
pub async fn lookup(
    ctx: Context<'_>,
    #[description = "In-game username"] username: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let Some(stats) = fetch_player_or_reply(ctx, &username).await? else {
        return Ok(());
    };

    let marker = if stats.has_positive_kdr() {
        "Positive KDR"
    } else {
        "Negative KDR"
    };

    let description = format!(
        "{} Kills: **{}**\n{} Deaths: **{}**\n{} Elo: **{}**\n\n{}",
        BULLET, format_number(stats.kills),
        BULLET, format_number(stats.deaths),
        BULLET, format_elo(stats.elo),
        marker
    );

    let embed = embeds::clan_embed(&ctx.data().settings.clan_name)
        .title(stats.display_name.clone())
        .description(description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Full hiscore profile of a player
#[poise::command(slash_command, guild_only)]
pub async fn player(
    ctx: Context<'_>,
    #[description = "In-game username"] username: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let Some(stats) = fetch_player_or_reply(ctx, &username).await? else {
        return Ok(());
    };

    let embed = embeds::clan_embed(&ctx.data().settings.clan_name)
        .title(stats.display_name.clone())
        .field("Kills", format_number(stats.kills), true)
        .field("Deaths", format_number(stats.deaths), true)
        .field("K/D", stats.kd_ratio(), true)
        .field("Elo", format_elo(stats.elo), true)
        .field("Game mode", stats.game_mode.clone(), true)
        .field("Player rank", stats.player_rank.clone().unwrap_or_else(|| "None".to_string()), true)
        .field("Donator rank", stats.donator_rank.to_string(), true)
        .field("Clan rank", stats.clan_rank_name.clone().unwrap_or_else(|| "None".to_string()), true)
        .field("Last seen", stats.last_seen.clone(), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// TzTok-Jad and Skotizo kill counts of a player
#[poise::command(slash_command, guild_only)]
pub async fn jadandskotizo(
    ctx: Context<'_>,
    #[description = "In-game username"] username: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let Some(stats) = fetch_player_or_reply(ctx, &username).await? else {
        return Ok(());
    };

    let embed = embeds::clan_embed(&ctx.data().settings.clan_name)
        .title(format!("Boss kills for {}", stats.display_name))
        .description(format!(
            "{} TzTok-Jad: **{}**\n{} Skotizo: **{}**",
            BULLET,
            format_number(stats.jad_kills),
            BULLET,
            format_number(stats.skotizo_kills)
        ));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
