use poise::serenity_prelude::User;
use tracing::info;

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::reply_error;
use crate::constants::embeds;
use crate::db::queries::ban_link;
use crate::services::tracking::username_key;
use crate::utils::formatting::mention_user;

/// Link a Discord member to their in-game name for ban notifications
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn linkusername(
    ctx: Context<'_>,
    #[description = "Discord member"] user: User,
    #[description = "Their in-game name"] ingame_name: String,
) -> Result<(), Error> {
    let name = ingame_name.trim();
    if name.is_empty() {
        return reply_error(ctx, "Invalid Name", "The in-game name cannot be empty.").await;
    }

    let link = ban_link::upsert(&ctx.data().pool, user.id.get() as i64, name, &username_key(name))
        .await
        .map_err(|e| Error::from_insert(e, name))?;
    info!("Linked {} to in-game name {}", user.id, link.in_game_name);

    let embed = embeds::success_embed()
        .title("Username Linked")
        .description(format!(
            "{} is now linked to **{}**.",
            mention_user(user.id),
            link.in_game_name
        ));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Remove the Discord link of an in-game name
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn removelink(
    ctx: Context<'_>,
    #[description = "In-game name to unlink"] ingame_name: String,
) -> Result<(), Error> {
    let name = ingame_name.trim();

    if !ban_link::delete_by_in_game_key(&ctx.data().pool, &username_key(name)).await? {
        return reply_error(
            ctx,
            "No Link Found",
            format!("**{}** is not linked to anyone.", name),
        )
        .await;
    }
    info!("Removed link for in-game name {}", name);

    let embed = embeds::success_embed()
        .title("Link Removed")
        .description(format!("**{}** is no longer linked.", name));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
