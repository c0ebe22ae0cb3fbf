use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::reply_error;
use crate::services::polling::warfare::warfare_notice;

/// Post the latest clan warfare result here without marking it announced
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn testwarfare(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let Some(result) = ctx.data().stats.fetch_warfare_result().await? else {
        return reply_error(ctx, "No Warfare Result", "The clan has no warfare result yet.").await;
    };

    let embed = warfare_notice(&result).to_embed();
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
