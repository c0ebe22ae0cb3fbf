use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, GatewayIntents, GuildId};
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::commands;
use crate::config::Settings;
use crate::constants::timeouts::VOICE_RECONCILE_DELAY_SECONDS;
use crate::handlers::event_handler::event_handler;
use crate::handlers::voice_state;
use crate::services::polling::scheduler;
use crate::services::roat::RoatClient;

pub async fn run(settings: Settings, pool: PgPool) -> Result<(), Error> {
    let client = RoatClient::new(&settings)?;
    let data = Arc::new(Data::new(pool, settings.clone(), Arc::new(client)));

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: None, // Slash commands only
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command /{} failed: {:?}", ctx.command().name, error);
                            let _ = ctx.say(user_message(&error)).await;
                        }
                        poise::FrameworkError::ArgumentParse { error, ctx, .. } => {
                            let _ = ctx.say(format!("Invalid argument: {}", error)).await;
                        }
                        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
                            let _ = ctx
                                .say("You need the Manage Server permission to use this command.")
                                .await;
                        }
                        poise::FrameworkError::UnknownCommand { .. } => {}
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as {}", ready.user.name);

                scheduler::start_background_jobs(ctx.http.clone(), data.clone());

                // Reconcile voice sessions once the cache has the guild's voice states
                let ctx_clone = ctx.clone();
                let data_clone = data.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(tokio::time::Duration::from_secs(
                        VOICE_RECONCILE_DELAY_SECONDS,
                    ))
                    .await;
                    if let Err(e) = voice_state::reconcile_from_cache(&ctx_clone, &data_clone).await {
                        warn!("Failed to reconcile voice sessions on startup: {:?}", e);
                    }
                });

                let commands = &framework.options().commands;
                match data.settings.guild_id {
                    Some(guild_id) => {
                        let guild_id = GuildId::new(guild_id);
                        poise::builtins::register_in_guild(ctx, commands, guild_id)
                            .await
                            .map_err(|e| {
                                error!("Failed to register commands in guild {}: {:?}", guild_id, e);
                                Error::Serenity(e)
                            })?;
                        info!("Registered {} commands in guild {}", commands.len(), guild_id);
                    }
                    None => {
                        poise::builtins::register_globally(ctx, commands)
                            .await
                            .map_err(|e| {
                                error!("Failed to register commands globally: {:?}", e);
                                Error::Serenity(e)
                            })?;
                        info!(
                            "Registered {} commands globally (may take up to an hour to appear)",
                            commands.len()
                        );
                    }
                }

                Ok(data)
            })
        })
        .build();

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = serenity::ClientBuilder::new(&settings.discord_token, intents)
        .framework(framework)
        .await
        .map_err(Error::Serenity)?;

    info!("Starting Discord client...");
    client.start().await.map_err(Error::Serenity)
}

/// Text shown to the invoking user for errors a command did not handle itself
fn user_message(error: &Error) -> String {
    match error {
        Error::NotFound(name) => format!("Could not find **{}**.", name),
        Error::AlreadyExists(name) => format!("**{}** already exists.", name),
        Error::Transient(_) | Error::Http(_) => {
            "The RoatPkz API is not responding right now. Please try again later.".to_string()
        }
        Error::Custom(msg) => msg.clone(),
        Error::Database(_) | Error::Serenity(_) => {
            "Something went wrong while handling this command.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internal_errors() {
        let msg = user_message(&Error::Database(sqlx::Error::RowNotFound));
        assert!(!msg.contains("RowNotFound"));
        assert_eq!(
            user_message(&Error::NotFound("zezima".to_string())),
            "Could not find **zezima**."
        );
    }
}
