//! Core bot logic using the Poise framework.

use crate::error::BotResult;
use crate::sweeper::spawn_sweeper;
use moana_commands::{create_framework, rate_limit_policy, Data};
use moana_config::Config;
use moana_core::Moderator;
use moana_i18n::Messages;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::info;

/// Main bot structure.
pub struct MoanaBot {
    config: Arc<Config>,
}

impl MoanaBot {
    /// Creates a new bot instance.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gateway intents: guild structure, member joins and message content.
    pub fn intents() -> serenity::GatewayIntents {
        serenity::GatewayIntents::GUILDS
            | serenity::GatewayIntents::GUILD_MEMBERS
            | serenity::GatewayIntents::GUILD_MESSAGES
            | serenity::GatewayIntents::MESSAGE_CONTENT
    }

    /// Starts the bot and runs until the connection ends or Ctrl-C is pressed.
    pub async fn start(&self) -> BotResult<()> {
        let messages = Messages::new(&self.config.language)?;
        let moderator = Arc::new(Moderator::new(rate_limit_policy(&self.config.moderation)));
        let data = Data::with_moderator(Arc::clone(&self.config), messages, Arc::clone(&moderator));
        let guild_id = serenity::GuildId::new(self.config.discord.guild_id.0);
        let sweep_interval = self.config.moderation.sweep_interval();

        let framework = create_framework()
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    let commands = &framework.options().commands;
                    poise::builtins::register_in_guild(ctx, commands, guild_id).await?;
                    info!(
                        "Registered {} commands in guild {} as {}",
                        commands.len(),
                        guild_id,
                        ready.user.tag()
                    );
                    spawn_sweeper(moderator, sweep_interval);
                    Ok(data)
                })
            })
            .build();

        let mut client = serenity::ClientBuilder::new(&self.config.discord.token, Self::intents())
            .framework(framework)
            .await?;

        let shard_manager = Arc::clone(&client.shard_manager);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
                shard_manager.shutdown_all().await;
            }
        });

        client.start().await?;
        Ok(())
    }
}
