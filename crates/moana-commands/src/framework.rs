//! Poise framework setup, shared data and error handling.

use crate::gateway::SerenityGateway;
use moana_config::{Config, ModerationConfig};
use moana_core::{FileTranscriptStore, Moderator, RateLimitPolicy, TicketDesk};
use moana_i18n::Messages;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, warn};

/// Application data accessible in all commands and event handlers.
pub struct Data {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Localized user-facing text.
    pub messages: Arc<Messages>,
    /// Link and spam moderation.
    pub moderator: Arc<Moderator>,
    /// Support ticket workflow.
    pub desk: Arc<TicketDesk>,
}

impl Data {
    /// Builds the shared state from configuration.
    pub fn new(config: Arc<Config>, messages: Messages) -> Self {
        let moderator = Arc::new(Moderator::new(rate_limit_policy(&config.moderation)));
        Self::with_moderator(config, messages, moderator)
    }

    /// Builds the shared state around an existing moderator.
    pub fn with_moderator(config: Arc<Config>, messages: Messages, moderator: Arc<Moderator>) -> Self {
        let transcripts = Arc::new(FileTranscriptStore::new(config.tickets.transcript_dir.clone()));
        Self {
            desk: Arc::new(TicketDesk::new(transcripts)),
            moderator,
            messages: Arc::new(messages),
            config,
        }
    }

    /// Platform adapter bound to the configured guild.
    pub fn gateway(&self, ctx: &serenity::Context) -> SerenityGateway {
        SerenityGateway::new(ctx.clone(), &self.config)
    }
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Context of slash commands that open a modal.
pub type ApplicationContext<'a> = poise::ApplicationContext<'a, Data, Error>;

/// Rate limiter thresholds from the moderation settings.
pub const fn rate_limit_policy(config: &ModerationConfig) -> RateLimitPolicy {
    RateLimitPolicy {
        spam_limit: config.spam_limit,
        spam_window: config.spam_window(),
        spam_timeout: config.spam_timeout(),
        link_timeout: config.link_timeout(),
    }
}

/// Every slash command of the bot.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        crate::tickets::ticketpanel(),
        crate::forms::embed(),
        crate::forms::review(),
        crate::forms::suggesties(),
        crate::moderation::purge(),
        crate::moderation::kick(),
        crate::moderation::ban(),
        crate::moderation::timeout(),
        crate::moderation::giverol(),
        crate::moderation::lock(),
        crate::moderation::unlock(),
        crate::moderation::slowmode(),
        crate::utility::ping(),
        crate::utility::userinfo(),
        crate::utility::serverinfo(),
        crate::utility::roleinfo(),
        crate::utility::avatar(),
        crate::utility::say(),
        crate::utility::announce(),
        crate::utility::logtest(),
    ]
}

/// Creates a new Poise framework.
pub fn create_framework() -> poise::FrameworkBuilder<Data, Error> {
    poise::Framework::builder().options(poise::FrameworkOptions {
        commands: commands(),
        event_handler: |ctx, event, framework, data| {
            Box::pin(crate::events::handle_event(ctx, event, framework, data))
        },
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    })
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            warn!(
                "{} lacks {:?} for /{}",
                ctx.author().tag(),
                missing_permissions,
                ctx.command().name
            );
            reply_ephemeral(ctx, ctx.data().messages.get("no-permission")).await;
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Command /{} failed: {}", ctx.command().name, error);
            reply_ephemeral(ctx, ctx.data().messages.get("command-failed")).await;
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

async fn reply_ephemeral(ctx: Context<'_>, text: String) {
    let reply = poise::CreateReply::default().content(text).ephemeral(true);
    if let Err(e) = ctx.send(reply).await {
        error!("Could not send error reply: {}", e);
    }
}
