//! Serenity implementation of the core platform gateway.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use moana_common::utils::{from_unix_seconds, ticket_channel_name};
use moana_common::{ChannelId, UserId};
use moana_config::Config;
use moana_core::{ChannelHandle, GatewayError, MessageTarget, PlatformGateway, TranscriptEntry};
use poise::serenity_prelude as serenity;
use std::time::Duration;
use tracing::{debug, warn};

/// Guild-specific settings the gateway needs.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Guild the bot serves.
    pub guild_id: serenity::GuildId,
    /// Role granting staff capability.
    pub staff_role_id: Option<serenity::RoleId>,
    /// Category new ticket channels are created in.
    pub ticket_category_id: Option<serenity::ChannelId>,
    /// Prefix of ticket channel names.
    pub channel_prefix: String,
    /// Maximum number of messages captured per transcript.
    pub history_limit: usize,
}

impl GatewaySettings {
    /// Extracts the gateway settings from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            guild_id: serenity::GuildId::new(config.discord.guild_id.0),
            staff_role_id: config.discord.staff_role_id.map(|id| serenity::RoleId::new(id.0)),
            ticket_category_id: config.discord.ticket_category_id.map(channel_id),
            channel_prefix: config.tickets.channel_prefix.clone(),
            history_limit: config.tickets.history_limit,
        }
    }

    /// The guild's `@everyone` role.
    pub fn everyone_role(&self) -> serenity::RoleId {
        serenity::RoleId::new(self.guild_id.get())
    }

    /// Permission overwrites of a new ticket channel: hidden from everyone,
    /// open to the creator and the staff role.
    pub fn ticket_overwrites(&self, creator: serenity::UserId) -> Vec<serenity::PermissionOverwrite> {
        let access = serenity::Permissions::VIEW_CHANNEL
            | serenity::Permissions::SEND_MESSAGES
            | serenity::Permissions::READ_MESSAGE_HISTORY;

        let mut overwrites = vec![
            serenity::PermissionOverwrite {
                allow: serenity::Permissions::empty(),
                deny: serenity::Permissions::VIEW_CHANNEL,
                kind: serenity::PermissionOverwriteType::Role(self.everyone_role()),
            },
            serenity::PermissionOverwrite {
                allow: access,
                deny: serenity::Permissions::empty(),
                kind: serenity::PermissionOverwriteType::Member(creator),
            },
        ];
        if let Some(role) = self.staff_role_id {
            overwrites.push(serenity::PermissionOverwrite {
                allow: access,
                deny: serenity::Permissions::empty(),
                kind: serenity::PermissionOverwriteType::Role(role),
            });
        }
        overwrites
    }
}

/// Converts a configured channel ID.
pub fn channel_id(id: ChannelId) -> serenity::ChannelId {
    serenity::ChannelId::new(id.0)
}

/// Converts a Discord channel ID.
pub fn core_channel_id(id: serenity::ChannelId) -> ChannelId {
    ChannelId(id.get())
}

/// Converts a Discord user ID.
pub fn user_id(id: serenity::UserId) -> UserId {
    UserId(id.get())
}

fn platform(error: serenity::Error) -> GatewayError {
    match &error {
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404 =>
        {
            GatewayError::NotFound(response.error.message.clone())
        }
        _ => GatewayError::Platform(error.to_string()),
    }
}

/// Carries out core effects through the Discord API.
#[derive(Clone)]
pub struct SerenityGateway {
    ctx: serenity::Context,
    settings: GatewaySettings,
}

impl SerenityGateway {
    /// Creates a gateway for the configured guild.
    pub fn new(ctx: serenity::Context, config: &Config) -> Self {
        Self {
            ctx,
            settings: GatewaySettings::from_config(config),
        }
    }

    /// Settings in use.
    pub const fn settings(&self) -> &GatewaySettings {
        &self.settings
    }
}

#[async_trait]
impl PlatformGateway for SerenityGateway {
    async fn has_staff_capability(&self, user: UserId) -> bool {
        let guild_id = self.settings.guild_id;
        let member = match guild_id.member(&self.ctx, serenity::UserId::new(user.0)).await {
            Ok(member) => member,
            Err(e) => {
                warn!("Could not resolve member {}: {}", user, e);
                return false;
            }
        };

        if self
            .settings
            .staff_role_id
            .is_some_and(|role| member.roles.contains(&role))
        {
            return true;
        }

        self.ctx
            .cache
            .guild(guild_id)
            .is_some_and(|guild| guild.member_permissions(&member).manage_messages())
    }

    async fn apply_timed_restriction(
        &self,
        user: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<(), GatewayError> {
        let seconds = i64::try_from(duration.as_secs())
            .map_err(|_| GatewayError::Platform(format!("restriction too long: {duration:?}")))?;
        let until = serenity::Timestamp::from_unix_timestamp(chrono::Utc::now().timestamp() + seconds)
            .map_err(|e| GatewayError::Platform(e.to_string()))?;

        let builder = serenity::EditMember::new()
            .disable_communication_until_datetime(until)
            .audit_log_reason(reason);
        self.settings
            .guild_id
            .edit_member(&self.ctx, serenity::UserId::new(user.0), builder)
            .await
            .map_err(platform)?;
        Ok(())
    }

    async fn create_ticket_channel(&self, creator: UserId) -> Result<ChannelHandle, GatewayError> {
        let creator = serenity::UserId::new(creator.0);
        let user = creator.to_user(&self.ctx).await.map_err(platform)?;
        let name = ticket_channel_name(&self.settings.channel_prefix, &user.name);

        let mut builder = serenity::CreateChannel::new(name)
            .kind(serenity::ChannelType::Text)
            .permissions(self.settings.ticket_overwrites(creator));
        if let Some(category) = self.settings.ticket_category_id {
            builder = builder.category(category);
        }

        let channel = self
            .settings
            .guild_id
            .create_channel(&self.ctx, builder)
            .await
            .map_err(platform)?;
        Ok(ChannelHandle::new(core_channel_id(channel.id), channel.name))
    }

    async fn capture_transcript(
        &self,
        channel: &ChannelHandle,
    ) -> Result<Vec<TranscriptEntry>, GatewayError> {
        let mut messages: Vec<serenity::Message> = channel_id(channel.id)
            .messages_iter(&self.ctx)
            .take(self.settings.history_limit)
            .try_collect()
            .await
            .map_err(platform)?;
        messages.reverse();
        debug!("Captured {} messages from {}", messages.len(), channel.name);

        Ok(messages
            .into_iter()
            .map(|message| TranscriptEntry {
                at: from_unix_seconds(message.timestamp.unix_timestamp()),
                author_id: user_id(message.author.id),
                author_name: message.author.tag(),
                text: message.content,
            })
            .collect())
    }

    async fn destroy_channel(&self, channel: &ChannelHandle, reason: &str) -> Result<(), GatewayError> {
        self.ctx
            .http
            .delete_channel(channel_id(channel.id), Some(reason))
            .await
            .map_err(platform)?;
        Ok(())
    }

    async fn post_message(&self, target: MessageTarget, text: &str) -> Result<(), GatewayError> {
        match target {
            MessageTarget::Channel(channel) => {
                channel_id(channel).say(&self.ctx, text).await.map_err(platform)?;
            }
            MessageTarget::User(user) => {
                serenity::UserId::new(user.0)
                    .direct_message(&self.ctx, serenity::CreateMessage::new().content(text))
                    .await
                    .map_err(platform)?;
            }
        }
        Ok(())
    }
}
