//! Gateway event handling: message moderation, welcomes and button presses.

use crate::embeds::branded;
use crate::framework::{Data, Error};
use crate::gateway::{channel_id, core_channel_id, user_id};
use chrono::Utc;
use moana_core::{IncomingMessage, MessageTarget, PlatformGateway, Verdict};
use moana_i18n::Messages;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use tracing::{debug, info, warn};

/// Dispatches a gateway event.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Bot online as {}", data_about_bot.user.tag());
        }
        serenity::FullEvent::Message { new_message } => {
            moderate_message(ctx, new_message, data).await;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            welcome_member(ctx, new_member, data).await?;
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            crate::tickets::handle_component(ctx, component, data).await?;
        }
        _ => {}
    }
    Ok(())
}

/// Text posted in the channel after a member was restricted.
pub fn restriction_notice(messages: &Messages, verdict: Verdict, mention: &str) -> Option<String> {
    match verdict {
        Verdict::Allow => None,
        Verdict::RestrictForLink { duration } => {
            let minutes = (duration.as_secs() / 60).to_string();
            Some(messages.get_with_args(
                "notice-link-timeout",
                &[("member", mention), ("minutes", &minutes)],
            ))
        }
        Verdict::RestrictForSpam { .. } => {
            Some(messages.get_with_args("notice-spam-timeout", &[("member", mention)]))
        }
    }
}

async fn moderate_message(ctx: &serenity::Context, message: &serenity::Message, data: &Data) {
    if message.author.bot {
        return;
    }
    let guild_id = data.config.discord.guild_id.0;
    if message.guild_id.map(serenity::GuildId::get) != Some(guild_id) {
        return;
    }

    let gateway = data.gateway(ctx);
    let incoming = IncomingMessage {
        author: user_id(message.author.id),
        channel: core_channel_id(message.channel_id),
        content: &message.content,
        at: Utc::now(),
    };
    let verdict = data.moderator.handle_message(&gateway, &incoming).await;

    let Some(notice) = restriction_notice(&data.messages, verdict, &message.author.mention().to_string())
    else {
        return;
    };
    if let Err(e) = gateway
        .post_message(MessageTarget::Channel(incoming.channel), &notice)
        .await
    {
        warn!("Could not post moderation notice: {}", e);
    }
}

async fn welcome_member(
    ctx: &serenity::Context,
    member: &serenity::Member,
    data: &Data,
) -> Result<(), Error> {
    let Some(channel) = data.config.discord.welcome_channel_id else {
        debug!("No welcome channel configured");
        return Ok(());
    };

    let member_count = ctx
        .cache
        .guild(member.guild_id)
        .map_or(0, |guild| guild.member_count)
        .to_string();
    let mention = member.mention().to_string();
    let embed = branded(&data.config.branding)
        .title(data.messages.get_with_args("welcome-title", &[("member", &mention)]))
        .description(
            data.messages
                .get_with_args("welcome-description", &[("count", &member_count)]),
        );

    channel_id(channel)
        .send_message(ctx, serenity::CreateMessage::new().embed(embed))
        .await?;
    info!("Sent welcome for {}", member.user.tag());
    Ok(())
}
