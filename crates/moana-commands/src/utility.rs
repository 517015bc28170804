//! Informational and posting commands.

use crate::embeds::{branded, notice};
use crate::framework::{Context, Error};
use moana_common::utils::{format_date, from_unix_seconds};
use moana_core::{MessageTarget, PlatformGateway};
use poise::serenity_prelude as serenity;
use std::borrow::Cow;
use tracing::info;

fn date_of(timestamp: serenity::Timestamp) -> String {
    format_date(from_unix_seconds(timestamp.unix_timestamp()))
}

async fn send_embed(ctx: Context<'_>, embed: serenity::CreateEmbed) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

async fn reply_text(ctx: Context<'_>, text: String) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
        .await?;
    Ok(())
}

/// Check bot latency
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let millis = ctx.ping().await.as_millis().to_string();
    let messages = &ctx.data().messages;
    let embed = notice(
        &ctx.data().config.branding,
        messages.get("ping-title"),
        messages.get_with_args("ping-result", &[("millis", &millis)]),
    );
    send_embed(ctx, embed).await
}

/// Get user info
#[poise::command(slash_command, guild_only)]
pub async fn userinfo(
    ctx: Context<'_>,
    #[description = "Gebruiker"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let member = match member {
        Some(member) => Some(member),
        None => ctx.author_member().await.map(Cow::into_owned),
    };
    let user = member
        .as_ref()
        .map_or_else(|| ctx.author().clone(), |member| member.user.clone());

    let messages = &ctx.data().messages;
    let joined = member
        .as_ref()
        .and_then(|member| member.joined_at)
        .map_or_else(|| messages.get("value-unknown"), date_of);

    let mut embed = branded(&ctx.data().config.branding)
        .title(messages.get_with_args("userinfo-title", &[("user", &user.tag())]))
        .field(messages.get("userinfo-field-id"), user.id.to_string(), true)
        .field(messages.get("userinfo-field-created"), date_of(user.created_at()), true)
        .field(messages.get("userinfo-field-joined"), joined, true);
    if let Some(avatar) = user.avatar_url() {
        embed = embed.thumbnail(avatar);
    }
    send_embed(ctx, embed).await
}

/// Server info
#[poise::command(slash_command, guild_only)]
pub async fn serverinfo(ctx: Context<'_>) -> Result<(), Error> {
    let (name, id, members, channels) = ctx
        .guild()
        .map(|guild| (guild.name.clone(), guild.id, guild.member_count, guild.channels.len()))
        .ok_or("guild not cached")?;

    let messages = &ctx.data().messages;
    let embed = branded(&ctx.data().config.branding)
        .title(messages.get_with_args("serverinfo-title", &[("name", &name)]))
        .field(messages.get("serverinfo-field-id"), id.to_string(), true)
        .field(messages.get("serverinfo-field-members"), members.to_string(), true)
        .field(messages.get("serverinfo-field-channels"), channels.to_string(), true);
    send_embed(ctx, embed).await
}

/// Info over een rol
#[poise::command(slash_command, guild_only)]
pub async fn roleinfo(
    ctx: Context<'_>,
    #[description = "Rol"] role: serenity::Role,
) -> Result<(), Error> {
    let holders = ctx.guild().map_or(0, |guild| {
        guild
            .members
            .values()
            .filter(|member| member.roles.contains(&role.id))
            .count()
    });

    let messages = &ctx.data().messages;
    let embed = branded(&ctx.data().config.branding)
        .title(messages.get_with_args("roleinfo-title", &[("name", &role.name)]))
        .field(messages.get("roleinfo-field-id"), role.id.to_string(), true)
        .field(messages.get("roleinfo-field-members"), holders.to_string(), true);
    send_embed(ctx, embed).await
}

/// Bekijk avatar
#[poise::command(slash_command)]
pub async fn avatar(
    ctx: Context<'_>,
    #[description = "Gebruiker"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.as_ref().unwrap_or_else(|| ctx.author());
    let embed = branded(&ctx.data().config.branding)
        .title(
            ctx.data()
                .messages
                .get_with_args("avatar-title", &[("user", &user.tag())]),
        )
        .image(user.face());
    send_embed(ctx, embed).await
}

/// Laat de bot iets zeggen (embed)
#[poise::command(slash_command)]
pub async fn say(
    ctx: Context<'_>,
    #[description = "Tekst"] tekst: String,
) -> Result<(), Error> {
    let embed = branded(&ctx.data().config.branding).description(tekst);
    send_embed(ctx, embed).await
}

/// Maak een grote announcement embed
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn announce(
    ctx: Context<'_>,
    #[description = "Titel"] titel: String,
    #[description = "Bericht"] bericht: String,
    #[description = "Kanaal"]
    #[channel_types("Text", "News")]
    kanaal: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let channel = kanaal.map_or_else(|| ctx.channel_id(), |channel| channel.id);
    let embed = notice(&ctx.data().config.branding, titel, bericht);
    channel
        .send_message(ctx, serenity::CreateMessage::new().embed(embed))
        .await?;
    reply_text(ctx, ctx.data().messages.get("announce-sent")).await?;
    info!("{} announced in {}", ctx.author().tag(), channel);
    Ok(())
}

/// Stuur een test log naar logs kanaal
#[poise::command(slash_command, guild_only)]
pub async fn logtest(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let Some(log_channel) = data.config.discord.log_channel_id else {
        return reply_text(ctx, data.messages.get("logtest-no-channel")).await;
    };

    let text = data
        .messages
        .get_with_args("logtest-message", &[("user", &ctx.author().tag())]);
    data.gateway(ctx.serenity_context())
        .post_message(MessageTarget::Channel(log_channel), &text)
        .await?;
    info!("Log test sent to {}", log_channel);
    reply_text(ctx, data.messages.get("logtest-sent")).await
}
