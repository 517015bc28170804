//! Moderation slash commands, each gated on the matching Discord permission.

use crate::embeds::notice;
use crate::framework::{Context, Error};
use crate::gateway::user_id;
use moana_core::PlatformGateway;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use std::time::Duration;
use tracing::info;

/// Upper bound Discord accepts for a timeout, in minutes.
pub const MAX_TIMEOUT_MINUTES: u32 = 40_320;

async fn reply_embed(ctx: Context<'_>, title: String, description: String) -> Result<(), Error> {
    let embed = notice(&ctx.data().config.branding, title, description);
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

async fn reply_text(ctx: Context<'_>, text: String) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
        .await?;
    Ok(())
}

fn everyone_role(ctx: Context<'_>) -> Result<serenity::RoleId, Error> {
    let guild_id = ctx.guild_id().ok_or("command used outside a guild")?;
    Ok(serenity::RoleId::new(guild_id.get()))
}

/// Verwijder aantal berichten
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "Aantal berichten (max 100)"]
    #[min = 1]
    #[max = 100]
    amount: u8,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    let channel = ctx.channel_id();
    let ids: Vec<serenity::MessageId> = channel
        .messages(ctx, serenity::GetMessages::new().limit(amount.clamp(1, 100)))
        .await?
        .into_iter()
        .map(|message| message.id)
        .collect();

    match ids.as_slice() {
        [] => {}
        [single] => channel.delete_message(ctx, *single).await?,
        _ => channel.delete_messages(ctx, &ids).await?,
    }

    let messages = &ctx.data().messages;
    reply_embed(
        ctx,
        messages.get("purge-title"),
        messages.get_with_args("purge-result", &[("count", &ids.len().to_string())]),
    )
    .await?;
    info!("{} purged {} messages in {}", ctx.author().tag(), ids.len(), channel);
    Ok(())
}

/// Kick een gebruiker
#[poise::command(slash_command, guild_only, required_permissions = "KICK_MEMBERS")]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "Gebruiker"] member: serenity::Member,
    #[description = "Reden"] reason: Option<String>,
) -> Result<(), Error> {
    match reason.as_deref() {
        Some(reason) => member.kick_with_reason(ctx, reason).await?,
        None => member.kick(ctx).await?,
    }

    let messages = &ctx.data().messages;
    let reason = reason.unwrap_or_else(|| messages.get("no-reason"));
    reply_embed(
        ctx,
        messages.get("kick-title"),
        messages.get_with_args(
            "kick-result",
            &[("user", &member.user.tag()), ("reason", &reason)],
        ),
    )
    .await?;
    info!("{} kicked {}", ctx.author().tag(), member.user.tag());
    Ok(())
}

/// Ban een gebruiker
#[poise::command(slash_command, guild_only, required_permissions = "BAN_MEMBERS")]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "Gebruiker"] member: serenity::Member,
    #[description = "Reden"] reason: Option<String>,
) -> Result<(), Error> {
    match reason.as_deref() {
        Some(reason) => member.ban_with_reason(ctx, 0, reason).await?,
        None => member.ban(ctx, 0).await?,
    }

    let messages = &ctx.data().messages;
    let reason = reason.unwrap_or_else(|| messages.get("no-reason"));
    reply_embed(
        ctx,
        messages.get("ban-title"),
        messages.get_with_args(
            "ban-result",
            &[("user", &member.user.tag()), ("reason", &reason)],
        ),
    )
    .await?;
    info!("{} banned {}", ctx.author().tag(), member.user.tag());
    Ok(())
}

/// Time-out een gebruiker (minuten)
#[poise::command(slash_command, guild_only, required_permissions = "MODERATE_MEMBERS")]
pub async fn timeout(
    ctx: Context<'_>,
    #[description = "Gebruiker"] member: serenity::Member,
    #[description = "Duur in minuten"]
    #[min = 1]
    #[max = 40320]
    minutes: u32,
) -> Result<(), Error> {
    let minutes = minutes.clamp(1, MAX_TIMEOUT_MINUTES);
    let reason = format!("Timed out by {}", ctx.author().tag());
    ctx.data()
        .gateway(ctx.serenity_context())
        .apply_timed_restriction(
            user_id(member.user.id),
            Duration::from_secs(u64::from(minutes) * 60),
            &reason,
        )
        .await?;

    let messages = &ctx.data().messages;
    reply_embed(
        ctx,
        messages.get("timeout-title"),
        messages.get_with_args(
            "timeout-result",
            &[("user", &member.user.tag()), ("minutes", &minutes.to_string())],
        ),
    )
    .await?;
    info!("{} timed out {} for {} minutes", ctx.author().tag(), member.user.tag(), minutes);
    Ok(())
}

/// Geef een rol aan iemand
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_ROLES")]
pub async fn giverol(
    ctx: Context<'_>,
    #[description = "Gebruiker"] member: serenity::Member,
    #[description = "Rol"] role: serenity::Role,
) -> Result<(), Error> {
    member.add_role(ctx, role.id).await?;

    let messages = &ctx.data().messages;
    reply_embed(
        ctx,
        messages.get("role-given-title"),
        messages.get_with_args(
            "role-given-result",
            &[
                ("member", &member.mention().to_string()),
                ("role", &role.mention().to_string()),
            ],
        ),
    )
    .await?;
    info!("{} gave role {} to {}", ctx.author().tag(), role.name, member.user.tag());
    Ok(())
}

/// Lock het huidige kanaal
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_CHANNELS")]
pub async fn lock(ctx: Context<'_>) -> Result<(), Error> {
    let overwrite = serenity::PermissionOverwrite {
        allow: serenity::Permissions::empty(),
        deny: serenity::Permissions::SEND_MESSAGES,
        kind: serenity::PermissionOverwriteType::Role(everyone_role(ctx)?),
    };
    ctx.channel_id().create_permission(ctx, overwrite).await?;
    reply_text(ctx, ctx.data().messages.get("channel-locked")).await?;
    info!("{} locked {}", ctx.author().tag(), ctx.channel_id());
    Ok(())
}

/// Unlock het huidige kanaal
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_CHANNELS")]
pub async fn unlock(ctx: Context<'_>) -> Result<(), Error> {
    let overwrite = serenity::PermissionOverwrite {
        allow: serenity::Permissions::empty(),
        deny: serenity::Permissions::empty(),
        kind: serenity::PermissionOverwriteType::Role(everyone_role(ctx)?),
    };
    ctx.channel_id().create_permission(ctx, overwrite).await?;
    reply_text(ctx, ctx.data().messages.get("channel-unlocked")).await?;
    info!("{} unlocked {}", ctx.author().tag(), ctx.channel_id());
    Ok(())
}

/// Zet slowmode in seconden
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_CHANNELS")]
pub async fn slowmode(
    ctx: Context<'_>,
    #[description = "Seconden tussen berichten"]
    #[min = 0]
    #[max = 21600]
    seconds: u16,
) -> Result<(), Error> {
    ctx.channel_id()
        .edit(ctx, serenity::EditChannel::new().rate_limit_per_user(seconds))
        .await?;
    let text = ctx
        .data()
        .messages
        .get_with_args("slowmode-set", &[("seconds", &seconds.to_string())]);
    reply_text(ctx, text).await
}
