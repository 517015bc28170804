//! Ticket panel command and the buttons driving the ticket workflow.
//!
//! Buttons carry their action and ticket ID in the component custom ID, so
//! presses are routed without per-message state. A press only reaches a
//! ticket from the channel backing it; presses for tickets the desk no longer
//! tracks, for instance old buttons after a restart, get an "unknown ticket"
//! reply.

use crate::embeds::branded;
use crate::framework::{Context, Data, Error};
use crate::gateway::{channel_id, core_channel_id, user_id, SerenityGateway};
use moana_core::{OpenedTicket, TicketError, TicketId, TicketStatus};
use moana_i18n::Messages;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use tracing::{info, warn};

const CUSTOM_ID_PREFIX: &str = "moana-ticket";

/// Action behind a ticket button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketAction {
    /// Post the public ticket panel.
    PlacePanel,
    /// Open a new ticket.
    Open,
    /// Claim a ticket.
    Claim(TicketId),
    /// Ask to close a ticket.
    Close(TicketId),
    /// Confirm a pending close.
    ConfirmClose(TicketId),
    /// Cancel a pending close.
    CancelClose(TicketId),
}

impl TicketAction {
    /// Component custom ID encoding this action.
    pub fn custom_id(self) -> String {
        match self {
            Self::PlacePanel => format!("{CUSTOM_ID_PREFIX}:panel"),
            Self::Open => format!("{CUSTOM_ID_PREFIX}:open"),
            Self::Claim(id) => format!("{CUSTOM_ID_PREFIX}:claim:{id}"),
            Self::Close(id) => format!("{CUSTOM_ID_PREFIX}:close:{id}"),
            Self::ConfirmClose(id) => format!("{CUSTOM_ID_PREFIX}:confirm:{id}"),
            Self::CancelClose(id) => format!("{CUSTOM_ID_PREFIX}:cancel:{id}"),
        }
    }

    /// Decodes a custom ID; `None` for components that are not ticket buttons.
    pub fn parse(custom_id: &str) -> Option<Self> {
        let rest = custom_id.strip_prefix(CUSTOM_ID_PREFIX)?.strip_prefix(':')?;
        let (verb, id) = match rest.split_once(':') {
            Some((verb, id)) => (verb, Some(TicketId(id.parse().ok()?))),
            None => (rest, None),
        };

        match (verb, id) {
            ("panel", None) => Some(Self::PlacePanel),
            ("open", None) => Some(Self::Open),
            ("claim", Some(id)) => Some(Self::Claim(id)),
            ("close", Some(id)) => Some(Self::Close(id)),
            ("confirm", Some(id)) => Some(Self::ConfirmClose(id)),
            ("cancel", Some(id)) => Some(Self::CancelClose(id)),
            _ => None,
        }
    }

    fn button(self, label: String, style: serenity::ButtonStyle) -> serenity::CreateButton {
        serenity::CreateButton::new(self.custom_id())
            .label(label)
            .style(style)
    }
}

/// Localized name of a ticket status.
pub fn status_text(messages: &Messages, status: TicketStatus) -> String {
    let key = match status {
        TicketStatus::Open => "ticket-status-open",
        TicketStatus::Claimed => "ticket-status-claimed",
        TicketStatus::PendingClose => "ticket-status-pending-close",
        TicketStatus::Closed => "ticket-status-closed",
    };
    messages.get(key)
}

/// Reply shown to a member whose ticket action was rejected.
pub fn rejection_text(messages: &Messages, error: &TicketError) -> String {
    match error {
        TicketError::NotStaff => messages.get("ticket-claim-denied"),
        TicketError::Unauthorized => messages.get("ticket-close-denied"),
        TicketError::UnknownTicket(_) => messages.get("ticket-unknown"),
        TicketError::InvalidState { status, .. } => messages.get_with_args(
            "ticket-invalid-state",
            &[("status", &status_text(messages, *status))],
        ),
    }
}

/// Buttons under a ticket's intro message.
pub fn ticket_buttons(messages: &Messages, id: TicketId) -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(vec![
        TicketAction::Claim(id).button(messages.get("button-claim"), serenity::ButtonStyle::Success),
        TicketAction::Close(id).button(messages.get("button-close"), serenity::ButtonStyle::Danger),
    ])
}

/// Confirm and cancel buttons of a close prompt.
pub fn close_prompt_buttons(messages: &Messages, id: TicketId) -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(vec![
        TicketAction::ConfirmClose(id)
            .button(messages.get("button-confirm-close"), serenity::ButtonStyle::Danger),
        TicketAction::CancelClose(id)
            .button(messages.get("button-cancel"), serenity::ButtonStyle::Secondary),
    ])
}

/// Public close prompt, so anyone in the ticket channel can confirm or cancel.
pub fn close_prompt(
    messages: &Messages,
    id: TicketId,
    requester: &str,
) -> serenity::CreateInteractionResponseMessage {
    serenity::CreateInteractionResponseMessage::new()
        .content(messages.get_with_args("ticket-close-prompt", &[("member", requester)]))
        .components(vec![close_prompt_buttons(messages, id)])
}

/// Maak een ticket panel.
#[poise::command(slash_command, guild_only)]
pub async fn ticketpanel(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let embed = branded(&data.config.branding)
        .title(data.messages.get("panel-creator-title"))
        .description(data.messages.get("panel-creator-description"));
    let row = serenity::CreateActionRow::Buttons(vec![TicketAction::PlacePanel.button(
        data.messages.get("button-create-panel"),
        serenity::ButtonStyle::Primary,
    )]);

    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .components(vec![row])
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Handles a button press; components that are not ticket buttons are ignored.
pub async fn handle_component(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    let Some(action) = TicketAction::parse(&component.data.custom_id) else {
        return Ok(());
    };
    let gateway = data.gateway(ctx);
    let messages = &data.messages;
    let actor = user_id(component.user.id);
    let channel = core_channel_id(component.channel_id);

    match action {
        TicketAction::PlacePanel => place_panel(ctx, component, data).await?,
        TicketAction::Open => open_ticket(ctx, component, data, &gateway).await?,
        TicketAction::Claim(id) => match data.desk.claim(&gateway, id, channel, actor).await {
            Ok(outcome) => {
                if let Some(previous) = outcome.previous_claimant {
                    info!("Ticket {} reassigned from {} to {}", id, previous, actor);
                }
                let notice = messages.get_with_args(
                    "ticket-claimed-notice",
                    &[
                        ("name", &component.user.tag()),
                        ("member", &component.user.mention().to_string()),
                    ],
                );
                component.channel_id.say(ctx, notice).await?;
                respond(ctx, component, messages.get("ticket-claimed")).await?;
                info!("{} claimed ticket {}", component.user.tag(), id);
            }
            Err(e) => respond(ctx, component, rejection_text(messages, &e)).await?,
        },
        TicketAction::Close(id) => match data.desk.request_close(&gateway, id, channel, actor).await {
            Ok(_) => {
                let prompt = close_prompt(messages, id, &component.user.mention().to_string());
                component
                    .create_response(ctx, serenity::CreateInteractionResponse::Message(prompt))
                    .await?;
            }
            Err(e) => respond(ctx, component, rejection_text(messages, &e)).await?,
        },
        TicketAction::ConfirmClose(id) => match data.desk.confirm_close(&gateway, id, channel, actor).await {
            Ok(closed) => {
                respond(ctx, component, messages.get("ticket-closing")).await?;
                info!("{} closing ticket {}", component.user.tag(), id);
                data.desk.finish_close(&gateway, closed).await;
            }
            Err(e) => respond(ctx, component, rejection_text(messages, &e)).await?,
        },
        TicketAction::CancelClose(id) => match data.desk.cancel_close(id, channel) {
            Ok(_) => {
                let update = serenity::CreateInteractionResponseMessage::new()
                    .content(messages.get("ticket-close-cancelled"))
                    .components(Vec::new());
                component
                    .create_response(ctx, serenity::CreateInteractionResponse::UpdateMessage(update))
                    .await?;
            }
            Err(e) => respond(ctx, component, rejection_text(messages, &e)).await?,
        },
    }
    Ok(())
}

async fn respond(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    text: String,
) -> Result<(), serenity::Error> {
    let message = serenity::CreateInteractionResponseMessage::new()
        .content(text)
        .ephemeral(true);
    component
        .create_response(ctx, serenity::CreateInteractionResponse::Message(message))
        .await
}

async fn place_panel(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    let embed = branded(&data.config.branding)
        .title(data.messages.get("panel-title"))
        .description(data.messages.get("panel-description"));
    let row = serenity::CreateActionRow::Buttons(vec![TicketAction::Open.button(
        data.messages.get("button-open-ticket"),
        serenity::ButtonStyle::Primary,
    )]);

    component
        .channel_id
        .send_message(ctx, serenity::CreateMessage::new().embed(embed).components(vec![row]))
        .await?;
    respond(ctx, component, data.messages.get("panel-placed")).await?;
    info!(
        "Ticket panel placed by {} in {}",
        component.user.tag(),
        component.channel_id
    );
    Ok(())
}

async fn open_ticket(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &Data,
    gateway: &SerenityGateway,
) -> Result<(), Error> {
    component.defer_ephemeral(ctx).await?;

    let text = match data.desk.open(gateway, user_id(component.user.id)).await {
        Ok(opened) => {
            if let Err(e) = post_intro(ctx, data, &component.user, &opened).await {
                warn!("Could not post intro in {}: {}", opened.channel.name, e);
            }
            let mention = channel_id(opened.channel.id).mention().to_string();
            data.messages
                .get_with_args("ticket-created", &[("channel", &mention)])
        }
        Err(e) => {
            warn!("Ticket for {} not opened: {}", component.user.tag(), e);
            data.messages.get("ticket-create-failed")
        }
    };

    component
        .edit_response(ctx, serenity::EditInteractionResponse::new().content(text))
        .await?;
    Ok(())
}

async fn post_intro(
    ctx: &serenity::Context,
    data: &Data,
    creator: &serenity::User,
    opened: &OpenedTicket,
) -> Result<(), serenity::Error> {
    let messages = &data.messages;
    let mention = creator.mention().to_string();
    let embed = branded(&data.config.branding)
        .title(messages.get_with_args("ticket-title", &[("name", &creator.tag())]))
        .description(messages.get_with_args("ticket-intro", &[("member", &mention)]))
        .field(messages.get("ticket-field-user"), mention.clone(), true)
        .field(
            messages.get("ticket-field-status"),
            status_text(messages, TicketStatus::Open),
            true,
        );

    let mut message = serenity::CreateMessage::new()
        .embed(embed)
        .components(vec![ticket_buttons(messages, opened.id)]);
    if let Some(role) = data.config.discord.staff_role_id {
        message = message.content(serenity::RoleId::new(role.0).mention().to_string());
    }

    channel_id(opened.channel.id)
        .send_message(ctx, message)
        .await?;
    info!("Ticket {} opened in {} for {}", opened.id, opened.channel.name, creator.tag());
    Ok(())
}
