//! Ticket workflow: lifecycle transitions followed by their platform effects.

use crate::gateway::{ChannelHandle, GatewayError, PlatformGateway};
use crate::ticket::{ClaimOutcome, ClosedTicket, Ticket, TicketError, TicketId, TicketLifecycle};
use crate::transcript::TranscriptSink;
use moana_common::{ChannelId, UserId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Failure of a desk operation.
#[derive(thiserror::Error, Debug)]
pub enum DeskError {
    /// The transition was rejected.
    #[error(transparent)]
    Ticket(#[from] TicketError),
    /// The platform failed to carry out a required effect.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// A ticket with its freshly created channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedTicket {
    /// Ticket ID.
    pub id: TicketId,
    /// The ticket channel.
    pub channel: ChannelHandle,
}

/// What happened after a close was confirmed.
#[derive(Debug)]
pub struct CloseReport {
    /// The closed ticket.
    pub closed: ClosedTicket,
    /// Where the transcript was written, if capturing and storing succeeded.
    pub transcript: Option<PathBuf>,
    /// Whether the channel was deleted.
    pub channel_destroyed: bool,
}

/// Runs the ticket workflow against a platform.
///
/// Every operation applies its state transition first and issues platform
/// effects only after the transition succeeded. Effect failures are logged
/// and never roll the transition back.
pub struct TicketDesk {
    lifecycle: TicketLifecycle,
    transcripts: Arc<dyn TranscriptSink>,
}

impl TicketDesk {
    /// Creates a desk storing transcripts in `transcripts`.
    pub fn new(transcripts: Arc<dyn TranscriptSink>) -> Self {
        Self {
            lifecycle: TicketLifecycle::new(),
            transcripts,
        }
    }

    /// The ticket state machine.
    pub const fn lifecycle(&self) -> &TicketLifecycle {
        &self.lifecycle
    }

    /// Opens a ticket and creates its channel; the ticket is dropped if the channel cannot be created.
    pub async fn open(
        &self,
        gateway: &dyn PlatformGateway,
        creator: UserId,
    ) -> Result<OpenedTicket, DeskError> {
        let id = self.lifecycle.open(creator);
        match gateway.create_ticket_channel(creator).await {
            Ok(channel) => {
                self.lifecycle.attach_channel(id, channel.clone())?;
                info!("Ticket {} created channel {} for {}", id, channel.name, creator);
                Ok(OpenedTicket { id, channel })
            }
            Err(e) => {
                self.lifecycle.abandon(id);
                error!("Could not create channel for ticket {}: {}", id, e);
                Err(e.into())
            }
        }
    }

    /// The tracked ticket `id`, provided `channel` is the channel backing it.
    ///
    /// Ticket IDs restart with the process, so a leftover button in an older
    /// ticket channel may name an ID that now belongs to another ticket. Such
    /// a press is answered as an unknown ticket.
    pub fn ticket_in(&self, id: TicketId, channel: ChannelId) -> Result<Ticket, TicketError> {
        self.lifecycle
            .find_by_channel(channel)
            .filter(|ticket| ticket.id == id)
            .ok_or(TicketError::UnknownTicket(id))
    }

    /// Claims a ticket for `staff`.
    pub async fn claim(
        &self,
        gateway: &dyn PlatformGateway,
        id: TicketId,
        channel: ChannelId,
        staff: UserId,
    ) -> Result<ClaimOutcome, TicketError> {
        self.ticket_in(id, channel)?;
        let is_staff = gateway.has_staff_capability(staff).await;
        self.lifecycle.claim(id, staff, is_staff)
    }

    /// Requests a close confirmation.
    pub async fn request_close(
        &self,
        gateway: &dyn PlatformGateway,
        id: TicketId,
        channel: ChannelId,
        requester: UserId,
    ) -> Result<Ticket, TicketError> {
        self.ticket_in(id, channel)?;
        let is_staff = gateway.has_staff_capability(requester).await;
        self.lifecycle.request_close(id, requester, is_staff)
    }

    /// Confirms a pending close. The caller must follow up with [`Self::finish_close`].
    pub async fn confirm_close(
        &self,
        gateway: &dyn PlatformGateway,
        id: TicketId,
        channel: ChannelId,
        confirmer: UserId,
    ) -> Result<ClosedTicket, TicketError> {
        self.ticket_in(id, channel)?;
        let is_staff = gateway.has_staff_capability(confirmer).await;
        self.lifecycle.confirm_close(id, confirmer, is_staff)
    }

    /// Cancels a pending close.
    pub fn cancel_close(&self, id: TicketId, channel: ChannelId) -> Result<Ticket, TicketError> {
        self.ticket_in(id, channel)?;
        self.lifecycle.cancel_close(id)
    }

    /// Captures and stores the transcript of a closed ticket, then deletes its channel.
    pub async fn finish_close(
        &self,
        gateway: &dyn PlatformGateway,
        closed: ClosedTicket,
    ) -> CloseReport {
        let Some(channel) = closed.ticket.channel.clone() else {
            warn!("Ticket {} closed without a channel", closed.ticket.id);
            return CloseReport {
                closed,
                transcript: None,
                channel_destroyed: false,
            };
        };

        let transcript = match gateway.capture_transcript(&channel).await {
            Ok(entries) => match self.transcripts.store(&channel, &entries, closed.closed_at).await {
                Ok(path) => Some(path),
                Err(e) => {
                    error!("Could not store transcript of {}: {}", channel.name, e);
                    None
                }
            },
            Err(e) => {
                error!("Could not capture transcript of {}: {}", channel.name, e);
                None
            }
        };

        let reason = format!("Closed by {}", closed.closed_by);
        let channel_destroyed = match gateway.destroy_channel(&channel, &reason).await {
            Ok(()) => true,
            Err(GatewayError::NotFound(e)) => {
                info!("Ticket channel {} was already gone: {}", channel.name, e);
                true
            }
            Err(e) => {
                error!("Could not delete ticket channel {}: {}", channel.name, e);
                false
            }
        };

        CloseReport {
            closed,
            transcript,
            channel_destroyed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MockPlatformGateway, TranscriptEntry};
    use crate::ticket::TicketStatus;
    use crate::transcript::MockTranscriptSink;
    use mockall::Sequence;
    use moana_common::test_utils::{discord_fixtures, mock_timestamp};

    fn handle() -> ChannelHandle {
        ChannelHandle::new(discord_fixtures::test_channel_id(), "ticket-moana")
    }

    fn sample_entries() -> Vec<TranscriptEntry> {
        vec![TranscriptEntry {
            at: mock_timestamp(2025, 1, 1, 12, 0, 0),
            author_id: UserId(1),
            author_name: "moana".to_string(),
            text: "help".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_open_attaches_channel() {
        let mut gateway = MockPlatformGateway::new();
        gateway
            .expect_create_ticket_channel()
            .times(1)
            .returning(|_| Ok(handle()));

        let desk = TicketDesk::new(Arc::new(MockTranscriptSink::new()));
        let opened = desk.open(&gateway, UserId(1)).await.unwrap();

        assert_eq!(opened.channel, handle());
        let ticket = desk.lifecycle().get(opened.id).unwrap();
        assert_eq!(ticket.channel, Some(handle()));
        assert_eq!(ticket.status, TicketStatus::Open);
    }

    #[tokio::test]
    async fn test_open_failure_abandons_ticket() {
        let mut gateway = MockPlatformGateway::new();
        gateway
            .expect_create_ticket_channel()
            .returning(|_| Err(GatewayError::Platform("missing access".to_string())));

        let desk = TicketDesk::new(Arc::new(MockTranscriptSink::new()));
        let result = desk.open(&gateway, UserId(1)).await;

        assert!(matches!(result, Err(DeskError::Gateway(_))));
        assert!(desk.lifecycle().is_empty());
    }

    #[tokio::test]
    async fn test_finish_close_captures_before_destroying() {
        let mut seq = Sequence::new();
        let mut gateway = MockPlatformGateway::new();
        gateway.expect_has_staff_capability().returning(|user| user == UserId(2));
        gateway
            .expect_create_ticket_channel()
            .returning(|_| Ok(handle()));
        gateway
            .expect_capture_transcript()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(sample_entries()));
        gateway
            .expect_destroy_channel()
            .withf(|channel, reason| channel.name == "ticket-moana" && reason == "Closed by 2")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut sink = MockTranscriptSink::new();
        sink.expect_store()
            .withf(|channel, entries, _| channel.name == "ticket-moana" && entries.len() == 1)
            .times(1)
            .returning(|_, _, _| Ok(PathBuf::from("transcripts/ticket-moana.txt")));

        let desk = TicketDesk::new(Arc::new(sink));
        let opened = desk.open(&gateway, UserId(1)).await.unwrap();
        desk.request_close(&gateway, opened.id, opened.channel.id, UserId(1)).await.unwrap();
        let closed = desk.confirm_close(&gateway, opened.id, opened.channel.id, UserId(2)).await.unwrap();
        let report = desk.finish_close(&gateway, closed).await;

        assert_eq!(report.transcript, Some(PathBuf::from("transcripts/ticket-moana.txt")));
        assert!(report.channel_destroyed);
        assert!(desk.lifecycle().is_empty());
    }

    #[tokio::test]
    async fn test_finish_close_deletes_channel_even_without_transcript() {
        let mut gateway = MockPlatformGateway::new();
        gateway.expect_has_staff_capability().returning(|_| true);
        gateway
            .expect_create_ticket_channel()
            .returning(|_| Ok(handle()));
        gateway
            .expect_capture_transcript()
            .returning(|_| Err(GatewayError::Platform("history unavailable".to_string())));
        gateway
            .expect_destroy_channel()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut sink = MockTranscriptSink::new();
        sink.expect_store().never();

        let desk = TicketDesk::new(Arc::new(sink));
        let opened = desk.open(&gateway, UserId(1)).await.unwrap();
        desk.request_close(&gateway, opened.id, opened.channel.id, UserId(3)).await.unwrap();
        let closed = desk.confirm_close(&gateway, opened.id, opened.channel.id, UserId(3)).await.unwrap();
        let report = desk.finish_close(&gateway, closed).await;

        assert_eq!(report.transcript, None);
        assert!(report.channel_destroyed);
    }

    #[tokio::test]
    async fn test_channel_deleted_elsewhere_counts_as_destroyed() {
        let mut gateway = MockPlatformGateway::new();
        gateway.expect_has_staff_capability().returning(|_| true);
        gateway
            .expect_create_ticket_channel()
            .returning(|_| Ok(handle()));
        gateway
            .expect_capture_transcript()
            .returning(|_| Err(GatewayError::NotFound("Unknown Channel".to_string())));
        gateway
            .expect_destroy_channel()
            .times(1)
            .returning(|_, _| Err(GatewayError::NotFound("Unknown Channel".to_string())));

        let desk = TicketDesk::new(Arc::new(MockTranscriptSink::new()));
        let opened = desk.open(&gateway, UserId(1)).await.unwrap();
        desk.request_close(&gateway, opened.id, opened.channel.id, UserId(1)).await.unwrap();
        let closed = desk.confirm_close(&gateway, opened.id, opened.channel.id, UserId(2)).await.unwrap();
        let report = desk.finish_close(&gateway, closed).await;

        assert_eq!(report.transcript, None);
        assert!(report.channel_destroyed);
    }

    #[tokio::test]
    async fn test_claim_by_member_is_rejected() {
        let mut gateway = MockPlatformGateway::new();
        gateway.expect_has_staff_capability().returning(|_| false);
        gateway
            .expect_create_ticket_channel()
            .returning(|_| Ok(handle()));

        let desk = TicketDesk::new(Arc::new(MockTranscriptSink::new()));
        let opened = desk.open(&gateway, UserId(1)).await.unwrap();

        assert_eq!(
            desk.claim(&gateway, opened.id, opened.channel.id, UserId(5)).await,
            Err(TicketError::NotStaff)
        );
        assert_eq!(
            desk.cancel_close(opened.id, opened.channel.id).map(|t| t.status),
            Err(TicketError::InvalidState {
                ticket: opened.id,
                status: TicketStatus::Open,
            })
        );
    }

    #[tokio::test]
    async fn test_press_from_another_channel_is_unknown() {
        let mut gateway = MockPlatformGateway::new();
        gateway.expect_has_staff_capability().never();
        gateway
            .expect_create_ticket_channel()
            .returning(|_| Ok(handle()));

        let desk = TicketDesk::new(Arc::new(MockTranscriptSink::new()));
        let opened = desk.open(&gateway, UserId(1)).await.unwrap();
        let elsewhere = ChannelId(1);

        assert_eq!(
            desk.claim(&gateway, opened.id, elsewhere, UserId(2)).await,
            Err(TicketError::UnknownTicket(opened.id))
        );
        assert_eq!(
            desk.cancel_close(opened.id, elsewhere),
            Err(TicketError::UnknownTicket(opened.id))
        );
        assert_eq!(desk.ticket_in(opened.id, opened.channel.id).map(|t| t.id), Ok(opened.id));
    }
}
