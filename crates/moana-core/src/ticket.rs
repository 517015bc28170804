//! Support ticket state machine.

use crate::gateway::ChannelHandle;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use moana_common::{ChannelId, UserId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Identifier of a tracked ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(pub u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ticket status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    /// Waiting for staff.
    Open,
    /// A staff member is handling the ticket.
    Claimed,
    /// A close was requested and awaits confirmation.
    PendingClose,
    /// Terminal; the ticket is no longer tracked.
    Closed,
}

impl TicketStatus {
    /// Stable lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Claimed => "claimed",
            Self::PendingClose => "pending_close",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scoped support conversation between one requester and staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Ticket identifier.
    pub id: TicketId,
    /// Member who opened the ticket.
    pub creator_id: UserId,
    /// Staff member currently handling the ticket.
    pub claimant_id: Option<UserId>,
    /// Current status.
    pub status: TicketStatus,
    /// Who asked to close, while a close is pending.
    pub close_requested_by: Option<UserId>,
    /// Status to return to if a pending close is cancelled.
    pub prior_status: Option<TicketStatus>,
    /// Channel backing the ticket, once created.
    pub channel: Option<ChannelHandle>,
    /// When the ticket was opened.
    pub opened_at: DateTime<Utc>,
}

impl Ticket {
    fn may_close(&self, user: UserId, is_staff: bool) -> bool {
        is_staff || user == self.creator_id
    }
}

/// Rejection of a ticket transition.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// The caller lacks staff capability.
    #[error("only staff can do this")]
    NotStaff,
    /// The caller is neither staff nor the ticket creator.
    #[error("only staff or the ticket creator can do this")]
    Unauthorized,
    /// No ticket with this ID is tracked.
    #[error("ticket {0} does not exist")]
    UnknownTicket(TicketId),
    /// The transition is not allowed from the current status.
    #[error("ticket {ticket} cannot do this while {status}")]
    InvalidState {
        /// Ticket concerned.
        ticket: TicketId,
        /// Status at the time of the attempt.
        status: TicketStatus,
    },
}

/// Result of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    /// The ticket after the claim.
    pub ticket: Ticket,
    /// Staff member who held the ticket before, if it was reassigned.
    pub previous_claimant: Option<UserId>,
}

/// A ticket that has just been closed and removed from tracking.
///
/// Receiving one obliges the caller to capture the transcript and then
/// destroy the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedTicket {
    /// Final ticket state, with status [`TicketStatus::Closed`].
    pub ticket: Ticket,
    /// Who confirmed the close.
    pub closed_by: UserId,
    /// When the close was confirmed.
    pub closed_at: DateTime<Utc>,
}

/// Owns every open ticket and applies transitions atomically per ticket.
#[derive(Debug)]
pub struct TicketLifecycle {
    tickets: DashMap<TicketId, Ticket>,
    next_id: AtomicU64,
}

impl TicketLifecycle {
    /// Creates an empty lifecycle manager.
    pub fn new() -> Self {
        Self {
            tickets: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Opens a new ticket for `creator`.
    pub fn open(&self, creator: UserId) -> TicketId {
        let id = TicketId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.tickets.insert(
            id,
            Ticket {
                id,
                creator_id: creator,
                claimant_id: None,
                status: TicketStatus::Open,
                close_requested_by: None,
                prior_status: None,
                channel: None,
                opened_at: Utc::now(),
            },
        );
        info!("Ticket {} opened by {}", id, creator);
        id
    }

    /// Records the channel created for a ticket.
    pub fn attach_channel(&self, id: TicketId, channel: ChannelHandle) -> Result<(), TicketError> {
        let mut ticket = self.tickets.get_mut(&id).ok_or(TicketError::UnknownTicket(id))?;
        debug!("Ticket {} backed by channel {}", id, channel.id);
        ticket.channel = Some(channel);
        Ok(())
    }

    /// Drops a ticket whose channel could not be created.
    pub fn abandon(&self, id: TicketId) -> Option<Ticket> {
        self.tickets.remove(&id).map(|(_, ticket)| ticket)
    }

    /// Assigns the ticket to a staff member, replacing any earlier claimant.
    pub fn claim(&self, id: TicketId, staff: UserId, is_staff: bool) -> Result<ClaimOutcome, TicketError> {
        if !is_staff {
            return Err(TicketError::NotStaff);
        }

        let mut ticket = self.tickets.get_mut(&id).ok_or(TicketError::UnknownTicket(id))?;
        let status = ticket.status;
        match status {
            TicketStatus::Open | TicketStatus::Claimed => {
                let previous_claimant = ticket.claimant_id.filter(|previous| *previous != staff);
                ticket.claimant_id = Some(staff);
                ticket.status = TicketStatus::Claimed;
                info!("Ticket {} claimed by {}", id, staff);
                Ok(ClaimOutcome {
                    ticket: ticket.clone(),
                    previous_claimant,
                })
            }
            status => Err(TicketError::InvalidState { ticket: id, status }),
        }
    }

    /// Asks to close the ticket; staff or the creator only.
    ///
    /// Repeating the request while a close is pending refreshes the requester
    /// and keeps the status remembered from before the first request.
    pub fn request_close(&self, id: TicketId, requester: UserId, is_staff: bool) -> Result<Ticket, TicketError> {
        let mut ticket = self.tickets.get_mut(&id).ok_or(TicketError::UnknownTicket(id))?;
        if !ticket.may_close(requester, is_staff) {
            return Err(TicketError::Unauthorized);
        }

        let status = ticket.status;
        match status {
            TicketStatus::Open | TicketStatus::Claimed => {
                ticket.prior_status = Some(status);
                ticket.status = TicketStatus::PendingClose;
            }
            TicketStatus::PendingClose => {}
            status @ TicketStatus::Closed => {
                return Err(TicketError::InvalidState { ticket: id, status });
            }
        }

        ticket.close_requested_by = Some(requester);
        debug!("Close of ticket {} requested by {}", id, requester);
        Ok(ticket.clone())
    }

    /// Confirms a pending close and removes the ticket from tracking.
    pub fn confirm_close(&self, id: TicketId, confirmer: UserId, is_staff: bool) -> Result<ClosedTicket, TicketError> {
        match self.tickets.entry(id) {
            Entry::Vacant(_) => Err(TicketError::UnknownTicket(id)),
            Entry::Occupied(entry) => {
                let ticket = entry.get();
                if !ticket.may_close(confirmer, is_staff) {
                    return Err(TicketError::Unauthorized);
                }
                if ticket.status != TicketStatus::PendingClose {
                    return Err(TicketError::InvalidState {
                        ticket: id,
                        status: ticket.status,
                    });
                }

                let mut ticket = entry.remove();
                ticket.status = TicketStatus::Closed;
                info!("Ticket {} closed by {}", id, confirmer);
                Ok(ClosedTicket {
                    ticket,
                    closed_by: confirmer,
                    closed_at: Utc::now(),
                })
            }
        }
    }

    /// Cancels a pending close, restoring the status held before the request.
    pub fn cancel_close(&self, id: TicketId) -> Result<Ticket, TicketError> {
        let mut ticket = self.tickets.get_mut(&id).ok_or(TicketError::UnknownTicket(id))?;
        if ticket.status != TicketStatus::PendingClose {
            return Err(TicketError::InvalidState {
                ticket: id,
                status: ticket.status,
            });
        }

        let restored = ticket.prior_status.take().unwrap_or(TicketStatus::Open);
        ticket.status = restored;
        ticket.close_requested_by = None;
        debug!("Close of ticket {} cancelled, back to {}", id, ticket.status);
        Ok(ticket.clone())
    }

    /// Snapshot of a tracked ticket.
    pub fn get(&self, id: TicketId) -> Option<Ticket> {
        self.tickets.get(&id).map(|ticket| ticket.clone())
    }

    /// Finds the ticket backed by a channel.
    pub fn find_by_channel(&self, channel: ChannelId) -> Option<Ticket> {
        self.tickets
            .iter()
            .find(|entry| entry.channel.as_ref().is_some_and(|handle| handle.id == channel))
            .map(|entry| entry.value().clone())
    }

    /// Number of tracked tickets.
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// Whether no tickets are tracked.
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

impl Default for TicketLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
