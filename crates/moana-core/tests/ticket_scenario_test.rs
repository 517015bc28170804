//! End-to-end ticket and moderation scenarios against an in-memory platform.

use async_trait::async_trait;
use chrono::TimeDelta;
use moana_common::test_utils::{init_test_logging, mock_timestamp};
use moana_common::{ChannelId, UserId};
use moana_core::{
    ChannelHandle, FileTranscriptStore, GatewayError, IncomingMessage, MessageTarget, Moderator,
    PlatformGateway, RateLimitPolicy, TicketDesk, TicketError, TicketStatus, TranscriptEntry,
    Verdict,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CREATOR: UserId = UserId(10);
const STAFF: UserId = UserId(20);
const OUTSIDER: UserId = UserId(30);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    Restricted(UserId, Duration, String),
    Created(UserId),
    Captured(String),
    Destroyed(String),
    Posted(MessageTarget, String),
}

#[derive(Default)]
struct RecordingGateway {
    staff: Vec<UserId>,
    effects: Mutex<Vec<Effect>>,
}

impl RecordingGateway {
    fn with_staff(staff: &[UserId]) -> Self {
        Self {
            staff: staff.to_vec(),
            effects: Mutex::new(Vec::new()),
        }
    }

    fn effects(&self) -> Vec<Effect> {
        self.effects.lock().unwrap().clone()
    }

    fn record(&self, effect: Effect) {
        self.effects.lock().unwrap().push(effect);
    }
}

#[async_trait]
impl PlatformGateway for RecordingGateway {
    async fn has_staff_capability(&self, user: UserId) -> bool {
        self.staff.contains(&user)
    }

    async fn apply_timed_restriction(
        &self,
        user: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<(), GatewayError> {
        self.record(Effect::Restricted(user, duration, reason.to_string()));
        Ok(())
    }

    async fn create_ticket_channel(&self, creator: UserId) -> Result<ChannelHandle, GatewayError> {
        self.record(Effect::Created(creator));
        Ok(ChannelHandle::new(ChannelId(500 + creator.0), format!("ticket-user{}", creator.0)))
    }

    async fn capture_transcript(
        &self,
        channel: &ChannelHandle,
    ) -> Result<Vec<TranscriptEntry>, GatewayError> {
        self.record(Effect::Captured(channel.name.clone()));
        Ok(vec![
            TranscriptEntry {
                at: mock_timestamp(2025, 3, 1, 10, 0, 0),
                author_id: CREATOR,
                author_name: "creator".to_string(),
                text: "my script does not load".to_string(),
            },
            TranscriptEntry {
                at: mock_timestamp(2025, 3, 1, 10, 1, 0),
                author_id: STAFF,
                author_name: "staff".to_string(),
                text: "fixed, please restart".to_string(),
            },
        ])
    }

    async fn destroy_channel(&self, channel: &ChannelHandle, _reason: &str) -> Result<(), GatewayError> {
        self.record(Effect::Destroyed(channel.name.clone()));
        Ok(())
    }

    async fn post_message(&self, target: MessageTarget, text: &str) -> Result<(), GatewayError> {
        self.record(Effect::Posted(target, text.to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn test_full_ticket_lifecycle() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let gateway = RecordingGateway::with_staff(&[STAFF]);
    let desk = TicketDesk::new(Arc::new(FileTranscriptStore::new(dir.path())));

    let opened = desk.open(&gateway, CREATOR).await.unwrap();
    assert_eq!(opened.channel.name, "ticket-user10");

    let claimed = desk.claim(&gateway, opened.id, opened.channel.id, STAFF).await.unwrap();
    assert_eq!(claimed.ticket.status, TicketStatus::Claimed);
    assert_eq!(claimed.ticket.claimant_id, Some(STAFF));

    let pending = desk.request_close(&gateway, opened.id, opened.channel.id, CREATOR).await.unwrap();
    assert_eq!(pending.status, TicketStatus::PendingClose);

    assert_eq!(
        desk.confirm_close(&gateway, opened.id, opened.channel.id, OUTSIDER).await,
        Err(TicketError::Unauthorized)
    );
    assert_eq!(
        desk.lifecycle().get(opened.id).map(|t| t.status),
        Some(TicketStatus::PendingClose)
    );

    let closed = desk.confirm_close(&gateway, opened.id, opened.channel.id, STAFF).await.unwrap();
    assert_eq!(closed.ticket.status, TicketStatus::Closed);
    let report = desk.finish_close(&gateway, closed).await;

    assert!(report.channel_destroyed);
    let path = report.transcript.expect("transcript stored");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("creator (10): my script does not load"));
    assert!(contents.contains("staff (20): fixed, please restart"));

    assert_eq!(
        gateway.effects(),
        vec![
            Effect::Created(CREATOR),
            Effect::Captured("ticket-user10".to_string()),
            Effect::Destroyed("ticket-user10".to_string()),
        ]
    );
    assert!(desk.lifecycle().get(opened.id).is_none());
    assert_eq!(
        desk.claim(&gateway, opened.id, opened.channel.id, STAFF).await,
        Err(TicketError::UnknownTicket(opened.id))
    );
}

#[tokio::test]
async fn test_cancelled_close_returns_to_claimed() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = RecordingGateway::with_staff(&[STAFF]);
    let desk = TicketDesk::new(Arc::new(FileTranscriptStore::new(dir.path())));

    let opened = desk.open(&gateway, CREATOR).await.unwrap();
    desk.claim(&gateway, opened.id, opened.channel.id, STAFF).await.unwrap();
    desk.request_close(&gateway, opened.id, opened.channel.id, STAFF).await.unwrap();
    let restored = desk.cancel_close(opened.id, opened.channel.id).unwrap();

    assert_eq!(restored.status, TicketStatus::Claimed);
    assert_eq!(restored.claimant_id, Some(STAFF));
    assert_eq!(restored.close_requested_by, None);
    assert_eq!(gateway.effects(), vec![Effect::Created(CREATOR)]);
}

#[tokio::test]
async fn test_buttons_from_before_restart_do_not_reach_new_tickets() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = RecordingGateway::with_staff(&[STAFF]);

    let before = TicketDesk::new(Arc::new(FileTranscriptStore::new(dir.path())));
    let old = before.open(&gateway, CREATOR).await.unwrap();
    drop(before);

    let after = TicketDesk::new(Arc::new(FileTranscriptStore::new(dir.path())));
    let new = after.open(&gateway, OUTSIDER).await.unwrap();
    assert_eq!(old.id, new.id);
    assert_ne!(old.channel.id, new.channel.id);

    // Close then confirm pressed on the buttons left in the old channel
    assert_eq!(
        after.request_close(&gateway, old.id, old.channel.id, STAFF).await,
        Err(TicketError::UnknownTicket(old.id))
    );
    assert_eq!(
        after.confirm_close(&gateway, old.id, old.channel.id, STAFF).await,
        Err(TicketError::UnknownTicket(old.id))
    );

    let untouched = after.lifecycle().get(new.id).unwrap();
    assert_eq!(untouched.status, TicketStatus::Open);
    assert_eq!(untouched.creator_id, OUTSIDER);
    assert_eq!(
        gateway.effects(),
        vec![Effect::Created(CREATOR), Effect::Created(OUTSIDER)]
    );
}

#[tokio::test]
async fn test_spam_burst_then_quiet_user() {
    let gateway = RecordingGateway::default();
    let moderator = Moderator::new(RateLimitPolicy::default());
    let start = mock_timestamp(2025, 3, 1, 12, 0, 0);
    let channel = ChannelId(1);

    let mut verdicts = Vec::new();
    for i in 0..7 {
        let message = IncomingMessage {
            author: CREATOR,
            channel,
            content: "hallo",
            at: start + TimeDelta::seconds(i),
        };
        verdicts.push(moderator.handle_message(&gateway, &message).await);
    }

    assert!(verdicts[..6].iter().all(|v| *v == Verdict::Allow));
    assert_eq!(
        verdicts[6],
        Verdict::RestrictForSpam {
            duration: Duration::from_secs(60)
        }
    );
    assert_eq!(moderator.limiter().tracked_messages(CREATOR), 0);

    let later = IncomingMessage {
        author: CREATOR,
        channel,
        content: "sorry",
        at: start + TimeDelta::seconds(30),
    };
    assert_eq!(moderator.handle_message(&gateway, &later).await, Verdict::Allow);
    assert_eq!(
        gateway.effects(),
        vec![Effect::Restricted(
            CREATOR,
            Duration::from_secs(60),
            "Automated spam timeout".to_string()
        )]
    );
}

#[tokio::test]
async fn test_staff_links_are_never_restricted() {
    let gateway = RecordingGateway::with_staff(&[STAFF]);
    let moderator = Moderator::default();
    let message = IncomingMessage {
        author: STAFF,
        channel: ChannelId(1),
        content: "docs: https://example.com/guide",
        at: mock_timestamp(2025, 3, 1, 12, 0, 0),
    };

    assert_eq!(moderator.handle_message(&gateway, &message).await, Verdict::Allow);
    assert!(gateway.effects().is_empty());
}
