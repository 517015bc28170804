//! Applies rate limiter verdicts to incoming messages.

use crate::gateway::PlatformGateway;
use crate::rate_limiter::{RateLimitPolicy, RateLimiter, Verdict};
use chrono::{DateTime, Utc};
use moana_common::{ChannelId, UserId};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+").expect("link pattern is valid"));

/// Whether the text contains an http or https URL.
pub fn contains_link(text: &str) -> bool {
    LINK_PATTERN.is_match(text)
}

/// A guild message as seen by the moderation pipeline.
#[derive(Debug, Clone, Copy)]
pub struct IncomingMessage<'a> {
    /// Author ID.
    pub author: UserId,
    /// Channel the message was posted in.
    pub channel: ChannelId,
    /// Message text.
    pub content: &'a str,
    /// When the message was posted.
    pub at: DateTime<Utc>,
}

/// Link and spam moderation.
#[derive(Debug, Default)]
pub struct Moderator {
    limiter: RateLimiter,
}

impl Moderator {
    /// Creates a moderator with its own rate limiter.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            limiter: RateLimiter::new(policy),
        }
    }

    /// The underlying rate limiter.
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Judges a message and, when required, restricts its author.
    ///
    /// The verdict is returned even if the platform refuses the restriction;
    /// that failure is only logged.
    pub async fn handle_message(
        &self,
        gateway: &dyn PlatformGateway,
        message: &IncomingMessage<'_>,
    ) -> Verdict {
        let link = contains_link(message.content);
        // Staff status only matters once a rule could fire. A message that
        // cannot be restricted is observed as exempt; the next one re-checks.
        let exempt = if self.limiter.would_restrict(message.author, message.at, link) {
            gateway.has_staff_capability(message.author).await
        } else {
            true
        };
        let verdict = self
            .limiter
            .observe_message(message.author, message.at, link, exempt);

        if let (Some(duration), Some(reason)) = (verdict.restriction(), verdict.reason()) {
            match gateway
                .apply_timed_restriction(message.author, duration, reason)
                .await
            {
                Ok(()) => info!(
                    "Timed out {} for {}s in channel {}: {}",
                    message.author,
                    duration.as_secs(),
                    message.channel,
                    reason
                ),
                Err(e) => warn!("Failed to time out {}: {}", message.author, e),
            }
        }

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, MockPlatformGateway};
    use moana_common::test_utils::{discord_fixtures, mock_timestamp};
    use std::time::Duration;

    fn message(content: &str) -> IncomingMessage<'_> {
        IncomingMessage {
            author: discord_fixtures::test_user_id(),
            channel: discord_fixtures::test_channel_id(),
            content,
            at: mock_timestamp(2025, 1, 1, 12, 0, 0),
        }
    }

    #[test]
    fn test_contains_link() {
        assert!(contains_link("check https://example.com now"));
        assert!(contains_link("HTTP://SHOUTING.example"));
        assert!(!contains_link("see example.com"));
        assert!(!contains_link("https://"));
    }

    #[tokio::test]
    async fn test_link_from_member_is_timed_out() {
        let mut gateway = MockPlatformGateway::new();
        gateway.expect_has_staff_capability().returning(|_| false);
        gateway
            .expect_apply_timed_restriction()
            .withf(|user, duration, reason| {
                *user == discord_fixtures::test_user_id()
                    && *duration == Duration::from_secs(300)
                    && reason == "Posting links restricted"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let moderator = Moderator::default();
        let verdict = moderator
            .handle_message(&gateway, &message("https://discord.gg/invite"))
            .await;
        assert!(matches!(verdict, Verdict::RestrictForLink { .. }));
    }

    #[tokio::test]
    async fn test_staff_link_is_allowed() {
        let mut gateway = MockPlatformGateway::new();
        gateway.expect_has_staff_capability().returning(|_| true);
        gateway.expect_apply_timed_restriction().never();

        let moderator = Moderator::default();
        let verdict = moderator
            .handle_message(&gateway, &message("https://example.com"))
            .await;
        assert_eq!(verdict, Verdict::Allow);
    }

    #[tokio::test]
    async fn test_staff_lookup_only_when_a_rule_could_fire() {
        let mut gateway = MockPlatformGateway::new();
        gateway.expect_has_staff_capability().times(1).returning(|_| false);
        gateway
            .expect_apply_timed_restriction()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let moderator = Moderator::default();
        let base = mock_timestamp(2025, 1, 1, 12, 0, 0);
        for i in 0..7 {
            let incoming = IncomingMessage {
                at: base + chrono::TimeDelta::seconds(i),
                ..message("hallo")
            };
            let verdict = moderator.handle_message(&gateway, &incoming).await;
            assert_eq!(verdict.is_restricted(), i == 6);
        }
    }

    #[tokio::test]
    async fn test_failed_restriction_still_reports_verdict() {
        let mut gateway = MockPlatformGateway::new();
        gateway.expect_has_staff_capability().returning(|_| false);
        gateway
            .expect_apply_timed_restriction()
            .times(1)
            .returning(|_, _, _| Err(GatewayError::Platform("missing permissions".to_string())));

        let moderator = Moderator::new(RateLimitPolicy {
            spam_limit: 1,
            ..RateLimitPolicy::default()
        });
        assert_eq!(moderator.handle_message(&gateway, &message("hi")).await, Verdict::Allow);
        let verdict = moderator.handle_message(&gateway, &message("hi")).await;
        assert!(matches!(verdict, Verdict::RestrictForSpam { .. }));
        assert_eq!(moderator.limiter().tracked_messages(discord_fixtures::test_user_id()), 0);
    }
}
