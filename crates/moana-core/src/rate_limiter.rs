//! Sliding-window spam detection and link policy.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use moana_common::UserId;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// Thresholds that decide when a member is restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Messages tolerated inside one window; one more triggers a spam restriction.
    pub spam_limit: usize,
    /// Length of the sliding window.
    pub spam_window: Duration,
    /// Restriction applied for spam.
    pub spam_timeout: Duration,
    /// Restriction applied for posting a link.
    pub link_timeout: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            spam_limit: 6,
            spam_window: Duration::from_secs(8),
            spam_timeout: Duration::from_secs(60),
            link_timeout: Duration::from_secs(5 * 60),
        }
    }
}

/// Outcome of observing a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing to do.
    Allow,
    /// The message contained a link and the author is not staff.
    RestrictForLink {
        /// How long the author must be restricted.
        duration: Duration,
    },
    /// The author exceeded the spam limit inside the window.
    RestrictForSpam {
        /// How long the author must be restricted.
        duration: Duration,
    },
}

impl Verdict {
    /// Restriction length, if the verdict demands one.
    pub const fn restriction(&self) -> Option<Duration> {
        match self {
            Self::Allow => None,
            Self::RestrictForLink { duration } | Self::RestrictForSpam { duration } => Some(*duration),
        }
    }

    /// Audit log reason passed to the platform with the restriction.
    pub const fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RestrictForLink { .. } => Some("Posting links restricted"),
            Self::RestrictForSpam { .. } => Some("Automated spam timeout"),
        }
    }

    /// Whether the author has to be restricted.
    pub const fn is_restricted(&self) -> bool {
        !matches!(self, Self::Allow)
    }
}

/// Per-user message rate tracker.
///
/// State is sharded by user: the append, prune and reset for one user happen
/// under that user's map entry lock, and different users never contend.
#[derive(Debug)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    window: TimeDelta,
    timestamps: DashMap<UserId, VecDeque<DateTime<Utc>>>,
}

impl RateLimiter {
    /// Creates an empty limiter with the given policy.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            window: TimeDelta::from_std(policy.spam_window).unwrap_or(TimeDelta::MAX),
            timestamps: DashMap::new(),
        }
    }

    /// The active policy.
    pub const fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Records a message and decides whether its author must be restricted.
    ///
    /// A link from a non-staff author is restricted immediately and is not
    /// counted towards the spam window. Staff are tracked like everyone else
    /// but never restricted.
    pub fn observe_message(
        &self,
        user: UserId,
        at: DateTime<Utc>,
        contains_link: bool,
        is_staff: bool,
    ) -> Verdict {
        if contains_link && !is_staff {
            debug!("Link posted by non-staff user {}", user);
            return Verdict::RestrictForLink {
                duration: self.policy.link_timeout,
            };
        }

        let mut entry = self.timestamps.entry(user).or_default();
        let sequence = entry.value_mut();
        // Kept sorted so a late observation cannot strand older entries
        let position = sequence.partition_point(|seen| *seen <= at);
        sequence.insert(position, at);
        if let Some(&newest) = sequence.back() {
            sequence.retain(|seen| newest - *seen < self.window);
        }

        if sequence.len() > self.policy.spam_limit && !is_staff {
            debug!(
                "User {} sent {} messages inside the spam window",
                user,
                sequence.len()
            );
            sequence.clear();
            return Verdict::RestrictForSpam {
                duration: self.policy.spam_timeout,
            };
        }

        Verdict::Allow
    }

    /// Whether observing this message could restrict a non-staff author.
    ///
    /// Does not record anything. Lets callers skip resolving staff status for
    /// messages that cannot trigger a restriction.
    pub fn would_restrict(&self, user: UserId, at: DateTime<Utc>, contains_link: bool) -> bool {
        if contains_link {
            return true;
        }
        let counted = self.timestamps.get(&user).map_or(1, |sequence| {
            let newest = sequence.back().map_or(at, |last| (*last).max(at));
            let in_window = |seen: &DateTime<Utc>| newest - *seen < self.window;
            sequence.iter().filter(|seen| in_window(*seen)).count() + usize::from(in_window(&at))
        });
        counted > self.policy.spam_limit
    }

    /// Number of messages currently counted for a user.
    pub fn tracked_messages(&self, user: UserId) -> usize {
        self.timestamps.get(&user).map_or(0, |sequence| sequence.len())
    }

    /// Number of users with tracking state.
    pub fn tracked_users(&self) -> usize {
        self.timestamps.len()
    }

    /// Drops all tracking state for a user.
    pub fn forget(&self, user: UserId) {
        self.timestamps.remove(&user);
    }

    /// Drops users whose newest message has left the window; returns how many were dropped.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.timestamps.len();
        self.timestamps
            .retain(|_, sequence| sequence.back().is_some_and(|newest| now - *newest < self.window));
        let removed = before.saturating_sub(self.timestamps.len());
        if removed > 0 {
            debug!("Swept {} idle spam trackers", removed);
        }
        removed
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}
