//! Periodic eviction of stale rate limiter state.

use moana_core::Moderator;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawns a task sweeping the moderator's rate limiter every `interval` (at least one second).
pub fn spawn_sweeper(moderator: Arc<Moderator>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            moderator.limiter().sweep(chrono::Utc::now());
        }
    })
}
