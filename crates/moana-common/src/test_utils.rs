//! Test utilities and shared test helpers for Moana Bot.
//!
//! Fixtures and helper functions shared by the unit and integration tests of
//! every crate in the workspace.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a fixed timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Discord-related test utilities.
pub mod discord_fixtures {
    use crate::{ChannelId, UserId};

    /// Create a test channel ID.
    pub fn test_channel_id() -> ChannelId {
        ChannelId(123_456_789_012_345_678)
    }

    /// Create a test user ID.
    pub fn test_user_id() -> UserId {
        UserId(987_654_321_098_765_432)
    }

    /// Create multiple test user IDs.
    pub fn test_user_ids(count: usize) -> Vec<UserId> {
        (0..count)
            .map(|i| UserId(100_000_000_000_000_000 + i as u64))
            .collect()
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// Create a minimal valid test configuration as YAML string.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
discord:
  token: "test_token"
  guild_id: 1442599860128976948
"#
    }

    /// Create a full test configuration as YAML string.
    pub fn full_config_yaml() -> &'static str {
        concat!(
            "discord:\n",
            "  token: \"test_token_full\"\n",
            "  guild_id: 1442599860128976948\n",
            "  welcome_channel_id: 1446155435819143382\n",
            "  ticket_category_id: 1446530882721808552\n",
            "  staff_role_id: 1446217175923953704\n",
            "  log_channel_id: 1446227079824932975\n",
            "\n",
            "moderation:\n",
            "  spam_limit: 4\n",
            "  spam_window_seconds: 10\n",
            "  spam_timeout_seconds: 120\n",
            "  link_timeout_minutes: 15\n",
            "  sweep_interval_seconds: 60\n",
            "\n",
            "tickets:\n",
            "  transcript_dir: \"archive/transcripts\"\n",
            "  history_limit: 500\n",
            "  channel_prefix: \"support-\"\n",
            "\n",
            "branding:\n",
            "  color: 16711680\n",
            "  footer: \"Test Footer\"\n",
            "\n",
            "logging:\n",
            "  level: \"debug\"\n",
            "  json: true\n",
            "  directory: \"var/log\"\n",
            "  file_name: \"moana.log\"\n",
            "\n",
            "language: \"en-US\"\n"
        )
    }
}
