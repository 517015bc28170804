//! Configuration schema definitions using serde.

use moana_common::{ChannelId, GuildId, LoggingOptions, MoanaError, RoleId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Moana Bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Automated moderation configuration.
    pub moderation: ModerationConfig,
    /// Support ticket configuration.
    pub tickets: TicketsConfig,
    /// Embed branding.
    pub branding: BrandingConfig,
    /// Logging configuration.
    pub logging: LogConfig,
    /// Language used for user-facing messages.
    pub language: String,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// The single guild the bot serves; commands are registered here.
    pub guild_id: GuildId,
    /// Channel receiving welcome messages.
    pub welcome_channel_id: Option<ChannelId>,
    /// Category under which ticket channels are created.
    pub ticket_category_id: Option<ChannelId>,
    /// Role granting staff capability.
    pub staff_role_id: Option<RoleId>,
    /// Channel for bot log messages.
    pub log_channel_id: Option<ChannelId>,
}

/// Link and spam moderation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Messages allowed inside the window before a spam timeout.
    pub spam_limit: usize,
    /// Length of the sliding spam window in seconds.
    pub spam_window_seconds: u64,
    /// Spam timeout in seconds.
    pub spam_timeout_seconds: u64,
    /// Timeout applied for posting a link, in minutes.
    pub link_timeout_minutes: u64,
    /// How often idle spam trackers are swept, in seconds.
    pub sweep_interval_seconds: u64,
}

/// Support ticket configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketsConfig {
    /// Directory where closed ticket transcripts are written.
    pub transcript_dir: PathBuf,
    /// Maximum number of messages captured in a transcript.
    pub history_limit: usize,
    /// Prefix of ticket channel names.
    pub channel_prefix: String,
}

/// Embed branding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Embed color as RGB integer.
    pub color: u32,
    /// Embed footer text.
    pub footer: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines on stdout.
    pub json: bool,
    /// Log file directory; unset disables file logging.
    pub directory: Option<PathBuf>,
    /// Log file name.
    pub file_name: String,
}

impl ModerationConfig {
    /// Spam window as a duration.
    pub const fn spam_window(&self) -> Duration {
        Duration::from_secs(self.spam_window_seconds)
    }

    /// Spam timeout as a duration.
    pub const fn spam_timeout(&self) -> Duration {
        Duration::from_secs(self.spam_timeout_seconds)
    }

    /// Link timeout as a duration.
    pub const fn link_timeout(&self) -> Duration {
        Duration::from_secs(self.link_timeout_minutes * 60)
    }

    /// Sweep interval as a duration.
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl LogConfig {
    /// Converts to the options understood by the logging initialiser.
    pub fn to_options(&self) -> LoggingOptions {
        LoggingOptions {
            level: self.level.clone(),
            json_format: self.json,
            directory: self.directory.clone(),
            file_name: self.file_name.clone(),
            include_targets: true,
        }
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), MoanaError> {
        if self.discord.token.is_empty() {
            return Err(MoanaError::Config(
                "Discord token cannot be empty".to_string(),
            ));
        }

        if self.discord.guild_id.0 == 0 {
            return Err(MoanaError::Config("Guild ID must be set".to_string()));
        }

        if self.moderation.spam_limit == 0 {
            return Err(MoanaError::Config(
                "spam_limit must be at least 1".to_string(),
            ));
        }

        if self.moderation.spam_window_seconds == 0 {
            return Err(MoanaError::Config(
                "spam_window_seconds must be at least 1".to_string(),
            ));
        }

        if self.tickets.history_limit == 0 {
            return Err(MoanaError::Config(
                "history_limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
