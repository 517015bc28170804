//! Default values mirroring the original server setup.

use crate::schema::{
    BrandingConfig, Config, DiscordConfig, LogConfig, ModerationConfig, TicketsConfig,
};
use moana_common::GuildId;
use std::path::PathBuf;

/// Default embed color.
pub const DEFAULT_COLOR: u32 = 0x0034_98db;

/// Default embed footer.
pub const DEFAULT_FOOTER: &str = "Moana Scripts - 2025";

impl Default for Config {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            moderation: ModerationConfig::default(),
            tickets: TicketsConfig::default(),
            branding: BrandingConfig::default(),
            logging: LogConfig::default(),
            language: "nl-NL".to_string(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            guild_id: GuildId(0),
            welcome_channel_id: None,
            ticket_category_id: None,
            staff_role_id: None,
            log_channel_id: None,
        }
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            spam_limit: 6,
            spam_window_seconds: 8,
            spam_timeout_seconds: 60,
            link_timeout_minutes: 5,
            sweep_interval_seconds: 300,
        }
    }
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            transcript_dir: PathBuf::from("transcripts"),
            history_limit: 2000,
            channel_prefix: "ticket-".to_string(),
        }
    }
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            footer: DEFAULT_FOOTER.to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "moana_bot=info,moana_commands=info,moana_core=info".to_string(),
            json: false,
            directory: Some(PathBuf::from("logs")),
            file_name: "bot.log".to_string(),
        }
    }
}
