//! Configuration loading from YAML with environment overrides.

use crate::schema::Config;
use moana_common::{GuildId, MoanaError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "MOANA_CONFIG";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration loader reading a YAML file.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a loader for `$MOANA_CONFIG`, or `config.yaml` when unset.
    pub fn from_env() -> Self {
        Self::new(std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()))
    }

    /// Path this loader reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file and applies process environment overrides.
    ///
    /// A missing file yields the defaults so a token supplied through the
    /// environment is enough to start the bot.
    pub async fn load(&self) -> Result<Config, MoanaError> {
        let config = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                info!("Loading configuration from {}", self.path.display());
                parse_yaml(&raw)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Configuration file {} not found, using defaults",
                    self.path.display()
                );
                Config::default()
            }
            Err(e) => return Err(e.into()),
        };

        apply_env_overrides(config, |key| std::env::var(key).ok())
    }
}

/// Parses a YAML document; missing sections fall back to their defaults.
pub fn parse_yaml(raw: &str) -> Result<Config, MoanaError> {
    serde_yaml::from_str(raw).map_err(|e| MoanaError::Serialization(e.to_string()))
}

/// Applies `DISCORD_TOKEN` (or the legacy `TOKEN`) and `GUILD_ID` overrides.
pub fn apply_env_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config, MoanaError> {
    if let Some(token) = lookup("DISCORD_TOKEN").or_else(|| lookup("TOKEN")) {
        debug!("Discord token taken from environment");
        config.discord.token = token;
    }

    if let Some(raw) = lookup("GUILD_ID") {
        let id = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| MoanaError::Config(format!("GUILD_ID '{raw}' is not a valid ID: {e}")))?;
        config.discord.guild_id = GuildId(id);
    }

    Ok(config)
}
