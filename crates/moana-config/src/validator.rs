//! Runtime validation with non-fatal warnings.

use crate::schema::Config;
use moana_common::MoanaError;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, failing on settings the bot cannot run without.
    pub fn validate(config: &Config) -> Result<(), MoanaError> {
        config.validate()
    }

    /// Lists settings that are valid but disable part of the bot.
    pub fn warnings(config: &Config) -> Vec<String> {
        let mut warnings = Vec::new();

        if config.discord.welcome_channel_id.is_none() {
            warnings.push("welcome_channel_id is not set; new members will not be greeted".to_string());
        }

        if config.discord.staff_role_id.is_none() {
            warnings.push(
                "staff_role_id is not set; only members with Manage Messages count as staff"
                    .to_string(),
            );
        }

        if config.discord.ticket_category_id.is_none() {
            warnings.push(
                "ticket_category_id is not set; ticket channels are created without a category"
                    .to_string(),
            );
        }

        if config.discord.log_channel_id.is_none() {
            warnings.push("log_channel_id is not set; /logtest has nowhere to post".to_string());
        }

        warnings
    }
}
