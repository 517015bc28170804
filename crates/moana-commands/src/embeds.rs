//! Branded embed construction.

use moana_config::BrandingConfig;
use poise::serenity_prelude as serenity;

/// An embed in the server colour with the standard footer.
pub fn branded(branding: &BrandingConfig) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .colour(branding.color)
        .footer(serenity::CreateEmbedFooter::new(&branding.footer))
}

/// Branded embed with a title and description.
pub fn notice(branding: &BrandingConfig, title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    branded(branding).title(title).description(description)
}
