//! Modal forms posting embeds: custom embeds, reviews and suggestions.

use crate::embeds::branded;
use crate::framework::{ApplicationContext, Error};
use moana_config::BrandingConfig;
use moana_i18n::Messages;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use poise::Modal;
use tracing::info;

/// Fields of a custom embed.
#[derive(Debug, Clone, Default, Modal)]
#[name = "Maak een Embed"]
pub struct EmbedForm {
    /// Author line.
    #[name = "Author naam (opt)"]
    #[max_length = 100]
    pub author: Option<String>,
    /// Embed title.
    #[name = "Titel"]
    #[max_length = 256]
    pub title: String,
    /// Embed body.
    #[name = "Beschrijving"]
    #[paragraph]
    #[max_length = 4000]
    pub description: String,
    /// Image URL.
    #[name = "Afbeelding URL (opt)"]
    #[max_length = 1000]
    pub image: Option<String>,
}

/// A product review.
#[derive(Debug, Clone, Default, Modal)]
#[name = "Laat een review achter"]
pub struct ReviewForm {
    /// Reviewed product.
    #[name = "Welk product?"]
    pub product: String,
    /// Product rating.
    #[name = "Aantal sterren (1-5)"]
    #[max_length = 2]
    pub stars: String,
    /// Service rating.
    #[name = "Service sterren (1-5)"]
    #[max_length = 2]
    pub service: String,
    /// Free text.
    #[name = "Review bericht"]
    #[paragraph]
    pub message: Option<String>,
}

/// A suggestion for the server.
#[derive(Debug, Clone, Default, Modal)]
#[name = "Nieuwe suggestie"]
pub struct SuggestionForm {
    /// Name of the suggester.
    #[name = "Naam"]
    pub name: String,
    /// Free-form time.
    #[name = "Tijd"]
    pub time: Option<String>,
    /// Free-form date.
    #[name = "Datum"]
    pub date: Option<String>,
    /// The suggestion.
    #[name = "Suggestie"]
    #[paragraph]
    pub suggestion: String,
    /// Additional information.
    #[name = "Extra"]
    #[paragraph]
    pub extra: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Embed built from an [`EmbedForm`].
pub fn custom_embed(branding: &BrandingConfig, form: &EmbedForm) -> serenity::CreateEmbed {
    let mut embed = branded(branding)
        .title(&form.title)
        .description(&form.description);
    if let Some(author) = non_empty(form.author.as_ref()) {
        embed = embed.author(serenity::CreateEmbedAuthor::new(author));
    }
    if let Some(image) = non_empty(form.image.as_ref()) {
        embed = embed.image(image);
    }
    embed
}

/// Embed announcing a review by `reviewer`.
pub fn review_embed(
    branding: &BrandingConfig,
    messages: &Messages,
    form: &ReviewForm,
    reviewer: &str,
) -> serenity::CreateEmbed {
    let comment = non_empty(form.message.as_ref())
        .map_or_else(|| messages.get("review-no-comment"), str::to_string);
    branded(branding)
        .title(messages.get("review-title"))
        .field(messages.get("review-field-product"), &form.product, false)
        .field(messages.get("review-field-stars"), &form.stars, true)
        .field(messages.get("review-field-service"), &form.service, true)
        .field(messages.get("review-field-reviewer"), reviewer, false)
        .field(messages.get("review-field-comment"), comment, false)
}

/// Embed presenting a suggestion.
pub fn suggestion_embed(
    branding: &BrandingConfig,
    messages: &Messages,
    form: &SuggestionForm,
) -> serenity::CreateEmbed {
    let or_unknown = |value: Option<&String>| {
        non_empty(value).map_or_else(|| messages.get("value-unknown"), str::to_string)
    };
    let extra = non_empty(form.extra.as_ref())
        .map_or_else(|| messages.get("suggestion-no-extra"), str::to_string);
    branded(branding)
        .title(messages.get("suggestion-title"))
        .field(messages.get("suggestion-field-name"), &form.name, true)
        .field(messages.get("suggestion-field-time"), or_unknown(form.time.as_ref()), true)
        .field(messages.get("suggestion-field-date"), or_unknown(form.date.as_ref()), true)
        .field(messages.get("suggestion-field-suggestion"), &form.suggestion, false)
        .field(messages.get("suggestion-field-extra"), extra, false)
}

/// Maak een custom embed.
#[poise::command(slash_command, guild_only)]
pub async fn embed(ctx: ApplicationContext<'_>) -> Result<(), Error> {
    let Some(form) = EmbedForm::execute(ctx).await? else {
        return Ok(());
    };
    let ctx = poise::Context::Application(ctx);
    let embed = custom_embed(&ctx.data().config.branding, &form);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Laat een review achter.
#[poise::command(slash_command, guild_only)]
pub async fn review(ctx: ApplicationContext<'_>) -> Result<(), Error> {
    let Some(form) = ReviewForm::execute(ctx).await? else {
        return Ok(());
    };
    let ctx = poise::Context::Application(ctx);
    let data = ctx.data();
    let reviewer = ctx.author().mention().to_string();
    let embed = review_embed(&data.config.branding, &data.messages, &form, &reviewer);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    info!("Review by {}", ctx.author().tag());
    Ok(())
}

/// Nieuwe suggestie.
#[poise::command(slash_command, guild_only)]
pub async fn suggesties(ctx: ApplicationContext<'_>) -> Result<(), Error> {
    let Some(form) = SuggestionForm::execute(ctx).await? else {
        return Ok(());
    };
    let ctx = poise::Context::Application(ctx);
    let data = ctx.data();
    let embed = suggestion_embed(&data.config.branding, &data.messages, &form);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    info!("Suggestion by {}", ctx.author().tag());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branding() -> BrandingConfig {
        BrandingConfig {
            color: 0x3498db,
            footer: "Moana Scripts - 2025".to_string(),
        }
    }

    fn messages() -> Messages {
        Messages::new("nl-NL").unwrap()
    }

    #[test]
    fn test_custom_embed_skips_blank_optional_fields() {
        let form = EmbedForm {
            author: Some("  ".to_string()),
            title: "Update".to_string(),
            description: "Nieuwe scripts".to_string(),
            image: None,
        };
        let value = serde_json::to_value(custom_embed(&branding(), &form)).unwrap();
        assert_eq!(value["title"], "Update");
        assert!(value.get("author").map_or(true, serde_json::Value::is_null));
        assert!(value.get("image").map_or(true, serde_json::Value::is_null));
    }

    #[test]
    fn test_custom_embed_with_author_and_image() {
        let form = EmbedForm {
            author: Some("Moana".to_string()),
            title: "Update".to_string(),
            description: "Nieuwe scripts".to_string(),
            image: Some("https://example.com/banner.png".to_string()),
        };
        let value = serde_json::to_value(custom_embed(&branding(), &form)).unwrap();
        assert_eq!(value["author"]["name"], "Moana");
        assert_eq!(value["image"]["url"], "https://example.com/banner.png");
    }

    #[test]
    fn test_review_without_comment_uses_placeholder() {
        let form = ReviewForm {
            product: "Garage script".to_string(),
            stars: "5".to_string(),
            service: "4".to_string(),
            message: None,
        };
        let value = serde_json::to_value(review_embed(&branding(), &messages(), &form, "<@1>")).unwrap();
        let fields = value["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0]["value"], "Garage script");
        assert_eq!(fields[1]["inline"], true);
        assert_eq!(fields[3]["value"], "<@1>");
        assert_eq!(fields[4]["value"], "Geen extra opmerking.");
    }

    #[test]
    fn test_suggestion_fills_unknown_values() {
        let form = SuggestionForm {
            name: "Moana".to_string(),
            time: None,
            date: Some(String::new()),
            suggestion: "Meer kleuren".to_string(),
            extra: None,
        };
        let value = serde_json::to_value(suggestion_embed(&branding(), &messages(), &form)).unwrap();
        let fields = value["fields"].as_array().unwrap();
        assert_eq!(fields[1]["value"], "Onbekend");
        assert_eq!(fields[2]["value"], "Onbekend");
        assert_eq!(fields[4]["value"], "Geen extra info");
    }
}
