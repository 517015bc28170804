//! Embedded catalogs and bundle construction.

use crate::error::{I18nError, I18nResult};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentResource;
use tracing::debug;
use unic_langid::LanguageIdentifier;

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "nl-NL";

/// Locale consulted when a message is missing from the selected one.
pub const FALLBACK_LOCALE: &str = "en-US";

const CATALOGS: &[(&str, &str)] = &[
    ("nl-NL", include_str!("../locales/nl-NL/bot.ftl")),
    ("en-US", include_str!("../locales/en-US/bot.ftl")),
];

/// A thread-safe bundle holding one locale's catalog.
pub type Bundle = FluentBundle<FluentResource>;

/// Locales with an embedded catalog.
pub fn available_locales() -> impl Iterator<Item = &'static str> {
    CATALOGS.iter().map(|(locale, _)| *locale)
}

/// Whether a catalog is embedded for `locale`.
pub fn is_supported(locale: &str) -> bool {
    available_locales().any(|candidate| candidate.eq_ignore_ascii_case(locale))
}

/// Builds the bundle for `locale`.
pub fn load_bundle(locale: &str) -> I18nResult<Bundle> {
    let (name, source) = CATALOGS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(locale))
        .ok_or_else(|| I18nError::UnsupportedLanguage(locale.to_string()))?;

    let language: LanguageIdentifier = name
        .parse()
        .map_err(|_| I18nError::InvalidLanguageId((*name).to_string()))?;

    let resource = FluentResource::try_new((*source).to_string()).map_err(|(_, errors)| {
        I18nError::CatalogLoad {
            locale: (*name).to_string(),
            errors: errors.iter().map(|e| format!("{e:?}")).collect(),
        }
    })?;

    let mut bundle = FluentBundle::new_concurrent(vec![language]);
    bundle.set_use_isolating(false);
    bundle
        .add_resource(resource)
        .map_err(|errors| I18nError::CatalogLoad {
            locale: (*name).to_string(),
            errors: errors.iter().map(|e| format!("{e:?}")).collect(),
        })?;

    debug!("Loaded catalog for {}", name);
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_embedded_catalog_loads() {
        for locale in available_locales() {
            let bundle = load_bundle(locale).unwrap();
            assert!(bundle.has_message("ticket-claimed"), "{locale}");
        }
    }

    #[test]
    fn test_locale_lookup_ignores_case() {
        assert!(is_supported("nl-nl"));
        assert!(is_supported("EN-US"));
        assert!(!is_supported("fr-FR"));
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        assert_eq!(
            load_bundle("de-DE").err(),
            Some(I18nError::UnsupportedLanguage("de-DE".to_string()))
        );
    }
}
