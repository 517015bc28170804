//! Message lookup with locale fallback.

use crate::error::I18nResult;
use crate::loader::{load_bundle, Bundle, FALLBACK_LOCALE};
use fluent_bundle::FluentArgs;
use std::fmt;
use tracing::warn;

/// Formatted messages for one configured locale.
///
/// Lookups try the configured locale, then [`FALLBACK_LOCALE`], and finally
/// return the key itself so a missing message never aborts a reply.
pub struct Messages {
    locale: String,
    primary: Bundle,
    fallback: Option<Bundle>,
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &self.locale)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl Messages {
    /// Loads the catalog for `locale` plus the fallback catalog.
    pub fn new(locale: &str) -> I18nResult<Self> {
        let primary = load_bundle(locale)?;
        let fallback = if locale.eq_ignore_ascii_case(FALLBACK_LOCALE) {
            None
        } else {
            Some(load_bundle(FALLBACK_LOCALE)?)
        };

        Ok(Self {
            locale: locale.to_string(),
            primary,
            fallback,
        })
    }

    /// Configured locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Formats a message without variables.
    pub fn get(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Formats a message with string variables.
    pub fn get_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, *value);
        }
        self.format(key, Some(&fluent_args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(text) = format_in(&self.primary, key, args) {
            return text;
        }
        if let Some(text) = self
            .fallback
            .as_ref()
            .and_then(|bundle| format_in(bundle, key, args))
        {
            return text;
        }
        warn!("Missing message '{}' for locale {}", key, self.locale);
        key.to_string()
    }
}

fn format_in(bundle: &Bundle, key: &str, args: Option<&FluentArgs>) -> Option<String> {
    let pattern = bundle.get_message(key)?.value()?;
    let mut errors = Vec::new();
    let text = bundle.format_pattern(pattern, args, &mut errors);
    if !errors.is_empty() {
        warn!("Formatting '{}' reported {:?}", key, errors);
    }
    Some(text.into_owned())
}
