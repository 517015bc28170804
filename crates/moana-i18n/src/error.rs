//! Error types for catalog loading.

use thiserror::Error;

/// Errors raised while building message bundles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// The language tag could not be parsed.
    #[error("invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// No catalog is embedded for the language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A catalog failed to parse or to load into its bundle.
    #[error("failed to load catalog {locale}: {errors:?}")]
    CatalogLoad {
        /// Locale of the catalog.
        locale: String,
        /// Parser or bundle errors.
        errors: Vec<String>,
    },
}

/// Result type for i18n operations.
pub type I18nResult<T> = Result<T, I18nError>;
