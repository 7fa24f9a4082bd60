use thiserror::Error;

use crate::catalog::CatalogError;
use crate::options::OptionKind;

/// Broad failure classes, for callers that branch on the kind of mistake
/// rather than the exact variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The translator was configured with invalid values.
    Configuration,
    /// An operation was called in the wrong lifecycle state.
    Usage,
    /// Neither the active nor the fallback vocabulary had a match.
    TranslationMissing,
    /// A vocabulary file could not be loaded.
    Catalog,
}

#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("translator has already been initialized")]
    AlreadyInitialized,

    #[error("translator not initialized; call `initialize` first")]
    NotInitialized,

    #[error("unknown option `{0}` (expected one of: fallbackLanguage, caseSensitive, autoCapitalize, logs)")]
    UnknownOption(String),

    #[error("option `{key}` only accepts a {expected} value")]
    OptionType { key: OptionKind, expected: &'static str },

    #[error("fallback language `{0}` is not available in the vocabularies collection")]
    FallbackUnavailable(String),

    #[error("`{input}` has no translation in `{fallback}`, which is configured as the fallback vocabulary")]
    TranslationMissing { input: String, fallback: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl TranslatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyInitialized
            | Self::UnknownOption(_)
            | Self::OptionType { .. }
            | Self::FallbackUnavailable(_) => ErrorKind::Configuration,
            Self::NotInitialized => ErrorKind::Usage,
            Self::TranslationMissing { .. } => ErrorKind::TranslationMissing,
            Self::Catalog(_) => ErrorKind::Catalog,
        }
    }
}
