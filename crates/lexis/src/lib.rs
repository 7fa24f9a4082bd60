//! Lexis: translate literal source strings.
//!
//! Strings written in code are their own lookup keys. A [`Translator`] holds
//! a collection of [`Vocabulary`] values keyed by language tag, an active
//! language, and a few [`Options`]:
//! - exact or case-insensitive key matching
//! - a fallback vocabulary (or `"bypass"` to return the source string)
//! - first-letter capitalization of every output
//! - advisories through a pluggable [`DiagnosticSink`]
//!
//! ```
//! use lexis::{Translator, VocabulariesCollection, Vocabulary};
//!
//! let mut collection = VocabulariesCollection::new();
//! collection.insert(
//!     "it".into(),
//!     Vocabulary::new("Italiano", "it-IT").pair("leave a comment", "lascia un commento"),
//! );
//!
//! let mut tr = Translator::new();
//! tr.initialize("it", Some(collection), None)?;
//!
//! assert_eq!(tr.t("leave a comment")?, "lascia un commento");
//! assert_eq!(tr.translate("leave a comment", Some(true))?, "Lascia un commento");
//! assert_eq!(tr.t(42)?, "42");
//! # Ok::<(), lexis::TranslatorError>(())
//! ```
//!
//! Hosts that need a process-wide translator can use [`global`] and the
//! [`t!`] macro instead.

mod diagnostics;
mod error;
mod locale;
mod options;
mod resolve;
mod translator;
mod vocabulary;

pub mod catalog;
pub mod global;

pub use catalog::{CatalogError, Format};
pub use diagnostics::{DiagnosticSink, Level, MemorySink, NullSink, TracingSink};
pub use error::{ErrorKind, TranslatorError};
pub use locale::{
    locale_candidates, match_collection, normalize_locale, EnvLocale, FixedLocale, LocaleProvider,
};
pub use options::{Language, OptionKind, OptionValue, Options, OptionsPatch, BYPASS};
pub use resolve::{set_first_case, Source};
pub use translator::Translator;
pub use vocabulary::{Pairs, VocabulariesCollection, Vocabulary};

/// Translate through the [`global`] translator.
///
/// - `t!("leave a comment")`
/// - `t!("leave a comment", capitalize = true)`
#[macro_export]
macro_rules! t {
    ($input:expr) => {
        $crate::global::translate($input, None)
    };
    ($input:expr, capitalize = $cap:expr) => {
        $crate::global::translate($input, Some($cap))
    };
}
