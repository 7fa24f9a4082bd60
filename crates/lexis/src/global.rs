//! Process-wide translator for hosts that want a global-looking API.
//!
//! Every call locks one mutex around a shared [`Translator`], so option and
//! vocabulary updates never interleave with a `translate` on another thread.
//! Prefer an owned [`Translator`] where the host can pass it around.

use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::diagnostics::DiagnosticSink;
use crate::locale::LocaleProvider;
use crate::options::{Language, OptionValue, OptionsPatch};
use crate::resolve::Source;
use crate::vocabulary::{VocabulariesCollection, Vocabulary};
use crate::{Translator, TranslatorError};

static TRANSLATOR: OnceLock<Mutex<Translator>> = OnceLock::new();

fn lock() -> MutexGuard<'static, Translator> {
    // Translator methods validate before writing, so a panic mid-call leaves
    // consistent state behind.
    TRANSLATOR
        .get_or_init(|| Mutex::new(Translator::new()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// Run `f` with exclusive access to the global translator.
pub fn with<R>(f: impl FnOnce(&mut Translator) -> R) -> R {
    f(&mut lock())
}

pub fn set_sink(sink: impl DiagnosticSink + 'static) {
    lock().set_sink(sink);
}

pub fn is_initialized() -> bool {
    lock().is_initialized()
}

pub fn initialize(
    language: impl Into<Language>,
    collection: Option<VocabulariesCollection>,
    options: Option<OptionsPatch>,
) -> Result<(), TranslatorError> {
    lock().initialize(language, collection, options)
}

pub fn set_language(language: impl Into<Language>) -> Result<(), TranslatorError> {
    lock().set_language(language)
}

pub fn add_vocabulary(key: impl Into<String>, vocabulary: Vocabulary) -> Result<(), TranslatorError> {
    lock().add_vocabulary(key, vocabulary)
}

pub fn remove_vocabulary(key: &str) -> Result<Option<Vocabulary>, TranslatorError> {
    lock().remove_vocabulary(key)
}

pub fn set_option(key: &str, value: impl Into<OptionValue>) -> Result<(), TranslatorError> {
    lock().set_option(key, value)
}

pub fn set_options(patch: &OptionsPatch) -> Result<(), TranslatorError> {
    lock().set_options(patch)
}

pub fn available_languages() -> Result<Vec<String>, TranslatorError> {
    Ok(lock()
        .available_languages()?
        .into_iter()
        .map(str::to_string)
        .collect())
}

pub fn get_dictionary(key: &str) -> Result<Option<Vocabulary>, TranslatorError> {
    Ok(lock().get_dictionary(key)?.cloned())
}

pub fn try_use_host_language<P>(provider: &P) -> Result<Option<String>, TranslatorError>
where
    P: LocaleProvider + ?Sized,
{
    lock().try_use_host_language(provider)
}

pub fn use_host_language<P>(provider: &P, force: bool) -> Result<Option<String>, TranslatorError>
where
    P: LocaleProvider + ?Sized,
{
    lock().use_host_language(provider, force)
}

pub fn translate<'a>(
    input: impl Into<Source<'a>>,
    capitalize: Option<bool>,
) -> Result<String, TranslatorError> {
    lock().translate(input, capitalize)
}
