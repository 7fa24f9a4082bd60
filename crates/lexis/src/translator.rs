use tracing::debug;

use crate::catalog::{self, Format};
use crate::diagnostics::{DiagnosticSink, Level, TracingSink};
use crate::locale::{locale_candidates, match_collection, LocaleProvider};
use crate::options::{Language, OptionKind, OptionValue, Options, OptionsPatch};
use crate::resolve::{self, Source};
use crate::vocabulary::{VocabulariesCollection, Vocabulary};
use crate::TranslatorError;

/// Everything `initialize` sets up.
#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) language: Language,
    pub(crate) collection: Option<VocabulariesCollection>,
    pub(crate) options: Options,
}

impl Config {
    fn has(&self, key: &str) -> bool {
        self.collection
            .as_ref()
            .is_some_and(|c| c.contains_key(key))
    }

    /// `bypass` is always accepted; any other fallback must already be loaded.
    fn check_fallback(&self, fallback: &Language) -> Result<(), TranslatorError> {
        match fallback {
            Language::Bypass => Ok(()),
            Language::Tag(t) if self.has(t) => Ok(()),
            Language::Tag(t) => Err(TranslatorError::FallbackUnavailable(t.clone())),
        }
    }
}

#[derive(Clone, Debug)]
enum State {
    Uninitialized,
    Initialized(Config),
}

/// Owns the active language, the vocabularies and the options.
///
/// Starts uninitialized; [`Translator::initialize`] succeeds exactly once and
/// every other operation fails with [`TranslatorError::NotInitialized`] until
/// then.
pub struct Translator {
    state: State,
    sink: Box<dyn DiagnosticSink>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn advise(sink: &dyn DiagnosticSink, options: &Options, level: Level, message: &str) {
    if options.logs {
        sink.emit(level, message);
    }
}

impl Translator {
    /// An uninitialized translator that reports advisories through `tracing`.
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }

    pub fn with_sink(sink: impl DiagnosticSink + 'static) -> Self {
        Self {
            state: State::Uninitialized,
            sink: Box::new(sink),
        }
    }

    pub fn set_sink(&mut self, sink: impl DiagnosticSink + 'static) {
        self.sink = Box::new(sink);
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, State::Initialized(_))
    }

    /// Set up the translator. Fails if called twice.
    ///
    /// `options` is merged over the defaults. Without a collection every
    /// string passes through unchanged. A `language` missing from the
    /// collection is only reported, so it can be added later; a fallback
    /// language missing from the collection is an error.
    pub fn initialize(
        &mut self,
        language: impl Into<Language>,
        collection: Option<VocabulariesCollection>,
        options: Option<OptionsPatch>,
    ) -> Result<(), TranslatorError> {
        if self.is_initialized() {
            return Err(TranslatorError::AlreadyInitialized);
        }

        let options = options.unwrap_or_default().merged_over(&Options::default());
        let config = Config {
            language: language.into(),
            collection,
            options,
        };

        config.check_fallback(&config.options.fallback_language)?;

        match (&config.collection, &config.language) {
            (None, _) => advise(
                &*self.sink,
                &config.options,
                Level::Warn,
                "no vocabularies collection provided; strings will pass through untranslated",
            ),
            (Some(c), Language::Tag(t)) if !c.contains_key(t) => advise(
                &*self.sink,
                &config.options,
                Level::Error,
                &format!("language \"{t}\" is not available in the vocabularies collection"),
            ),
            _ => {}
        }

        debug!(
            language = %config.language,
            vocabularies = config.collection.as_ref().map_or(0, |c| c.len()),
            "Translator::initialize"
        );
        self.state = State::Initialized(config);
        Ok(())
    }

    fn config(&self) -> Result<&Config, TranslatorError> {
        match &self.state {
            State::Initialized(c) => Ok(c),
            State::Uninitialized => Err(TranslatorError::NotInitialized),
        }
    }

    fn parts_mut(&mut self) -> Result<(&mut Config, &dyn DiagnosticSink), TranslatorError> {
        match &mut self.state {
            State::Initialized(c) => Ok((c, &*self.sink)),
            State::Uninitialized => Err(TranslatorError::NotInitialized),
        }
    }

    /// Switch the active language.
    ///
    /// The language does not need to be in the collection yet; a missing one
    /// is reported and lookups miss until it is added.
    pub fn set_language(&mut self, language: impl Into<Language>) -> Result<(), TranslatorError> {
        let (config, sink) = self.parts_mut()?;
        let language = language.into();

        if let Language::Tag(t) = &language {
            if !config.has(t) {
                advise(
                    sink,
                    &config.options,
                    Level::Warn,
                    &format!("language \"{t}\" is not available in the vocabularies collection"),
                );
            }
        }

        debug!("Translator::set_language: {} -> {}", config.language, language);
        config.language = language;
        Ok(())
    }

    /// Insert or replace the vocabulary stored under `key`.
    pub fn add_vocabulary(
        &mut self,
        key: impl Into<String>,
        vocabulary: Vocabulary,
    ) -> Result<(), TranslatorError> {
        let (config, _) = self.parts_mut()?;
        let key = key.into();
        debug!(key = %key, pairs = vocabulary.len(), "Translator::add_vocabulary");
        config
            .collection
            .get_or_insert_with(VocabulariesCollection::new)
            .insert(key, vocabulary);
        Ok(())
    }

    /// Parse a vocabulary file and store it under `key`.
    pub fn add_vocabulary_str(
        &mut self,
        key: impl Into<String>,
        src: &str,
        format: Format,
    ) -> Result<(), TranslatorError> {
        // Check state before parsing so usage errors win over catalog errors.
        self.config()?;
        let key = key.into();
        let vocabulary = catalog::parse_vocabulary(src, format, &key)?;
        self.add_vocabulary(key, vocabulary)
    }

    /// Remove the vocabulary stored under `key`, returning it.
    ///
    /// Removing a missing vocabulary is reported and otherwise ignored.
    pub fn remove_vocabulary(&mut self, key: &str) -> Result<Option<Vocabulary>, TranslatorError> {
        let (config, sink) = self.parts_mut()?;
        let removed = config
            .collection
            .as_mut()
            .and_then(|c| c.shift_remove(key));

        if removed.is_none() {
            advise(
                sink,
                &config.options,
                Level::Warn,
                &format!(
                    "cannot remove vocabulary \"{key}\": it is not in the vocabularies collection"
                ),
            );
        } else {
            debug!(key = %key, "Translator::remove_vocabulary");
        }
        Ok(removed)
    }

    /// Override one option by name.
    ///
    /// `key` must be one of `fallbackLanguage`, `caseSensitive`,
    /// `autoCapitalize` or `logs`, and `value` must have that option's type.
    pub fn set_option(
        &mut self,
        key: &str,
        value: impl Into<OptionValue>,
    ) -> Result<(), TranslatorError> {
        let kind: OptionKind = key.parse()?;
        self.set_option_kind(kind, value)
    }

    pub fn set_option_kind(
        &mut self,
        kind: OptionKind,
        value: impl Into<OptionValue>,
    ) -> Result<(), TranslatorError> {
        let (config, _) = self.parts_mut()?;
        let value = value.into();
        validate(config, kind, &value)?;
        debug!(option = %kind, value = ?value, "Translator::set_option");
        config.options.apply(kind, value);
        Ok(())
    }

    /// Override several options at once. Nothing is written unless every
    /// field validates.
    pub fn set_options(&mut self, patch: &OptionsPatch) -> Result<(), TranslatorError> {
        let (config, _) = self.parts_mut()?;
        let entries = patch.entries();
        for (kind, value) in &entries {
            validate(config, *kind, value)?;
        }
        for (kind, value) in entries {
            config.options.apply(kind, value);
        }
        Ok(())
    }

    pub fn language(&self) -> Result<&Language, TranslatorError> {
        Ok(&self.config()?.language)
    }

    pub fn options(&self) -> Result<&Options, TranslatorError> {
        Ok(&self.config()?.options)
    }

    pub fn collection(&self) -> Result<Option<&VocabulariesCollection>, TranslatorError> {
        Ok(self.config()?.collection.as_ref())
    }

    /// The vocabulary stored under `key`, if any.
    pub fn get_dictionary(&self, key: &str) -> Result<Option<&Vocabulary>, TranslatorError> {
        Ok(self.config()?.collection.as_ref().and_then(|c| c.get(key)))
    }

    /// Keys of every loaded vocabulary, in insertion order.
    pub fn available_languages(&self) -> Result<Vec<&str>, TranslatorError> {
        Ok(self
            .config()?
            .collection
            .iter()
            .flat_map(|c| c.keys().map(String::as_str))
            .collect())
    }

    /// Make the vocabulary matching the host locale the active language.
    ///
    /// Returns the selected key, or `None` (leaving the active language
    /// untouched) when the locale is unknown or has no vocabulary.
    pub fn try_use_host_language<P>(
        &mut self,
        provider: &P,
    ) -> Result<Option<String>, TranslatorError>
    where
        P: LocaleProvider + ?Sized,
    {
        self.use_host_language(provider, false)
    }

    /// Like [`Translator::try_use_host_language`], but with `force` a host
    /// locale that has no vocabulary still becomes the active language as
    /// its primary subtag (`fr_FR.UTF-8` selects `fr`), so its vocabulary
    /// can be added later.
    pub fn use_host_language<P>(
        &mut self,
        provider: &P,
        force: bool,
    ) -> Result<Option<String>, TranslatorError>
    where
        P: LocaleProvider + ?Sized,
    {
        let (config, sink) = self.parts_mut()?;

        let Some(locale) = provider.locale() else {
            advise(
                sink,
                &config.options,
                Level::Warn,
                "cannot use the host language: the host did not report a locale",
            );
            return Ok(None);
        };

        let matched = match config.collection.as_ref() {
            Some(collection) => {
                let key = match_collection(collection, &locale).map(str::to_string);
                if key.is_none() {
                    advise(
                        sink,
                        &config.options,
                        Level::Warn,
                        &format!(
                            "host language \"{locale}\" is not available in the vocabularies collection"
                        ),
                    );
                }
                key
            }
            None => {
                advise(
                    sink,
                    &config.options,
                    Level::Warn,
                    "cannot use the host language: no vocabularies collection provided",
                );
                None
            }
        };

        let key = match matched {
            Some(key) => key,
            None if force => match locale_candidates(&locale).pop() {
                Some(primary) => primary,
                None => return Ok(None),
            },
            None => return Ok(None),
        };

        debug!(locale = %locale, key = %key, force, "Translator::use_host_language");
        config.language = Language::Tag(key.clone());
        Ok(Some(key))
    }

    /// Translate `input`; see [`resolve::translate`].
    pub fn translate<'a>(
        &self,
        input: impl Into<Source<'a>>,
        capitalize: Option<bool>,
    ) -> Result<String, TranslatorError> {
        resolve::translate(self.config()?, &*self.sink, input.into(), capitalize)
    }

    /// Shorthand for [`Translator::translate`] without a capitalization
    /// override.
    pub fn t<'a>(&self, input: impl Into<Source<'a>>) -> Result<String, TranslatorError> {
        self.translate(input, None)
    }
}

fn validate(config: &Config, kind: OptionKind, value: &OptionValue) -> Result<(), TranslatorError> {
    kind.check(value)?;
    if let OptionValue::Text(s) = value {
        config.check_fallback(&Language::from(s.as_str()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn italian() -> VocabulariesCollection {
        let mut c = VocabulariesCollection::new();
        c.insert(
            "it".into(),
            Vocabulary::new("italian", "it-IT").pair("leave a comment", "lascia un commento"),
        );
        c
    }

    fn recording() -> (Translator, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Translator::with_sink(sink.clone()), sink)
    }

    #[test]
    fn operations_require_initialize() {
        let mut tr = Translator::new();
        assert!(!tr.is_initialized());
        assert!(matches!(tr.set_language("it"), Err(TranslatorError::NotInitialized)));
        assert!(matches!(
            tr.add_vocabulary("it", Vocabulary::default()),
            Err(TranslatorError::NotInitialized)
        ));
        assert!(matches!(tr.remove_vocabulary("it"), Err(TranslatorError::NotInitialized)));
        assert!(matches!(tr.set_option("logs", false), Err(TranslatorError::NotInitialized)));
        assert!(matches!(tr.get_dictionary("it"), Err(TranslatorError::NotInitialized)));
        assert!(matches!(tr.available_languages(), Err(TranslatorError::NotInitialized)));
        assert!(matches!(tr.t("hi"), Err(TranslatorError::NotInitialized)));
        assert!(matches!(
            tr.try_use_host_language("it-IT"),
            Err(TranslatorError::NotInitialized)
        ));
    }

    #[test]
    fn defaults_are_applied() {
        let mut tr = Translator::new();
        tr.initialize("it", Some(italian()), None).unwrap();
        assert_eq!(tr.options().unwrap(), &Options::default());
        assert_eq!(tr.language().unwrap(), &Language::Tag("it".into()));
    }

    #[test]
    fn initialize_merges_options() {
        let mut tr = Translator::new();
        tr.initialize(
            "it",
            Some(italian()),
            Some(OptionsPatch::new().case_sensitive(false)),
        )
        .unwrap();
        let opts = tr.options().unwrap();
        assert!(!opts.case_sensitive);
        assert!(!opts.auto_capitalize);
        assert!(opts.logs);
    }

    #[test]
    fn second_initialize_fails() {
        let mut tr = Translator::new();
        tr.initialize("it", Some(italian()), None).unwrap();
        let err = tr.initialize("en", None, None).unwrap_err();
        assert!(matches!(err, TranslatorError::AlreadyInitialized));
        // First configuration survives.
        assert_eq!(tr.language().unwrap().as_str(), "it");
    }

    #[test]
    fn missing_fallback_fails_initialize_and_leaves_store_uninitialized() {
        let mut tr = Translator::new();
        let err = tr
            .initialize(
                "it",
                Some(italian()),
                Some(OptionsPatch::new().fallback_language("en")),
            )
            .unwrap_err();
        assert!(matches!(err, TranslatorError::FallbackUnavailable(ref l) if l == "en"));
        assert!(!tr.is_initialized());

        let err = tr
            .initialize("it", None, Some(OptionsPatch::new().fallback_language("en")))
            .unwrap_err();
        assert!(matches!(err, TranslatorError::FallbackUnavailable(_)));

        tr.initialize("it", Some(italian()), None).unwrap();
    }

    #[test]
    fn unknown_language_at_initialize_is_advisory() {
        let (mut tr, sink) = recording();
        tr.initialize("es", Some(italian()), None).unwrap();
        assert_eq!(sink.count(Level::Error), 1);
        assert_eq!(tr.language().unwrap().as_str(), "es");
    }

    #[test]
    fn missing_collection_warns_once() {
        let (mut tr, sink) = recording();
        tr.initialize("it", None, None).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.count(Level::Warn), 1);
    }

    #[test]
    fn logs_false_silences_advisories() {
        let (mut tr, sink) = recording();
        tr.initialize("es", Some(italian()), Some(OptionsPatch::new().logs(false)))
            .unwrap();
        tr.set_language("fr").unwrap();
        tr.remove_vocabulary("fr").unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn set_language_accepts_missing_language() {
        let (mut tr, sink) = recording();
        tr.initialize("it", Some(italian()), None).unwrap();
        tr.set_language("fr").unwrap();
        assert_eq!(tr.language().unwrap().as_str(), "fr");
        assert_eq!(sink.count(Level::Warn), 1);

        sink.clear();
        tr.set_language("bypass").unwrap();
        assert_eq!(tr.language().unwrap(), &Language::Bypass);
        assert!(sink.is_empty());
    }

    #[test]
    fn add_and_remove_vocabularies() {
        let (mut tr, sink) = recording();
        tr.initialize("it", Some(italian()), None).unwrap();

        tr.add_vocabulary("fr", Vocabulary::new("french", "fr").pair("Deleted", "Supprimé"))
            .unwrap();
        assert_eq!(tr.available_languages().unwrap(), vec!["it", "fr"]);

        // Last write wins.
        tr.add_vocabulary("fr", Vocabulary::new("français", "fr")).unwrap();
        assert_eq!(tr.get_dictionary("fr").unwrap().unwrap().name, "français");

        let removed = tr.remove_vocabulary("it").unwrap();
        assert_eq!(removed.unwrap().name, "italian");
        assert_eq!(tr.available_languages().unwrap(), vec!["fr"]);
        assert!(sink.is_empty());

        assert!(tr.remove_vocabulary("it").unwrap().is_none());
        assert_eq!(sink.count(Level::Warn), 1);
    }

    #[test]
    fn add_vocabulary_creates_collection() {
        let mut tr = Translator::with_sink(crate::NullSink);
        tr.initialize("fr", None, None).unwrap();
        assert!(tr.collection().unwrap().is_none());
        tr.add_vocabulary("fr", Vocabulary::new("french", "fr")).unwrap();
        assert_eq!(tr.available_languages().unwrap(), vec!["fr"]);
    }

    #[test]
    fn set_option_writes_named_field() {
        let mut tr = Translator::new();
        tr.initialize("it", Some(italian()), None).unwrap();

        tr.set_option("caseSensitive", false).unwrap();
        let opts = tr.options().unwrap();
        assert!(!opts.case_sensitive);
        assert!(!opts.auto_capitalize);

        tr.set_option("autoCapitalize", true).unwrap();
        tr.set_option("logs", false).unwrap();
        let opts = tr.options().unwrap();
        assert!(opts.auto_capitalize);
        assert!(!opts.logs);
    }

    #[test]
    fn set_option_rejects_unknown_keys_and_types() {
        let mut tr = Translator::new();
        tr.initialize("it", Some(italian()), None).unwrap();

        assert!(matches!(
            tr.set_option("capitalize", true),
            Err(TranslatorError::UnknownOption(_))
        ));
        assert!(matches!(
            tr.set_option("logs", "yes"),
            Err(TranslatorError::OptionType { key: OptionKind::Logs, .. })
        ));
        assert!(matches!(
            tr.set_option("fallbackLanguage", true),
            Err(TranslatorError::OptionType { key: OptionKind::FallbackLanguage, .. })
        ));
    }

    #[test]
    fn fallback_option_must_exist() {
        let mut tr = Translator::new();
        tr.initialize("it", Some(italian()), None).unwrap();

        assert!(matches!(
            tr.set_option("fallbackLanguage", "xx"),
            Err(TranslatorError::FallbackUnavailable(ref l)) if l == "xx"
        ));
        tr.set_option("fallbackLanguage", "it").unwrap();
        assert_eq!(
            tr.options().unwrap().fallback_language,
            Language::Tag("it".into())
        );
        tr.set_option("fallbackLanguage", "bypass").unwrap();
        assert!(tr.options().unwrap().fallback_language.is_bypass());
    }

    #[test]
    fn set_options_is_all_or_nothing() {
        let mut tr = Translator::new();
        tr.initialize("it", Some(italian()), None).unwrap();

        let bad = OptionsPatch::new().auto_capitalize(true).fallback_language("xx");
        assert!(tr.set_options(&bad).is_err());
        assert!(!tr.options().unwrap().auto_capitalize);

        let good = OptionsPatch::new().auto_capitalize(true).case_sensitive(false);
        tr.set_options(&good).unwrap();
        let opts = tr.options().unwrap();
        assert!(opts.auto_capitalize);
        assert!(!opts.case_sensitive);
    }

    #[test]
    fn host_language_selects_matching_vocabulary() {
        let (mut tr, sink) = recording();
        let mut c = italian();
        c.insert("en".into(), Vocabulary::new("english", "en-GB"));
        tr.initialize("en", Some(c), None).unwrap();

        assert_eq!(tr.try_use_host_language("it_IT.UTF-8").unwrap().as_deref(), Some("it"));
        assert_eq!(tr.language().unwrap().as_str(), "it");
        assert!(sink.is_empty());

        tr.set_language("en").unwrap();
        assert_eq!(tr.try_use_host_language("fr-FR").unwrap(), None);
        assert_eq!(tr.language().unwrap().as_str(), "en");
        assert_eq!(sink.count(Level::Warn), 1);
    }

    #[test]
    fn host_language_without_collection() {
        let (mut tr, sink) = recording();
        tr.initialize("en", None, None).unwrap();
        sink.clear();
        assert_eq!(tr.try_use_host_language("it-IT").unwrap(), None);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn forced_host_language_selects_primary_subtag() {
        let (mut tr, sink) = recording();
        tr.initialize("it", Some(italian()), None).unwrap();

        assert_eq!(tr.use_host_language("fr_FR.UTF-8", true).unwrap().as_deref(), Some("fr"));
        assert_eq!(tr.language().unwrap().as_str(), "fr");
        assert_eq!(sink.count(Level::Warn), 1);

        // A matching vocabulary still wins over the primary subtag.
        assert_eq!(tr.use_host_language("it-CH", true).unwrap().as_deref(), Some("it"));

        tr.set_language("fr").unwrap();
        tr.add_vocabulary("fr", Vocabulary::new("Français", "fr").pair("hi", "salut"))
            .unwrap();
        tr.set_option("logs", false).unwrap();
        assert_eq!(tr.t("hi").unwrap(), "salut");
    }

    #[test]
    fn forced_host_language_without_collection_or_locale() {
        let (mut tr, sink) = recording();
        tr.initialize("en", None, None).unwrap();
        sink.clear();

        assert_eq!(tr.use_host_language("pl-PL", true).unwrap().as_deref(), Some("pl"));
        assert_eq!(tr.language().unwrap().as_str(), "pl");
        assert_eq!(sink.len(), 1);

        assert_eq!(tr.use_host_language("", true).unwrap(), None);
        assert_eq!(tr.language().unwrap().as_str(), "pl");
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn add_vocabulary_from_yaml() {
        let mut tr = Translator::new();
        tr.initialize("pt", None, Some(OptionsPatch::new().logs(false)))
            .unwrap();
        tr.add_vocabulary_str(
            "pt",
            "name: Português\npairs:\n  base word: palavra básica\n",
            Format::Yaml,
        )
        .unwrap();
        let v = tr.get_dictionary("pt").unwrap().unwrap();
        assert_eq!(v.tag, "pt");
        assert_eq!(tr.t("base word").unwrap(), "palavra básica");
    }
}
