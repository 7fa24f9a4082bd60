use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Original source string -> translated string.
///
/// Insertion-ordered: case-insensitive lookups return the first key that
/// matches, so iteration order is observable.
pub type Pairs = IndexMap<String, String>;

/// All known vocabularies, keyed by language tag (e.g. `"it"`, `"pt-BR"`).
///
/// The map key is what `set_language`, `fallback_language` and
/// `add_vocabulary` address. [`Vocabulary::tag`] is descriptive and only used
/// when matching a host locale.
pub type VocabulariesCollection = IndexMap<String, Vocabulary>;

/// A named set of translations for one language.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Display name, e.g. `"Italiano"`.
    #[serde(default)]
    pub name: String,
    /// BCP-47 style tag, e.g. `"it-IT"`.
    #[serde(default, alias = "bcp47", alias = "BCP47")]
    pub tag: String,
    #[serde(default)]
    pub pairs: Pairs,
}

impl Vocabulary {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            pairs: Pairs::new(),
        }
    }

    /// Builder-style insert.
    pub fn pair(mut self, original: impl Into<String>, translated: impl Into<String>) -> Self {
        self.insert(original, translated);
        self
    }

    pub fn insert(&mut self, original: impl Into<String>, translated: impl Into<String>) {
        self.pairs.insert(original.into(), translated.into());
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Find the translation for `original`.
    ///
    /// Case-insensitive matching lowercases both sides and returns the first
    /// key in insertion order that matches. An empty translation is a match.
    pub fn lookup(&self, original: &str, case_sensitive: bool) -> Option<&str> {
        if case_sensitive {
            return self.pairs.get(original).map(String::as_str);
        }

        let wanted = original.to_lowercase();
        self.pairs
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v.as_str())
    }
}
