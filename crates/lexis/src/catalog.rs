//! Vocabulary files.
//!
//! A collection file maps language tags to vocabularies:
//!
//! ```yaml
//! it:
//!   name: Italiano
//!   tag: it-IT
//!   pairs:
//!     leave a comment: lascia un commento
//! pl:
//!   pairs:
//!     leave a comment: zostaw komentarz
//! ```
//!
//! A list of vocabularies is also accepted; each entry is then keyed by its
//! `tag`. Missing `tag`s default to the map key and missing `name`s to the
//! tag. JSON files use the same shape.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::vocabulary::{VocabulariesCollection, Vocabulary};

const MAX_VOCABULARY_ENTRIES: usize = 10_000;
const MAX_KEY_BYTES: usize = 4 * 1024;
const MAX_VALUE_BYTES: usize = 16 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Some(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("yaml vocabulary error: {0}")]
    Yaml(String),

    #[error("json vocabulary error: {0}")]
    Json(String),

    #[error("{0:?} vocabularies are not supported by this build")]
    Unsupported(Format),

    #[error("vocabulary #{index} in the list has no tag")]
    MissingTag { index: usize },

    #[error("duplicate vocabulary tag `{0}`")]
    DuplicateTag(String),

    #[error("vocabulary `{vocabulary}` has too many entries (max {MAX_VOCABULARY_ENTRIES})")]
    TooManyEntries { vocabulary: String },

    #[error("vocabulary `{vocabulary}`: key `{key}` is too long (max {MAX_KEY_BYTES} bytes)")]
    KeyTooLong { vocabulary: String, key: String },

    #[error("vocabulary `{vocabulary}`: value for key `{key}` is too long (max {MAX_VALUE_BYTES} bytes)")]
    ValueTooLong { vocabulary: String, key: String },
}

/// Top-level shape of a collection file.
enum Shape {
    Empty,
    Map,
    List,
}

const NOT_A_COLLECTION: &str = "expected a mapping of language tags or a list of vocabularies";

#[cfg_attr(not(any(feature = "yaml", feature = "json")), allow(unused_variables))]
fn deserialize<T: for<'de> Deserialize<'de>>(src: &str, format: Format) -> Result<T, CatalogError> {
    match format {
        #[cfg(feature = "yaml")]
        Format::Yaml => serde_yaml::from_str(src).map_err(|e| CatalogError::Yaml(e.to_string())),
        #[cfg(feature = "json")]
        Format::Json => serde_json::from_str(src).map_err(|e| CatalogError::Json(e.to_string())),
        #[cfg(not(all(feature = "yaml", feature = "json")))]
        other => Err(CatalogError::Unsupported(other)),
    }
}

/// Look at the document root only. The chosen shape is then deserialized
/// straight from `src`, so scalars like `2` or `true` still coerce to strings.
#[cfg_attr(not(any(feature = "yaml", feature = "json")), allow(unused_variables))]
fn shape(src: &str, format: Format) -> Result<Shape, CatalogError> {
    match format {
        #[cfg(feature = "yaml")]
        Format::Yaml => match serde_yaml::from_str::<serde_yaml::Value>(src) {
            Ok(serde_yaml::Value::Mapping(_)) => Ok(Shape::Map),
            Ok(serde_yaml::Value::Sequence(_)) => Ok(Shape::List),
            Ok(serde_yaml::Value::Null) => Ok(Shape::Empty),
            Ok(_) => Err(CatalogError::Yaml(NOT_A_COLLECTION.to_string())),
            Err(e) => Err(CatalogError::Yaml(e.to_string())),
        },
        #[cfg(feature = "json")]
        Format::Json => match src.trim_start().chars().next() {
            None => Ok(Shape::Empty),
            Some('[') => Ok(Shape::List),
            Some('{') => Ok(Shape::Map),
            Some(_) => Err(CatalogError::Json(NOT_A_COLLECTION.to_string())),
        },
        #[cfg(not(all(feature = "yaml", feature = "json")))]
        other => Err(CatalogError::Unsupported(other)),
    }
}

/// Fill in defaults and enforce size limits.
fn finalize(mut vocab: Vocabulary, key: &str) -> Result<Vocabulary, CatalogError> {
    if vocab.tag.is_empty() {
        vocab.tag = key.to_string();
    }
    if vocab.name.is_empty() {
        vocab.name = vocab.tag.clone();
    }

    if vocab.pairs.len() > MAX_VOCABULARY_ENTRIES {
        return Err(CatalogError::TooManyEntries {
            vocabulary: key.to_string(),
        });
    }
    for (k, v) in &vocab.pairs {
        if k.len() > MAX_KEY_BYTES {
            return Err(CatalogError::KeyTooLong {
                vocabulary: key.to_string(),
                key: truncate(k),
            });
        }
        if v.len() > MAX_VALUE_BYTES {
            return Err(CatalogError::ValueTooLong {
                vocabulary: key.to_string(),
                key: truncate(k),
            });
        }
    }
    Ok(vocab)
}

/// Shorten a key for error messages.
fn truncate(s: &str) -> String {
    const MAX: usize = 32;
    if s.len() <= MAX {
        return s.to_string();
    }
    let mut end = MAX;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Parse a single vocabulary that will be stored under `key`.
pub fn parse_vocabulary(src: &str, format: Format, key: &str) -> Result<Vocabulary, CatalogError> {
    finalize(deserialize(src, format)?, key)
}

/// Parse a whole collection, keyed by language tag.
pub fn parse_collection(src: &str, format: Format) -> Result<VocabulariesCollection, CatalogError> {
    let mut out = VocabulariesCollection::new();
    match shape(src, format)? {
        Shape::Empty => {}
        Shape::Map => {
            for (key, vocab) in deserialize::<IndexMap<String, Vocabulary>>(src, format)? {
                let vocab = finalize(vocab, &key)?;
                out.insert(key, vocab);
            }
        }
        Shape::List => {
            let list: Vec<Vocabulary> = deserialize(src, format)?;
            for (index, vocab) in list.into_iter().enumerate() {
                if vocab.tag.is_empty() {
                    return Err(CatalogError::MissingTag { index });
                }
                let key = vocab.tag.clone();
                if out.contains_key(&key) {
                    return Err(CatalogError::DuplicateTag(key));
                }
                let vocab = finalize(vocab, &key)?;
                out.insert(key, vocab);
            }
        }
    }
    Ok(out)
}
