use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TranslatorError;

/// Sentinel language name meaning "do not translate".
pub const BYPASS: &str = "bypass";

/// A language selection: either a key into the vocabularies collection or
/// the `"bypass"` sentinel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    Bypass,
    Tag(String),
}

impl Language {
    pub fn is_bypass(&self) -> bool {
        matches!(self, Self::Bypass)
    }

    /// The collection key, or `None` for [`Language::Bypass`].
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Bypass => None,
            Self::Tag(t) => Some(t),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Bypass => BYPASS,
            Self::Tag(t) => t,
        }
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        if s == BYPASS {
            Self::Bypass
        } else {
            Self::Tag(s.to_string())
        }
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        if s == BYPASS {
            Self::Bypass
        } else {
            Self::Tag(s)
        }
    }
}

impl From<&String> for Language {
    fn from(s: &String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Language> for String {
    fn from(l: Language) -> Self {
        match l {
            Language::Bypass => BYPASS.to_string(),
            Language::Tag(t) => t,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of options accepted by `set_option`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKind {
    FallbackLanguage,
    CaseSensitive,
    AutoCapitalize,
    Logs,
}

impl OptionKind {
    pub const ALL: [OptionKind; 4] = [
        Self::FallbackLanguage,
        Self::CaseSensitive,
        Self::AutoCapitalize,
        Self::Logs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::FallbackLanguage => "fallbackLanguage",
            Self::CaseSensitive => "caseSensitive",
            Self::AutoCapitalize => "autoCapitalize",
            Self::Logs => "logs",
        }
    }

    fn expected_type(self) -> &'static str {
        match self {
            Self::FallbackLanguage => "string",
            Self::CaseSensitive | Self::AutoCapitalize | Self::Logs => "boolean",
        }
    }

    /// Check that `value` has the type this option declares.
    pub(crate) fn check(self, value: &OptionValue) -> Result<(), TranslatorError> {
        let ok = match self {
            Self::FallbackLanguage => matches!(value, OptionValue::Text(_)),
            Self::CaseSensitive | Self::AutoCapitalize | Self::Logs => {
                matches!(value, OptionValue::Bool(_))
            }
        };
        if ok {
            Ok(())
        } else {
            Err(TranslatorError::OptionType {
                key: self,
                expected: self.expected_type(),
            })
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionKind {
    type Err = TranslatorError;

    /// Accepts the camelCase option names, plus their snake_case spelling
    /// used in TOML configs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fallbackLanguage" | "fallback_language" => Ok(Self::FallbackLanguage),
            "caseSensitive" | "case_sensitive" => Ok(Self::CaseSensitive),
            "autoCapitalize" | "auto_capitalize" => Ok(Self::AutoCapitalize),
            "logs" => Ok(Self::Logs),
            other => Err(TranslatorError::UnknownOption(other.to_string())),
        }
    }
}

/// A dynamically typed option value, validated against [`OptionKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Language> for OptionValue {
    fn from(v: Language) -> Self {
        Self::Text(v.into())
    }
}

/// Translator behavior.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Match source strings exactly (`true`) or ignoring case.
    pub case_sensitive: bool,
    /// Uppercase the first character of every output.
    pub auto_capitalize: bool,
    /// Emit advisories through the diagnostic sink.
    pub logs: bool,
    /// Vocabulary consulted when the active one has no match.
    pub fallback_language: Language,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            auto_capitalize: false,
            logs: true,
            fallback_language: Language::Bypass,
        }
    }
}

impl Options {
    pub(crate) fn apply(&mut self, kind: OptionKind, value: OptionValue) {
        match (kind, value) {
            (OptionKind::FallbackLanguage, OptionValue::Text(s)) => {
                self.fallback_language = Language::from(s)
            }
            (OptionKind::CaseSensitive, OptionValue::Bool(b)) => self.case_sensitive = b,
            (OptionKind::AutoCapitalize, OptionValue::Bool(b)) => self.auto_capitalize = b,
            (OptionKind::Logs, OptionValue::Bool(b)) => self.logs = b,
            // Callers run `OptionKind::check` first.
            _ => {}
        }
    }
}

/// A partial [`Options`] record; unset fields keep their current value.
///
/// Deserializes from both camelCase and snake_case keys and rejects anything
/// else.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsPatch {
    #[serde(default, alias = "case_sensitive")]
    pub case_sensitive: Option<bool>,
    #[serde(default, alias = "auto_capitalize")]
    pub auto_capitalize: Option<bool>,
    #[serde(default)]
    pub logs: Option<bool>,
    #[serde(default, alias = "fallback_language")]
    pub fallback_language: Option<Language>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, v: bool) -> Self {
        self.case_sensitive = Some(v);
        self
    }

    pub fn auto_capitalize(mut self, v: bool) -> Self {
        self.auto_capitalize = Some(v);
        self
    }

    pub fn logs(mut self, v: bool) -> Self {
        self.logs = Some(v);
        self
    }

    pub fn fallback_language(mut self, v: impl Into<Language>) -> Self {
        self.fallback_language = Some(v.into());
        self
    }

    pub(crate) fn entries(&self) -> Vec<(OptionKind, OptionValue)> {
        let mut out = Vec::new();
        if let Some(v) = &self.fallback_language {
            out.push((OptionKind::FallbackLanguage, v.clone().into()));
        }
        if let Some(v) = self.case_sensitive {
            out.push((OptionKind::CaseSensitive, v.into()));
        }
        if let Some(v) = self.auto_capitalize {
            out.push((OptionKind::AutoCapitalize, v.into()));
        }
        if let Some(v) = self.logs {
            out.push((OptionKind::Logs, v.into()));
        }
        out
    }

    /// Merge over `base`, without validation.
    pub(crate) fn merged_over(&self, base: &Options) -> Options {
        let mut out = base.clone();
        for (kind, value) in self.entries() {
            out.apply(kind, value);
        }
        out
    }
}
