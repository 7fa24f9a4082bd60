use crate::vocabulary::VocabulariesCollection;

/// Supplies the host's current locale tag, e.g. `"it-IT"`.
pub trait LocaleProvider {
    fn locale(&self) -> Option<String>;
}

/// Reads the locale from `LC_ALL`, `LC_MESSAGES`, then `LANG`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvLocale;

impl LocaleProvider for EnvLocale {
    fn locale(&self) -> Option<String> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .find_map(|key| std::env::var(key).ok().and_then(|v| normalize_locale(&v)))
    }
}

/// A locale known up front (tests, or hosts that read it from a request).
#[derive(Clone, Debug)]
pub struct FixedLocale(pub String);

impl LocaleProvider for FixedLocale {
    fn locale(&self) -> Option<String> {
        normalize_locale(&self.0)
    }
}

impl LocaleProvider for str {
    fn locale(&self) -> Option<String> {
        normalize_locale(self)
    }
}

impl LocaleProvider for String {
    fn locale(&self) -> Option<String> {
        normalize_locale(self)
    }
}

impl<T: LocaleProvider + ?Sized> LocaleProvider for &T {
    fn locale(&self) -> Option<String> {
        (**self).locale()
    }
}

/// Normalize a host locale string into a BCP-47 style tag.
///
/// - Drops encoding and modifier suffixes (`en_US.UTF-8`, `de_DE@euro`).
/// - Converts `_` to `-` (POSIX and Android report `en_US`).
/// - Returns `None` for empty values and the `C`/`POSIX` locales.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let s = raw.trim();
    let s = s.split_once('.').map_or(s, |(part, _)| part);
    let s = s.split_once('@').map_or(s, |(part, _)| part);
    let s = s.trim();
    if s.is_empty() || s == "C" || s == "POSIX" {
        return None;
    }
    Some(s.replace('_', "-"))
}

/// Tags to try for a locale, most specific first.
///
/// - `it-IT` -> `["it-IT", "it"]`
/// - `it` -> `["it"]`
pub fn locale_candidates(locale: &str) -> Vec<String> {
    let Some(l) = normalize_locale(locale) else {
        return Vec::new();
    };

    let mut chain = vec![l.clone()];
    if let Some(lang) = l.split('-').next() {
        if !lang.is_empty() && lang != l {
            chain.push(lang.to_string());
        }
    }
    chain
}

/// Find the collection key whose key or vocabulary tag matches `locale`.
///
/// A full-tag match anywhere in the collection beats a primary-subtag match.
/// Tag comparison ignores ASCII case.
pub fn match_collection<'a>(
    collection: &'a VocabulariesCollection,
    locale: &str,
) -> Option<&'a str> {
    locale_candidates(locale).iter().find_map(|candidate| {
        collection
            .iter()
            .find(|(key, vocab)| {
                key.eq_ignore_ascii_case(candidate) || vocab.tag.eq_ignore_ascii_case(candidate)
            })
            .map(|(key, _)| key.as_str())
    })
}
