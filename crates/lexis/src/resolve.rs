//! Translation resolution.
//!
//! Order of operations for a single request:
//!
//! 1. Numbers are returned as their string form, untouched.
//! 2. With the `bypass` language or no vocabularies, the input is returned.
//! 3. The active vocabulary is searched (exactly or ignoring case).
//! 4. On a miss an advisory is emitted; then either the input is returned
//!    (`bypass` fallback) or the fallback vocabulary is searched, and a second
//!    miss is an error.
//! 5. The capitalization override or `autoCapitalize` is applied to whatever
//!    string came out.
//!
//! Resolution only reads translator state.

use std::borrow::Cow;

use crate::diagnostics::{DiagnosticSink, Level};
use crate::options::Language;
use crate::translator::Config;
use crate::TranslatorError;

/// Something to translate: source text, or a number that passes through.
#[derive(Clone, Debug, PartialEq)]
pub enum Source<'a> {
    Text(Cow<'a, str>),
    Number(String),
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(v: &'a str) -> Self {
        Self::Text(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(v: &'a String) -> Self {
        Self::Text(Cow::Borrowed(v.as_str()))
    }
}

impl From<String> for Source<'_> {
    fn from(v: String) -> Self {
        Self::Text(Cow::Owned(v))
    }
}

impl<'a> From<Cow<'a, str>> for Source<'a> {
    fn from(v: Cow<'a, str>) -> Self {
        Self::Text(v)
    }
}

macro_rules! integer_source {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Source<'_> {
                fn from(v: $t) -> Self {
                    Self::Number(v.to_string())
                }
            }
        )*
    };
}

integer_source!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_source {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Source<'_> {
                fn from(v: $t) -> Self {
                    let s = if v.is_nan() {
                        "NaN".to_string()
                    } else if v.is_infinite() {
                        let s = if v > 0.0 { "Infinity" } else { "-Infinity" };
                        s.to_string()
                    } else if v == 0.0 {
                        // Also covers -0.0.
                        "0".to_string()
                    } else if v.abs() >= 1e21 || v.abs() < 1e-6 {
                        exponential(format!("{v:e}"))
                    } else {
                        // Display already drops the `.0` of integral values.
                        v.to_string()
                    };
                    Self::Number(s)
                }
            }
        )*
    };
}

float_source!(f32, f64);

/// `1e21` -> `1e+21`; negative exponents keep their sign.
fn exponential(s: String) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

/// Uppercase (`upper == true`) or lowercase the first character of `s`.
///
/// Only the first code point changes. Empty input stays empty.
pub fn set_first_case(s: &str, upper: bool) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(s.len());
    if upper {
        out.extend(first.to_uppercase());
    } else {
        out.extend(first.to_lowercase());
    }
    out.push_str(chars.as_str());
    out
}

fn finish(s: &str, capitalize: Option<bool>, auto_capitalize: bool) -> String {
    match capitalize {
        Some(upper) => set_first_case(s, upper),
        None if auto_capitalize => set_first_case(s, true),
        None => s.to_string(),
    }
}

/// Resolve one string against an initialized configuration.
pub(crate) fn translate(
    config: &Config,
    sink: &dyn DiagnosticSink,
    input: Source<'_>,
    capitalize: Option<bool>,
) -> Result<String, TranslatorError> {
    let text = match input {
        Source::Number(n) => return Ok(n),
        Source::Text(t) => t,
    };

    let opts = &config.options;
    let done = |s: &str| finish(s, capitalize, opts.auto_capitalize);

    let collection = match (&config.language, &config.collection) {
        (Language::Tag(_), Some(c)) if !c.is_empty() => c,
        _ => return Ok(done(&text)),
    };

    let lookup = |key: &str| {
        collection
            .get(key)
            .and_then(|v| v.lookup(&text, opts.case_sensitive))
    };

    // Language::Bypass returned above.
    let active = config.language.as_str();
    if let Some(found) = lookup(active) {
        return Ok(done(found));
    }

    if opts.logs {
        sink.emit(
            Level::Warn,
            &format!("\"{text}\" doesn't match any translation in the \"{active}\" vocabulary"),
        );
    }

    match &opts.fallback_language {
        Language::Bypass => Ok(done(&text)),
        Language::Tag(fallback) => match lookup(fallback) {
            Some(found) => Ok(done(found)),
            None => Err(TranslatorError::TranslationMissing {
                input: text.to_string(),
                fallback: fallback.clone(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_case() {
        assert_eq!(set_first_case("hello", true), "Hello");
        assert_eq!(set_first_case("Hello", false), "hello");
        assert_eq!(set_first_case("", true), "");
        assert_eq!(set_first_case("é", true), "É");
        assert_eq!(set_first_case("1st", true), "1st");
        assert_eq!(set_first_case("Ärger", false), "ärger");
    }

    #[test]
    fn finish_rules() {
        assert_eq!(finish("hi", None, false), "hi");
        assert_eq!(finish("hi", None, true), "Hi");
        assert_eq!(finish("Hi", Some(false), true), "hi");
        assert_eq!(finish("hi", Some(true), false), "Hi");
    }

    #[test]
    fn numbers_render_plainly() {
        assert_eq!(Source::from(2), Source::Number("2".into()));
        assert_eq!(Source::from(-7i64), Source::Number("-7".into()));
        assert_eq!(Source::from(2.0f64), Source::Number("2".into()));
        assert_eq!(Source::from(2.5f64), Source::Number("2.5".into()));
        assert_eq!(Source::from(0.1f32), Source::Number("0.1".into()));
        assert_eq!(Source::from(-0.0f64), Source::Number("0".into()));
        assert_eq!(Source::from(f64::NAN), Source::Number("NaN".into()));
        assert_eq!(Source::from(f64::NEG_INFINITY), Source::Number("-Infinity".into()));
    }

    #[test]
    fn extreme_numbers_use_exponents() {
        assert_eq!(Source::from(1e21f64), Source::Number("1e+21".into()));
        assert_eq!(Source::from(-1.5e300f64), Source::Number("-1.5e+300".into()));
        assert_eq!(Source::from(1e-7f64), Source::Number("1e-7".into()));
        assert_eq!(Source::from(1.5e-7f64), Source::Number("1.5e-7".into()));
        assert_eq!(Source::from(0.000001f64), Source::Number("0.000001".into()));
        assert_eq!(Source::from(1e20f64), Source::Number("100000000000000000000".into()));
    }
}
