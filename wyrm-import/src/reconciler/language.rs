//! Language code resolution
//!
//! Bibliographic records carry languages as key paths such as
//! `/languages/eng`. Codes are ISO 639-2 style, including both the
//! bibliographic and terminology variants where they differ.

use crate::types::EditionLanguage;

/// Code → display name
pub const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("eng", "English"),
    ("fre", "French"),
    ("fra", "French"),
    ("ger", "German"),
    ("deu", "German"),
    ("spa", "Spanish"),
    ("ita", "Italian"),
    ("por", "Portuguese"),
    ("rus", "Russian"),
    ("jpn", "Japanese"),
    ("chi", "Chinese"),
    ("zho", "Chinese"),
    ("kor", "Korean"),
    ("ara", "Arabic"),
    ("heb", "Hebrew"),
    ("hin", "Hindi"),
    ("dut", "Dutch"),
    ("nld", "Dutch"),
    ("swe", "Swedish"),
    ("nor", "Norwegian"),
    ("dan", "Danish"),
    ("fin", "Finnish"),
    ("pol", "Polish"),
    ("cze", "Czech"),
    ("gre", "Greek"),
    ("tur", "Turkish"),
    ("lat", "Latin"),
    ("hun", "Hungarian"),
    ("ukr", "Ukrainian"),
    ("vie", "Vietnamese"),
    ("per", "Persian"),
    ("ind", "Indonesian"),
];

/// Display name for a language code; unmapped codes pass through unchanged
pub fn resolve_language(code: &str) -> String {
    let code = code.trim();
    LANGUAGE_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Trailing path segment of a language key (`/languages/eng` → `eng`)
pub fn language_code_from_key(key: &str) -> Option<&str> {
    key.trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|c| !c.is_empty())
}

/// Original-language code for a work
///
/// Prefers an entry of the original-language list that follows the
/// `/languages/<code>` convention, else the first language of any kind.
pub fn work_language_code<S: AsRef<str>>(original: &[S], languages: &[S]) -> Option<String> {
    for key in original {
        let key: &str = key.as_ref();
        if key.contains("/languages/") {
            if let Some(code) = language_code_from_key(key) {
                return Some(code.to_string());
            }
        }
    }

    original
        .iter()
        .chain(languages.iter())
        .find_map(|key| language_code_from_key(key.as_ref()))
        .map(str::to_string)
}

/// Display language for an edition: the entry flagged original, else the
/// first listed, resolved through [`LANGUAGE_NAMES`]
pub fn edition_language_name(languages: &[EditionLanguage]) -> Option<String> {
    languages
        .iter()
        .find(|l| l.is_original)
        .or_else(|| languages.first())
        .map(|l| resolve_language(&l.code))
        .filter(|name| !name.is_empty())
}
