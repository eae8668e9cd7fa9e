//! Chapter and page count heuristics

use crate::types::TocEntry;
use once_cell::sync::Lazy;
use regex::Regex;

static CHAPTERS_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s+chapters").expect("valid chapters regex"));

static PAGINATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*p").expect("valid pagination regex"));

/// Count table-of-contents entries that look like chapters
///
/// An entry counts when its title contains "chapter" (any case) or its
/// type is `chapter`. Returns `None` when nothing counts.
pub fn count_toc_chapters(toc: &[TocEntry]) -> Option<u32> {
    let count = toc
        .iter()
        .filter(|entry| {
            let titled = entry
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains("chapter"));
            let typed = entry
                .kind
                .as_ref()
                .and_then(|k| k.label())
                .is_some_and(|label| label.eq_ignore_ascii_case("chapter"));
            titled || typed
        })
        .count();

    u32::try_from(count).ok().filter(|c| *c > 0)
}

/// First `<n> chapters` mention in free text
pub fn chapters_from_text(text: &str) -> Option<u32> {
    CHAPTERS_IN_TEXT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|c| *c > 0)
}

/// Page count from free-text pagination such as `"xii, 412 p."`
pub fn parse_pagination(text: &str) -> Option<u32> {
    PAGINATION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|c| *c > 0)
}

/// Chapter count by the first rule that yields one:
/// explicit field, then table of contents, then excerpt text.
pub fn derive_chapter_count<'a>(
    explicit: Option<u32>,
    toc: &[TocEntry],
    excerpts: impl IntoIterator<Item = &'a str>,
) -> Option<u32> {
    if let Some(count) = explicit {
        return Some(count);
    }

    if let Some(count) = count_toc_chapters(toc) {
        return Some(count);
    }

    excerpts.into_iter().find_map(chapters_from_text)
}
