//! Vibes text construction
//!
//! The vibes text is a metadata preamble ("Dune by Frank Herbert, published
//! in 1965. Categories include ...") followed by either a short synopsis
//! mined from the description or the book's opening line.
//!
//! Plot sentences are chosen by the first strategy that finds any:
//! 1. Sentences with a plot-marker phrase ("the story of", ...)
//! 2. Fiction only: sentences naming something (inner capitalized word)
//!    or mentioning a setting / time-period word
//! 3. Non-fiction only: sentences with an analytical verb
//! 4. The first sentences longer than six words

use crate::types::SearchHit;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Selected sentences stop before the synopsis would pass this many characters
pub const SYNOPSIS_LIMIT: usize = 250;

/// Hard truncation point when no sentence qualifies
pub const TRUNCATE_AT: usize = 197;

const MAX_PLOT_SENTENCES: usize = 3;
const MIN_FALLBACK_WORDS: usize = 6;
const PREAMBLE_SUBJECTS: usize = 3;

pub const PLOT_MARKERS: [&str; 10] = [
    "the story of",
    "follows the",
    "centers on",
    "chronicles",
    "tells the tale",
    "revolves around",
    "is about",
    "recounts",
    "narrates",
    "the journey of",
];

pub const ANALYTICAL_VERBS: [&str; 10] = [
    "explores",
    "examines",
    "investigates",
    "analyzes",
    "presents",
    "discusses",
    "explains",
    "reveals",
    "argues",
    "demonstrates",
];

static SETTING_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)world|kingdom|city|town|village|century|era|age|time|journey|quest|adventure")
        .expect("valid setting regex")
});

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid sentence regex"));

/// Which strategy picked the plot sentences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPath {
    PlotMarker,
    FictionDetail,
    Analytical,
    LongSentences,
}

/// Build the full vibes text for a hit and its merged description
pub fn build_vibes_text(hit: &SearchHit, description: Option<&str>) -> String {
    let mut text = build_preamble(
        &hit.title,
        &hit.author,
        hit.published_year,
        &hit.subjects,
    );

    if let Some(description) = description {
        text.push(' ');
        text.push_str(&summarize_description(description, &hit.subjects));
    } else if let Some(line) = hit.first_sentence.as_ref().and_then(|f| f.text()) {
        text.push_str(&format!(" Opening line: \"{}\"", line));
    }

    text
}

/// `"<title> by <author>[, published in <year>].[ Categories include a, b, c.]"`
pub fn build_preamble(title: &str, author: &str, year: Option<i32>, subjects: &[String]) -> String {
    let mut preamble = format!("{} by {}", title, author);

    if let Some(year) = year {
        preamble.push_str(&format!(", published in {}", year));
    }
    preamble.push('.');

    let categories: Vec<&str> = subjects
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(PREAMBLE_SUBJECTS)
        .collect();
    if !categories.is_empty() {
        preamble.push_str(&format!(" Categories include {}.", categories.join(", ")));
    }

    preamble
}

/// Synopsis from a description: selected plot sentences, or a hard
/// truncation when none fit
pub fn summarize_description(description: &str, subjects: &[String]) -> String {
    let sentences = split_sentences(description);

    if let Some((selected, path)) = select_plot_sentences(&sentences, subjects) {
        if let Some(synopsis) = join_within_limit(&selected) {
            debug!(path = ?path, sentences = selected.len(), "Synopsis from plot sentences");
            return synopsis;
        }
    }

    debug!("No plot sentence fits, truncating description");
    truncate_description(description)
}

/// Split text into trimmed sentences, terminators removed
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Fiction when any subject mentions fiction or novel, or there are no subjects
pub fn is_fiction(subjects: &[String]) -> bool {
    subjects.is_empty()
        || subjects.iter().any(|s| {
            let s = s.to_lowercase();
            s.contains("fiction") || s.contains("novel")
        })
}

/// Up to three plot sentences and the strategy that found them
pub fn select_plot_sentences<'a>(
    sentences: &[&'a str],
    subjects: &[String],
) -> Option<(Vec<&'a str>, SelectionPath)> {
    let pick = |pred: &dyn Fn(&str) -> bool| -> Vec<&'a str> {
        sentences
            .iter()
            .copied()
            .filter(|s| pred(s))
            .take(MAX_PLOT_SENTENCES)
            .collect()
    };

    let marked = pick(&|s| {
        let lower = s.to_lowercase();
        PLOT_MARKERS.iter().any(|m| lower.contains(m))
    });
    if !marked.is_empty() {
        return Some((marked, SelectionPath::PlotMarker));
    }

    if is_fiction(subjects) {
        let detailed = pick(&|s| has_inner_capital(s) || SETTING_WORDS.is_match(s));
        if !detailed.is_empty() {
            return Some((detailed, SelectionPath::FictionDetail));
        }
    } else {
        let analytical = pick(&|s| {
            let lower = s.to_lowercase();
            ANALYTICAL_VERBS.iter().any(|v| lower.contains(v))
        });
        if !analytical.is_empty() {
            return Some((analytical, SelectionPath::Analytical));
        }
    }

    let long = pick(&|s| s.split_whitespace().count() > MIN_FALLBACK_WORDS);
    if !long.is_empty() {
        return Some((long, SelectionPath::LongSentences));
    }

    None
}

/// A capitalized word anywhere after the first word
fn has_inner_capital(sentence: &str) -> bool {
    sentence.split_whitespace().skip(1).any(|word| {
        word.trim_start_matches(|c: char| !c.is_alphanumeric())
            .chars()
            .next()
            .is_some_and(char::is_uppercase)
    })
}

/// Join sentences as `"<s>. "` while the total stays within
/// [`SYNOPSIS_LIMIT`]; `None` if not even the first one fits
fn join_within_limit(sentences: &[&str]) -> Option<String> {
    let mut synopsis = String::new();
    let mut length = 0;

    for sentence in sentences {
        let piece = format!("{}. ", sentence.trim_end_matches(['.', '!', '?']).trim());
        let piece_length = piece.chars().count();
        if length + piece_length > SYNOPSIS_LIMIT {
            break;
        }
        synopsis.push_str(&piece);
        length += piece_length;
    }

    let synopsis = synopsis.trim_end();
    if synopsis.is_empty() {
        None
    } else {
        Some(synopsis.to_string())
    }
}

/// First [`TRUNCATE_AT`] characters plus an ellipsis, for descriptions
/// longer than 200 characters
pub fn truncate_description(description: &str) -> String {
    let description = description.trim();
    if description.chars().count() <= TRUNCATE_AT + 3 {
        return description.to_string();
    }

    let cut: String = description.chars().take(TRUNCATE_AT).collect();
    format!("{}...", cut.trim_end())
}
