//! Flat book record for the persistence backend
//!
//! The backend stores tags and content warnings ("vibes") as single
//! comma-separated columns capped at 255 characters, and keeps the vibes
//! text and the reader's own notes together in `book_notes`, split by
//! [`VIBES_SEPARATOR`]. Scalar columns have widths too: a value that
//! cannot fit is cut (text) or dropped (ISBN).

use crate::types::BookDraft;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Marker between the vibes text and the reader's thoughts in `book_notes`
pub const VIBES_SEPARATOR: &str = "--VIBES_SEPARATOR--";

/// Column width of the `tags` and `vibes` fields
pub const LIST_FIELD_MAX: usize = 255;

/// Column width of `title`, `author` and `publisher`
pub const TEXT_FIELD_MAX: usize = 255;

/// Column width of `isbn`
pub const ISBN_MAX: usize = 13;

/// Column width of `language`
pub const LANGUAGE_MAX: usize = 50;

const LIST_JOIN: &str = ", ";

/// Book record as the backend stores it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Content warnings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibes: Option<String>,
    pub book_notes: String,
}

impl BookFields {
    /// Map a draft, optionally attaching the reader's thoughts
    pub fn from_draft(draft: &BookDraft, thoughts: Option<&str>) -> Self {
        Self {
            title: cap_chars(&draft.title, TEXT_FIELD_MAX),
            author: cap_chars(&draft.author, TEXT_FIELD_MAX),
            // A cut ISBN is a different ISBN
            isbn: draft
                .isbn
                .clone()
                .filter(|isbn| isbn.chars().count() <= ISBN_MAX),
            publication_date: draft
                .publication_year
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
            publisher: draft
                .publisher
                .as_deref()
                .map(|p| cap_chars(p, TEXT_FIELD_MAX)),
            language: draft
                .language
                .as_deref()
                .map(|l| cap_chars(l, LANGUAGE_MAX)),
            page_count: draft.page_count,
            tags: join_capped(&draft.tags, LIST_FIELD_MAX),
            vibes: join_capped(&draft.content_warnings, LIST_FIELD_MAX),
            book_notes: compose_book_notes(&draft.vibes_text, thoughts),
        }
    }
}

/// `"<vibes>\n\n--VIBES_SEPARATOR--\n\n<thoughts>"`, or the vibes alone
/// when there are no thoughts
pub fn compose_book_notes(vibes_text: &str, thoughts: Option<&str>) -> String {
    match thoughts.map(str::trim).filter(|t| !t.is_empty()) {
        Some(thoughts) => format!("{}\n\n{}\n\n{}", vibes_text, VIBES_SEPARATOR, thoughts),
        None => vibes_text.to_string(),
    }
}

/// Split stored notes back into `(vibes, thoughts)`
///
/// Without a separator the whole text counts as thoughts.
pub fn split_vibes_and_thoughts(notes: &str) -> (String, String) {
    match notes.split_once(VIBES_SEPARATOR) {
        Some((vibes, thoughts)) => (vibes.trim().to_string(), thoughts.trim().to_string()),
        None => (String::new(), notes.to_string()),
    }
}

/// First `max` characters, trailing whitespace trimmed
fn cap_chars(value: &str, max: usize) -> String {
    let capped: String = value.chars().take(max).collect();
    capped.trim_end().to_string()
}

/// Join with ", ", dropping whole trailing entries until it fits `max` chars
fn join_capped(items: &[String], max: usize) -> Option<String> {
    let mut joined = String::new();
    let mut length = 0;

    for item in items {
        let separator = if joined.is_empty() { 0 } else { LIST_JOIN.len() };
        let item_length = item.chars().count();
        if length + separator + item_length > max {
            break;
        }
        if separator > 0 {
            joined.push_str(LIST_JOIN);
        }
        joined.push_str(item);
        length += separator + item_length;
    }

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BookDraft {
        BookDraft {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            publication_year: Some(1965),
            isbn: Some("9780441013593".to_string()),
            vibes_text: "Dune by Frank Herbert, published in 1965.".to_string(),
            tags: vec!["sci-fi".to_string(), "desert".to_string()],
            content_warnings: vec!["Violence".to_string(), "Death".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_from_draft() {
        let fields = BookFields::from_draft(&draft(), None);

        assert_eq!(fields.publication_date, NaiveDate::from_ymd_opt(1965, 1, 1));
        assert_eq!(fields.tags.as_deref(), Some("sci-fi, desert"));
        assert_eq!(fields.vibes.as_deref(), Some("Violence, Death"));
        assert_eq!(fields.book_notes, "Dune by Frank Herbert, published in 1965.");
        assert_eq!(fields.publisher, None);
    }

    #[test]
    fn test_absent_fields_omitted_from_json() {
        let mut bare = draft();
        bare.tags.clear();
        bare.content_warnings.clear();
        bare.publication_year = None;

        let json = serde_json::to_value(BookFields::from_draft(&bare, None)).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("tags"));
        assert!(!object.contains_key("vibes"));
        assert!(!object.contains_key("publication_date"));
        assert!(!object.contains_key("page_count"));
        assert_eq!(object["isbn"], "9780441013593");
    }

    #[test]
    fn test_publication_date_serializes_iso() {
        let json = serde_json::to_value(BookFields::from_draft(&draft(), None)).unwrap();
        assert_eq!(json["publication_date"], "1965-01-01");
    }

    #[test]
    fn test_book_notes_with_thoughts_round_trip() {
        let fields = BookFields::from_draft(&draft(), Some("Loved the sandworms."));
        assert_eq!(
            fields.book_notes,
            "Dune by Frank Herbert, published in 1965.\n\n--VIBES_SEPARATOR--\n\nLoved the sandworms."
        );

        let (vibes, thoughts) = split_vibes_and_thoughts(&fields.book_notes);
        assert_eq!(vibes, "Dune by Frank Herbert, published in 1965.");
        assert_eq!(thoughts, "Loved the sandworms.");
    }

    #[test]
    fn test_blank_thoughts_ignored() {
        assert_eq!(compose_book_notes("vibes", Some("   ")), "vibes");
    }

    #[test]
    fn test_split_without_separator() {
        let (vibes, thoughts) = split_vibes_and_thoughts("just my notes");
        assert_eq!(vibes, "");
        assert_eq!(thoughts, "just my notes");
    }

    #[test]
    fn test_overlong_isbn_dropped() {
        let mut long = draft();
        long.isbn = Some("97804410135931234".to_string());
        assert_eq!(BookFields::from_draft(&long, None).isbn, None);

        let mut ten = draft();
        ten.isbn = Some("0441013597".to_string());
        assert_eq!(BookFields::from_draft(&ten, None).isbn.as_deref(), Some("0441013597"));
    }

    #[test]
    fn test_scalar_columns_capped() {
        let mut long = draft();
        long.language = Some("Language ".repeat(10));
        long.publisher = Some("p".repeat(300));
        long.title = "t".repeat(256);
        long.author = "Frank Herbert".to_string();

        let fields = BookFields::from_draft(&long, None);
        let language = fields.language.unwrap();
        assert!(language.chars().count() <= LANGUAGE_MAX);
        assert!(language.starts_with("Language Language"));
        assert!(!language.ends_with(' '));
        assert_eq!(fields.publisher.unwrap().chars().count(), TEXT_FIELD_MAX);
        assert_eq!(fields.title.chars().count(), TEXT_FIELD_MAX);
        assert_eq!(fields.author, "Frank Herbert");
    }

    #[test]
    fn test_list_cut_at_whole_entry() {
        let items: Vec<String> = (0..30).map(|i| format!("warning-{:02}", i)).collect();
        let joined = join_capped(&items, LIST_FIELD_MAX).unwrap();

        assert!(joined.chars().count() <= LIST_FIELD_MAX);
        assert!(joined.ends_with(char::is_numeric));
        // 10 chars per entry + 2 per separator: 21 entries use 250
        assert_eq!(joined.split(", ").count(), 21);
    }
}
