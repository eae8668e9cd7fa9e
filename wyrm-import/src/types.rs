//! Core types for book import and reconciliation
//!
//! Inputs (SearchHit, WorkDetail, EditionDetail) are deliberately loose:
//! bibliographic APIs return the same field as a string, a list, or a
//! `{ "value": ... }` object depending on the record. The helper enums here
//! absorb those shapes so malformed optional data never fails a parse.
//!
//! The output (BookDraft) is strict: every optional field is either a real
//! value or absent.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Loose-shape helpers
// ============================================================================

/// A field that may be a single value or a list of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl OneOrMany<String> {
    /// First non-blank entry, trimmed
    pub fn first(&self) -> Option<&str> {
        match self {
            OneOrMany::One(s) => non_blank(s),
            OneOrMany::Many(items) => items.iter().find_map(|s| non_blank(s)),
        }
    }
}

/// Free text that may arrive as a plain string or as `{ "value": "..." }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    Typed { value: String },
    /// Any other shape; treated as absent
    Other(Value),
}

impl TextValue {
    /// Text content, if this is a recognizable non-blank string
    pub fn text(&self) -> Option<&str> {
        match self {
            TextValue::Plain(s) | TextValue::Typed { value: s } => non_blank(s),
            TextValue::Other(_) => None,
        }
    }
}

impl From<&str> for TextValue {
    fn from(s: &str) -> Self {
        TextValue::Plain(s.to_string())
    }
}

/// Opening line of a book: string, list of strings, `{ "value" }`, or anything else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FirstSentence {
    Text(String),
    List(Vec<Value>),
    Typed { value: String },
    Other(Value),
}

impl FirstSentence {
    /// Opening line as text; lists yield their first element, other
    /// scalars are coerced to a string
    pub fn text(&self) -> Option<String> {
        let text = match self {
            FirstSentence::Text(s) | FirstSentence::Typed { value: s } => s.clone(),
            FirstSentence::List(items) => coerce_to_string(items.first()?)?,
            FirstSentence::Other(v) => coerce_to_string(v)?,
        };
        non_blank(&text).map(str::to_string)
    }
}

fn coerce_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => match map.get("value") {
            Some(Value::String(s)) => Some(s.clone()),
            _ => Some(value.to_string()),
        },
        other => Some(other.to_string()),
    }
}

/// Type tag that may be a bare name or a `{ "key": "/type/chapter" }` reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Name(String),
    Keyed { key: String },
    Other(Value),
}

impl TypeRef {
    /// Trailing name of the type (`"/type/chapter"` → `"chapter"`)
    pub fn label(&self) -> Option<&str> {
        match self {
            TypeRef::Name(s) => Some(s.as_str()),
            TypeRef::Keyed { key } => key.rsplit('/').next(),
            TypeRef::Other(_) => None,
        }
    }
}

/// Returns the trimmed string unless it is empty
pub(crate) fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Field deserializer that treats a wrong-shaped value as absent
///
/// Used with `#[serde(default, deserialize_with = "lenient")]` so one
/// malformed optional field never fails the whole record.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// List deserializer that keeps the entries that parse and drops the rest
///
/// A bare scalar or object counts as a one-entry list; `null` is empty.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

// ============================================================================
// Inputs
// ============================================================================

/// One table-of-contents entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<TypeRef>,
}

impl TocEntry {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            kind: None,
        }
    }
}

/// A candidate book found by keyword search
///
/// `title` and `author` are required by contract. They default to empty
/// strings on deserialize so the reconciler can report which one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    /// Mixed ISBN-10 / ISBN-13 strings, possibly hyphenated
    #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub isbn: Vec<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub publisher: Option<OneOrMany<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub language: Option<OneOrMany<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub pagination: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_sentence: Option<FirstSentence>,
    /// Identifier for the work-detail lookup
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub work_key: Option<String>,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    /// Description text, unwrapped from `{ "value" }` if needed
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_ref().and_then(TextValue::text)
    }
}

/// Enrichment record for a work (abstract content, any printing)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDetail {
    #[serde(default)]
    pub number_of_chapters: Option<u32>,
    /// ISO 639-2 style code, e.g. `eng`
    #[serde(default)]
    pub original_language_code: Option<String>,
    #[serde(default)]
    pub table_of_contents: Vec<TocEntry>,
    /// Work-level description, used when the hit carries none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One language listed on an edition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionLanguage {
    pub code: String,
    #[serde(default)]
    pub is_original: bool,
}

/// Enrichment record for a specific edition, keyed by ISBN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionDetail {
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub languages: Vec<EditionLanguage>,
    /// Display name derived from `languages` (original first, else first listed)
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub number_of_pages: Option<u32>,
    /// Free-text pagination, e.g. `"xii, 412 p."`
    #[serde(default)]
    pub pagination: Option<String>,
    #[serde(default)]
    pub number_of_chapters: Option<u32>,
    #[serde(default)]
    pub table_of_contents: Vec<TocEntry>,
}

// ============================================================================
// Output
// ============================================================================

/// Normalized book record produced by one reconciliation
///
/// Built fresh per call and never mutated afterwards; the caller owns
/// persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    /// Digits plus an optional trailing `X`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_chapters: Option<u32>,
    pub vibes_text: String,
    /// At most five, de-duplicated
    #[serde(default)]
    pub tags: Vec<String>,
    /// De-duplicated, each capitalized
    #[serde(default)]
    pub content_warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_description_object_unwraps_value() {
        let hit: SearchHit = serde_json::from_value(json!({
            "title": "T",
            "author": "A",
            "description": { "type": "/type/text", "value": "A tale." }
        }))
        .unwrap();

        assert_eq!(hit.description_text(), Some("A tale."));
    }

    #[test]
    fn test_description_unknown_shape_is_absent() {
        let hit: SearchHit = serde_json::from_value(json!({
            "title": "T",
            "author": "A",
            "description": 42
        }))
        .unwrap();

        assert_eq!(hit.description_text(), None);
    }

    #[test]
    fn test_publisher_string_or_list() {
        let one: SearchHit =
            serde_json::from_value(json!({ "title": "T", "author": "A", "publisher": "Ace" }))
                .unwrap();
        let many: SearchHit = serde_json::from_value(
            json!({ "title": "T", "author": "A", "publisher": ["", "Chilton", "Ace"] }),
        )
        .unwrap();

        assert_eq!(one.publisher.unwrap().first(), Some("Ace"));
        assert_eq!(many.publisher.unwrap().first(), Some("Chilton"));
    }

    #[test]
    fn test_first_sentence_shapes() {
        let text: FirstSentence = serde_json::from_value(json!("Call me Ishmael.")).unwrap();
        let list: FirstSentence =
            serde_json::from_value(json!(["It was a dark night.", "ignored"])).unwrap();
        let typed: FirstSentence =
            serde_json::from_value(json!({ "type": "/type/text", "value": "In a hole." }))
                .unwrap();
        let number: FirstSentence = serde_json::from_value(json!(1984)).unwrap();
        let null: FirstSentence = serde_json::from_value(json!(null)).unwrap();

        assert_eq!(text.text().as_deref(), Some("Call me Ishmael."));
        assert_eq!(list.text().as_deref(), Some("It was a dark night."));
        assert_eq!(typed.text().as_deref(), Some("In a hole."));
        assert_eq!(number.text().as_deref(), Some("1984"));
        assert_eq!(null.text(), None);
    }

    #[test]
    fn test_type_ref_label() {
        let keyed: TypeRef = serde_json::from_value(json!({ "key": "/type/chapter" })).unwrap();
        let named: TypeRef = serde_json::from_value(json!("chapter")).unwrap();

        assert_eq!(keyed.label(), Some("chapter"));
        assert_eq!(named.label(), Some("chapter"));
    }

    #[test]
    fn test_malformed_optional_hit_fields_dropped_individually() {
        let hit: SearchHit = serde_json::from_value(json!({
            "title": "T",
            "author": "A",
            "publishedYear": "nineteen sixty-five",
            "isbn": ["9780441013593", 441013597, null],
            "pageCount": -3,
            "pagination": 412,
            "subjects": "Science fiction",
            "workKey": { "key": "/works/OL1W" }
        }))
        .unwrap();

        assert_eq!(hit.published_year, None);
        assert_eq!(hit.isbn, vec!["9780441013593".to_string()]);
        assert_eq!(hit.page_count, None);
        assert_eq!(hit.pagination, None);
        assert_eq!(hit.subjects, vec!["Science fiction".to_string()]);
        assert_eq!(hit.work_key, None);
    }

    #[test]
    fn test_missing_required_fields_deserialize_empty() {
        let hit: SearchHit = serde_json::from_value(json!({ "subjects": ["x"] })).unwrap();
        assert!(hit.title.is_empty());
        assert!(hit.author.is_empty());
    }

    #[test]
    fn test_draft_omits_absent_fields() {
        let draft = BookDraft {
            title: "T".to_string(),
            author: "A".to_string(),
            vibes_text: "T by A.".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&draft).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("isbn"));
        assert!(!obj.contains_key("pageCount"));
        assert!(!obj.contains_key("publicationYear"));
        assert_eq!(obj["title"], "T");
    }
}
