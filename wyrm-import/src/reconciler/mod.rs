//! Metadata reconciler
//!
//! Turns one SearchHit, plus optional WorkDetail and EditionDetail records,
//! into a normalized BookDraft. Pure and deterministic: no I/O happens here.
//!
//! # Field priority
//! Edition data > work data > search hit > absent. A lower-priority source
//! never replaces a value already supplied by a higher one.
//!
//! | Field      | Sources, highest first                                          |
//! |------------|-----------------------------------------------------------------|
//! | publisher  | edition.publishers[0], hit.publisher[0]                         |
//! | language   | edition language name, work original language, hit.language[0] |
//! | page count | edition pages, edition pagination, hit pages, hit pagination    |
//! | chapters   | work chapters, edition chapters, work ToC, edition ToC          |
//! | isbn       | hit.isbn: 13-digit, else 10-digit, else first                   |
//! | description| hit.description, work.description                               |

pub mod chapters;
pub mod isbn;
pub mod language;
pub mod merge;
pub mod synopsis;
pub mod tags;
pub mod warnings;

use crate::error::ReconcileError;
use crate::types::{BookDraft, EditionDetail, SearchHit, WorkDetail};
use merge::{FieldMerge, Source};
use tracing::debug;

pub use tags::extract_tags;
pub use warnings::extract_warnings;

/// Check the caller contract: title and author must be present
pub fn validate_hit(hit: &SearchHit) -> Result<(), ReconcileError> {
    if hit.title.trim().is_empty() {
        return Err(ReconcileError::MissingField("title"));
    }
    if hit.author.trim().is_empty() {
        return Err(ReconcileError::MissingField("author"));
    }
    Ok(())
}

/// Merge all sources into one BookDraft
///
/// Fails only when the hit has no title or author.
pub fn reconcile(
    hit: &SearchHit,
    work: Option<&WorkDetail>,
    edition: Option<&EditionDetail>,
) -> Result<BookDraft, ReconcileError> {
    validate_hit(hit)?;

    let publisher = FieldMerge::new("publisher")
        .or(Source::Edition, || edition?.publishers.first().cloned())
        .or(Source::SearchHit, || {
            hit.publisher.as_ref()?.first().map(str::to_string)
        })
        .resolve();

    let language = FieldMerge::new("language")
        .or(Source::Edition, || edition?.language.clone())
        .or(Source::Work, || {
            work?
                .original_language_code
                .as_deref()
                .map(language::resolve_language)
        })
        .or(Source::SearchHit, || {
            hit.language.as_ref()?.first().map(str::to_string)
        })
        .resolve();

    let page_count = FieldMerge::new("page_count")
        .or(Source::Edition, || edition?.number_of_pages)
        .or(Source::Edition, || {
            edition?
                .pagination
                .as_deref()
                .and_then(chapters::parse_pagination)
        })
        .or(Source::SearchHit, || hit.page_count)
        .or(Source::SearchHit, || {
            hit.pagination.as_deref().and_then(chapters::parse_pagination)
        })
        .resolve();

    let number_of_chapters = FieldMerge::new("number_of_chapters")
        .or(Source::Work, || work?.number_of_chapters)
        .or(Source::Edition, || edition?.number_of_chapters)
        .or(Source::Work, || {
            chapters::count_toc_chapters(&work?.table_of_contents)
        })
        .or(Source::Edition, || {
            chapters::count_toc_chapters(&edition?.table_of_contents)
        })
        .resolve();

    let isbn = isbn::select_isbn(&hit.isbn);

    let description = FieldMerge::new("description")
        .or(Source::SearchHit, || hit.description_text().map(str::to_string))
        .or(Source::Work, || work?.description.clone())
        .resolve();

    let vibes_text = synopsis::build_vibes_text(hit, description.as_deref());

    let heuristic_text = heuristic_text(hit, &vibes_text, description.as_deref());
    let tags = extract_tags(&heuristic_text, &hit.subjects);
    let content_warnings = extract_warnings(&heuristic_text, &hit.subjects);

    debug!(
        title = %hit.title,
        enriched_work = work.is_some(),
        enriched_edition = edition.is_some(),
        tags = tags.len(),
        warnings = content_warnings.len(),
        "Reconciled book draft"
    );

    Ok(BookDraft {
        title: hit.title.clone(),
        author: hit.author.clone(),
        publication_year: hit.published_year,
        isbn,
        publisher,
        language,
        page_count,
        number_of_chapters,
        vibes_text,
        tags,
        content_warnings,
    })
}

/// Text scanned for tags and warnings: the vibes text without the author
/// byline, followed by the full description
fn heuristic_text(hit: &SearchHit, vibes_text: &str, description: Option<&str>) -> String {
    let byline = format!("{} by {}", hit.title, hit.author);
    let mut text = match vibes_text.strip_prefix(&byline) {
        Some(rest) => format!("{}{}", hit.title, rest),
        None => vibes_text.to_string(),
    };

    if let Some(description) = description {
        text.push(' ');
        text.push_str(description);
    }
    text
}
