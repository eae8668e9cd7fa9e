//! End-to-end reconciliation from recorded Open Library payloads

use serde_json::json;
use wyrm_import::services::open_library::OlSearchResponse;
use wyrm_import::services::{OlEditionRecord, OlWorkRecord};
use wyrm_import::{reconcile, BookFields, EditionDetail, SearchHit, WorkDetail};

fn dune_hits() -> Vec<SearchHit> {
    let response: OlSearchResponse =
        serde_json::from_str(include_str!("fixtures/dune_search.json")).unwrap();
    response
        .docs
        .into_iter()
        .filter_map(|doc| doc.into_hit())
        .collect()
}

fn dune_work() -> WorkDetail {
    let record: OlWorkRecord =
        serde_json::from_str(include_str!("fixtures/dune_work.json")).unwrap();
    record.into()
}

fn dune_edition() -> EditionDetail {
    let record: OlEditionRecord =
        serde_json::from_str(include_str!("fixtures/dune_edition.json")).unwrap();
    record.into()
}

#[test]
fn test_dune_description_without_enrichment() {
    let hit: SearchHit = serde_json::from_value(json!({
        "title": "Dune",
        "author": "Frank Herbert",
        "publishedYear": 1965,
        "subjects": ["science fiction", "desert planet"],
        "description": "The story of Paul Atreides on the desert world of Arrakis."
    }))
    .unwrap();

    let draft = reconcile(&hit, None, None).unwrap();

    assert_eq!(draft.title, "Dune");
    assert_eq!(draft.author, "Frank Herbert");
    assert_eq!(draft.publication_year, Some(1965));
    assert_eq!(
        draft.vibes_text,
        "Dune by Frank Herbert, published in 1965. Categories include science fiction, \
         desert planet. The story of Paul Atreides on the desert world of Arrakis."
    );
    assert_eq!(draft.tags, vec!["science-fiction", "sci-fi", "desert", "space"]);
    assert!(draft.content_warnings.is_empty());

    assert_eq!(draft.isbn, None);
    assert_eq!(draft.publisher, None);
    assert_eq!(draft.language, None);
    assert_eq!(draft.page_count, None);
    assert_eq!(draft.number_of_chapters, None);
}

#[test]
fn test_absent_fields_not_serialized() {
    let hit = SearchHit::new("Emma", "Jane Austen");
    let draft = reconcile(&hit, None, None).unwrap();

    let json = serde_json::to_value(&draft).unwrap();
    let object = json.as_object().unwrap();

    for absent in ["publicationYear", "isbn", "publisher", "language", "pageCount", "numberOfChapters"] {
        assert!(!object.contains_key(absent), "{} should be omitted", absent);
    }
    assert_eq!(object["vibesText"], "Emma by Jane Austen.");
    assert_eq!(object["tags"], json!([]));
}

#[test]
fn test_search_docs_without_author_are_skipped() {
    let hits = dune_hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].work_key.as_deref(), Some("/works/OL893415W"));
}

#[test]
fn test_dune_hit_only() {
    let hit = &dune_hits()[0];
    let draft = reconcile(hit, None, None).unwrap();

    assert_eq!(draft.isbn.as_deref(), Some("9780441013593"));
    assert_eq!(draft.publisher.as_deref(), Some("Chilton Books"));
    assert_eq!(draft.language.as_deref(), Some("eng"));
    assert_eq!(draft.page_count, Some(612));
    assert_eq!(
        draft.vibes_text,
        "Dune by Frank Herbert, published in 1965. Categories include Science Fiction, \
         Desert planets. Opening line: \"A beginning is the time for taking the most \
         delicate care that the balances are correct.\""
    );
    assert_eq!(draft.tags, vec!["science-fiction", "sci-fi", "desert", "space"]);
}

#[test]
fn test_dune_with_work_only() {
    let hit = &dune_hits()[0];
    let work = dune_work();
    assert_eq!(work.original_language_code.as_deref(), Some("eng"));
    assert_eq!(work.number_of_chapters, None);

    let draft = reconcile(hit, Some(&work), None).unwrap();

    assert_eq!(draft.language.as_deref(), Some("English"));
    assert_eq!(draft.publisher.as_deref(), Some("Chilton Books"));
    assert_eq!(draft.page_count, Some(612));
    assert_eq!(draft.number_of_chapters, None);
    assert_eq!(
        draft.vibes_text,
        "Dune by Frank Herbert, published in 1965. Categories include Science Fiction, \
         Desert planets. The story of Paul Atreides, heir to House Atreides, on the desert \
         planet Arrakis."
    );
    assert_eq!(draft.tags, vec!["science-fiction", "sci-fi", "desert", "space"]);
    assert!(draft.content_warnings.is_empty());
}

#[test]
fn test_work_description_used_for_bare_hit() {
    let hit = SearchHit::new("Dune", "Frank Herbert");
    let draft = reconcile(&hit, Some(&dune_work()), None).unwrap();

    assert_eq!(
        draft.vibes_text,
        "Dune by Frank Herbert. The story of Paul Atreides, heir to House Atreides, \
         on the desert planet Arrakis."
    );
    assert_eq!(draft.tags, vec!["desert", "space"]);
}

#[test]
fn test_dune_fully_enriched() {
    let hit = &dune_hits()[0];
    let draft = reconcile(hit, Some(&dune_work()), Some(&dune_edition())).unwrap();

    assert_eq!(draft.publisher.as_deref(), Some("Ace Books"));
    assert_eq!(draft.language.as_deref(), Some("English"));
    assert_eq!(draft.page_count, Some(896));
    assert_eq!(draft.number_of_chapters, Some(3));
    assert_eq!(draft.isbn.as_deref(), Some("9780441013593"));
}

#[test]
fn test_edition_does_not_change_text_fields() {
    let hit = &dune_hits()[0];
    let work = dune_work();
    let bare = reconcile(hit, Some(&work), None).unwrap();
    let enriched = reconcile(hit, Some(&work), Some(&dune_edition())).unwrap();

    assert_eq!(bare.vibes_text, enriched.vibes_text);
    assert_eq!(bare.tags, enriched.tags);
    assert_eq!(bare.content_warnings, enriched.content_warnings);
}

#[test]
fn test_reconcile_is_deterministic() {
    let hit = &dune_hits()[0];
    let work = dune_work();
    let edition = dune_edition();

    let first = reconcile(hit, Some(&work), Some(&edition)).unwrap();
    let second = reconcile(hit, Some(&work), Some(&edition)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_backend_fields_from_enriched_draft() {
    let hit = &dune_hits()[0];
    let draft = reconcile(hit, Some(&dune_work()), Some(&dune_edition())).unwrap();
    let fields = BookFields::from_draft(&draft, None);

    let json = serde_json::to_value(&fields).unwrap();
    assert_eq!(json["publication_date"], "1965-01-01");
    assert_eq!(json["tags"], "science-fiction, sci-fi, desert, space");
    assert_eq!(json["page_count"], 896);
    assert!(json.get("vibes").is_none());
    assert_eq!(json["book_notes"], draft.vibes_text.as_str());
}

#[test]
fn test_malformed_optional_fields_are_absorbed() {
    let hit: SearchHit = serde_json::from_value(json!({
        "title": "Odd Record",
        "author": "Someone",
        "description": { "unexpected": true },
        "firstSentence": 1234,
        "publisher": [],
        "language": ["  "]
    }))
    .unwrap();

    let draft = reconcile(&hit, None, None).unwrap();
    assert_eq!(draft.publisher, None);
    assert_eq!(draft.language, None);
    assert_eq!(draft.vibes_text, "Odd Record by Someone. Opening line: \"1234\"");
}
