//! wyrm-import library interface
//!
//! Book metadata import: search a bibliographic API, enrich the chosen hit
//! with work and edition records, and reconcile everything into one
//! normalized [`BookDraft`].

pub mod book_fields;
pub mod error;
pub mod reconciler;
pub mod services;
pub mod types;

pub use crate::book_fields::{split_vibes_and_thoughts, BookFields};
pub use crate::error::{LookupError, ReconcileError};
pub use crate::reconciler::{extract_tags, extract_warnings, reconcile};
pub use crate::services::{BookImporter, EnrichmentSource, OpenLibraryClient};
pub use crate::types::{BookDraft, EditionDetail, SearchHit, TocEntry, WorkDetail};
