//! Soft enrichment lookups and the import pipeline
//!
//! An [`EnrichmentSource`] answers work and edition lookups with
//! `Option`: network failures, missing records and malformed payloads all
//! come back as `None` and the import carries on with less data.

use crate::error::{LookupError, ReconcileError};
use crate::reconciler::isbn::select_isbn;
use crate::reconciler::{reconcile, validate_hit};
use crate::services::open_library::OpenLibraryClient;
use crate::types::{BookDraft, EditionDetail, SearchHit, WorkDetail};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of optional work and edition detail
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    /// Work detail for a work key; `None` on any failure
    async fn fetch_work_detail(&self, work_key: &str) -> Option<WorkDetail>;

    /// Edition detail for a normalized ISBN; `None` on any failure
    async fn fetch_edition_detail(&self, isbn: &str) -> Option<EditionDetail>;
}

#[async_trait]
impl<T: EnrichmentSource + ?Sized> EnrichmentSource for Arc<T> {
    async fn fetch_work_detail(&self, work_key: &str) -> Option<WorkDetail> {
        (**self).fetch_work_detail(work_key).await
    }

    async fn fetch_edition_detail(&self, isbn: &str) -> Option<EditionDetail> {
        (**self).fetch_edition_detail(isbn).await
    }
}

#[async_trait]
impl EnrichmentSource for OpenLibraryClient {
    async fn fetch_work_detail(&self, work_key: &str) -> Option<WorkDetail> {
        if work_key.trim().is_empty() {
            return None;
        }
        absorb("work", work_key, self.lookup_work(work_key).await)
    }

    async fn fetch_edition_detail(&self, isbn: &str) -> Option<EditionDetail> {
        if isbn.trim().is_empty() {
            return None;
        }
        absorb("edition", isbn, self.lookup_edition(isbn).await)
    }
}

/// Turn a strict lookup result into a soft one
fn absorb<T>(kind: &str, id: &str, result: Result<T, LookupError>) -> Option<T> {
    match result {
        Ok(detail) => Some(detail),
        Err(LookupError::NotFound(_)) => {
            debug!(kind = kind, id = %id, "No record found, continuing without it");
            None
        }
        Err(e) => {
            warn!(kind = kind, id = %id, error = %e, "Lookup failed, continuing without it");
            None
        }
    }
}

/// Runs enrichment and reconciliation for one search hit
pub struct BookImporter<S> {
    source: S,
}

impl<S: EnrichmentSource> BookImporter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Import a hit: both lookups run concurrently, then everything merges
    ///
    /// Work lookup needs a work key, edition lookup needs a usable ISBN;
    /// a lookup without its input is skipped.
    pub async fn import(&self, hit: &SearchHit) -> Result<BookDraft, ReconcileError> {
        validate_hit(hit)?;

        let work_key = hit
            .work_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());
        let isbn = select_isbn(&hit.isbn);

        let work_lookup = async {
            match work_key {
                Some(key) => self.source.fetch_work_detail(key).await,
                None => None,
            }
        };
        let edition_lookup = async {
            match isbn.as_deref() {
                Some(isbn) => self.source.fetch_edition_detail(isbn).await,
                None => None,
            }
        };

        let (work, edition) = tokio::join!(work_lookup, edition_lookup);

        debug!(
            title = %hit.title,
            work_key = ?work_key,
            isbn = ?isbn,
            work_found = work.is_some(),
            edition_found = edition.is_some(),
            "Enrichment complete"
        );

        reconcile(hit, work.as_ref(), edition.as_ref())
    }
}
