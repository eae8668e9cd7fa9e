//! Open Library API client
//!
//! Search, work and edition lookups against the public Open Library API.
//! Raw responses are post-processed into SearchHit / WorkDetail /
//! EditionDetail here, so nothing downstream sees the wire shapes.
//!
//! # API Reference
//! - Search: `GET /search.json?q=<query>&limit=<n>`
//! - Work: `GET /works/<id>.json`
//! - Edition by ISBN: `GET /isbn/<isbn>.json` (redirects to the edition)

use crate::error::LookupError;
use crate::reconciler::chapters::derive_chapter_count;
use crate::reconciler::language::{edition_language_name, language_code_from_key, work_language_code};
use crate::types::{
    lenient, lenient_vec, EditionDetail, EditionLanguage, FirstSentence, OneOrMany, SearchHit,
    TextValue, TocEntry, WorkDetail,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use wyrm_common::config::OpenLibraryConfig;

/// Fields requested from the search endpoint
const SEARCH_FIELDS: &str = "key,title,author_name,first_publish_year,isbn,publisher,language,\
number_of_pages_median,subject,first_sentence,description";

// ============================================================================
// Raw response types
// ============================================================================
//
// Every optional field goes through `lenient` / `lenient_vec` or a
// catch-all enum, so a wrong-shaped field drops only itself.

/// Search response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct OlSearchResponse {
    #[serde(default, rename = "numFound", deserialize_with = "lenient")]
    pub num_found: u64,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub docs: Vec<OlSearchDoc>,
}

/// One search result document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OlSearchDoc {
    /// Work key, e.g. `/works/OL893415W`
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub author_name: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub isbn: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub publisher: Option<OneOrMany<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<OneOrMany<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub number_of_pages_median: Option<u32>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub subject: Vec<String>,
    #[serde(default)]
    pub first_sentence: Option<FirstSentence>,
    #[serde(default)]
    pub description: Option<TextValue>,
}

impl OlSearchDoc {
    /// Convert to a SearchHit; `None` when title or author is missing
    pub fn into_hit(self) -> Option<SearchHit> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let author = self
            .author_name
            .into_iter()
            .find(|a| !a.trim().is_empty())?;

        Some(SearchHit {
            title,
            author,
            published_year: self.first_publish_year,
            isbn: self.isbn,
            publisher: self.publisher,
            language: self.language,
            page_count: self.number_of_pages_median,
            pagination: None,
            subjects: self.subject,
            description: self.description,
            first_sentence: self.first_sentence,
            work_key: self.key,
        })
    }
}

/// `{ "key": "/languages/eng" }`; entries without a usable key are skipped
#[derive(Debug, Clone, Deserialize)]
pub struct OlKeyRef {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
}

/// Excerpt attached to a work or edition
#[derive(Debug, Clone, Deserialize)]
pub struct OlExcerpt {
    #[serde(default)]
    pub excerpt: Option<TextValue>,
}

/// Count that may arrive as a number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseCount {
    Number(u32),
    Text(String),
    Other(Value),
}

impl LooseCount {
    pub fn value(&self) -> Option<u32> {
        let count = match self {
            LooseCount::Number(n) => Some(*n),
            LooseCount::Text(s) => s.trim().parse().ok(),
            LooseCount::Other(_) => None,
        };
        count.filter(|n| *n > 0)
    }
}

fn excerpt_texts(excerpts: &[OlExcerpt]) -> Vec<&str> {
    excerpts
        .iter()
        .filter_map(|e| e.excerpt.as_ref().and_then(TextValue::text))
        .collect()
}

fn language_keys(refs: &[OlKeyRef]) -> Vec<&str> {
    refs.iter().filter_map(|r| r.key.as_deref()).collect()
}

/// Work record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OlWorkRecord {
    #[serde(default)]
    pub number_of_chapters: Option<LooseCount>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub table_of_contents: Vec<TocEntry>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub excerpts: Vec<OlExcerpt>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub original_languages: Vec<OlKeyRef>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub languages: Vec<OlKeyRef>,
    /// Plain string or `{ "type": "/type/text", "value": ... }`
    #[serde(default)]
    pub description: Option<TextValue>,
}

impl From<OlWorkRecord> for WorkDetail {
    fn from(record: OlWorkRecord) -> Self {
        let number_of_chapters = derive_chapter_count(
            record.number_of_chapters.as_ref().and_then(LooseCount::value),
            &record.table_of_contents,
            excerpt_texts(&record.excerpts),
        );

        let original_language_code = work_language_code(
            &language_keys(&record.original_languages),
            &language_keys(&record.languages),
        );

        let description = record
            .description
            .as_ref()
            .and_then(TextValue::text)
            .map(str::to_string);

        WorkDetail {
            number_of_chapters,
            original_language_code,
            table_of_contents: record.table_of_contents,
            description,
        }
    }
}

/// Language entry on an edition, with the ways a record can flag it original
#[derive(Debug, Clone, Deserialize)]
pub struct OlEditionLanguage {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_original: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub original: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
}

impl OlEditionLanguage {
    pub fn flagged_original(&self) -> bool {
        self.is_original == Some(true)
            || self.original == Some(true)
            || self.key.as_deref().is_some_and(|k| k.contains("/original/"))
            || self
                .role
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case("original"))
    }
}

/// Edition record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OlEditionRecord {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub publishers: Vec<TextValue>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub languages: Vec<OlEditionLanguage>,
    #[serde(default)]
    pub number_of_pages: Option<LooseCount>,
    #[serde(default)]
    pub pagination: Option<TextValue>,
    #[serde(default)]
    pub number_of_chapters: Option<LooseCount>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub table_of_contents: Vec<TocEntry>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub excerpts: Vec<OlExcerpt>,
}

impl From<OlEditionRecord> for EditionDetail {
    fn from(record: OlEditionRecord) -> Self {
        let number_of_chapters = derive_chapter_count(
            record.number_of_chapters.as_ref().and_then(LooseCount::value),
            &record.table_of_contents,
            excerpt_texts(&record.excerpts),
        );

        let languages: Vec<EditionLanguage> = record
            .languages
            .iter()
            .filter_map(|l| {
                let code = l.key.as_deref().and_then(language_code_from_key)?;
                Some(EditionLanguage {
                    code: code.to_string(),
                    is_original: l.flagged_original(),
                })
            })
            .collect();
        let language = edition_language_name(&languages);

        EditionDetail {
            publishers: record
                .publishers
                .iter()
                .filter_map(TextValue::text)
                .map(str::to_string)
                .collect(),
            languages,
            language,
            number_of_pages: record.number_of_pages.as_ref().and_then(LooseCount::value),
            pagination: record
                .pagination
                .as_ref()
                .and_then(TextValue::text)
                .map(str::to_string),
            number_of_chapters,
            table_of_contents: record.table_of_contents,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Enforces a minimum spacing between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the configured interval
    async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Open Library API client
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
    search_limit: usize,
    rate_limiter: Arc<RateLimiter>,
}

impl OpenLibraryClient {
    pub fn new(config: &OpenLibraryConfig) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit,
            rate_limiter: Arc::new(RateLimiter::new(config.min_request_interval_ms)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Free-text search; docs without title or author are skipped
    ///
    /// `limit` of `None` uses the configured search limit.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchHit>, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = limit.unwrap_or(self.search_limit).to_string();
        let url = format!("{}/search.json", self.base_url);

        self.rate_limiter.wait().await;
        tracing::debug!(query = %query, url = %url, "Searching Open Library");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", query), ("limit", limit.as_str()), ("fields", SEARCH_FIELDS)])
            .send()
            .await?;

        let results: OlSearchResponse = Self::read_json(response, query).await?;
        let total = results.docs.len();

        let hits: Vec<SearchHit> = results
            .docs
            .into_iter()
            .filter_map(|doc| {
                let key = doc.key.clone();
                let hit = doc.into_hit();
                if hit.is_none() {
                    tracing::debug!(key = ?key, "Skipping search doc without title or author");
                }
                hit
            })
            .collect();

        tracing::info!(
            query = %query,
            found = results.num_found,
            returned = total,
            usable = hits.len(),
            "Open Library search complete"
        );

        Ok(hits)
    }

    /// Work record by key (`OL45804W` or `/works/OL45804W`)
    pub async fn lookup_work(&self, work_key: &str) -> Result<WorkDetail, LookupError> {
        let id = work_id(work_key)
            .ok_or_else(|| LookupError::NotFound(format!("invalid work key: {}", work_key)))?;
        let url = format!("{}/works/{}.json", self.base_url, id);

        let record: OlWorkRecord = self.get_json(&url, work_key).await?;
        let detail = WorkDetail::from(record);

        tracing::debug!(
            work_key = %work_key,
            chapters = ?detail.number_of_chapters,
            language = ?detail.original_language_code,
            "Retrieved work from Open Library"
        );

        Ok(detail)
    }

    /// Edition record by normalized ISBN
    pub async fn lookup_edition(&self, isbn: &str) -> Result<EditionDetail, LookupError> {
        let isbn = isbn.trim();
        if isbn.is_empty() {
            return Err(LookupError::NotFound("empty ISBN".to_string()));
        }
        let url = format!("{}/isbn/{}.json", self.base_url, isbn);

        let record: OlEditionRecord = self.get_json(&url, isbn).await?;
        let detail = EditionDetail::from(record);

        tracing::debug!(
            isbn = %isbn,
            publisher = ?detail.publishers.first(),
            pages = ?detail.number_of_pages,
            language = ?detail.language,
            "Retrieved edition from Open Library"
        );

        Ok(detail)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, LookupError> {
        self.rate_limiter.wait().await;
        tracing::debug!(url = %url, "Querying Open Library");

        let response = self.http_client.get(url).send().await?;
        Self::read_json(response, what).await
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, LookupError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LookupError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))
    }
}

/// Bare work id from a key: `/works/OL45804W` → `OL45804W`
pub fn work_id(work_key: &str) -> Option<&str> {
    work_key
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}
