//! Field-wise priority merge
//!
//! Each BookDraft field lists its candidate sources from highest to lowest
//! priority. Candidates are evaluated lazily and the first present value
//! wins; later sources are never consulted once a value is found.

use tracing::trace;

/// Where a merged value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Edition,
    Work,
    SearchHit,
}

/// Values that can be "empty" even when present
pub trait Present {
    fn is_present(&self) -> bool;
}

impl Present for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Present for u32 {
    fn is_present(&self) -> bool {
        *self > 0
    }
}

type Getter<'a, T> = Box<dyn FnOnce() -> Option<T> + 'a>;

/// Ordered list of (source, getter) candidates for one field
pub struct FieldMerge<'a, T> {
    field: &'static str,
    candidates: Vec<(Source, Getter<'a, T>)>,
}

impl<'a, T: Present> FieldMerge<'a, T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            candidates: Vec::new(),
        }
    }

    /// Append a lower-priority candidate
    pub fn or(mut self, source: Source, getter: impl FnOnce() -> Option<T> + 'a) -> Self {
        self.candidates.push((source, Box::new(getter)));
        self
    }

    /// First present value in priority order
    pub fn resolve(self) -> Option<T> {
        self.resolve_with_source().map(|(value, _)| value)
    }

    /// First present value along with the source that supplied it
    pub fn resolve_with_source(self) -> Option<(T, Source)> {
        for (source, getter) in self.candidates {
            if let Some(value) = getter().filter(Present::is_present) {
                trace!(field = self.field, source = ?source, "Field resolved");
                return Some((value, source));
            }
        }
        trace!(field = self.field, "Field omitted, no source");
        None
    }
}
