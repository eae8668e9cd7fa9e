//! External services used during import

pub mod enrichment;
pub mod open_library;

pub use enrichment::{BookImporter, EnrichmentSource};
pub use open_library::{OlEditionRecord, OlWorkRecord, OpenLibraryClient};
