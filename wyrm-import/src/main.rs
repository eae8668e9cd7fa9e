//! wyrm-import - book metadata import CLI
//!
//! Searches Open Library, enriches a hit with its work and edition records,
//! and prints the reconciled book as JSON on stdout. Logs go to stderr.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wyrm_common::config::ConfigResolver;
use wyrm_common::logging::init_logging;
use wyrm_import::services::{OlEditionRecord, OlWorkRecord};
use wyrm_import::{
    reconcile, BookDraft, BookFields, BookImporter, EditionDetail, OpenLibraryClient, SearchHit,
    WorkDetail,
};

/// Command-line arguments for wyrm-import
#[derive(Parser, Debug)]
#[command(name = "wyrm-import")]
#[command(about = "Find a book and reconcile its metadata into one record")]
#[command(version)]
struct Args {
    /// Config file (overrides WYRM_CONFIG and the platform default)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level or filter directive, e.g. "debug" or "wyrm_import=trace"
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search and print matching hits
    Search {
        query: String,

        /// Maximum number of hits (defaults to the configured limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search, enrich one hit and print the reconciled book
    Import {
        query: String,

        /// Index of the hit to import
        #[arg(long, default_value = "0")]
        pick: usize,

        /// Print the backend field set instead of the draft
        #[arg(long)]
        fields: bool,

        /// Reader's own notes, stored after the vibes text
        #[arg(long, requires = "fields")]
        thoughts: Option<String>,
    },

    /// Reconcile offline from JSON files
    Reconcile {
        /// SearchHit JSON
        #[arg(long, value_name = "FILE")]
        hit: PathBuf,

        /// Raw work record JSON
        #[arg(long, value_name = "FILE")]
        work: Option<PathBuf>,

        /// Raw edition record JSON
        #[arg(long, value_name = "FILE")]
        edition: Option<PathBuf>,

        /// Print the backend field set instead of the draft
        #[arg(long)]
        fields: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging comes up first so config loading can report problems
    let log_level = init_logging(args.log_level.as_deref())?;

    let config = ConfigResolver::new(args.config.clone())
        .resolve()
        .context("Failed to load configuration")?;
    log_level.apply_config(&config.logging)?;
    debug!(base_url = %config.open_library.base_url, "Configuration resolved");

    match args.command {
        Command::Search { query, limit } => {
            let client = OpenLibraryClient::new(&config.open_library)?;
            let hits = client.search(&query, limit).await?;
            print_json(&hits)
        }
        Command::Import {
            query,
            pick,
            fields,
            thoughts,
        } => {
            let client = OpenLibraryClient::new(&config.open_library)?;
            let hits = client.search(&query, None).await?;
            let found = hits.len();
            let hit = hits
                .into_iter()
                .nth(pick)
                .ok_or_else(|| anyhow!("No search hit at index {} ({} found)", pick, found))?;

            info!(title = %hit.title, author = %hit.author, "Importing search hit");

            let importer = BookImporter::new(client);
            let draft = importer.import(&hit).await?;
            print_draft(&draft, fields, thoughts.as_deref())
        }
        Command::Reconcile {
            hit,
            work,
            edition,
            fields,
        } => {
            let hit: SearchHit = read_json(&hit)?;
            let work = work
                .map(|path| read_json::<OlWorkRecord>(&path).map(WorkDetail::from))
                .transpose()?;
            let edition = edition
                .map(|path| read_json::<OlEditionRecord>(&path).map(EditionDetail::from))
                .transpose()?;

            let draft = reconcile(&hit, work.as_ref(), edition.as_ref())?;
            print_draft(&draft, fields, None)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_draft(draft: &BookDraft, fields: bool, thoughts: Option<&str>) -> Result<()> {
    if fields {
        print_json(&BookFields::from_draft(draft, thoughts))
    } else {
        print_json(draft)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
