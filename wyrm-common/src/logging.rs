//! Logging bootstrap
//!
//! The subscriber is installed before configuration is resolved, so
//! warnings from config loading are not lost. It starts at the level named
//! by `RUST_LOG`, `--log-level` or `WYRM_LOG_LEVEL` (in that order, default
//! `info`); once the config file is loaded its level is applied through a
//! reload handle. `RUST_LOG` and `--log-level` pin the filter and are never
//! overridden by the file.

use crate::config::{LoggingConfig, LOG_LEVEL_ENV};
use crate::error::{Error, Result};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

const DEFAULT_LEVEL: &str = "info";

/// Adjusts the installed filter once configuration is known
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned: bool,
}

impl LogLevelHandle {
    /// True when `RUST_LOG` or `--log-level` chose the filter
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Switch to the configured level unless the filter is pinned
    pub fn apply_config(&self, config: &LoggingConfig) -> Result<()> {
        let level = config.level.trim();
        if self.pinned || level.is_empty() {
            return Ok(());
        }

        self.handle
            .reload(parse_filter(level))
            .map_err(|e| Error::Internal(format!("Failed to apply log level {}: {}", level, e)))
    }
}

/// Build the bootstrap subscriber writing to `writer`
pub fn subscriber<W>(
    cli_level: Option<&str>,
    writer: W,
) -> (impl Subscriber + Send + Sync + 'static, LogLevelHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, pinned) = bootstrap_filter(cli_level);
    let (filter, handle) = reload::Layer::new(filter);

    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(writer));

    (subscriber, LogLevelHandle { handle, pinned })
}

/// Install the stderr subscriber as the global default
pub fn init_logging(cli_level: Option<&str>) -> Result<LogLevelHandle> {
    let (subscriber, handle) = subscriber(cli_level, std::io::stderr);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Internal(format!("Failed to install log subscriber: {}", e)))?;
    Ok(handle)
}

fn bootstrap_filter(cli_level: Option<&str>) -> (EnvFilter, bool) {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return (filter, true);
    }

    if let Some(level) = cli_level.map(str::trim).filter(|l| !l.is_empty()) {
        return (parse_filter(level), true);
    }

    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    (parse_filter(&level), false)
}

/// Unparseable directives fall back to the default level
fn parse_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}
