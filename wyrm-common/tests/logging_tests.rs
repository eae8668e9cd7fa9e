//! Tests for the logging bootstrap
//!
//! Output is captured through a scoped subscriber; tests that touch
//! RUST_LOG or WYRM_LOG_LEVEL are #[serial].

use serial_test::serial;
use std::env;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;
use wyrm_common::config::{ConfigResolver, LoggingConfig, CONFIG_PATH_ENV, LOG_LEVEL_ENV};
use wyrm_common::logging;

#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    fn output(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn clear_env() {
    env::remove_var("RUST_LOG");
    env::remove_var(LOG_LEVEL_ENV);
    env::remove_var(CONFIG_PATH_ENV);
}

fn level(level: &str) -> LoggingConfig {
    LoggingConfig {
        level: level.to_string(),
    }
}

#[test]
#[serial]
fn test_missing_config_warning_is_logged() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let capture = CaptureWriter::default();
    let (subscriber, handle) = logging::subscriber(None, capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let config = ConfigResolver::new(Some(missing)).resolve().unwrap();
        handle.apply_config(&config.logging).unwrap();
    });

    let output = capture.output();
    assert!(output.contains("Config file not found at"), "got: {}", output);
    assert!(output.contains("nope.toml"));
}

#[test]
#[serial]
fn test_config_level_applied_after_bootstrap() {
    clear_env();
    let capture = CaptureWriter::default();
    let (subscriber, handle) = logging::subscriber(None, capture.clone());
    assert!(!handle.is_pinned());

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("before config");
        handle.apply_config(&level("warn")).unwrap();
        tracing::info!("after config");
        tracing::warn!("still shown");
    });

    let output = capture.output();
    assert!(output.contains("before config"));
    assert!(!output.contains("after config"));
    assert!(output.contains("still shown"));
}

#[test]
#[serial]
fn test_cli_level_pins_filter() {
    clear_env();
    let capture = CaptureWriter::default();
    let (subscriber, handle) = logging::subscriber(Some("debug"), capture.clone());
    assert!(handle.is_pinned());

    tracing::subscriber::with_default(subscriber, || {
        handle.apply_config(&level("error")).unwrap();
        tracing::debug!("debug survives");
    });

    assert!(capture.output().contains("debug survives"));
}

#[test]
#[serial]
fn test_env_level_used_before_config() {
    clear_env();
    env::set_var(LOG_LEVEL_ENV, "error");

    let capture = CaptureWriter::default();
    let (subscriber, handle) = logging::subscriber(None, capture.clone());
    assert!(!handle.is_pinned());

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!("hidden warning");
        tracing::error!("visible error");
    });

    let output = capture.output();
    assert!(!output.contains("hidden warning"));
    assert!(output.contains("visible error"));

    clear_env();
}
