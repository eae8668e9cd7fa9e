//! # Wyrm Common Library
//!
//! Shared code for the wyrm book-cataloging services:
//! - Error type and result alias
//! - Bootstrap configuration (TOML file, environment overrides, defaults)
//! - Logging bootstrap with a reloadable level

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
