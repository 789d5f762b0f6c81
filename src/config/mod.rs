//! Configuration loading for pipr.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and overrides in [`loader`]
//!
//! # Example
//!
//! ```
//! use pipr::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".pipr.yml"), "python: python3.12").unwrap();
//!
//! let config = load_config(temp.path()).unwrap();
//! assert_eq!(config.python.as_deref(), Some("python3.12"));
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    config_path, load_config, load_config_file, load_with_overrides, parse_config,
    ConfigOverrides, CONFIG_FILE,
};
pub use schema::{OutputMode, PiprConfig, DEFAULT_INSTALL_FILE, DEFAULT_MANIFEST};
