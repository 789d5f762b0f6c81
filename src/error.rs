//! Error types for pipr operations.
//!
//! This module defines [`PiprError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Manifest errors (`ManifestNotFound`, `ManifestUnreadable`, `EmptyManifest`)
//!   are fatal and abort the run
//! - Per-record errors (`SpecifierSyntax`, `InvalidVersion`, `ProbeFailed`)
//!   skip the record and get reported, the batch continues
//! - `InstallFailed` feeds the installer's retry loop
//! - `NotificationFailed` is only ever logged
//! - Use `anyhow::Error` (via `PiprError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pipr operations.
#[derive(Debug, Error)]
pub enum PiprError {
    /// Requirements manifest does not exist.
    #[error("Requirements file not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Requirements manifest exists but could not be read.
    #[error("Failed to read requirements file {path}: {source}")]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest contained no parseable requirement lines.
    #[error("Requirements file {path} has no requirements")]
    EmptyManifest { path: PathBuf },

    /// A version specifier could not be parsed.
    #[error("Invalid version specifier '{specifier}': {message}")]
    SpecifierSyntax { specifier: String, message: String },

    /// A version string could not be parsed.
    #[error("Invalid version '{version}': {message}")]
    InvalidVersion { version: String, message: String },

    /// The environment probe could not determine an installed version.
    #[error("Could not probe '{package}': {message}")]
    ProbeFailed { package: String, message: String },

    /// The package installer exited unsuccessfully.
    #[error("Install command failed ({}): {command}", exit_status(.code))]
    InstallFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A desktop notification could not be delivered.
    #[error("Notification failed: {message}")]
    NotificationFailed { message: String },

    /// Failed to parse the project configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PiprError {
    /// Whether this error only affects a single requirement record.
    ///
    /// Record-level errors are reported next to the record and never abort
    /// the batch.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            PiprError::SpecifierSyntax { .. }
                | PiprError::InvalidVersion { .. }
                | PiprError::ProbeFailed { .. }
        )
    }

    /// Diagnostic text captured from a failed install, trimmed.
    pub fn install_diagnostic(&self) -> Option<&str> {
        match self {
            PiprError::InstallFailed { stderr, .. } => {
                Some(stderr.trim()).filter(|text| !text.is_empty())
            }
            _ => None,
        }
    }
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "did not run to completion".to_string(),
    }
}

/// Result type alias for pipr operations.
pub type Result<T> = std::result::Result<T, PiprError>;
