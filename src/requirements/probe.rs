//! Installed-package probes.
//!
//! A [`PackageProbe`] answers one question: which version of a distribution
//! does the target interpreter have installed? Production code asks the
//! interpreter itself through `importlib.metadata`; tests use [`MapProbe`].
//!
//! # Example
//!
//! ```
//! use pipr::requirements::probe::{MapProbe, PackageProbe};
//!
//! let probe = MapProbe::new().with("Requests", "2.28.1");
//! assert_eq!(probe.installed_version("requests").unwrap().as_deref(), Some("2.28.1"));
//! assert_eq!(probe.installed_version("numpy").unwrap(), None);
//! ```

use std::collections::HashMap;

use crate::error::{PiprError, Result};
use crate::requirements::manifest::canonicalize_name;
use crate::shell;

/// Snippet run by [`InterpreterProbe`]; exits non-zero when the
/// distribution is not installed.
const VERSION_SNIPPET: &str = "import sys\n\
from importlib import metadata\n\
try:\n    print(metadata.version(sys.argv[1]))\n\
except metadata.PackageNotFoundError:\n    sys.exit(1)\n";

/// Lookup of installed package versions.
pub trait PackageProbe {
    /// Installed version of `name`, or `None` when it isn't installed.
    ///
    /// `Err` means the probe itself could not run.
    fn installed_version(&self, name: &str) -> Result<Option<String>>;
}

/// Probe that asks a Python interpreter via `importlib.metadata`.
#[derive(Debug, Clone)]
pub struct InterpreterProbe {
    python: String,
}

impl InterpreterProbe {
    /// Probe packages installed for `python`.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// The interpreter this probe runs.
    pub fn python(&self) -> &str {
        &self.python
    }
}

impl PackageProbe for InterpreterProbe {
    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        let result = shell::execute_quiet(&self.python, &["-c", VERSION_SNIPPET, name])
            .map_err(|e| PiprError::ProbeFailed {
                package: name.to_string(),
                message: format!("could not run {}: {}", self.python, e),
            })?;

        if !result.success {
            tracing::debug!("{} is not installed for {}", name, self.python);
            return Ok(None);
        }

        let version = result.stdout.trim();
        if version.is_empty() {
            return Ok(None);
        }
        tracing::debug!("{} {} found for {}", name, version, self.python);
        Ok(Some(version.to_string()))
    }
}

/// In-memory probe keyed by canonical package name.
#[derive(Debug, Clone, Default)]
pub struct MapProbe {
    versions: HashMap<String, String>,
}

impl MapProbe {
    /// Create an empty probe; every lookup reports "not installed".
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an installed package.
    pub fn with(mut self, name: &str, version: &str) -> Self {
        self.insert(name, version);
        self
    }

    /// Record an installed package.
    pub fn insert(&mut self, name: &str, version: &str) {
        self.versions
            .insert(canonicalize_name(name), version.to_string());
    }
}

impl PackageProbe for MapProbe {
    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        Ok(self.versions.get(&canonicalize_name(name)).cloned())
    }
}
