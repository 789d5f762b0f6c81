//! Configuration schema for `.pipr.yml`.
//!
//! Every field is optional in the file; missing fields take the defaults
//! below. Unknown keys are rejected so typos surface as parse errors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

/// Default install file name.
pub const DEFAULT_INSTALL_FILE: &str = "requirements-install.txt";

/// Root configuration structure for `.pipr.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PiprConfig {
    /// Requirements manifest, relative to the project root.
    pub manifest: PathBuf,

    /// Install file written before pip runs, relative to the project root.
    pub install_file: PathBuf,

    /// Python interpreter used to probe and install.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Send desktop notifications.
    pub notifications: bool,

    /// Default output mode.
    pub output: OutputMode,
}

impl Default for PiprConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            install_file: PathBuf::from(DEFAULT_INSTALL_FILE),
            python: None,
            notifications: true,
            output: OutputMode::default(),
        }
    }
}

impl PiprConfig {
    /// Manifest path resolved against `project_root`.
    pub fn manifest_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.manifest)
    }

    /// Install file path resolved against `project_root`.
    pub fn install_file_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.install_file)
    }

    /// Interpreter to run, falling back to the platform default.
    pub fn python_or_default(&self) -> &str {
        self.python
            .as_deref()
            .unwrap_or_else(|| crate::shell::default_python())
    }
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}
