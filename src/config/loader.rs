//! Configuration file discovery and loading.
//!
//! The project configuration lives at `<project>/.pipr.yml`. It is
//! optional; without it every setting takes its default. Command-line
//! flags and `PIPR_*` environment variables are layered on top through
//! [`ConfigOverrides`].

use crate::config::schema::{OutputMode, PiprConfig};
use crate::error::{PiprError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Project configuration file name.
pub const CONFIG_FILE: &str = ".pipr.yml";

/// Path of the configuration file for `project_root`.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE)
}

/// Parse YAML content into PiprConfig.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<PiprConfig> {
    // An empty file is a valid, all-defaults config.
    if content.trim().is_empty() {
        return Ok(PiprConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| PiprError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `Io` if the file can't be read.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<PiprConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Load the project config, falling back to defaults when absent.
pub fn load_config(project_root: &Path) -> Result<PiprConfig> {
    let path = config_path(project_root);
    if !path.is_file() {
        tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, project_root.display());
        return Ok(PiprConfig::default());
    }

    tracing::debug!("Loading config from {}", path.display());
    load_config_file(&path)
}

/// Values from the command line and environment that beat the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub manifest: Option<PathBuf>,
    pub install_file: Option<PathBuf>,
    pub python: Option<String>,
    pub no_notify: bool,
    pub output: Option<OutputMode>,
}

impl ConfigOverrides {
    /// Apply these overrides to `config`.
    pub fn apply(self, mut config: PiprConfig) -> PiprConfig {
        if let Some(manifest) = self.manifest {
            config.manifest = manifest;
        }
        if let Some(install_file) = self.install_file {
            config.install_file = install_file;
        }
        if let Some(python) = self.python {
            config.python = Some(python);
        }
        if self.no_notify {
            config.notifications = false;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        config
    }
}

/// Load the project config and apply `overrides`.
pub fn load_with_overrides(project_root: &Path, overrides: ConfigOverrides) -> Result<PiprConfig> {
    Ok(overrides.apply(load_config(project_root)?))
}
