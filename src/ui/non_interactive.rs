//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{PiprError, Result};

use super::{answer_from_text, OutputMode, Prompt, PromptResult, SpinnerHandle, Table, UserInterface};

/// Prefix of environment variables that answer prompts.
const PROMPT_ENV_PREFIX: &str = "PIPR_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `PIPR_PROMPT_<KEY>` environment variables or
/// the prompt's default. When running in CI (detected via `is_ci()`),
/// spinner lines are suppressed since they only add noise to build logs.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    is_ci: bool,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            env_overrides: prompt_overrides_from_env(),
            is_ci: crate::shell::is_ci(),
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            is_ci: false,
        }
    }

    /// Create with explicit CI flag (for testing).
    pub fn with_ci(mode: OutputMode, is_ci: bool) -> Self {
        Self {
            mode,
            env_overrides: prompt_overrides_from_env(),
            is_ci,
        }
    }
}

fn prompt_overrides_from_env() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
        .collect()
}

/// Environment variable that answers the prompt with `key`.
///
/// `install_scikit-learn` becomes `PIPR_PROMPT_INSTALL_SCIKIT_LEARN`.
pub fn prompt_env_key(key: &str) -> String {
    let normalized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", PROMPT_ENV_PREFIX, normalized)
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        if let Some(value) = self.env_overrides.get(&prompt_env_key(&prompt.key)) {
            return Ok(answer_from_text(&prompt.prompt_type, value));
        }

        if let Some(default) = &prompt.default {
            return Ok(answer_from_text(&prompt.prompt_type, default));
        }

        Err(PiprError::Other(anyhow::anyhow!(
            "Cannot prompt for '{}' in non-interactive mode (no default value)",
            prompt.key
        )))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let quiet = self.is_ci || !self.mode.shows_spinners();
        if !quiet {
            println!("  {}", message);
        }
        Box::new(NoopSpinner)
    }

    fn show_table(&mut self, table: &Table) {
        if self.mode.shows_report() {
            println!("{}", table.render());
        }
    }
}

/// Spinner stand-in; the start line is all a log gets.
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn finish_clear(&mut self) {}
}
