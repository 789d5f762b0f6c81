//! Package installation with retries.
//!
//! Installation always goes through the install file: the planned tokens
//! are written to it, pip installs from it, and it is deleted only after a
//! successful install. A file left behind is picked up by the next run.
//!
//! Each batch runs as a small state machine:
//!
//! ```text
//! Idle -> Running -> Success
//!            ^   \-> Failed -> (forced retry | confirmed retry) -> Running
//!                              \-> declined -> Unresolved
//! ```
//!
//! A forced retry happens at most once per batch; confirmed retries are
//! unbounded but each one is asked for.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{PiprError, Result};
use crate::notify::{notify_quietly, Notifier, Priority};
use crate::shell::{self, OutputLine};
use crate::ui::{Prompt, PromptType, UserInterface};

/// Runs the package manager against an install file.
pub trait PackageInstaller {
    /// Install everything listed in `install_file`.
    ///
    /// Fails with [`PiprError::InstallFailed`] when the install doesn't
    /// succeed.
    fn install(&self, install_file: &Path) -> Result<()>;

    /// Command line shown to the user before an attempt.
    fn describe(&self, install_file: &Path) -> String;
}

/// Installs with `{python} -m pip install -r {file}`.
#[derive(Debug, Clone)]
pub struct PipInstaller {
    python: String,
    echo_output: bool,
}

impl PipInstaller {
    /// Create an installer for `python`, echoing pip's output.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            echo_output: true,
        }
    }

    /// Whether pip's output is forwarded to the terminal.
    pub fn with_echo(mut self, echo_output: bool) -> Self {
        self.echo_output = echo_output;
        self
    }

    fn args(install_file: &Path) -> Vec<String> {
        vec![
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            "-r".to_string(),
            install_file.to_string_lossy().to_string(),
        ]
    }
}

impl PackageInstaller for PipInstaller {
    fn install(&self, install_file: &Path) -> Result<()> {
        let args = Self::args(install_file);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = shell::display_command(&self.python, &args);
        let echo = self.echo_output;

        let result = shell::execute_streaming(
            &self.python,
            &args,
            Box::new(move |line| {
                if !echo {
                    return;
                }
                match line {
                    OutputLine::Stdout(l) => {
                        let _ = writeln!(io::stdout(), "{}", l);
                    }
                    OutputLine::Stderr(l) => {
                        let _ = writeln!(io::stderr(), "{}", l);
                    }
                }
            }),
        )
        .map_err(|e| PiprError::InstallFailed {
            command: command.clone(),
            code: None,
            stderr: e.to_string(),
        })?;

        if result.success {
            Ok(())
        } else {
            Err(PiprError::InstallFailed {
                command,
                code: result.exit_code,
                stderr: result.stderr,
            })
        }
    }

    fn describe(&self, install_file: &Path) -> String {
        let args = Self::args(install_file);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        shell::display_command(&self.python, &args)
    }
}

/// Where an install batch is in its lifecycle.
#[derive(Debug)]
pub enum InstallState {
    /// Nothing attempted yet.
    Idle,
    /// An attempt is about to run.
    Running { attempt: u32 },
    /// The last attempt succeeded.
    Success,
    /// The last attempt failed.
    Failed { attempt: u32, error: PiprError },
}

/// How an install batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Packages installed and the install file removed.
    Installed,
    /// The user stopped retrying; the install file is kept for next time.
    Unresolved,
}

/// Drives install attempts for one install file.
pub struct Installer<'a> {
    backend: &'a dyn PackageInstaller,
    notifier: &'a dyn Notifier,
    install_file: PathBuf,
    force_retry: bool,
}

impl<'a> Installer<'a> {
    /// Create an installer writing to and installing from `install_file`.
    pub fn new(
        backend: &'a dyn PackageInstaller,
        notifier: &'a dyn Notifier,
        install_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            backend,
            notifier,
            install_file: install_file.into(),
            force_retry: false,
        }
    }

    /// Retry once automatically after the first failure of each batch.
    pub fn with_force_retry(mut self, force_retry: bool) -> Self {
        self.force_retry = force_retry;
        self
    }

    /// Path of the install file.
    pub fn install_file(&self) -> &Path {
        &self.install_file
    }

    /// Whether a non-empty install file is waiting from an earlier run.
    pub fn has_pending(&self) -> bool {
        fs::metadata(&self.install_file).is_ok_and(|m| m.is_file() && m.len() > 0)
    }

    /// Write `packages` to the install file and install from it.
    pub fn run_install(
        &self,
        packages: &[String],
        ui: &mut dyn UserInterface,
    ) -> Result<InstallOutcome> {
        fs::write(&self.install_file, packages.join("\n"))?;
        tracing::debug!(
            "Wrote {} package(s) to {}",
            packages.len(),
            self.install_file.display()
        );
        self.install_from_file(ui)
    }

    /// Install from the existing install file, retrying as configured.
    pub fn install_from_file(&self, ui: &mut dyn UserInterface) -> Result<InstallOutcome> {
        let mut force_retry = self.force_retry;
        let mut state = InstallState::Idle;

        loop {
            state = match state {
                InstallState::Idle => InstallState::Running { attempt: 1 },

                InstallState::Running { attempt } => {
                    ui.message(&format!(
                        ">>> Running: {}",
                        self.backend.describe(&self.install_file)
                    ));
                    tracing::info!("Install attempt {}", attempt);
                    match self.backend.install(&self.install_file) {
                        Ok(()) => InstallState::Success,
                        Err(error @ PiprError::InstallFailed { .. }) => {
                            InstallState::Failed { attempt, error }
                        }
                        Err(other) => return Err(other),
                    }
                }

                InstallState::Success => {
                    self.finish_success(ui)?;
                    return Ok(InstallOutcome::Installed);
                }

                InstallState::Failed { attempt, error } => {
                    ui.error(&format!("Install error: {}", error));
                    if let Some(diagnostic) = error.install_diagnostic() {
                        ui.error(diagnostic);
                    }
                    notify_quietly(
                        self.notifier,
                        "Install Error",
                        &format!("Failed from {}", self.install_file.display()),
                        Priority::High,
                    );

                    if force_retry {
                        force_retry = false;
                        ui.warning("Retrying installation (force mode)...");
                        InstallState::Running {
                            attempt: attempt + 1,
                        }
                    } else if self.confirm_retry(ui) {
                        InstallState::Running {
                            attempt: attempt + 1,
                        }
                    } else {
                        tracing::info!(
                            "Leaving {} for the next run",
                            self.install_file.display()
                        );
                        return Ok(InstallOutcome::Unresolved);
                    }
                }
            };
        }
    }

    fn finish_success(&self, ui: &mut dyn UserInterface) -> Result<()> {
        notify_quietly(
            self.notifier,
            "Install Success",
            &format!("Installed from {}", self.install_file.display()),
            Priority::Normal,
        );

        match fs::remove_file(&self.install_file) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        ui.success(&format!(
            "Removed {} after successful install",
            self.install_file.display()
        ));
        Ok(())
    }

    fn confirm_retry(&self, ui: &mut dyn UserInterface) -> bool {
        let prompt = Prompt {
            key: "retry_install".to_string(),
            question: "Retry installation?".to_string(),
            prompt_type: PromptType::Confirm,
            default: Some("no".to_string()),
        };

        ui.prompt(&prompt)
            .ok()
            .and_then(|r| r.as_bool())
            .unwrap_or(false)
    }
}
