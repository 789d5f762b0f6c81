//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the collaborators every command works through
//! - [`CommandDispatcher`] for picking the command a command line asks for

use std::path::{Path, PathBuf};

use crate::cli::args::Cli;
use crate::config::PiprConfig;
use crate::error::{PiprError, Result};
use crate::notify::{DesktopNotifier, Notifier, NullNotifier};
use crate::requirements::{
    parse_file, InterpreterProbe, Installer, PackageInstaller, PackageProbe, PipInstaller,
    Platform, RequirementRecord,
};
use crate::ui::UserInterface;

use super::check::{CheckCommand, Decision};
use super::completions::CompletionsCommand;
use super::force_install::ForceInstallCommand;
use super::resume::ResumeCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Everything a command needs besides the UI.
///
/// Production collaborators are built by [`CommandDispatcher::dispatch`];
/// tests build a context from fakes.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub project_root: &'a Path,
    pub config: &'a PiprConfig,
    pub platform: Platform,
    pub probe: &'a dyn PackageProbe,
    pub backend: &'a dyn PackageInstaller,
    pub notifier: &'a dyn Notifier,
}

impl<'a> CommandContext<'a> {
    /// Resolved manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.config.manifest_path(self.project_root)
    }

    /// Resolved install file path.
    pub fn install_file_path(&self) -> PathBuf {
        self.config.install_file_path(self.project_root)
    }

    /// Retry loop bound to this context's install file.
    pub fn installer(&self, force_retry: bool) -> Installer<'a> {
        Installer::new(self.backend, self.notifier, self.install_file_path())
            .with_force_retry(force_retry)
    }

    /// Parse the manifest, rejecting one without requirements.
    pub fn load_manifest(&self) -> Result<Vec<RequirementRecord>> {
        let path = self.manifest_path();
        let records = parse_file(&path, self.platform)?;
        if records.is_empty() {
            return Err(PiprError::EmptyManifest { path });
        }
        Ok(records)
    }
}

/// Dispatches a command line to its command implementation.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config: PiprConfig,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root and resolved config.
    pub fn new(project_root: PathBuf, config: PiprConfig) -> Self {
        Self {
            project_root,
            config,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the resolved configuration.
    pub fn config(&self) -> &PiprConfig {
        &self.config
    }

    /// Dispatch and execute a command with the production collaborators.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Some(shell) = cli.completions {
            return CompletionsCommand::new(shell).execute(ui);
        }

        let python = self.config.python_or_default();
        let probe = InterpreterProbe::new(python);
        let installer = PipInstaller::new(python).with_echo(ui.output_mode().shows_report());
        let notifier: Box<dyn Notifier> = if self.config.notifications {
            Box::new(DesktopNotifier)
        } else {
            Box::new(NullNotifier)
        };

        let ctx = CommandContext {
            project_root: &self.project_root,
            config: &self.config,
            platform: Platform::current(),
            probe: &probe,
            backend: &installer,
            notifier: notifier.as_ref(),
        };

        self.dispatch_with(cli, ctx, ui)
    }

    /// Pick and execute the command for `cli` using `ctx`.
    ///
    /// A pending install file is resumed before anything else, unless the
    /// run is summary-only. Manifest problems end the run with exit code 1.
    pub fn dispatch_with(
        &self,
        cli: &Cli,
        ctx: CommandContext<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let result = if !cli.is_summary_only() && ctx.installer(false).has_pending() {
            ResumeCommand::new(ctx, cli.force_retry).execute(ui)
        } else if cli.force_install {
            ForceInstallCommand::new(ctx, cli.force_retry).execute(ui)
        } else {
            let decision = if cli.is_summary_only() {
                Decision::Summary
            } else if cli.yes {
                Decision::AcceptAll
            } else {
                Decision::Prompt
            };
            CheckCommand::new(ctx, decision, cli.json, cli.force_retry).execute(ui)
        };

        match result {
            Err(
                e @ (PiprError::ManifestNotFound { .. }
                | PiprError::ManifestUnreadable { .. }
                | PiprError::EmptyManifest { .. }),
            ) => {
                report_manifest_error(ui, &e);
                Ok(CommandResult::failure(1))
            }
            other => other,
        }
    }
}

fn report_manifest_error(ui: &mut dyn UserInterface, error: &PiprError) {
    ui.error(&error.to_string());
    match error {
        PiprError::ManifestNotFound { .. } => {
            ui.message("Pass a manifest path, or run pipr from the directory holding requirements.txt.");
            ui.message("See `pipr --help` for usage.");
        }
        PiprError::EmptyManifest { .. } => {
            ui.message("Add one requirement per line, for example `requests>=2.25.0`.");
        }
        _ => {}
    }
}
