//! Installing every requirement without checking.

use crate::error::Result;
use crate::requirements::InstallOutcome;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Installs each declared requirement in its own batch, in manifest order.
///
/// Nothing is classified and nothing is confirmed; each batch still goes
/// through the installer's retry loop.
pub struct ForceInstallCommand<'a> {
    ctx: CommandContext<'a>,
    force_retry: bool,
}

impl<'a> ForceInstallCommand<'a> {
    /// Create a new force-install command.
    pub fn new(ctx: CommandContext<'a>, force_retry: bool) -> Self {
        Self { ctx, force_retry }
    }
}

impl Command for ForceInstallCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let records = self.ctx.load_manifest()?;
        let installer = self.ctx.installer(self.force_retry);

        let mut unresolved = Vec::new();
        for record in &records {
            let token = record.install_token();
            if installer.run_install(std::slice::from_ref(&token), ui)? == InstallOutcome::Unresolved {
                unresolved.push(token);
            }
        }

        if unresolved.is_empty() {
            ui.success(&format!("Installed {} requirement(s)", records.len()));
        } else {
            ui.error(&format!("Failed to install: {}", unresolved.join(", ")));
        }
        Ok(CommandResult::success())
    }
}
