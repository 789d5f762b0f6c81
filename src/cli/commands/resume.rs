//! Resuming an install left behind by an earlier run.

use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Installs straight from a pending install file.
///
/// No manifest is read. The run exits 0 whatever the install outcome; an
/// unresolved install simply leaves the file for the next run.
pub struct ResumeCommand<'a> {
    ctx: CommandContext<'a>,
    force_retry: bool,
}

impl<'a> ResumeCommand<'a> {
    /// Create a new resume command.
    pub fn new(ctx: CommandContext<'a>, force_retry: bool) -> Self {
        Self { ctx, force_retry }
    }
}

impl Command for ResumeCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let installer = self.ctx.installer(self.force_retry);
        ui.warning(&format!(
            "Found {}, installing directly...",
            installer.install_file().display()
        ));

        let outcome = installer.install_from_file(ui)?;
        tracing::debug!("Resumed install finished: {:?}", outcome);
        Ok(CommandResult::success())
    }
}
