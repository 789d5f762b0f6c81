//! The default command: check the manifest and resolve what's missing.
//!
//! Every record is classified first. Then, in manifest order, each result
//! gets a notification and, when it needs action, is offered to the run's
//! [`Decision`] policy before the next result is looked at. The report
//! table follows, and finally the accepted changes go to the installer.
//! JSON runs send no notifications.

use crate::error::{PiprError, Result};
use crate::notify::{notify_quietly, Priority};
use crate::requirements::{
    confirm_change, plan, CheckReport, ClassificationResult, Classifier, InstallOutcome,
    RequirementStatus,
};
use crate::ui::{should_use_colors, status_icon, PiprTheme, Table, UserInterface};
use crate::version::Pep440;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Title of the report table.
const REPORT_TITLE: &str = "Package Version Checker";

/// How proposed changes are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Ask about each change.
    Prompt,
    /// Accept every change.
    AcceptAll,
    /// Report only; nothing is offered or installed.
    Summary,
}

/// The check command implementation.
pub struct CheckCommand<'a> {
    ctx: CommandContext<'a>,
    decision: Decision,
    json: bool,
    force_retry: bool,
}

impl<'a> CheckCommand<'a> {
    /// Create a new check command.
    pub fn new(ctx: CommandContext<'a>, decision: Decision, json: bool, force_retry: bool) -> Self {
        Self {
            ctx,
            decision,
            json,
            force_retry,
        }
    }

    fn classify(&self, ui: &mut dyn UserInterface) -> Result<CheckReport> {
        let records = self.ctx.load_manifest()?;
        let classifier = Classifier::new(&Pep440);

        if self.json {
            return Ok(classifier.check(&records, self.ctx.probe));
        }

        let mut spinner = ui.start_spinner(&format!("Checking {} requirement(s)...", records.len()));
        let report = classifier.check(&records, self.ctx.probe);
        spinner.finish_clear();
        Ok(report)
    }

    fn decide(&self, ui: &mut dyn UserInterface, result: &ClassificationResult) -> bool {
        match self.decision {
            Decision::Prompt => confirm_change(ui, result),
            Decision::AcceptAll => true,
            Decision::Summary => false,
        }
    }

    fn render_report(&self, ui: &mut dyn UserInterface, report: &CheckReport) {
        let theme = if should_use_colors() {
            PiprTheme::new()
        } else {
            PiprTheme::plain()
        };

        let mut table =
            Table::new(vec!["Package", "Installed", "Required", "", "Status"]).with_title(REPORT_TITLE);
        for result in &report.results {
            let installed = result.installed_version.as_deref().unwrap_or("none");
            let required = result.record.specifier.as_deref().unwrap_or("-");
            table.add_row(vec![
                theme.highlight.apply_to(&result.record.name).to_string(),
                theme.installed.apply_to(installed).to_string(),
                theme.required.apply_to(required).to_string(),
                status_icon(result.status).to_string(),
                theme.format_status(result.status, &result.explanation()),
            ]);
        }
        ui.show_table(&table);

        for malformed in &report.malformed {
            ui.warning(&format!(
                "Skipped {} (line {}): {}",
                malformed.record.name, malformed.record.source_line, malformed.reason
            ));
        }

        if ui.output_mode().shows_details() {
            ui.message(&summary_line(report));
        }
    }

    fn emit_json(&self, ui: &mut dyn UserInterface, report: &CheckReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report).map_err(|e| PiprError::Other(e.into()))?;
        ui.message(&json);
        Ok(())
    }
}

impl Command for CheckCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.classify(ui)?;

        let results = report.results.iter().inspect(|result| {
            if !self.json {
                let (title, message, priority) = notification_for(result);
                notify_quietly(self.ctx.notifier, &title, &message, priority);
            }
        });
        let plan = plan(results, |_, result| self.decide(ui, result));

        if self.json {
            self.emit_json(ui, &report)?;
            return Ok(CommandResult::success());
        }

        self.render_report(ui, &report);

        if self.decision == Decision::Summary {
            let pending = report.actionable().count();
            if pending == 0 {
                ui.success("All requirements satisfied.");
            } else {
                ui.warning(&format!(
                    "{} requirement(s) need changes. Run without --summary-only to resolve them.",
                    pending
                ));
            }
            return Ok(CommandResult::success());
        }

        if plan.is_empty() {
            ui.success("All requirements satisfied. Nothing to install.");
            return Ok(CommandResult::success());
        }

        ui.warning(&format!(
            "Installing these packages: {}",
            plan.packages().join(", ")
        ));
        let outcome = self
            .ctx
            .installer(self.force_retry)
            .run_install(plan.packages(), ui)?;
        if outcome == InstallOutcome::Unresolved {
            ui.error("Some packages failed to install.");
        }

        Ok(CommandResult::success())
    }
}

/// Notification sent for one classification.
fn notification_for(result: &ClassificationResult) -> (String, String, Priority) {
    let name = &result.record.name;
    let installed = result.installed_version.as_deref().unwrap_or("none");
    let spec = result.record.specifier.as_deref().unwrap_or("");

    let (title, message) = match result.status {
        RequirementStatus::NotInstalled => {
            (format!("{} Missing", name), format!("{} is not installed.", name))
        }
        RequirementStatus::ExactMatch => (
            format!("{} OK", name),
            format!("{} {} matches {}", name, installed, spec),
        ),
        RequirementStatus::Mismatch => (
            format!("{} Mismatch", name),
            format!("{} {} != required {}", name, installed, spec),
        ),
        RequirementStatus::InRange => (
            format!("{} OK", name),
            format!("{} {} satisfies {}", name, installed, spec),
        ),
        RequirementStatus::OutOfRange => (
            format!("{} Out of range", name),
            format!("{} {} not in {}", name, installed, spec),
        ),
        RequirementStatus::Unconstrained => {
            (format!("{} Checked", name), format!("{} {}", name, installed))
        }
    };

    (title, message, Priority::Normal)
}

fn summary_line(report: &CheckReport) -> String {
    let counts: Vec<String> = [
        RequirementStatus::NotInstalled,
        RequirementStatus::Mismatch,
        RequirementStatus::OutOfRange,
        RequirementStatus::ExactMatch,
        RequirementStatus::InRange,
        RequirementStatus::Unconstrained,
    ]
    .into_iter()
    .filter_map(|status| {
        let n = report.count(status);
        (n > 0).then(|| format!("{} {}", n, status.label()))
    })
    .collect();

    let mut line = format!("{} checked", report.results.len());
    if !counts.is_empty() {
        line.push_str(&format!(": {}", counts.join(", ")));
    }
    if !report.malformed.is_empty() {
        line.push_str(&format!(", {} skipped", report.malformed.len()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PiprConfig;
    use crate::notify::{Notifier, RecordingNotifier};
    use crate::requirements::{MapProbe, PackageInstaller, Platform};
    use crate::ui::{MockUI, OutputMode, Prompt, PromptResult, SpinnerHandle};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Installer that records the install file contents of every attempt.
    struct CapturingInstaller {
        batches: RefCell<Vec<String>>,
        succeed: bool,
    }

    impl CapturingInstaller {
        fn new(succeed: bool) -> Self {
            Self {
                batches: RefCell::new(Vec::new()),
                succeed,
            }
        }
    }

    impl PackageInstaller for CapturingInstaller {
        fn install(&self, install_file: &Path) -> Result<()> {
            self.batches
                .borrow_mut()
                .push(fs::read_to_string(install_file).unwrap());
            if self.succeed {
                Ok(())
            } else {
                Err(PiprError::InstallFailed {
                    command: "pip install".to_string(),
                    code: Some(1),
                    stderr: String::new(),
                })
            }
        }

        fn describe(&self, _install_file: &Path) -> String {
            "pip install".to_string()
        }
    }

    struct Fixture {
        temp: TempDir,
        config: PiprConfig,
        probe: MapProbe,
        installer: CapturingInstaller,
        notifier: RecordingNotifier,
    }

    impl Fixture {
        fn new(manifest: &str, succeed: bool) -> Self {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join("requirements.txt"), manifest).unwrap();
            Self {
                temp,
                config: PiprConfig::default(),
                probe: MapProbe::new()
                    .with("pandas", "1.2.0")
                    .with("requests", "2.28.1")
                    .with("flask", "2.0.1"),
                installer: CapturingInstaller::new(succeed),
                notifier: RecordingNotifier::new(),
            }
        }

        fn run(&self, decision: Decision, json: bool, ui: &mut MockUI) -> CommandResult {
            let ctx = CommandContext {
                project_root: self.temp.path(),
                config: &self.config,
                platform: Platform::Linux,
                probe: &self.probe,
                backend: &self.installer,
                notifier: &self.notifier,
            };
            CheckCommand::new(ctx, decision, json, false)
                .execute(ui)
                .unwrap()
        }

        fn install_file(&self) -> std::path::PathBuf {
            self.temp.path().join("requirements-install.txt")
        }
    }

    const MANIFEST: &str = "numpy>=1.20.0\npandas==1.3.0\n# comment\n\nrequests\n";

    #[test]
    fn accepted_changes_are_installed_in_order() {
        let fixture = Fixture::new(MANIFEST, true);
        let mut ui = MockUI::new();
        ui.set_default_prompt_response("yes");

        let result = fixture.run(Decision::Prompt, false, &mut ui);

        assert_eq!(result.exit_code, 0);
        assert_eq!(
            fixture.installer.batches.borrow().as_slice(),
            ["numpy>=1.20.0\npandas==1.3.0"]
        );
        assert_eq!(ui.prompts_shown(), ["install_numpy", "install_pandas"]);
        assert_eq!(
            ui.questions_asked(),
            [
                "Install numpy (found none) >=1.20.0?",
                "Change pandas (found 1.2.0) to ==1.3.0?"
            ]
        );
        assert!(ui.has_warning("Installing these packages: numpy>=1.20.0, pandas==1.3.0"));
        assert!(!fixture.install_file().exists());
    }

    #[test]
    fn declined_changes_install_nothing() {
        let fixture = Fixture::new(MANIFEST, true);
        let mut ui = MockUI::new();

        fixture.run(Decision::Prompt, false, &mut ui);

        assert!(fixture.installer.batches.borrow().is_empty());
        assert!(ui.has_success("All requirements satisfied. Nothing to install."));
    }

    #[test]
    fn partial_acceptance_keeps_only_accepted() {
        let fixture = Fixture::new(MANIFEST, true);
        let mut ui = MockUI::new();
        ui.set_prompt_response("install_pandas", "y");

        fixture.run(Decision::Prompt, false, &mut ui);

        assert_eq!(fixture.installer.batches.borrow().as_slice(), ["pandas==1.3.0"]);
    }

    #[test]
    fn report_table_lists_every_record() {
        let fixture = Fixture::new(MANIFEST, true);
        let mut ui = MockUI::new();

        fixture.run(Decision::Summary, false, &mut ui);

        let table = &ui.tables()[0];
        assert!(table.starts_with(REPORT_TITLE));
        assert!(table.contains("Not installed"));
        assert!(table.contains("Mismatch (need ==1.3.0)"));
        assert!(table.contains("No version rule"));
        assert!(table.contains("none"));
    }

    #[test]
    fn summary_only_never_prompts_or_installs() {
        let fixture = Fixture::new(MANIFEST, true);
        let mut ui = MockUI::new();
        ui.set_default_prompt_response("yes");

        fixture.run(Decision::Summary, false, &mut ui);

        assert!(ui.prompts_shown().is_empty());
        assert!(fixture.installer.batches.borrow().is_empty());
        assert!(!fixture.install_file().exists());
        assert!(ui.has_warning("2 requirement(s) need changes"));
    }

    #[test]
    fn accept_all_skips_prompts() {
        let fixture = Fixture::new("flask>=2.1\n", true);
        let mut ui = MockUI::new();

        fixture.run(Decision::AcceptAll, false, &mut ui);

        assert!(ui.prompts_shown().is_empty());
        assert_eq!(fixture.installer.batches.borrow().as_slice(), ["flask>=2.1"]);
    }

    #[test]
    fn failed_install_is_reported_and_file_kept() {
        let fixture = Fixture::new("numpy\n", false);
        let mut ui = MockUI::new();

        let result = fixture.run(Decision::AcceptAll, false, &mut ui);

        assert_eq!(result.exit_code, 0);
        assert!(ui.has_error("Some packages failed to install."));
        assert_eq!(fs::read_to_string(fixture.install_file()).unwrap(), "numpy");
    }

    #[test]
    fn notifications_follow_classification() {
        let fixture = Fixture::new("numpy\npandas==1.3.0\nflask>=2.1\nrequests>=2.0\nFlask\n", true);
        let mut ui = MockUI::new();

        fixture.run(Decision::Summary, false, &mut ui);

        assert_eq!(
            fixture.notifier.titles(),
            [
                "numpy Missing",
                "pandas Mismatch",
                "flask Out of range",
                "requests OK",
                "Flask Checked"
            ]
        );
        let sent = fixture.notifier.sent();
        assert_eq!(sent[3].1, "requests 2.28.1 satisfies >=2.0");
    }

    #[test]
    fn json_mode_sends_no_notifications() {
        let fixture = Fixture::new(MANIFEST, true);
        let mut ui = MockUI::new();

        fixture.run(Decision::Summary, true, &mut ui);

        assert!(fixture.notifier.titles().is_empty());
    }

    /// Shared record of notifications and prompts, in the order they happen.
    type Timeline = Rc<RefCell<Vec<String>>>;

    struct TimelineNotifier(Timeline);

    impl Notifier for TimelineNotifier {
        fn notify(&self, title: &str, _message: &str, _priority: Priority) -> Result<()> {
            self.0.borrow_mut().push(format!("notify {}", title));
            Ok(())
        }
    }

    struct TimelineUI {
        inner: MockUI,
        timeline: Timeline,
    }

    impl UserInterface for TimelineUI {
        fn output_mode(&self) -> OutputMode {
            self.inner.output_mode()
        }
        fn message(&mut self, msg: &str) {
            self.inner.message(msg)
        }
        fn success(&mut self, msg: &str) {
            self.inner.success(msg)
        }
        fn warning(&mut self, msg: &str) {
            self.inner.warning(msg)
        }
        fn error(&mut self, msg: &str) {
            self.inner.error(msg)
        }
        fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
            self.timeline
                .borrow_mut()
                .push(format!("prompt {}", prompt.key));
            self.inner.prompt(prompt)
        }
        fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
            self.inner.start_spinner(message)
        }
        fn show_table(&mut self, table: &Table) {
            self.inner.show_table(table)
        }
    }

    #[test]
    fn each_result_is_notified_then_offered_in_order() {
        let fixture = Fixture::new("numpy
requests
pandas==1.3.0
", true);
        let timeline: Timeline = Rc::default();
        let notifier = TimelineNotifier(Rc::clone(&timeline));
        let mut ui = TimelineUI {
            inner: MockUI::new(),
            timeline: Rc::clone(&timeline),
        };
        let ctx = CommandContext {
            project_root: fixture.temp.path(),
            config: &fixture.config,
            platform: Platform::Linux,
            probe: &fixture.probe,
            backend: &fixture.installer,
            notifier: &notifier,
        };

        CheckCommand::new(ctx, Decision::Prompt, false, false)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(
            timeline.borrow().as_slice(),
            [
                "notify numpy Missing",
                "prompt install_numpy",
                "notify requests Checked",
                "notify pandas Mismatch",
                "prompt install_pandas",
            ]
        );
    }

    #[test]
    fn malformed_records_are_reported_and_skipped() {
        let fixture = Fixture::new("requests>>2\nnumpy\n", true);
        let mut ui = MockUI::new();

        fixture.run(Decision::Summary, false, &mut ui);

        assert!(ui.has_warning("Skipped requests (line 1)"));
        assert!(ui.tables()[0].contains("numpy"));
    }

    #[test]
    fn json_report_is_emitted_without_table() {
        let fixture = Fixture::new(MANIFEST, true);
        let mut ui = MockUI::new();

        fixture.run(Decision::Summary, true, &mut ui);

        assert!(ui.tables().is_empty());
        assert!(ui.spinners().is_empty());
        let report: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(report["results"][0]["status"], "not_installed");
        assert_eq!(report["results"][1]["status"], "mismatch");
        assert_eq!(report["results"][2]["status"], "unconstrained");
    }

    #[test]
    fn verbose_mode_adds_summary_line() {
        let fixture = Fixture::new(MANIFEST, true);
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        fixture.run(Decision::Summary, false, &mut ui);

        assert!(ui.has_message("3 checked: 1 missing, 1 mismatch, 1 unconstrained"));
    }

    #[test]
    fn summary_line_counts_skipped() {
        let report = CheckReport::default();
        assert_eq!(summary_line(&report), "0 checked");
    }
}
