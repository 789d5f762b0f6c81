//! CLI argument definitions.
//!
//! pipr has a single flat command line; the mode of a run (check, resume,
//! force-install, completions) follows from the flags and from whether an
//! install file is waiting. The main entry point is the [`Cli`] struct.

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// pipr - Check Python requirements against the installed environment.
#[derive(Debug, Default, Parser)]
#[command(name = "pipr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Requirements manifest (default: requirements.txt, or `manifest` in .pipr.yml)
    #[arg(value_name = "MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Retry a failed installation once without asking
    #[arg(short = 'f', long)]
    pub force_retry: bool,

    /// Install every requirement without checking or asking
    #[arg(short = 'F', long, conflicts_with_all = ["summary_only", "json"])]
    pub force_install: bool,

    /// Show the report without offering any changes
    #[arg(short, long)]
    pub summary_only: bool,

    /// Accept every proposed change without prompting
    #[arg(short, long, conflicts_with = "summary_only")]
    pub yes: bool,

    /// Print the check report as JSON (implies --summary-only)
    #[arg(long)]
    pub json: bool,

    /// Python interpreter to probe and install with
    #[arg(long, value_name = "PATH", env = "PIPR_PYTHON")]
    pub python: Option<String>,

    /// File the planned installs are written to
    #[arg(long, value_name = "PATH", env = "PIPR_INSTALL_FILE")]
    pub install_file: Option<PathBuf>,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Path to project root (overrides current directory)
    #[arg(short, long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Whether changes are never offered on this run.
    pub fn is_summary_only(&self) -> bool {
        self.summary_only || self.json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["pipr"]).unwrap();
        assert!(cli.manifest.is_none());
        assert!(!cli.force_retry);
        assert!(!cli.force_install);
        assert!(!cli.is_summary_only());
    }

    #[test]
    fn parses_manifest_and_short_flags() {
        let cli = Cli::try_parse_from(["pipr", "dev-requirements.txt", "-f", "-F"]).unwrap();
        assert_eq!(cli.manifest, Some(PathBuf::from("dev-requirements.txt")));
        assert!(cli.force_retry);
        assert!(cli.force_install);

        let cli = Cli::try_parse_from(["pipr", "-s"]).unwrap();
        assert!(cli.summary_only);
    }

    #[test]
    fn json_implies_summary_only() {
        let cli = Cli::try_parse_from(["pipr", "--json"]).unwrap();
        assert!(cli.is_summary_only());
    }

    #[test]
    fn yes_conflicts_with_summary_only() {
        assert!(Cli::try_parse_from(["pipr", "-y", "-s"]).is_err());
    }

    #[test]
    fn force_install_conflicts_with_json() {
        assert!(Cli::try_parse_from(["pipr", "-F", "--json"]).is_err());
    }

    #[test]
    fn parses_completions_shell() {
        let cli = Cli::try_parse_from(["pipr", "--completions", "bash"]).unwrap();
        assert_eq!(cli.completions, Some(Shell::Bash));
    }

    #[test]
    fn parses_paths() {
        let cli = Cli::try_parse_from([
            "pipr",
            "--python",
            "/opt/py/bin/python",
            "--install-file",
            "pending.txt",
            "-p",
            "/work",
        ])
        .unwrap();
        assert_eq!(cli.python.as_deref(), Some("/opt/py/bin/python"));
        assert_eq!(cli.install_file, Some(PathBuf::from("pending.txt")));
        assert_eq!(cli.project, Some(PathBuf::from("/work")));
    }
}
