//! pipr CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use pipr::cli::{Cli, CommandDispatcher};
use pipr::config::{load_with_overrides, ConfigOverrides, OutputMode as ConfigOutputMode};
use pipr::shell::is_ci;
use pipr::ui::{create_ui, NonInteractiveUI, OutputMode, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pipr=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pipr=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn overrides_from(cli: &Cli) -> ConfigOverrides {
    let output = if cli.quiet {
        Some(ConfigOutputMode::Quiet)
    } else if cli.verbose {
        Some(ConfigOutputMode::Verbose)
    } else {
        None
    };

    ConfigOverrides {
        manifest: cli.manifest.clone(),
        install_file: cli.install_file.clone(),
        python: cli.python.clone(),
        no_notify: cli.no_notify,
        output,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("pipr starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Determine project root
    let project_root = cli
        .project
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let config = match load_with_overrides(&project_root, overrides_from(&cli)) {
        Ok(config) => config,
        Err(e) => {
            NonInteractiveUI::new(OutputMode::Normal).error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };

    let output_mode = OutputMode::from(config.output);
    let mut ui = create_ui(!is_ci(), output_mode);

    let dispatcher = CommandDispatcher::new(project_root, config);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
