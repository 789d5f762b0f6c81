//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are picked by [`CommandDispatcher`] from the flags and from
//! the state of the project directory:
//! - a pending install file is resumed ([`resume`])
//! - `--force-install` installs every record ([`force_install`])
//! - otherwise the manifest is checked ([`check`])
//! - `--completions` short-circuits everything ([`completions`])

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod force_install;
pub mod resume;

pub use check::{CheckCommand, Decision};
pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
