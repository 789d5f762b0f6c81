//! Subprocess execution and platform helpers.

pub mod command;
pub mod platform;

pub use command::{
    display_command, execute, execute_quiet, execute_streaming, CommandOptions, CommandResult,
    OutputCallback, OutputLine,
};
pub use platform::{default_python, is_ci, is_ci_with};
