//! User interface abstractions.
//!
//! Everything the checker shows or asks goes through [`UserInterface`], so
//! the same flow runs against a terminal, a CI log or a test double.
//!
//! - [`TerminalUI`] - styled output and dialoguer prompts on a TTY
//! - [`NonInteractiveUI`] - plain output; prompts resolve to defaults or
//!   `PIPR_PROMPT_<KEY>` environment overrides
//! - [`MockUI`] - records interactions for assertions

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use table::Table;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, status_icon, PiprTheme};

use crate::error::Result;

/// Abstraction over how pipr talks to the user.
pub trait UserInterface {
    /// Current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Plain status line.
    fn message(&mut self, msg: &str);

    /// Success line.
    fn success(&mut self, msg: &str);

    /// Warning line.
    fn warning(&mut self, msg: &str);

    /// Error line; shown in every mode.
    fn error(&mut self, msg: &str);

    /// Ask the user something.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for a blocking operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Render a table.
    fn show_table(&mut self, table: &Table);
}

/// Handle to a running spinner.
pub trait SpinnerHandle {
    /// Stop without leaving a line behind.
    fn finish_clear(&mut self);
}

/// A question for the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Stable key; also names the `PIPR_PROMPT_<KEY>` override.
    pub key: String,
    /// Question text.
    pub question: String,
    /// Kind of answer expected.
    pub prompt_type: PromptType,
    /// Answer used when nobody can be asked.
    pub default: Option<String>,
}

/// Kind of answer a prompt expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptType {
    /// Yes / no.
    Confirm,
}

/// Answer to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    Bool(bool),
}

impl PromptResult {
    /// Answer as a yes/no, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
        }
    }
}

/// Interpret a textual answer to a confirm prompt.
pub(crate) fn parse_confirm(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// Build a prompt result from configured text, honoring the prompt type.
pub(crate) fn answer_from_text(prompt_type: &PromptType, answer: &str) -> PromptResult {
    match prompt_type {
        PromptType::Confirm => PromptResult::Bool(parse_confirm(answer)),
    }
}
