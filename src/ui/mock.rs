//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use pipr::ui::{MockUI, Prompt, PromptType, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("retry_install", "yes");
//!
//! let answer = ui
//!     .prompt(&Prompt {
//!         key: "retry_install".to_string(),
//!         question: "Retry installation?".to_string(),
//!         prompt_type: PromptType::Confirm,
//!         default: Some("no".to_string()),
//!     })
//!     .unwrap();
//! assert_eq!(answer.as_bool(), Some(true));
//! assert_eq!(ui.prompts_shown(), ["retry_install"]);
//! ```

use std::collections::{HashMap, VecDeque};

use crate::error::Result;

use super::{
    answer_from_text, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, Table,
    UserInterface,
};

/// Mock UI implementation for testing.
///
/// Captures all UI interactions and allows pre-configured prompt responses.
/// Supports both single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys asked more than once.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    tables: Vec<String>,
    spinners: Vec<String>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
    questions_asked: Vec<String>,
    /// Fallback response for any prompt key not in `prompt_responses` or `prompt_queues`.
    default_prompt_response: Option<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    ///
    /// When `prompt()` is called with this key, it returns the configured response.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key.
    ///
    /// Responses are returned in order. After the queue is exhausted,
    /// falls back to `set_prompt_response` or defaults.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    /// Set a default response for any prompt key not explicitly configured.
    pub fn set_default_prompt_response(&mut self, response: &str) {
        self.default_prompt_response = Some(response.to_string());
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get every rendered table.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Get all spinner messages.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get keys of prompts that were shown, in order.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Get question texts of prompts that were shown, in order.
    pub fn questions_asked(&self) -> &[String] {
        &self.questions_asked
    }

    /// Check if a message containing `msg` was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a success message containing `msg` was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if an error containing `msg` was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if a warning containing `msg` was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());
        self.questions_asked.push(prompt.question.clone());

        // Queued responses first (for keys asked multiple times)
        if let Some(response) = self
            .prompt_queues
            .get_mut(&prompt.key)
            .and_then(|queue| queue.pop_front())
        {
            return Ok(answer_from_text(&prompt.prompt_type, &response));
        }

        let configured = self
            .prompt_responses
            .get(&prompt.key)
            .or(self.default_prompt_response.as_ref())
            .or(prompt.default.as_ref());
        if let Some(response) = configured {
            return Ok(answer_from_text(&prompt.prompt_type, response));
        }

        // Unanswered confirms are a no
        match prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(false)),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::new())
    }

    fn show_table(&mut self, table: &Table) {
        self.tables.push(table.render());
    }
}

/// Mock spinner that records whether it was finished.
#[derive(Debug, Default)]
pub struct MockSpinner {
    cleared: bool,
}

impl MockSpinner {
    /// Create a new mock spinner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `finish_clear` was called.
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}

impl SpinnerHandle for MockSpinner {
    fn finish_clear(&mut self) {
        self.cleared = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirm(key: &str, default: Option<&str>) -> Prompt {
        Prompt {
            key: key.to_string(),
            question: format!("{}?", key),
            prompt_type: PromptType::Confirm,
            default: default.map(String::from),
        }
    }

    #[test]
    fn mock_ui_captures_messages() {
        let mut ui = MockUI::new();

        ui.message("Hello");
        ui.success("Done");
        ui.warning("Be careful");
        ui.error("Oops");

        assert_eq!(ui.messages(), &["Hello"]);
        assert_eq!(ui.successes(), &["Done"]);
        assert_eq!(ui.warnings(), &["Be careful"]);
        assert_eq!(ui.errors(), &["Oops"]);
        assert!(ui.has_warning("careful"));
    }

    #[test]
    fn configured_response_wins_over_default() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("install_numpy", "yes");
        let result = ui.prompt(&confirm("install_numpy", Some("no"))).unwrap();
        assert_eq!(result, PromptResult::Bool(true));
        assert_eq!(ui.questions_asked(), ["install_numpy?"]);
    }

    #[test]
    fn queued_responses_are_consumed_in_order() {
        let mut ui = MockUI::new();
        ui.queue_prompt_responses("retry_install", vec!["yes", "no"]);
        ui.set_prompt_response("retry_install", "yes");

        let answers: Vec<_> = (0..3)
            .map(|_| ui.prompt(&confirm("retry_install", None)).unwrap())
            .collect();
        assert_eq!(
            answers,
            vec![
                PromptResult::Bool(true),
                PromptResult::Bool(false),
                PromptResult::Bool(true)
            ]
        );
    }

    #[test]
    fn default_response_applies_to_unknown_keys() {
        let mut ui = MockUI::new();
        ui.set_default_prompt_response("y");
        let result = ui.prompt(&confirm("anything", Some("no"))).unwrap();
        assert_eq!(result.as_bool(), Some(true));
    }

    #[test]
    fn prompt_default_is_used_when_unconfigured() {
        let mut ui = MockUI::new();
        let result = ui.prompt(&confirm("retry_install", Some("yes"))).unwrap();
        assert_eq!(result.as_bool(), Some(true));
    }

    #[test]
    fn unconfigured_confirm_without_default_is_no() {
        let mut ui = MockUI::new();
        let result = ui.prompt(&confirm("x", None)).unwrap();
        assert_eq!(result.as_bool(), Some(false));
    }

    #[test]
    fn tables_are_captured_rendered() {
        let mut ui = MockUI::new();
        let mut table = Table::new(vec!["Package"]);
        table.add_row(vec!["numpy".to_string()]);
        ui.show_table(&table);
        assert!(ui.tables()[0].contains("numpy"));
    }

    #[test]
    fn spinner_records_clear() {
        let mut ui = MockUI::new();
        let mut spinner = MockSpinner::new();
        assert!(!spinner.is_cleared());
        spinner.finish_clear();
        assert!(spinner.is_cleared());

        ui.start_spinner("Checking 2 requirement(s)...").finish_clear();
        assert_eq!(ui.spinners(), ["Checking 2 requirement(s)..."]);
    }

    #[test]
    fn output_mode_is_reported() {
        let ui = MockUI::with_mode(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }
}
