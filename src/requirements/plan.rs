//! Resolution planning.
//!
//! Turns classification results into the ordered list of install tokens
//! that gets written to the install file. Which results make it in is up
//! to a decision callback, typically a confirmation prompt.

use crate::requirements::manifest::RequirementRecord;
use crate::requirements::status::ClassificationResult;
use crate::ui::{Prompt, PromptType, UserInterface};

/// Ordered install tokens, e.g. `["numpy>=1.20.0", "pandas==1.3.0"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPlan {
    packages: Vec<String>,
}

impl ResolutionPlan {
    /// Build a plan from tokens.
    pub fn from_packages(packages: Vec<String>) -> Self {
        Self { packages }
    }

    /// Tokens in install order.
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Whether nothing needs installing.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Install-file contents: tokens joined by newlines, no trailing newline.
    pub fn render(&self) -> String {
        self.packages.join("\n")
    }
}

/// Build a plan from results, offering each actionable one to `decide`.
///
/// Satisfied results are never offered; declined ones are left out.
/// Input order is preserved.
pub fn plan<'r, I, F>(results: I, mut decide: F) -> ResolutionPlan
where
    I: IntoIterator<Item = &'r ClassificationResult>,
    F: FnMut(&RequirementRecord, &ClassificationResult) -> bool,
{
    let packages = results
        .into_iter()
        .filter(|result| result.needs_action())
        .filter(|result| decide(&result.record, result))
        .map(ClassificationResult::install_token)
        .collect();

    ResolutionPlan { packages }
}

/// Ask the user to confirm one proposed change.
///
/// Answers default to "no" when the prompt can't be shown.
pub fn confirm_change(ui: &mut dyn UserInterface, result: &ClassificationResult) -> bool {
    let prompt = Prompt {
        key: format!("install_{}", result.record.canonical_name()),
        question: result.confirmation_question(),
        prompt_type: PromptType::Confirm,
        default: Some("no".to_string()),
    };

    ui.prompt(&prompt)
        .ok()
        .and_then(|r| r.as_bool())
        .unwrap_or(false)
}
