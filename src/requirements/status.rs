//! Classification results for requirement checks.
//!
//! Each manifest record checked against the environment produces a
//! [`ClassificationResult`] whose [`RequirementStatus`] says whether the
//! installed package satisfies the declared constraint.

use serde::Serialize;

use crate::error::PiprError;
use crate::requirements::manifest::RequirementRecord;

/// How an installed package relates to its declared requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    /// Package is not installed at all.
    NotInstalled,

    /// Specifier pins a version (`==`) and the installed version equals it.
    ExactMatch,

    /// Installed version satisfies a range specifier.
    InRange,

    /// Installed version falls outside a range specifier.
    OutOfRange,

    /// Specifier pins a version (`==`) and the installed version differs.
    Mismatch,

    /// Package is installed and the record declares no constraint.
    Unconstrained,
}

impl RequirementStatus {
    /// Whether this status calls for an install or version change.
    pub fn needs_action(&self) -> bool {
        matches!(
            self,
            RequirementStatus::NotInstalled
                | RequirementStatus::OutOfRange
                | RequirementStatus::Mismatch
        )
    }

    /// Short label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            RequirementStatus::NotInstalled => "missing",
            RequirementStatus::ExactMatch => "exact",
            RequirementStatus::InRange => "in range",
            RequirementStatus::OutOfRange => "out of range",
            RequirementStatus::Mismatch => "mismatch",
            RequirementStatus::Unconstrained => "unconstrained",
        }
    }
}

/// Outcome of classifying one requirement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// The record that was checked.
    pub record: RequirementRecord,
    /// Installed version, `None` when the package is absent.
    pub installed_version: Option<String>,
    /// Classification of the record.
    pub status: RequirementStatus,
    /// Specifier to install with when action is taken.
    pub actionable_specifier: Option<String>,
}

impl ClassificationResult {
    /// Whether the record needs an install or version change.
    pub fn needs_action(&self) -> bool {
        self.status.needs_action()
    }

    /// Human-readable status for the report table.
    pub fn explanation(&self) -> String {
        let spec = self.record.specifier.as_deref().unwrap_or("");
        match self.status {
            RequirementStatus::NotInstalled => "Not installed".to_string(),
            RequirementStatus::ExactMatch => "Exact match".to_string(),
            RequirementStatus::InRange => format!("OK (within {})", spec),
            RequirementStatus::OutOfRange => format!("Not in range {}", spec),
            RequirementStatus::Mismatch => format!("Mismatch (need {})", spec),
            RequirementStatus::Unconstrained => "No version rule".to_string(),
        }
    }

    /// The token written to the install file, e.g. `pandas==1.3.0`.
    pub fn install_token(&self) -> String {
        format!(
            "{}{}",
            self.record.name,
            self.actionable_specifier.as_deref().unwrap_or("")
        )
    }

    /// Confirmation question asked before planning this result.
    pub fn confirmation_question(&self) -> String {
        let name = &self.record.name;
        let spec = self.record.specifier.as_deref().unwrap_or("");
        let found = self.installed_version.as_deref().unwrap_or("none");
        match self.status {
            RequirementStatus::NotInstalled => format!("Install {} (found none) {}?", name, spec),
            RequirementStatus::Mismatch => format!("Change {} (found {}) to {}?", name, found, spec),
            _ => format!("Install {} (found {}) {}?", name, found, spec),
        }
    }
}

/// A record that could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedRecord {
    /// The offending record.
    pub record: RequirementRecord,
    /// Why it was skipped.
    pub reason: String,
}

impl MalformedRecord {
    /// Build from a record-level error.
    pub fn from_error(record: RequirementRecord, error: &PiprError) -> Self {
        Self {
            record,
            reason: error.to_string(),
        }
    }
}

/// Everything learned from checking a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Classified records in manifest order.
    pub results: Vec<ClassificationResult>,
    /// Records skipped because their specifier or version didn't parse.
    pub malformed: Vec<MalformedRecord>,
}

impl CheckReport {
    /// Results that need an install or version change.
    pub fn actionable(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.results.iter().filter(|r| r.needs_action())
    }

    /// Whether every classified record is satisfied and nothing was malformed.
    pub fn all_satisfied(&self) -> bool {
        self.malformed.is_empty() && self.actionable().next().is_none()
    }

    /// Number of results with the given status.
    pub fn count(&self, status: RequirementStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}
