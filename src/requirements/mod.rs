//! Requirement checking and resolution.
//!
//! This module holds the core of pipr: reading a requirements manifest,
//! comparing each entry with what the interpreter has installed, planning
//! the changes the user accepts, and installing them through pip.
//!
//! # Modules
//!
//! - [`manifest`] - Manifest parsing into requirement records
//! - [`probe`] - Installed-version lookup
//! - [`checker`] - Classification of records against installed versions
//! - [`status`] - Classification result and report types
//! - [`plan`] - Resolution planning from classification results
//! - [`installer`] - Install file handling and the retry loop

pub mod checker;
pub mod installer;
pub mod manifest;
pub mod plan;
pub mod probe;
pub mod status;

pub use checker::Classifier;
pub use installer::{InstallOutcome, InstallState, Installer, PackageInstaller, PipInstaller};
pub use manifest::{parse, parse_file, Platform, RequirementRecord};
pub use plan::{confirm_change, plan, ResolutionPlan};
pub use probe::{InterpreterProbe, MapProbe, PackageProbe};
pub use status::{CheckReport, ClassificationResult, MalformedRecord, RequirementStatus};
