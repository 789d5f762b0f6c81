//! Version comparison for installed packages.
//!
//! The classifier never touches version grammar directly. It talks to a
//! [`VersionScheme`], which keeps the classification rules testable with a
//! fake scheme and lets the full PEP 440 implementation live here.
//!
//! # Modules
//!
//! - [`pep440`] - Version parsing and total ordering
//! - [`specifier`] - Specifier clauses and conjunctive specifier sets

pub mod pep440;
pub mod specifier;

pub use pep440::{LocalSegment, PreRelease, Version};
pub use specifier::{Operator, Specifier, SpecifierSet};

use crate::error::Result;

/// The version comparisons the classifier relies on.
pub trait VersionScheme {
    /// Check that `specifier` is a syntactically valid specifier set.
    fn validate_specifier(&self, specifier: &str) -> Result<()>;

    /// Check that `version` is a valid version string.
    fn validate_version(&self, version: &str) -> Result<()>;

    /// Whether two versions are equal under the scheme's ordering.
    fn versions_equal(&self, left: &str, right: &str) -> Result<bool>;

    /// Whether `version` satisfies every clause of `specifier`.
    fn satisfies(&self, version: &str, specifier: &str) -> Result<bool>;
}

/// PEP 440 version scheme used for Python packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pep440;

impl VersionScheme for Pep440 {
    fn validate_specifier(&self, specifier: &str) -> Result<()> {
        SpecifierSet::parse(specifier).map(|_| ())
    }

    fn validate_version(&self, version: &str) -> Result<()> {
        Version::parse(version).map(|_| ())
    }

    fn versions_equal(&self, left: &str, right: &str) -> Result<bool> {
        Ok(Version::parse(left)? == Version::parse(right)?)
    }

    fn satisfies(&self, version: &str, specifier: &str) -> Result<bool> {
        let set = SpecifierSet::parse(specifier)?;
        Ok(set.contains(&Version::parse(version)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PiprError;

    #[test]
    fn pep440_equality_is_numeric() {
        assert!(Pep440.versions_equal("1.3", "1.3.0").unwrap());
        assert!(!Pep440.versions_equal("1.3.0", "1.2.9").unwrap());
    }

    #[test]
    fn pep440_satisfies_ranges() {
        assert!(Pep440.satisfies("2.28.1", ">=2.25.0").unwrap());
        assert!(!Pep440.satisfies("2.0.0", ">=2.25.0").unwrap());
    }

    #[test]
    fn pep440_reports_bad_input() {
        assert!(matches!(
            Pep440.validate_specifier(">>1"),
            Err(PiprError::SpecifierSyntax { .. })
        ));
        assert!(matches!(
            Pep440.validate_version("banana"),
            Err(PiprError::InvalidVersion { .. })
        ));
        assert!(Pep440.satisfies("banana", ">=1").is_err());
    }
}
