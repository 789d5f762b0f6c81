//! Requirement classification.
//!
//! The [`Classifier`] decides how an installed version relates to a
//! record's specifier. It only talks to a [`VersionScheme`], so the rules
//! below are independent of version grammar:
//!
//! 1. Nothing installed: `NotInstalled`.
//! 2. No specifier: `Unconstrained`.
//! 3. The specifier set and installed version must both parse, otherwise
//!    the record is rejected with a record-level error.
//! 4. A specifier mentioning `==` is decided by the first clause containing
//!    `==` alone (`ExactMatch` / `Mismatch`); the other clauses of the set
//!    are not consulted on this path.
//! 5. Anything else is set containment (`InRange` / `OutOfRange`).

use crate::error::Result;
use crate::requirements::manifest::RequirementRecord;
use crate::requirements::probe::PackageProbe;
use crate::requirements::status::{
    CheckReport, ClassificationResult, MalformedRecord, RequirementStatus,
};
use crate::version::VersionScheme;

/// Classifies requirement records against installed versions.
pub struct Classifier<'a, S: VersionScheme> {
    scheme: &'a S,
}

impl<'a, S: VersionScheme> Classifier<'a, S> {
    /// Create a classifier using `scheme` for all comparisons.
    pub fn new(scheme: &'a S) -> Self {
        Self { scheme }
    }

    /// Classify one record given the installed version, if any.
    pub fn classify(
        &self,
        record: &RequirementRecord,
        installed: Option<&str>,
    ) -> Result<ClassificationResult> {
        let Some(installed) = installed else {
            return Ok(self.result(record, None, RequirementStatus::NotInstalled));
        };

        let Some(spec) = record.specifier.as_deref() else {
            return Ok(self.result(record, Some(installed), RequirementStatus::Unconstrained));
        };

        self.scheme.validate_specifier(spec)?;
        self.scheme.validate_version(installed)?;

        let status = if let Some(clause) = first_equality_clause(spec) {
            if self.equality_holds(installed, clause)? {
                RequirementStatus::ExactMatch
            } else {
                RequirementStatus::Mismatch
            }
        } else if self.scheme.satisfies(installed, spec)? {
            RequirementStatus::InRange
        } else {
            RequirementStatus::OutOfRange
        };

        tracing::debug!(
            "{} {} against {}: {:?}",
            record.name,
            installed,
            spec,
            status
        );
        Ok(self.result(record, Some(installed), status))
    }

    /// Probe and classify every record in manifest order.
    ///
    /// Records whose specifier, installed version or probe fails are
    /// collected as malformed; the batch always completes.
    pub fn check(&self, records: &[RequirementRecord], probe: &dyn PackageProbe) -> CheckReport {
        let mut report = CheckReport::default();

        for record in records {
            let outcome = probe
                .installed_version(&record.canonical_name())
                .and_then(|installed| self.classify(record, installed.as_deref()));

            match outcome {
                Ok(result) => report.results.push(result),
                Err(e) => {
                    tracing::debug!("Skipping {} (line {}): {}", record.name, record.source_line, e);
                    report
                        .malformed
                        .push(MalformedRecord::from_error(record.clone(), &e));
                }
            }
        }

        report
    }

    fn equality_holds(&self, installed: &str, clause: &str) -> Result<bool> {
        if let Some(literal) = clause.strip_prefix("===") {
            return Ok(installed.eq_ignore_ascii_case(literal.trim()));
        }
        let required = clause.trim_start_matches("==").trim();
        if required.ends_with(".*") {
            return self.scheme.satisfies(installed, clause);
        }
        self.scheme.versions_equal(installed, required)
    }

    fn result(
        &self,
        record: &RequirementRecord,
        installed: Option<&str>,
        status: RequirementStatus,
    ) -> ClassificationResult {
        ClassificationResult {
            record: record.clone(),
            installed_version: installed.map(String::from),
            status,
            actionable_specifier: if status.needs_action() {
                record.specifier.clone()
            } else {
                None
            },
        }
    }
}

/// The first comma-separated clause containing `==`, trimmed.
fn first_equality_clause(spec: &str) -> Option<&str> {
    spec.split(',').map(str::trim).find(|c| c.contains("=="))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PiprError;
    use crate::requirements::probe::MapProbe;
    use crate::version::Pep440;

    fn record(spec: Option<&str>) -> RequirementRecord {
        RequirementRecord::new("pkg", spec, 1)
    }

    fn status_of(spec: Option<&str>, installed: Option<&str>) -> RequirementStatus {
        Classifier::new(&Pep440)
            .classify(&record(spec), installed)
            .unwrap()
            .status
    }

    /// Scheme that treats versions as opaque strings and every range as
    /// satisfied, to show the classifier relies on the trait alone.
    struct OpaqueScheme;

    impl VersionScheme for OpaqueScheme {
        fn validate_specifier(&self, _specifier: &str) -> Result<()> {
            Ok(())
        }

        fn validate_version(&self, _version: &str) -> Result<()> {
            Ok(())
        }

        fn versions_equal(&self, left: &str, right: &str) -> Result<bool> {
            Ok(left == right)
        }

        fn satisfies(&self, _version: &str, _specifier: &str) -> Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn missing_package_is_not_installed_regardless_of_specifier() {
        for spec in [Some(">=1.0"), Some("==2.0"), None, Some(">>>garbage")] {
            let result = Classifier::new(&Pep440).classify(&record(spec), None).unwrap();
            assert_eq!(result.status, RequirementStatus::NotInstalled);
            assert_eq!(result.actionable_specifier.as_deref(), spec);
        }
    }

    #[test]
    fn no_specifier_is_unconstrained() {
        let result = Classifier::new(&Pep440)
            .classify(&record(None), Some("2.28.1"))
            .unwrap();
        assert_eq!(result.status, RequirementStatus::Unconstrained);
        assert_eq!(result.actionable_specifier, None);
    }

    #[test]
    fn exact_pin_compares_numerically() {
        assert_eq!(status_of(Some("==1.3.0"), Some("1.3.0")), RequirementStatus::ExactMatch);
        assert_eq!(status_of(Some("==1.3.0"), Some("1.3")), RequirementStatus::ExactMatch);
        assert_eq!(status_of(Some("==1.3.0"), Some("1.2.9")), RequirementStatus::Mismatch);
    }

    #[test]
    fn mismatch_carries_specifier() {
        let result = Classifier::new(&Pep440)
            .classify(&record(Some("==1.3.0")), Some("1.2.0"))
            .unwrap();
        assert_eq!(result.actionable_specifier.as_deref(), Some("==1.3.0"));
        assert_eq!(result.install_token(), "pkg==1.3.0");
    }

    #[test]
    fn exact_pin_distinguishes_local_label() {
        assert_eq!(status_of(Some("==1.3.0"), Some("1.3.0+cpu")), RequirementStatus::Mismatch);
    }

    #[test]
    fn range_specifiers() {
        assert_eq!(status_of(Some(">=2.25.0"), Some("2.28.1")), RequirementStatus::InRange);
        assert_eq!(status_of(Some(">=2.25.0"), Some("2.0.0")), RequirementStatus::OutOfRange);
        assert_eq!(status_of(Some(">=1.0,<2.0"), Some("1.5")), RequirementStatus::InRange);
        assert_eq!(status_of(Some(">=1.0,<2.0"), Some("2.0")), RequirementStatus::OutOfRange);
        assert_eq!(status_of(Some("~=1.4.2"), Some("1.4.9")), RequirementStatus::InRange);
        assert_eq!(status_of(Some("!=1.5"), Some("1.5.0")), RequirementStatus::OutOfRange);
    }

    #[test]
    fn prerelease_installed_is_out_of_plain_range() {
        assert_eq!(status_of(Some(">=1.0"), Some("2.0b1")), RequirementStatus::OutOfRange);
        assert_eq!(status_of(Some(">=1.0b1"), Some("2.0b1")), RequirementStatus::InRange);
    }

    #[test]
    fn equality_in_conjunction_ignores_other_clauses() {
        // The `==` clause alone decides; `<1.0` is never consulted.
        assert_eq!(status_of(Some(">=0.5,==1.3,<1.0"), Some("1.3")), RequirementStatus::ExactMatch);
        assert_eq!(status_of(Some("==1.3,!=1.3"), Some("1.3")), RequirementStatus::ExactMatch);
    }

    #[test]
    fn wildcard_equality_matches_prefix() {
        assert_eq!(status_of(Some("==1.3.*"), Some("1.3.7")), RequirementStatus::ExactMatch);
        assert_eq!(status_of(Some("==1.3.*"), Some("1.4.0")), RequirementStatus::Mismatch);
    }

    #[test]
    fn arbitrary_equality_is_textual() {
        assert_eq!(status_of(Some("===1.0"), Some("1.0")), RequirementStatus::ExactMatch);
        assert_eq!(status_of(Some("===1.0"), Some("1.0.0")), RequirementStatus::Mismatch);
    }

    #[test]
    fn malformed_specifier_is_record_error() {
        let err = Classifier::new(&Pep440)
            .classify(&record(Some(">>1.0")), Some("1.0"))
            .unwrap_err();
        assert!(matches!(err, PiprError::SpecifierSyntax { .. }));
        assert!(err.is_record_level());
    }

    #[test]
    fn malformed_specifier_rejected_before_equality_path() {
        let err = Classifier::new(&Pep440)
            .classify(&record(Some("==1.0,>>2")), Some("1.0"))
            .unwrap_err();
        assert!(matches!(err, PiprError::SpecifierSyntax { .. }));
    }

    #[test]
    fn unparseable_installed_version_is_record_error() {
        let err = Classifier::new(&Pep440)
            .classify(&record(Some(">=1.0")), Some("not a version"))
            .unwrap_err();
        assert!(matches!(err, PiprError::InvalidVersion { .. }));
    }

    #[test]
    fn classifier_only_uses_scheme() {
        let classifier = Classifier::new(&OpaqueScheme);
        let exact = classifier.classify(&record(Some("==abc")), Some("abc")).unwrap();
        assert_eq!(exact.status, RequirementStatus::ExactMatch);
        let ranged = classifier.classify(&record(Some("<whatever")), Some("x")).unwrap();
        assert_eq!(ranged.status, RequirementStatus::InRange);
    }

    #[test]
    fn check_collects_results_and_malformed() {
        let records = vec![
            RequirementRecord::new("numpy", Some(">=1.20.0"), 1),
            RequirementRecord::new("broken", Some("~~1"), 2),
            RequirementRecord::new("Requests", None, 3),
        ];
        let probe = MapProbe::new().with("broken", "1.0").with("requests", "2.28.1");

        let report = Classifier::new(&Pep440).check(&records, &probe);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].status, RequirementStatus::NotInstalled);
        assert_eq!(report.results[1].status, RequirementStatus::Unconstrained);
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(report.malformed[0].record.name, "broken");
    }

    #[test]
    fn check_preserves_duplicate_records() {
        let records = vec![
            RequirementRecord::new("a", Some(">=1"), 1),
            RequirementRecord::new("a", Some("<1"), 2),
        ];
        let probe = MapProbe::new().with("a", "1.5");

        let report = Classifier::new(&Pep440).check(&records, &probe);
        assert_eq!(report.results[0].status, RequirementStatus::InRange);
        assert_eq!(report.results[1].status, RequirementStatus::OutOfRange);
    }
}
