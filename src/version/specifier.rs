//! PEP 440 version specifiers.
//!
//! A [`SpecifierSet`] is a comma-joined conjunction of clauses such as
//! `>=1.20,<2.0` or `~=3.1`. Containment follows PEP 440: every clause must
//! match, local labels on the candidate are ignored by ordered comparisons,
//! and pre-releases are excluded unless a clause names a pre-release itself.
//!
//! # Example
//!
//! ```
//! use pipr::version::{SpecifierSet, Version};
//!
//! let spec = SpecifierSet::parse(">=2.25.0,<3").unwrap();
//! assert!(spec.contains(&Version::parse("2.28.1").unwrap()));
//! assert!(!spec.contains(&Version::parse("2.0.0").unwrap()));
//! ```

use std::fmt;
use std::str::FromStr;

use super::pep440::Version;
use crate::error::{PiprError, Result};

/// Comparison operator of a single specifier clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `~=`
    Compatible,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `===`
    Arbitrary,
}

impl Operator {
    /// Longest tokens first so `===` wins over `==` and `<=` over `<`.
    const TOKENS: [(&'static str, Operator); 8] = [
        ("===", Operator::Arbitrary),
        ("~=", Operator::Compatible),
        ("==", Operator::Equal),
        ("!=", Operator::NotEqual),
        ("<=", Operator::LessEqual),
        (">=", Operator::GreaterEqual),
        ("<", Operator::Less),
        (">", Operator::Greater),
    ];

    fn split(clause: &str) -> Option<(Operator, &str)> {
        Self::TOKENS
            .iter()
            .find_map(|(token, op)| clause.strip_prefix(*token).map(|rest| (*op, rest)))
    }

    /// The operator as written in a specifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Compatible => "~=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Arbitrary => "===",
        }
    }
}

/// A single `operator version` clause.
#[derive(Debug, Clone)]
pub struct Specifier {
    operator: Operator,
    /// Version text as written, without the `.*` suffix.
    text: String,
    /// Parsed version; `None` only for `===` clauses that are not PEP 440.
    version: Option<Version>,
    wildcard: bool,
}

impl Specifier {
    /// Parse one clause, e.g. `>=1.20.0` or `==1.3.*`.
    pub fn parse(clause: &str) -> Result<Self> {
        let clause = clause.trim();
        let (operator, rest) = Operator::split(clause)
            .ok_or_else(|| syntax(clause, "missing comparison operator"))?;
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(syntax(clause, "missing version"));
        }

        if operator == Operator::Arbitrary {
            if rest.contains(char::is_whitespace) {
                return Err(syntax(clause, "arbitrary equality takes a single token"));
            }
            return Ok(Self {
                operator,
                text: rest.to_string(),
                version: Version::parse(rest).ok(),
                wildcard: false,
            });
        }

        let (text, wildcard) = match rest.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (rest, false),
        };

        if wildcard && !matches!(operator, Operator::Equal | Operator::NotEqual) {
            return Err(syntax(clause, "wildcards are only allowed with == and !="));
        }

        let version = Version::parse(text).map_err(|e| syntax(clause, &e.to_string()))?;

        if wildcard && version != version.base() {
            return Err(syntax(clause, "wildcard prefix must be a plain release"));
        }
        if version.has_local() && !matches!(operator, Operator::Equal | Operator::NotEqual) {
            return Err(syntax(clause, "local versions are only allowed with == and !="));
        }
        if operator == Operator::Compatible && version.release().len() < 2 {
            return Err(syntax(clause, "~= needs at least two release segments"));
        }

        Ok(Self {
            operator,
            text: text.to_string(),
            version: Some(version),
            wildcard,
        })
    }

    /// Whether this clause opts in to matching pre-releases.
    fn allows_prereleases(&self) -> bool {
        match self.operator {
            Operator::Equal
            | Operator::GreaterEqual
            | Operator::LessEqual
            | Operator::Compatible
            | Operator::Arbitrary => self.version.as_ref().is_some_and(Version::is_prerelease),
            _ => false,
        }
    }

    /// Test a candidate against this clause alone, ignoring pre-release
    /// filtering.
    pub fn matches(&self, candidate: &Version) -> bool {
        let Some(spec) = self.version.as_ref() else {
            // Non-PEP 440 `===` clause: compare as text.
            return candidate.to_string().eq_ignore_ascii_case(&self.text);
        };

        match self.operator {
            Operator::Equal => self.matches_equal(candidate, spec),
            Operator::NotEqual => !self.matches_equal(candidate, spec),
            Operator::LessEqual => candidate.public() <= *spec,
            Operator::GreaterEqual => candidate.public() >= *spec,
            Operator::Less => {
                if *candidate >= *spec {
                    return false;
                }
                // `<1.0` must not admit `1.0rc1`.
                !(!spec.is_prerelease()
                    && candidate.is_prerelease()
                    && candidate.base() == spec.base())
            }
            Operator::Greater => {
                if *candidate <= *spec {
                    return false;
                }
                let same_base = candidate.base() == spec.base();
                if !spec.is_postrelease() && candidate.is_postrelease() && same_base {
                    return false;
                }
                !(candidate.has_local() && same_base)
            }
            Operator::Compatible => {
                let prefix = &spec.release()[..spec.release().len() - 1];
                candidate.public() >= *spec && release_prefix_matches(candidate, spec, prefix)
            }
            Operator::Arbitrary => candidate.to_string().eq_ignore_ascii_case(&self.text),
        }
    }

    fn matches_equal(&self, candidate: &Version, spec: &Version) -> bool {
        if self.wildcard {
            release_prefix_matches(candidate, spec, spec.release())
        } else if spec.has_local() {
            candidate == spec
        } else {
            candidate.public() == *spec
        }
    }
}

/// Epoch equal and the candidate's release (zero padded) starts with `prefix`.
fn release_prefix_matches(candidate: &Version, spec: &Version, prefix: &[u64]) -> bool {
    if candidate.epoch() != spec.epoch() {
        return false;
    }
    prefix
        .iter()
        .enumerate()
        .all(|(i, n)| candidate.release().get(i).copied().unwrap_or(0) == *n)
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.as_str(), self.text)?;
        if self.wildcard {
            write!(f, ".*")?;
        }
        Ok(())
    }
}

/// A conjunction of specifier clauses.
#[derive(Debug, Clone)]
pub struct SpecifierSet {
    clauses: Vec<Specifier>,
    raw: String,
}

impl SpecifierSet {
    /// Parse a comma-joined specifier expression.
    ///
    /// Empty clauses (e.g. a trailing comma) are ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let clauses = input
            .split(',')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .map(Specifier::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            clauses,
            raw: input.trim().to_string(),
        })
    }

    /// Parsed clauses in written order.
    pub fn clauses(&self) -> &[Specifier] {
        &self.clauses
    }

    /// The expression as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `candidate` satisfies every clause.
    ///
    /// Pre-releases only match when some clause names a pre-release.
    pub fn contains(&self, candidate: &Version) -> bool {
        let prereleases = self.clauses.iter().any(Specifier::allows_prereleases);
        if candidate.is_prerelease() && !prereleases {
            return false;
        }
        self.clauses.iter().all(|clause| clause.matches(candidate))
    }
}

impl FromStr for SpecifierSet {
    type Err = PiprError;

    fn from_str(s: &str) -> Result<Self> {
        SpecifierSet::parse(s)
    }
}

impl fmt::Display for SpecifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", clauses.join(","))
    }
}

fn syntax(clause: &str, message: &str) -> PiprError {
    PiprError::SpecifierSyntax {
        specifier: clause.to_string(),
        message: message.to_string(),
    }
}
