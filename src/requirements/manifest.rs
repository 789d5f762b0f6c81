//! Requirements manifest parsing.
//!
//! Turns `requirements.txt` text into an ordered list of
//! [`RequirementRecord`]s. Only the narrow `sys_platform` marker handling of
//! the manifest format is understood: a condition mentioning `win32` keeps
//! the line on Windows hosts only, one mentioning `linux` keeps it on Linux
//! hosts only, and every other condition is ignored.
//!
//! # Example
//!
//! ```
//! use pipr::requirements::manifest::{parse, Platform};
//!
//! let records = parse("numpy>=1.20.0\n# comment\n\nrequests\n", Platform::Linux);
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].name, "numpy");
//! assert_eq!(records[0].specifier.as_deref(), Some(">=1.20.0"));
//! assert_eq!(records[1].specifier, None);
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{PiprError, Result};

static REQUIREMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_.-]+)(.*)$").expect("REQUIREMENT_REGEX must compile")
});

static CANONICAL_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("CANONICAL_SEPARATORS must compile"));

/// Host platform as seen by `sys_platform` conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
    Other,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }
}

/// One requirement line from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementRecord {
    /// Package name as written.
    pub name: String,
    /// Raw version constraint; `None` means any version.
    pub specifier: Option<String>,
    /// 1-based line number in the manifest.
    pub source_line: usize,
}

impl RequirementRecord {
    /// Create a record.
    pub fn new(name: &str, specifier: Option<&str>, source_line: usize) -> Self {
        Self {
            name: name.to_string(),
            specifier: specifier.map(String::from),
            source_line,
        }
    }

    /// Normalised package name used for lookups (`Foo_Bar.baz` → `foo-bar-baz`).
    pub fn canonical_name(&self) -> String {
        canonicalize_name(&self.name)
    }

    /// The token handed to pip, e.g. `numpy>=1.20.0`.
    pub fn install_token(&self) -> String {
        format!("{}{}", self.name, self.specifier.as_deref().unwrap_or(""))
    }
}

/// Normalise a distribution name the way package indexes compare them.
pub fn canonicalize_name(name: &str) -> String {
    CANONICAL_SEPARATORS
        .replace_all(name, "-")
        .to_ascii_lowercase()
}

/// Parse manifest text into requirement records.
///
/// Blank lines and `#` comments are skipped, as are lines that don't start
/// with a package name. Specifiers are not validated here.
pub fn parse(text: &str, platform: Platform) -> Vec<RequirementRecord> {
    let mut records = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let mut line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((package, condition)) = line.split_once(';') {
            if !condition_applies(condition.trim(), platform) {
                tracing::debug!(line = line_no, "Skipping requirement for another platform");
                continue;
            }
            line = package.trim();
        }

        let Some(caps) = REQUIREMENT_REGEX.captures(line) else {
            tracing::debug!(line = line_no, "Skipping unrecognised line: {}", line);
            continue;
        };

        let specifier = caps[2].trim();
        records.push(RequirementRecord {
            name: caps[1].to_string(),
            specifier: (!specifier.is_empty()).then(|| specifier.to_string()),
            source_line: line_no,
        });
    }

    records
}

/// Read and parse a manifest file.
pub fn parse_file(path: &Path, platform: Platform) -> Result<Vec<RequirementRecord>> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => PiprError::ManifestNotFound {
            path: path.to_path_buf(),
        },
        _ => PiprError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let records = parse(&text, platform);
    tracing::debug!(
        "Parsed {} requirement(s) from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Whether a `;` condition keeps the line on this platform.
///
/// Only `win32` and `linux` inside a `sys_platform` condition are
/// recognised; anything else passes.
fn condition_applies(condition: &str, platform: Platform) -> bool {
    if !condition.contains("sys_platform") {
        return true;
    }
    if condition.contains("win32") && platform != Platform::Windows {
        return false;
    }
    if condition.contains("linux") && platform != Platform::Linux {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn comments_and_blank_lines_yield_nothing() {
        let text = "# header\n\n   \n  # indented comment\n\t\n";
        assert!(parse(text, Platform::Linux).is_empty());
    }

    #[test]
    fn name_and_specifier_are_split() {
        let records = parse("pandas==1.3.0\nrequests\nflask >= 2.0 , <3\n", Platform::Linux);
        assert_eq!(
            records,
            vec![
                RequirementRecord::new("pandas", Some("==1.3.0"), 1),
                RequirementRecord::new("requests", None, 2),
                RequirementRecord::new("flask", Some(">= 2.0 , <3"), 3),
            ]
        );
    }

    #[test]
    fn whitespace_only_remainder_is_unconstrained() {
        let records = parse("requests   \n", Platform::Linux);
        assert_eq!(records[0].specifier, None);
    }

    #[test]
    fn win32_condition_filtered_off_windows() {
        let text = "pkg>=1; sys_platform == \"win32\"\n";
        assert!(parse(text, Platform::Linux).is_empty());
        assert!(parse(text, Platform::MacOS).is_empty());

        let records = parse(text, Platform::Windows);
        assert_eq!(records, vec![RequirementRecord::new("pkg", Some(">=1"), 1)]);
    }

    #[test]
    fn linux_condition_filtered_off_linux() {
        let text = "uvloop; sys_platform == \"linux\"\n";
        assert!(parse(text, Platform::Windows).is_empty());
        assert!(parse(text, Platform::Other).is_empty());
        assert_eq!(parse(text, Platform::Linux).len(), 1);
    }

    #[test]
    fn other_platform_markers_pass_through() {
        let text = "pyobjc; sys_platform == \"darwin\"\n";
        let records = parse(text, Platform::Linux);
        assert_eq!(records, vec![RequirementRecord::new("pyobjc", None, 1)]);
    }

    #[test]
    fn non_platform_conditions_are_ignored() {
        let text = "tomli>=1.1; python_version < \"3.11\"\n";
        let records = parse(text, Platform::Windows);
        assert_eq!(records, vec![RequirementRecord::new("tomli", Some(">=1.1"), 1)]);
    }

    #[test]
    fn unmatched_lines_are_skipped() {
        let records = parse("[extra]\n@ https://x/pkg.whl\n==1\nok==1\n", Platform::Linux);
        assert_eq!(records, vec![RequirementRecord::new("ok", Some("==1"), 4)]);
    }

    #[test]
    fn option_lines_match_the_name_pattern() {
        let records = parse("-r other.txt\n--index-url https://x\n", Platform::Linux);
        assert_eq!(
            records,
            vec![
                RequirementRecord::new("-r", Some("other.txt"), 1),
                RequirementRecord::new("--index-url", Some("https://x"), 2),
            ]
        );
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let records = parse("a>=1\nb\na<3\n", Platform::Linux);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
        assert_eq!(records[2].source_line, 3);
    }

    #[test]
    fn malformed_specifier_is_not_validated() {
        let records = parse("numpy>>>1\n", Platform::Linux);
        assert_eq!(records[0].specifier.as_deref(), Some(">>>1"));
    }

    #[test]
    fn canonical_name_normalises_separators() {
        let record = RequirementRecord::new("Foo_Bar..baz", None, 1);
        assert_eq!(record.canonical_name(), "foo-bar-baz");
        assert_eq!(canonicalize_name("PyYAML"), "pyyaml");
    }

    #[test]
    fn install_token_joins_name_and_specifier() {
        assert_eq!(
            RequirementRecord::new("numpy", Some(">=1.20.0"), 1).install_token(),
            "numpy>=1.20.0"
        );
        assert_eq!(RequirementRecord::new("requests", None, 1).install_token(), "requests");
    }

    #[test]
    fn parse_file_reads_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("requirements.txt");
        fs::write(&path, "numpy>=1.20.0\n").unwrap();

        let records = parse_file(&path, Platform::Linux).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn parse_file_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let result = parse_file(&temp.path().join("nope.txt"), Platform::Linux);
        assert!(matches!(result, Err(PiprError::ManifestNotFound { .. })));
    }

    #[test]
    fn parse_file_directory_is_unreadable() {
        let temp = TempDir::new().unwrap();
        let result = parse_file(temp.path(), Platform::Linux);
        assert!(matches!(
            result,
            Err(PiprError::ManifestUnreadable { .. }) | Err(PiprError::ManifestNotFound { .. })
        ));
    }
}
