//! Platform detection helpers.

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()` so a CI run never waits
/// on a confirmation prompt. Checks common CI environment variables: `CI`,
/// `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    is_ci_with(|key| std::env::var(key).is_ok())
}

/// CI detection against an arbitrary variable lookup.
pub fn is_ci_with(has_var: impl Fn(&str) -> bool) -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|key| has_var(key))
}

/// Default Python interpreter name for this platform.
pub fn default_python() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}
