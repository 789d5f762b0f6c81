//! Visual theme and styling.

use console::Style;

use crate::requirements::RequirementStatus;

/// pipr's visual theme.
#[derive(Debug, Clone)]
pub struct PiprTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (yellow).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for installed versions (cyan).
    pub installed: Style,
    /// Style for required specifiers (magenta).
    pub required: Style,
}

impl Default for PiprTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl PiprTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            highlight: Style::new().bold(),
            installed: Style::new().cyan(),
            required: Style::new().magenta(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            highlight: Style::new(),
            installed: Style::new(),
            required: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in yellow).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Style a status explanation for the report table.
    pub fn format_status(&self, status: RequirementStatus, text: &str) -> String {
        let style = match status {
            RequirementStatus::NotInstalled => &self.error,
            RequirementStatus::OutOfRange | RequirementStatus::Mismatch => &self.warning,
            _ => &self.info,
        };
        format!("{}", style.apply_to(text))
    }
}

/// Icon shown next to a status in the report table.
pub fn status_icon(status: RequirementStatus) -> &'static str {
    match status {
        RequirementStatus::NotInstalled => "✗",
        RequirementStatus::OutOfRange | RequirementStatus::Mismatch => "⚠",
        _ => "✓",
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check if stdout is a TTY
    console::Term::stdout().is_term()
}
