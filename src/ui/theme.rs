//! Visual theme and styling.

use console::Style;

use crate::lint::Severity;

/// Terminal styles for diagnostics.
#[derive(Debug, Clone)]
pub struct LintTheme {
    /// Style for error labels (red bold).
    pub error: Style,
    /// Style for warning labels (orange).
    pub warning: Style,
    /// Style for informational labels (cyan).
    pub info: Style,
    /// Style for diagnostic messages (bold).
    pub message: Style,
    /// Style for the `-->` location arrow (dim).
    pub arrow: Style,
    /// Style for summary counts (bold).
    pub highlight: Style,
}

impl Default for LintTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl LintTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            error: Style::new().red().bold(),
            warning: Style::new().color256(208),
            info: Style::new().cyan(),
            message: Style::new().bold(),
            arrow: Style::new().dim(),
            highlight: Style::new().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            error: Style::new(),
            warning: Style::new(),
            info: Style::new(),
            message: Style::new(),
            arrow: Style::new(),
            highlight: Style::new(),
        }
    }

    /// Pick the theme for the current environment.
    pub fn for_output(use_color: bool) -> Self {
        if use_color {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Style used for a severity label.
    pub fn severity(&self, severity: Severity) -> &Style {
        match severity {
            Severity::Error => &self.error,
            Severity::Warning => &self.warning,
            Severity::Info => &self.info,
        }
    }

    /// Format `severity[code]`.
    pub fn format_label(&self, severity: Severity, code: &str) -> String {
        format!(
            "{}",
            self.severity(severity)
                .apply_to(format!("{}[{}]", severity, code))
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    console::Term::stdout().is_term()
}
