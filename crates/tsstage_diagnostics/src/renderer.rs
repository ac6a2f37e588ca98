//! Diagnostic rendering backends.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// warning[W001]: no project configuration found
///   --> tsconfig.json
///    = note: compiling with default compiler options
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let label = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return label;
        }
        let ansi = match diag.severity {
            Severity::Error => "31",
            Severity::Warning => "33",
        };
        format!("\x1b[1;{ansi}m{label}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}: {}\n", self.header(diag), diag.message);

        if let Some(path) = &diag.path {
            out.push_str(&format!("  --> {}\n", path.display()));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;

    #[test]
    fn render_warning_with_path_and_notes() {
        let diag = Diagnostic::warning(DiagnosticCode::UNSUPPORTED_OPTION, "unknown option type")
            .with_path("tsconfig.json")
            .with_note("`incremental` has type number")
            .with_help("use a boolean, string or list value");

        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.contains("warning[W002]: unknown option type"));
        assert!(output.contains("--> tsconfig.json"));
        assert!(output.contains("= note: `incremental` has type number"));
        assert!(output.contains("= help: use a boolean, string or list value"));
    }

    #[test]
    fn render_without_path() {
        let diag = Diagnostic::error(DiagnosticCode::BUILD_FAILED, "build failed");
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.starts_with("error[E001]: build failed"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn render_colored_header() {
        let diag = Diagnostic::warning(DiagnosticCode::MISSING_PROJECT_CONFIG, "missing");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;33mwarning[W001]\x1b[0m: missing"));
    }
}
