//! Output formatting and step reporting

use console::{style, Style, Term};
use std::time::Duration;

/// Step reporter for smoke runs
#[derive(Debug)]
pub struct StepReporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for StepReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl StepReporter {
    /// Create a new reporter writing to stderr
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    fn prefix(&self, glyph: &str, plain: &str, color: Style) -> String {
        if self.use_color {
            color.bold().apply_to(glyph).to_string()
        } else {
            plain.to_string()
        }
    }

    /// Line for a passed step
    #[must_use]
    pub fn format_pass(&self, step: &str, elapsed: Duration) -> String {
        format!(
            "{} {step} ({:.2}s)",
            self.prefix("✓", "PASS", Style::new().green()),
            elapsed.as_secs_f64()
        )
    }

    /// Line for a failed step
    #[must_use]
    pub fn format_fail(&self, step: &str, reason: &str) -> String {
        format!("{} {step}: {reason}", self.prefix("✗", "FAIL", Style::new().red()))
    }

    /// Print a passed step
    pub fn pass(&self, step: &str, elapsed: Duration) {
        if self.quiet {
            return;
        }
        let _ = self.term.write_line(&self.format_pass(step, elapsed));
    }

    /// Print a failed step
    pub fn fail(&self, step: &str, reason: &str) {
        // Failures print even in quiet mode
        let _ = self.term.write_line(&self.format_fail(step, reason));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let line = format!("{} {message}", self.prefix("ℹ", "INFO", Style::new().blue()));
        let _ = self.term.write_line(&line);
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print the summary of a passing run
    pub fn summary(&self, passed: usize, duration: Duration) {
        if self.quiet {
            return;
        }
        let status = if self.use_color {
            Style::new().green().bold().apply_to("PASSED").to_string()
        } else {
            "PASSED".to_string()
        };
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "{status} {passed} steps in {:.2}s",
            duration.as_secs_f64()
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_pass_line() {
        let reporter = StepReporter::new(false, false);
        let line = reporter.format_pass("open sports", Duration::from_millis(1500));
        assert_eq!(line, "PASS open sports (1.50s)");
    }

    #[test]
    fn test_plain_fail_line() {
        let reporter = StepReporter::new(false, true);
        let line = reporter.format_fail("checkout", "Login button should be visible");
        assert_eq!(line, "FAIL checkout: Login button should be visible");
    }

    #[test]
    fn test_colored_line_keeps_step_text() {
        let reporter = StepReporter::new(true, false);
        let line = reporter.format_pass("add to cart", Duration::ZERO);
        assert!(line.contains("add to cart"));
    }
}
