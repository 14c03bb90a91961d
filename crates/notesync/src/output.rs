//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter.
///
/// Progress and diagnostics go to stderr; machine-consumable results
/// (block JSON from `convert`) go to stdout.
pub(crate) struct Output {
    stderr: Term,
    stdout: Term,
    green: Style,
    yellow: Style,
    red: Style,
    bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stderr: Term::stderr(),
            stdout: Term::stdout(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            bold: Style::new().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.stderr.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a section heading (bold).
    pub(crate) fn heading(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.bold.apply_to(msg).to_string());
    }

    /// Print a result line to stdout.
    pub(crate) fn result(&self, msg: &str) {
        let _ = self.stdout.write_line(msg);
    }
}
