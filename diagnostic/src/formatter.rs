use colored::*;

use crate::diagnostic::Diagnostic;
use crate::diagnostic_code::Severity;

/// Renders a [`Diagnostic`] the way `rustc` renders a one-line error, minus
/// the source snippet this language's diagnostics never carry.
pub struct DiagnosticFormatter<'a> {
  diagnostic: &'a Diagnostic,
}

impl<'a> DiagnosticFormatter<'a> {
  pub fn new(diagnostic: &'a Diagnostic) -> Self {
    Self { diagnostic }
  }

  fn severity_text(&self) -> &'static str {
    match self.diagnostic.severity {
      Severity::Error => "error",
      Severity::Warning => "warning",
    }
  }

  pub fn format(&self) -> String {
    let mut out = match self.diagnostic.severity {
      Severity::Error => format!(
        "{}[{}]: {}\n",
        self.severity_text().red().bold(),
        self.diagnostic.code.code().red().bold(),
        self.diagnostic.message
      ),
      Severity::Warning => format!(
        "{}[{}]: {}\n",
        self.severity_text().yellow().bold(),
        self.diagnostic.code.code().yellow().bold(),
        self.diagnostic.message
      ),
    };

    if let Some(help) = &self.diagnostic.help {
      out.push_str(&format!("  {} {}\n", "= help:".blue().bold(), help));
    }
    out
  }

  pub fn format_plain(&self) -> String {
    let mut out = format!(
      "{}[{}]: {}\n",
      self.severity_text(),
      self.diagnostic.code.code(),
      self.diagnostic.message
    );
    if let Some(help) = &self.diagnostic.help {
      out.push_str(&format!("  = help: {}\n", help));
    }
    out
  }
}
