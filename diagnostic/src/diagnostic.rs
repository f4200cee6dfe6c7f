use crate::diagnostic_code::{DiagnosticCode, Severity};

/// A single fatal diagnostic. Unlike the teacher's own diagnostic crate, this
/// carries no `Span`/`Label` — the language's error model has no
/// source-location tracking, so a diagnostic is just a code, a message, and
/// an optional one-line hint.
#[derive(Debug, Clone)]
pub struct Diagnostic {
  pub code: DiagnosticCode,
  pub severity: Severity,
  pub message: String,
  pub help: Option<String>,
}

impl Diagnostic {
  pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
    Self {
      severity: code.severity(),
      code,
      message: message.into(),
      help: None,
    }
  }

  pub fn with_help(mut self, help: impl Into<String>) -> Self {
    self.help = Some(help.into());
    self
  }
}
