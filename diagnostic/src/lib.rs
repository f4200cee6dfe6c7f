pub mod diagnostic;
pub mod diagnostic_code;
pub mod error;
pub mod formatter;

use colored::*;

use crate::{diagnostic::Diagnostic, diagnostic_code::Severity, formatter::DiagnosticFormatter};

/// Collector for all diagnostics raised during a single compilation run.
/// Every stage funnels its errors through here rather than printing
/// directly, so `core` can decide once, at the end, whether to print to
/// stdout or just report a count.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
  diagnostics: Vec<Diagnostic>,
  error_count: usize,
  warning_count: usize,
}

impl DiagnosticEngine {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn emit(&mut self, diagnostic: Diagnostic) {
    match diagnostic.severity {
      Severity::Error => self.error_count += 1,
      Severity::Warning => self.warning_count += 1,
    }
    self.diagnostics.push(diagnostic);
  }

  pub fn has_errors(&self) -> bool {
    self.error_count > 0
  }

  pub fn error_count(&self) -> usize {
    self.error_count
  }

  pub fn warning_count(&self) -> usize {
    self.warning_count
  }

  pub fn diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }

  pub fn print_all(&self) {
    for diagnostic in &self.diagnostics {
      let formatter = DiagnosticFormatter::new(diagnostic);
      eprint!("{}", formatter.format());
    }
    self.print_summary();
  }

  pub fn format_all_plain(&self) -> String {
    let mut output = String::new();
    for diagnostic in &self.diagnostics {
      let formatter = DiagnosticFormatter::new(diagnostic);
      output.push_str(&formatter.format_plain());
    }
    output.push_str(&self.format_summary_plain());
    output
  }

  fn print_summary(&self) {
    if self.error_count == 0 && self.warning_count == 0 {
      return;
    }
    if self.has_errors() {
      eprintln!(
        "{}: could not compile due to {} previous {}{}",
        "error".red().bold(),
        self.error_count.to_string().red().bold(),
        if self.error_count == 1 { "error" } else { "errors" },
        self.warning_suffix()
      );
    } else {
      eprintln!(
        "{}: {} {} emitted",
        "warning".yellow().bold(),
        self.warning_count.to_string().yellow().bold(),
        if self.warning_count == 1 { "warning" } else { "warnings" }
      );
    }
  }

  fn warning_suffix(&self) -> String {
    if self.warning_count == 0 {
      return String::new();
    }
    format!(
      "; {} {} emitted",
      self.warning_count.to_string().yellow().bold(),
      if self.warning_count == 1 { "warning" } else { "warnings" }
    )
  }

  fn format_summary_plain(&self) -> String {
    if self.error_count == 0 && self.warning_count == 0 {
      return String::new();
    }
    if self.has_errors() {
      format!(
        "error: could not compile due to {} previous {}\n",
        self.error_count,
        if self.error_count == 1 { "error" } else { "errors" }
      )
    } else {
      format!(
        "warning: {} {} emitted\n",
        self.warning_count,
        if self.warning_count == 1 { "warning" } else { "warnings" }
      )
    }
  }
}
