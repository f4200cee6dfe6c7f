use diagnostic::{
  diagnostic::Diagnostic,
  diagnostic_code::{DiagnosticCode, Severity},
  error::{ParseError, TypeError},
  DiagnosticEngine,
};

#[test]
fn engine_counts_errors_and_warnings() {
  let mut engine = DiagnosticEngine::new();
  assert!(!engine.has_errors());

  engine.emit(Diagnostic::new(DiagnosticCode::LexError, "unexpected character '@'"));
  engine.emit(Diagnostic::new(DiagnosticCode::TypeError, "type mismatch"));

  assert!(engine.has_errors());
  assert_eq!(engine.error_count(), 2);
  assert_eq!(engine.warning_count(), 0);
}

#[test]
fn diagnostic_carries_no_span() {
  let d = Diagnostic::new(DiagnosticCode::ParseError, "expected ')'").with_help("add a closing paren");
  assert_eq!(d.severity, Severity::Error);
  assert_eq!(d.code.code(), "E0200");
  assert_eq!(d.help.as_deref(), Some("add a closing paren"));
}

#[test]
fn format_plain_includes_code_and_message() {
  let mut engine = DiagnosticEngine::new();
  engine.emit(Diagnostic::new(DiagnosticCode::TypeError, "undefined variable 'x'"));
  let text = engine.format_all_plain();
  assert!(text.contains("E0300"));
  assert!(text.contains("undefined variable 'x'"));
  assert!(text.contains("could not compile due to 1 previous error"));
}

#[test]
fn stage_errors_convert_into_diagnostics() {
  let parse_err: Diagnostic = ParseError::UnexpectedToken {
    expected: "')'".to_string(),
    found: "EOF".to_string(),
  }
  .into();
  assert_eq!(parse_err.code.code(), "E0200");

  let type_err: Diagnostic = TypeError::UndefinedFunction("foo".to_string()).into();
  assert_eq!(type_err.code.code(), "E0300");
  assert!(type_err.message.contains("foo"));
}
