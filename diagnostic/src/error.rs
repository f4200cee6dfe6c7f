use thiserror::Error;

use crate::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode};

/// Errors raised while turning source text into tokens.
#[derive(Debug, Error)]
pub enum LexError {
  #[error("unexpected character '{0}'")]
  UnexpectedChar(char),
}

/// Errors raised while turning tokens into an AST.
#[derive(Debug, Error)]
pub enum ParseError {
  #[error("expected {expected}, found '{found}'")]
  UnexpectedToken { expected: String, found: String },
  #[error("unexpected end of input, expected {0}")]
  UnexpectedEnd(String),
}

/// Errors raised during type checking.
#[derive(Debug, Error)]
pub enum TypeError {
  #[error("{0}")]
  Mismatch(String),
  #[error("undefined variable '{0}'")]
  UndefinedVariable(String),
  #[error("undefined function '{0}'")]
  UndefinedFunction(String),
  #[error("wrong number of arguments to '{name}': expected {expected}, found {found}")]
  ArityMismatch {
    name: String,
    expected: usize,
    found: usize,
  },
}

/// Errors raised while lowering a checked AST to IR.
#[derive(Debug, Error)]
pub enum IrError {
  #[error("{0}")]
  Internal(String),
}

/// Errors raised while lowering IR to assembly.
#[derive(Debug, Error)]
pub enum AsmError {
  #[error("unknown instruction target '{0}'")]
  UnknownTarget(String),
  #[error("{0}")]
  Internal(String),
}

impl From<LexError> for Diagnostic {
  fn from(err: LexError) -> Self {
    Diagnostic::new(DiagnosticCode::LexError, err.to_string())
  }
}

impl From<ParseError> for Diagnostic {
  fn from(err: ParseError) -> Self {
    Diagnostic::new(DiagnosticCode::ParseError, err.to_string())
  }
}

impl From<TypeError> for Diagnostic {
  fn from(err: TypeError) -> Self {
    Diagnostic::new(DiagnosticCode::TypeError, err.to_string())
  }
}

impl From<IrError> for Diagnostic {
  fn from(err: IrError) -> Self {
    Diagnostic::new(DiagnosticCode::IrError, err.to_string())
  }
}

impl From<AsmError> for Diagnostic {
  fn from(err: AsmError) -> Self {
    Diagnostic::new(DiagnosticCode::AsmError, err.to_string())
  }
}
