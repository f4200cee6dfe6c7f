use codegen::CodeGenerator;
use diagnostic::DiagnosticEngine;
use ir::{program::IrProgram, IrGenerator};
use lexer::Lexer;
use parser::{ast::Expr, Parser};
use semantic_analysis::TypeChecker;

/// Drives the five pipeline stages in order, funneling every stage's
/// errors into the caller's [`DiagnosticEngine`] instead of returning
/// them directly. Each method returns `None` as soon as `engine` holds
/// an error — there is no recovery path between stages, only within the
/// lexer's own error-and-continue scanning.
pub struct Pipeline;

impl Pipeline {
  pub fn typecheck(source: &str, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let tokens = Lexer::tokenize(source, engine);
    if engine.has_errors() {
      return None;
    }
    let module = match Parser::parse_module(tokens) {
      Ok(module) => module,
      Err(err) => {
        engine.emit(err.into());
        return None;
      },
    };
    if let Err(err) = TypeChecker::check_module(&module) {
      engine.emit(err.into());
      return None;
    }
    Some(module)
  }

  pub fn compile_to_ir(source: &str, engine: &mut DiagnosticEngine) -> Option<IrProgram> {
    let module = Self::typecheck(source, engine)?;
    match IrGenerator::generate(&module) {
      Ok(program) => Some(program),
      Err(err) => {
        engine.emit(err.into());
        None
      },
    }
  }

  pub fn compile_to_asm(source: &str, engine: &mut DiagnosticEngine) -> Option<String> {
    let program = Self::compile_to_ir(source, engine)?;
    match CodeGenerator::generate(&program) {
      Ok(asm) => Some(asm),
      Err(err) => {
        engine.emit(err.into());
        None
      },
    }
  }
}
