use diagnostic::DiagnosticEngine;
use lexer::Lexer;
use parser::{
  ast::{Expr, ExprKind, Literal},
  Parser,
};

fn parse(src: &str) -> Expr {
  let mut engine = DiagnosticEngine::new();
  let tokens = Lexer::tokenize(src, &mut engine);
  assert!(!engine.has_errors(), "lex errors: {:?}", engine.diagnostics());
  Parser::parse_module(tokens).expect("parse should succeed")
}

fn main_expr(module: &Expr) -> &Expr {
  match &module.kind {
    ExprKind::Module(seq) => &seq[0],
    _ => panic!("expected Module"),
  }
}

#[test]
fn parses_arithmetic_with_precedence() {
  let module = parse("1 + 2 * 3");
  let main = main_expr(&module);
  match &main.kind {
    ExprKind::BinaryOp { left, op, right } => {
      assert_eq!(op, "+");
      assert!(matches!(left.kind, ExprKind::Literal(Literal::Int(1))));
      assert!(matches!(right.kind, ExprKind::BinaryOp { .. }));
    },
    other => panic!("unexpected shape: {:?}", other),
  }
}

#[test]
fn parses_if_then_else() {
  let module = parse("if 1 < 2 then 3 else 4");
  let main = main_expr(&module);
  match &main.kind {
    ExprKind::IfExpression { cond, else_clause, .. } => {
      assert!(matches!(cond.kind, ExprKind::BinaryOp { .. }));
      assert!(else_clause.is_some());
    },
    other => panic!("unexpected shape: {:?}", other),
  }
}

#[test]
fn parses_var_decl_and_while_with_assignment() {
  let module = parse("var a = 1; while a < 3 do a = a + 1; a");
  let main = main_expr(&module);
  match &main.kind {
    ExprKind::Block(seq) => {
      assert!(matches!(seq[0].kind, ExprKind::VariableDeclaration { .. }));
      assert!(matches!(seq[1].kind, ExprKind::WhileExpression { .. }));
      assert!(matches!(seq[2].kind, ExprKind::Identifier(_)));
    },
    other => panic!("unexpected shape: {:?}", other),
  }
}

#[test]
fn function_declaration_and_call_site() {
  let module = parse("fun sq(x: Int): Int { return x*x; } sq(5)");
  match &module.kind {
    ExprKind::Module(seq) => {
      assert_eq!(seq.len(), 2);
      assert!(matches!(seq[0].kind, ExprKind::Function { .. }));
      match &seq[1].kind {
        ExprKind::FunctionDeclaration { name, params, .. } => {
          assert_eq!(name, "sq");
          assert_eq!(params.len(), 1);
        },
        other => panic!("unexpected shape: {:?}", other),
      }
    },
    other => panic!("unexpected module shape: {:?}", other),
  }
}

#[test]
fn trailing_semicolon_yields_implicit_none() {
  let module = parse("{ 1; }");
  let main = main_expr(&module);
  match &main.kind {
    ExprKind::Block(seq) => {
      assert_eq!(seq.len(), 2);
      assert!(matches!(seq[1].kind, ExprKind::Literal(Literal::None)));
    },
    other => panic!("unexpected shape: {:?}", other),
  }
}

#[test]
fn block_tail_without_semicolon_does_not_require_one() {
  let module = parse("{ if true then { 1 } a }");
  let main = main_expr(&module);
  match &main.kind {
    ExprKind::Block(seq) => assert_eq!(seq.len(), 2),
    other => panic!("unexpected shape: {:?}", other),
  }
}

#[test]
fn missing_semicolon_between_non_block_expressions_is_an_error() {
  let mut engine = DiagnosticEngine::new();
  let tokens = Lexer::tokenize("{ a b }", &mut engine);
  assert!(Parser::parse_module(tokens).is_err());
}

#[test]
fn assignment_is_right_associative_and_only_valid_on_identifiers() {
  let module = parse("var a = 1; var b = 2; a = b");
  let main = main_expr(&module);
  match &main.kind {
    ExprKind::Block(seq) => match &seq[2].kind {
      ExprKind::BinaryOp { op, left, .. } => {
        assert_eq!(op, "=");
        assert!(matches!(left.kind, ExprKind::Identifier(_)));
      },
      other => panic!("unexpected shape: {:?}", other),
    },
    other => panic!("unexpected shape: {:?}", other),
  }
}
