use diagnostic::DiagnosticEngine;
use lexer::Lexer;
use parser::{
  ast::{Expr, ExprKind},
  types::Type,
  Parser,
};
use semantic_analysis::TypeChecker;

fn parse(src: &str) -> Expr {
  let mut engine = DiagnosticEngine::new();
  let tokens = Lexer::tokenize(src, &mut engine);
  assert!(!engine.has_errors());
  Parser::parse_module(tokens).expect("parse should succeed")
}

fn main_expr(module: &Expr) -> &Expr {
  match &module.kind {
    ExprKind::Module(seq) => &seq[0],
    _ => panic!("expected Module"),
  }
}

#[test]
fn arithmetic_expression_types_as_int() {
  let module = parse("1 + 2 * 3");
  TypeChecker::check_module(&module).expect("should type-check");
  assert_eq!(main_expr(&module).get_type(), Type::Int);
}

#[test]
fn if_with_matching_branches_types_as_branch_type() {
  let module = parse("if 1 < 2 then 3 else 4");
  TypeChecker::check_module(&module).expect("should type-check");
  assert_eq!(main_expr(&module).get_type(), Type::Int);
}

#[test]
fn if_without_else_types_as_unit() {
  let module = parse("if true then print_int(1)");
  TypeChecker::check_module(&module).expect("should type-check");
  assert_eq!(main_expr(&module).get_type(), Type::Unit);
}

#[test]
fn while_loop_types_as_unit() {
  let module = parse("var a = 1; while a < 3 do a = a + 1; a");
  TypeChecker::check_module(&module).expect("should type-check");
  assert_eq!(main_expr(&module).get_type(), Type::Int);
}

#[test]
fn function_call_resolves_to_return_type_and_supports_recursion() {
  let module = parse("fun sq(x: Int): Int { return x*x; } sq(5)");
  TypeChecker::check_module(&module).expect("should type-check");
  assert_eq!(main_expr(&module).get_type(), Type::Int);
}

#[test]
fn mutually_recursive_functions_type_check() {
  let module = parse(
    "fun is_even(n: Int): Bool { if n == 0 then true else is_odd(n - 1) } \
     fun is_odd(n: Int): Bool { if n == 0 then false else is_even(n - 1) } \
     is_even(4)",
  );
  TypeChecker::check_module(&module).expect("should type-check");
}

#[test]
fn rejects_int_plus_bool() {
  let module = parse("1 + true");
  assert!(TypeChecker::check_module(&module).is_err());
}

#[test]
fn rejects_non_bool_if_condition() {
  let module = parse("if 1 then 2 else 3");
  assert!(TypeChecker::check_module(&module).is_err());
}

#[test]
fn rejects_unary_not_on_int() {
  let module = parse("not 1");
  assert!(TypeChecker::check_module(&module).is_err());
}

#[test]
fn rejects_undefined_variable() {
  let module = parse("x + 1");
  assert!(TypeChecker::check_module(&module).is_err());
}

#[test]
fn rejects_bool_argument_to_print_int() {
  let module = parse("print_int(true)");
  assert!(TypeChecker::check_module(&module).is_err());
}

#[test]
fn equality_accepts_any_matching_type() {
  let module = parse("true == false");
  TypeChecker::check_module(&module).expect("should type-check");
  assert_eq!(main_expr(&module).get_type(), Type::Bool);
}

#[test]
fn function_declared_to_return_bool_but_body_yields_int_is_a_type_error() {
  let module = parse("fun f(): Bool { 1 } f()");
  assert!(TypeChecker::check_module(&module).is_err());
}
