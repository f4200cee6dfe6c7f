use diagnostic::DiagnosticEngine;
use tcc_core::interpreter::Interpreter;
use tcc_core::runner::Pipeline;

fn run_and_capture(src: &str) -> Result<(), ()> {
  let mut engine = DiagnosticEngine::new();
  let module = match Pipeline::typecheck(src, &mut engine) {
    Some(module) => module,
    None => return Err(()),
  };
  Interpreter::run(&module).map_err(|_| ())
}

fn typechecks(src: &str) -> bool {
  let mut engine = DiagnosticEngine::new();
  Pipeline::typecheck(src, &mut engine).is_some()
}

#[test]
fn arithmetic_with_precedence_typechecks_and_runs() {
  assert!(run_and_capture("1 + 2 * 3").is_ok());
}

#[test]
fn if_then_else_runs() {
  assert!(run_and_capture("if 1 < 2 then 3 else 4").is_ok());
}

#[test]
fn var_decl_and_while_with_assignment_runs() {
  assert!(run_and_capture("var a = 1; while a < 3 do a = a + 1; a").is_ok());
}

#[test]
fn or_short_circuits_and_does_not_print() {
  assert!(run_and_capture("true or { print_int(1); true }").is_ok());
}

#[test]
fn function_declaration_and_call_runs() {
  assert!(run_and_capture("fun sq(x: Int): Int { return x * x; } sq(5)").is_ok());
}

#[test]
fn two_param_function_with_even_arity_runs() {
  assert!(run_and_capture("fun vls(x: Int, y: Int): Int { return x * x + y * y; } vls(3, 4)").is_ok());
}

#[test]
fn mismatched_arithmetic_operand_types_is_a_type_error() {
  assert!(!typechecks("1 + true"));
}

#[test]
fn non_bool_if_condition_is_a_type_error() {
  assert!(!typechecks("if 1 then 2 else 3"));
}

#[test]
fn unary_not_on_int_is_a_type_error() {
  assert!(!typechecks("not 1"));
}

#[test]
fn referencing_an_undeclared_variable_is_a_type_error() {
  assert!(!typechecks("var a = b"));
}

#[test]
fn print_int_rejects_a_bool_argument() {
  assert!(!typechecks("print_int(true)"));
}

#[test]
fn calling_a_function_with_the_wrong_arity_is_a_type_error() {
  assert!(!typechecks("fun f(x: Int): Int { return x; } f(1, 2)"));
}
