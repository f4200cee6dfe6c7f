use diagnostic::DiagnosticEngine;
use ir::{instr::Instruction, IrGenerator};
use lexer::Lexer;
use parser::{ast::Expr, Parser};
use semantic_analysis::TypeChecker;

fn compile_to_module(src: &str) -> Expr {
  let mut engine = DiagnosticEngine::new();
  let tokens = Lexer::tokenize(src, &mut engine);
  assert!(!engine.has_errors());
  let module = Parser::parse_module(tokens).expect("parse should succeed");
  TypeChecker::check_module(&module).expect("should type-check");
  module
}

#[test]
fn every_function_ends_with_return() {
  let module = compile_to_module("fun sq(x: Int): Int { return x*x; } sq(5)");
  let program = IrGenerator::generate(&module).expect("should lower to IR");

  for (_name, instructions) in program.functions() {
    assert!(matches!(instructions.last(), Some(Instruction::Return(_))));
  }
}

#[test]
fn main_contains_start_label_and_print_call_for_int_result() {
  let module = compile_to_module("1 + 2 * 3");
  let program = IrGenerator::generate(&module).expect("should lower to IR");
  let main = program.get("main").expect("main must exist");

  assert!(matches!(main.first(), Some(Instruction::Label(label)) if label == "start"));
  let has_print_call = main.iter().any(|instr| {
    matches!(instr, Instruction::Call { fun, .. } if fun.0 == "print_int")
  });
  assert!(has_print_call);
}

#[test]
fn jump_and_condjump_targets_exist_as_labels_in_the_same_function() {
  let module = compile_to_module("if 1 < 2 then 3 else 4");
  let program = IrGenerator::generate(&module).expect("should lower to IR");
  let main = program.get("main").expect("main must exist");

  let labels: Vec<&str> = main
    .iter()
    .filter_map(|i| match i {
      Instruction::Label(name) => Some(name.as_str()),
      _ => None,
    })
    .collect();

  for instr in main {
    match instr {
      Instruction::Jump(target) => assert!(labels.contains(&target.as_str()), "missing label {}", target),
      Instruction::CondJump { then_label, else_label, .. } => {
        assert!(labels.contains(&then_label.as_str()));
        assert!(labels.contains(&else_label.as_str()));
      },
      _ => {},
    }
  }
}

#[test]
fn short_circuit_or_does_not_unconditionally_visit_right_operand() {
  let module = compile_to_module("true or { print_int(1); true }");
  let program = IrGenerator::generate(&module).expect("should lower to IR");
  let main = program.get("main").expect("main must exist");

  // The right-hand side is only reachable through the "right" label,
  // never executed unconditionally at the top of the instruction list.
  let right_label_index = main.iter().position(|i| matches!(i, Instruction::Label(l) if l.starts_with("right")));
  assert!(right_label_index.is_some());
}

#[test]
fn user_function_call_and_odd_arity_phantom_parameter() {
  let module = compile_to_module("fun f(a: Int, b: Int, c: Int): Int { return a + b + c; } f(1, 2, 3)");
  let program = IrGenerator::generate(&module).expect("should lower to IR");
  let f = program.get("f").expect("f must exist");

  // Three parameters is odd, so the phantom occupies p1 and the real
  // parameters read from p2, p3, p4.
  let copies_from_params: Vec<&str> = f
    .iter()
    .filter_map(|i| match i {
      Instruction::Copy { source, .. } if source.0.starts_with('p') => Some(source.0.as_str()),
      _ => None,
    })
    .collect();
  assert_eq!(copies_from_params, vec!["p2", "p3", "p4"]);
}

#[test]
fn while_loop_lowers_to_start_body_end_labels() {
  let module = compile_to_module("var a = 1; while a < 3 do a = a + 1; a");
  let program = IrGenerator::generate(&module).expect("should lower to IR");
  let main = program.get("main").expect("main must exist");

  let has_start = main.iter().any(|i| matches!(i, Instruction::Label(l) if l.starts_with("start")));
  let has_body = main.iter().any(|i| matches!(i, Instruction::Label(l) if l.starts_with("body")));
  assert!(has_start && has_body);
}
