use codegen::CodeGenerator;
use diagnostic::DiagnosticEngine;
use ir::IrGenerator;
use lexer::Lexer;
use parser::Parser;
use semantic_analysis::TypeChecker;

fn compile_to_asm(src: &str) -> String {
  let mut engine = DiagnosticEngine::new();
  let tokens = Lexer::tokenize(src, &mut engine);
  assert!(!engine.has_errors());
  let module = Parser::parse_module(tokens).expect("parse should succeed");
  TypeChecker::check_module(&module).expect("should type-check");
  let program = IrGenerator::generate(&module).expect("should lower to IR");
  CodeGenerator::generate(&program).expect("should generate assembly")
}

#[test]
fn header_declares_externs_and_text_section() {
  let asm = compile_to_asm("1 + 2");
  assert!(asm.contains(".extern print_int"));
  assert!(asm.contains(".extern print_bool"));
  assert!(asm.contains(".extern read_int"));
  assert!(asm.contains(".section .text"));
  assert!(asm.contains(".global main"));
}

#[test]
fn main_ends_with_zeroed_exit_code_and_ret() {
  let asm = compile_to_asm("1 + 2");
  let main_fn = asm.split("main:").nth(1).expect("main body");
  assert!(main_fn.contains("movq $0, %rax"));
  assert!(main_fn.trim_end().ends_with("ret"));
}

#[test]
fn every_function_has_matched_prologue_and_epilogue() {
  let asm = compile_to_asm("fun sq(x: Int): Int { return x*x; } sq(5)");
  assert!(asm.contains("sq:"));
  assert!(asm.contains("pushq %rbp"));
  assert!(asm.contains("movq %rsp, %rbp"));
  assert!(asm.contains("popq %rbp"));
}

#[test]
fn division_lowers_to_cqto_idivq() {
  let asm = compile_to_asm("10 / 3");
  assert!(asm.contains("cqto"));
  assert!(asm.contains("idivq"));
}

#[test]
fn comparison_lowers_to_setcc() {
  let asm = compile_to_asm("1 < 2");
  assert!(asm.contains("setl"));
}

#[test]
fn user_call_pushes_args_and_pads_odd_arity() {
  let asm = compile_to_asm("fun f(a: Int, b: Int, c: Int): Int { return a + b + c; } f(1, 2, 3)");
  assert!(asm.contains("pushq %rax"));
  assert!(asm.contains("subq $8, %rsp"));
  assert!(asm.contains("call f"));
}

#[test]
fn print_int_call_moves_argument_into_rdi() {
  let asm = compile_to_asm("print_int(42)");
  assert!(asm.contains("movq") && asm.contains("%rdi"));
  assert!(asm.contains("call print_int"));
}
