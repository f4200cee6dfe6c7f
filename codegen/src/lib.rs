pub mod locals;

use diagnostic::error::AsmError;
use ir::{
  instr::{IRVar, Instruction},
  program::IrProgram,
};
use logger::Logger;

use locals::Locals;

const COMPARISON_INTRINSICS: &[&str] = &["<", ">", "<=", ">=", "==", "!="];
const ARITHMETIC_INTRINSICS: &[&str] = &["+", "-", "*", "/", "%"];
const BOOL_INTRINSICS: &[&str] = &["and", "or"];
const UNARY_INTRINSICS: &[&str] = &["unary_-", "unary_not"];
const PRINT_FUNCTIONS: &[&str] = &["print_int", "print_bool"];

/// Lowers a function-partitioned IR program into a single textual
/// x86-64 System V assembly program, in the "spill everywhere" style:
/// every IRVar, parameter or local, lives on the stack, so no register
/// allocator is needed — just a frame-offset table and a handful of
/// `%rax`/`%rdi`/`%rdx` scratch moves per instruction.
pub struct CodeGenerator;

impl CodeGenerator {
  pub fn generate(program: &IrProgram) -> Result<String, AsmError> {
    Logger::stage("codegen");
    let mut out = String::new();

    out.push_str(".extern print_int\n");
    out.push_str(".extern print_bool\n");
    out.push_str(".extern read_int\n");
    for (name, _) in program.functions() {
      out.push_str(&format!(".global {}\n", name));
      out.push_str(&format!(".type {}, @function\n", name));
    }
    out.push_str(".section .text\n");

    for (name, instructions) in program.functions() {
      out.push_str(&Self::generate_function(name, instructions)?);
    }

    Ok(out)
  }

  fn generate_function(name: &str, instructions: &[Instruction]) -> Result<String, AsmError> {
    let locals = Locals::build(instructions);
    let mut body = String::new();

    for instruction in instructions {
      Self::lower_instruction(instruction, &locals, &mut body)?;
    }

    let mut out = String::new();
    out.push_str(&format!("{}:\n", name));
    out.push_str("    pushq %rbp\n");
    out.push_str("    movq %rsp, %rbp\n");
    out.push_str(&format!("    subq ${}, %rsp\n", locals.frame_size()));
    out.push_str(&body);
    if name == "main" {
      out.push_str("    movq $0, %rax\n");
    }
    out.push_str("    movq %rbp, %rsp\n");
    out.push_str("    popq %rbp\n");
    out.push_str("    ret\n");
    Ok(out)
  }

  fn lower_instruction(instruction: &Instruction, locals: &Locals, out: &mut String) -> Result<(), AsmError> {
    match instruction {
      Instruction::Label(name) => out.push_str(&format!(".L{}:\n", name)),

      Instruction::LoadIntConst { value, dest } => {
        let slot = locals.slot(dest);
        if *value >= i32::MIN as i64 && *value <= i32::MAX as i64 {
          out.push_str(&format!("    movq ${}, {}\n", value, slot));
        } else {
          out.push_str(&format!("    movabsq ${}, %rax\n", value));
          out.push_str(&format!("    movq %rax, {}\n", slot));
        }
      },

      Instruction::LoadBoolConst { value, dest } => {
        out.push_str(&format!("    movq ${}, {}\n", if *value { 1 } else { 0 }, locals.slot(dest)));
      },

      Instruction::Copy { source, dest } => {
        out.push_str(&format!("    movq {}, %rax\n", locals.slot(source)));
        out.push_str(&format!("    movq %rax, {}\n", locals.slot(dest)));
      },

      Instruction::Jump(label) => out.push_str(&format!("    jmp .L{}\n", label)),

      Instruction::CondJump { cond, then_label, else_label } => {
        out.push_str(&format!("    cmpq $0, {}\n", locals.slot(cond)));
        out.push_str(&format!("    jne .L{}\n", then_label));
        out.push_str(&format!("    jmp .L{}\n", else_label));
      },

      Instruction::Return(value) => {
        if let Some(v) = value {
          out.push_str(&format!("    movq {}, %rax\n", locals.slot(v)));
        }
      },

      Instruction::Call { fun, args, dest } => Self::lower_call(fun, args, dest, locals, out)?,
    }
    Ok(())
  }

  fn lower_call(fun: &IRVar, args: &[IRVar], dest: &IRVar, locals: &Locals, out: &mut String) -> Result<(), AsmError> {
    let name = fun.0.as_str();

    if ARITHMETIC_INTRINSICS.contains(&name) || COMPARISON_INTRINSICS.contains(&name) || BOOL_INTRINSICS.contains(&name) {
      return Self::lower_binary_intrinsic(name, args, dest, locals, out);
    }
    if UNARY_INTRINSICS.contains(&name) {
      return Self::lower_unary_intrinsic(name, args, dest, locals, out);
    }
    if PRINT_FUNCTIONS.contains(&name) {
      if args.len() != 1 {
        return Err(AsmError::Internal(format!("{} expects exactly one argument", name)));
      }
      out.push_str(&format!("    movq {}, %rdi\n", locals.slot(&args[0])));
      out.push_str(&format!("    call {}\n", name));
      return Ok(());
    }
    if args.is_empty() {
      out.push_str(&format!("    call {}\n", name));
      out.push_str(&format!("    movq %rax, {}\n", locals.slot(dest)));
      return Ok(());
    }

    // User function: push arguments right-to-left so the first
    // argument ends up nearest the return address, matching the
    // parameter addressing formula pk = (8k + 8)(%rbp) directly.
    for arg in args.iter().rev() {
      out.push_str(&format!("    movq {}, %rax\n", locals.slot(arg)));
      out.push_str("    pushq %rax\n");
    }
    if args.len() % 2 == 1 {
      out.push_str("    subq $8, %rsp\n");
    }
    out.push_str(&format!("    call {}\n", name));
    out.push_str(&format!("    movq %rax, {}\n", locals.slot(dest)));
    Ok(())
  }

  fn lower_binary_intrinsic(
    name: &str,
    args: &[IRVar],
    dest: &IRVar,
    locals: &Locals,
    out: &mut String,
  ) -> Result<(), AsmError> {
    if args.len() != 2 {
      return Err(AsmError::Internal(format!("intrinsic '{}' expects two operands", name)));
    }
    let (lhs, rhs) = (&args[0], &args[1]);

    match name {
      "+" => {
        out.push_str(&format!("    movq {}, %rax\n", locals.slot(lhs)));
        out.push_str(&format!("    addq {}, %rax\n", locals.slot(rhs)));
      },
      "-" => {
        out.push_str(&format!("    movq {}, %rax\n", locals.slot(lhs)));
        out.push_str(&format!("    subq {}, %rax\n", locals.slot(rhs)));
      },
      "*" => {
        out.push_str(&format!("    movq {}, %rax\n", locals.slot(lhs)));
        out.push_str(&format!("    imulq {}, %rax\n", locals.slot(rhs)));
      },
      "/" => {
        out.push_str(&format!("    movq {}, %rax\n", locals.slot(lhs)));
        out.push_str("    cqto\n");
        out.push_str(&format!("    idivq {}\n", locals.slot(rhs)));
      },
      "%" => {
        out.push_str(&format!("    movq {}, %rax\n", locals.slot(lhs)));
        out.push_str("    cqto\n");
        out.push_str(&format!("    idivq {}\n", locals.slot(rhs)));
        out.push_str("    movq %rdx, %rax\n");
      },
      "and" => {
        out.push_str(&format!("    movq {}, %rax\n", locals.slot(lhs)));
        out.push_str(&format!("    andq {}, %rax\n", locals.slot(rhs)));
      },
      "or" => {
        out.push_str(&format!("    movq {}, %rax\n", locals.slot(lhs)));
        out.push_str(&format!("    orq {}, %rax\n", locals.slot(rhs)));
      },
      "<" | ">" | "<=" | ">=" | "==" | "!=" => {
        let setcc = match name {
          "<" => "setl",
          ">" => "setg",
          "<=" => "setle",
          ">=" => "setge",
          "==" => "sete",
          "!=" => "setne",
          _ => unreachable!(),
        };
        out.push_str("    movq $0, %rax\n");
        out.push_str(&format!("    movq {}, %rcx\n", locals.slot(lhs)));
        out.push_str(&format!("    cmpq {}, %rcx\n", locals.slot(rhs)));
        out.push_str(&format!("    {} %al\n", setcc));
      },
      _ => return Err(AsmError::UnknownTarget(name.to_string())),
    }

    out.push_str(&format!("    movq %rax, {}\n", locals.slot(dest)));
    Ok(())
  }

  fn lower_unary_intrinsic(
    name: &str,
    args: &[IRVar],
    dest: &IRVar,
    locals: &Locals,
    out: &mut String,
  ) -> Result<(), AsmError> {
    if args.len() != 1 {
      return Err(AsmError::Internal(format!("intrinsic '{}' expects one operand", name)));
    }
    out.push_str(&format!("    movq {}, %rax\n", locals.slot(&args[0])));
    match name {
      "unary_-" => out.push_str("    negq %rax\n"),
      "unary_not" => out.push_str("    xorq $1, %rax\n"),
      _ => return Err(AsmError::UnknownTarget(name.to_string())),
    }
    out.push_str(&format!("    movq %rax, {}\n", locals.slot(dest)));
    Ok(())
  }
}
