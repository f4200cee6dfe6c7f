use std::collections::HashMap;

use ir::instr::{IRVar, Instruction};

/// A function's derived stack frame: every non-parameter IRVar that
/// appears in its instruction list gets a unique 8-byte slot below
/// `%rbp`, assigned in first-appearance order. Parameter IRVars are
/// addressed directly by their own numeric suffix and never occupy a
/// slot here.
pub struct Locals {
  slots: HashMap<String, i64>,
  frame_size: i64,
}

impl Locals {
  pub fn build(instructions: &[Instruction]) -> Self {
    let mut slots = HashMap::new();
    let mut next_index: i64 = 1;

    let mut note = |var: &IRVar, slots: &mut HashMap<String, i64>, next_index: &mut i64| {
      if var.is_parameter() {
        return;
      }
      slots.entry(var.0.clone()).or_insert_with(|| {
        let idx = *next_index;
        *next_index += 1;
        idx
      });
    };

    for instruction in instructions {
      match instruction {
        Instruction::Label(_) | Instruction::Jump(_) => {},
        Instruction::LoadIntConst { dest, .. } | Instruction::LoadBoolConst { dest, .. } => {
          note(dest, &mut slots, &mut next_index);
        },
        Instruction::Copy { source, dest } => {
          note(source, &mut slots, &mut next_index);
          note(dest, &mut slots, &mut next_index);
        },
        Instruction::Call { args, dest, .. } => {
          for arg in args {
            note(arg, &mut slots, &mut next_index);
          }
          note(dest, &mut slots, &mut next_index);
        },
        Instruction::CondJump { cond, .. } => {
          note(cond, &mut slots, &mut next_index);
        },
        Instruction::Return(Some(v)) => {
          note(v, &mut slots, &mut next_index);
        },
        Instruction::Return(None) => {},
      }
    }

    let frame_size = (next_index - 1) * 8;
    Self { slots, frame_size }
  }

  /// The operand string (e.g. `-8(%rbp)` or `24(%rbp)`) for referencing
  /// `var` in the body of the function this frame was built for.
  pub fn slot(&self, var: &IRVar) -> String {
    if var.is_parameter() {
      let k: i64 = var.0[1..].parse().expect("parameter IRVar name must be pN");
      format!("{}(%rbp)", 8 * k + 8)
    } else {
      let idx = self
        .slots
        .get(&var.0)
        .unwrap_or_else(|| panic!("local variable '{}' missing from computed frame", var.0));
      format!("-{}(%rbp)", idx * 8)
    }
  }

  pub fn frame_size(&self) -> i64 {
    self.frame_size
  }
}
