use std::fmt;

use crate::instr::Instruction;

/// The IR generator's product: an insertion-ordered map from function
/// name to its instruction list, always containing `"main"` first,
/// followed by each user `FunctionDeclaration` in source order.
#[derive(Debug, Default)]
pub struct IrProgram {
  functions: Vec<(String, Vec<Instruction>)>,
}

impl IrProgram {
  pub fn new() -> Self {
    Self { functions: Vec::new() }
  }

  pub fn push(&mut self, name: impl Into<String>, instructions: Vec<Instruction>) {
    self.functions.push((name.into(), instructions));
  }

  pub fn get(&self, name: &str) -> Option<&[Instruction]> {
    self
      .functions
      .iter()
      .find(|(fn_name, _)| fn_name == name)
      .map(|(_, instrs)| instrs.as_slice())
  }

  pub fn functions(&self) -> impl Iterator<Item = (&str, &[Instruction])> {
    self.functions.iter().map(|(name, instrs)| (name.as_str(), instrs.as_slice()))
  }
}

impl fmt::Display for IrProgram {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (name, instructions) in &self.functions {
      writeln!(f, "{}:", name)?;
      for instruction in instructions {
        writeln!(f, "{}", instruction)?;
      }
    }
    Ok(())
  }
}
