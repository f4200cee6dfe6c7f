use std::fmt;

/// A name-tagged value location: a local temporary (`x1, x2, …`), a
/// function parameter (`p1, p2, …`), the `unit` sentinel, or an
/// operator/runtime-primitive/user-function name used as a call target.
/// IRVars are value-equal and hashable by name — the IR generator
/// doesn't distinguish an intrinsic from an extern call from a user
/// call; that dispatch happens entirely in codegen, by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IRVar(pub String);

impl IRVar {
  pub fn named(name: impl Into<String>) -> Self {
    IRVar(name.into())
  }

  pub fn unit() -> Self {
    IRVar("unit".to_string())
  }

  pub fn is_parameter(&self) -> bool {
    self.0.starts_with('p') && self.0[1..].chars().all(|c| c.is_ascii_digit()) && self.0.len() > 1
  }
}

impl fmt::Display for IRVar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// One instruction of the linear, function-partitioned IR. All
/// instructions are immutable once built.
#[derive(Debug, Clone)]
pub enum Instruction {
  Label(String),
  LoadIntConst { value: i64, dest: IRVar },
  LoadBoolConst { value: bool, dest: IRVar },
  Copy { source: IRVar, dest: IRVar },
  /// `fun` names an operator, a runtime primitive, or a user function —
  /// codegen dispatches on the name, the generator doesn't care which.
  Call { fun: IRVar, args: Vec<IRVar>, dest: IRVar },
  Jump(String),
  /// Branches to `then_label` iff `cond != 0`.
  CondJump { cond: IRVar, then_label: String, else_label: String },
  Return(Option<IRVar>),
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Instruction::Label(name) => write!(f, "{}:", name),
      Instruction::LoadIntConst { value, dest } => write!(f, "    {} = LoadIntConst({})", dest, value),
      Instruction::LoadBoolConst { value, dest } => write!(f, "    {} = LoadBoolConst({})", dest, value),
      Instruction::Copy { source, dest } => write!(f, "    {} = Copy({})", dest, source),
      Instruction::Call { fun, args, dest } => {
        let arg_list = args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
        write!(f, "    {} = Call({}, [{}])", dest, fun, arg_list)
      },
      Instruction::Jump(label) => write!(f, "    Jump({})", label),
      Instruction::CondJump { cond, then_label, else_label } => {
        write!(f, "    CondJump({}, {}, {})", cond, then_label, else_label)
      },
      Instruction::Return(None) => write!(f, "    Return()"),
      Instruction::Return(Some(v)) => write!(f, "    Return({})", v),
    }
  }
}
