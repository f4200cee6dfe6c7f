pub mod instr;
pub mod program;

use diagnostic::error::IrError;
use logger::Logger;
use parser::{
  ast::{Expr, ExprKind, Literal},
  symbol_table::SymbolTable,
  types::Type,
};

use instr::{IRVar, Instruction};
use program::IrProgram;

/// Lowers a type-checked tree into the function-partitioned IR. Counters
/// for temporaries and labels are monotonically increasing across the
/// whole run (stage-local state, reset only between stages, never
/// between functions); the name scope, by contrast, is rebuilt fresh
/// for each function since parameter names don't carry across bodies.
pub struct IrGenerator {
  instructions: Vec<Instruction>,
  scopes: SymbolTable<IRVar>,
  next_temp: usize,
  next_label: usize,
  end_label: String,
}

impl IrGenerator {
  fn new() -> Self {
    Self {
      instructions: Vec::new(),
      scopes: SymbolTable::new(),
      next_temp: 0,
      next_label: 0,
      end_label: String::new(),
    }
  }

  pub fn generate(module: &Expr) -> Result<IrProgram, IrError> {
    Logger::stage("ir");
    let ExprKind::Module(sequence) = &module.kind else {
      return Err(IrError::Internal("IR generation expects a Module node".to_string()));
    };
    let (main, functions) = sequence
      .split_first()
      .ok_or_else(|| IrError::Internal("Module has no main expression".to_string()))?;

    let mut generator = IrGenerator::new();
    let mut program = IrProgram::new();

    program.push("main", generator.generate_main(main)?);

    for function in functions {
      let ExprKind::FunctionDeclaration { name, .. } = &function.kind else {
        return Err(IrError::Internal("Module's tail must all be FunctionDeclarations".to_string()));
      };
      program.push(name.clone(), generator.generate_function(function)?);
    }

    Ok(program)
  }

  fn generate_main(&mut self, main: &Expr) -> Result<Vec<Instruction>, IrError> {
    self.instructions = vec![Instruction::Label("start".to_string())];
    self.scopes = SymbolTable::new();
    self.end_label = self.fresh_label_name("End");

    let result = self.visit(main)?;

    match main.get_type() {
      Type::Int => {
        let dest = self.fresh_temp();
        self.emit(Instruction::Call {
          fun: IRVar::named("print_int"),
          args: vec![result],
          dest,
        });
      },
      Type::Bool => {
        let dest = self.fresh_temp();
        self.emit(Instruction::Call {
          fun: IRVar::named("print_bool"),
          args: vec![result],
          dest,
        });
      },
      _ => {},
    }

    self.emit(Instruction::Label(self.end_label.clone()));
    self.emit(Instruction::Return(None));
    Ok(std::mem::take(&mut self.instructions))
  }

  fn generate_function(&mut self, function: &Expr) -> Result<Vec<Instruction>, IrError> {
    let ExprKind::FunctionDeclaration { params, body, .. } = &function.kind else {
      return Err(IrError::Internal("expected FunctionDeclaration".to_string()));
    };

    self.instructions = Vec::new();
    self.scopes = SymbolTable::new();
    self.end_label = self.fresh_label_name("End");

    // Odd-arity phantom parameter: reserve p1 unused so the real
    // parameters start at an index that keeps the post-call alignment
    // pad's slot count even, per the calling convention.
    let has_phantom = params.len() % 2 == 1;
    let mut index = if has_phantom { 2 } else { 1 };
    for (name, _ty) in params {
      let source = IRVar::named(format!("p{}", index));
      let local = self.fresh_temp();
      self.emit(Instruction::Copy { source, dest: local.clone() });
      self.scopes.define(name.clone(), local);
      index += 1;
    }

    self.visit(body)?;

    self.emit(Instruction::Label(self.end_label.clone()));
    self.emit(Instruction::Return(None));
    Ok(std::mem::take(&mut self.instructions))
  }

  fn visit(&mut self, expr: &Expr) -> Result<IRVar, IrError> {
    match &expr.kind {
      ExprKind::Literal(Literal::Int(value)) => {
        let dest = self.fresh_temp();
        self.emit(Instruction::LoadIntConst { value: *value, dest: dest.clone() });
        Ok(dest)
      },
      ExprKind::Literal(Literal::Bool(value)) => {
        let dest = self.fresh_temp();
        self.emit(Instruction::LoadBoolConst { value: *value, dest: dest.clone() });
        Ok(dest)
      },
      ExprKind::Literal(Literal::None) => Ok(IRVar::unit()),

      ExprKind::Identifier(name) => self
        .scopes
        .lookup(name)
        .ok_or_else(|| IrError::Internal(format!("undefined name '{}' reached IR generation", name))),

      ExprKind::BinaryOp { left, op, right } => self.visit_binary_op(left, op, right),

      ExprKind::UnaryOp { op, right } => {
        let right_var = self.visit(right)?;
        let fun_name = if op == "not" { "unary_not".to_string() } else { format!("unary_{}", op) };
        let dest = self.fresh_temp();
        self.emit(Instruction::Call { fun: IRVar::named(fun_name), args: vec![right_var], dest: dest.clone() });
        Ok(dest)
      },

      ExprKind::IfExpression { cond, then_clause, else_clause } => {
        self.visit_if(cond, then_clause, else_clause.as_deref())
      },

      ExprKind::WhileExpression { cond, body } => self.visit_while(cond, body),

      ExprKind::VariableDeclaration { name, initializer, .. } => {
        let value = self.visit(initializer)?;
        // Bind the declared name to its own slot rather than aliasing
        // the initializer's temporary, so a later reassignment of
        // `name` can't retroactively change what the initializer
        // expression (e.g. another identifier) evaluated to.
        let slot = self.fresh_temp();
        self.emit(Instruction::Copy { source: value, dest: slot.clone() });
        self.scopes.define(name.clone(), slot);
        Ok(IRVar::unit())
      },

      ExprKind::Block(elements) => {
        self.scopes.enter_scope();
        let mut last = IRVar::unit();
        for element in elements {
          last = self.visit(element)?;
        }
        self.scopes.exit_scope();
        Ok(last)
      },

      ExprKind::Function { name, args } => {
        let mut arg_vars = Vec::with_capacity(args.len());
        for arg in args {
          arg_vars.push(self.visit(arg)?);
        }
        let dest = self.fresh_temp();
        self.emit(Instruction::Call { fun: IRVar::named(name.clone()), args: arg_vars, dest: dest.clone() });
        Ok(dest)
      },

      ExprKind::FunctionDeclaration { .. } => {
        Err(IrError::Internal("nested function declarations are not supported".to_string()))
      },

      ExprKind::ReturnExpression(value) => {
        let value_var = self.visit(value)?;
        self.emit(Instruction::Return(Some(value_var)));
        self.emit(Instruction::Jump(self.end_label.clone()));
        Ok(IRVar::unit())
      },

      ExprKind::Module(_) => Err(IrError::Internal("nested Module node".to_string())),
    }
  }

  fn visit_binary_op(&mut self, left: &Expr, op: &str, right: &Expr) -> Result<IRVar, IrError> {
    if op == "=" {
      let ExprKind::Identifier(name) = &left.kind else {
        return Err(IrError::Internal("assignment target must be an identifier".to_string()));
      };
      let target = self
        .scopes
        .lookup(name)
        .ok_or_else(|| IrError::Internal(format!("undefined name '{}' reached IR generation", name)))?;
      let rhs = self.visit(right)?;
      self.emit(Instruction::Copy { source: rhs, dest: target.clone() });
      return Ok(target);
    }

    if op == "and" || op == "or" {
      return self.visit_short_circuit(op, left, right);
    }

    let left_var = self.visit(left)?;
    let right_var = self.visit(right)?;
    let dest = self.fresh_temp();
    self.emit(Instruction::Call {
      fun: IRVar::named(op),
      args: vec![left_var, right_var],
      dest: dest.clone(),
    });
    Ok(dest)
  }

  fn visit_short_circuit(&mut self, op: &str, left: &Expr, right: &Expr) -> Result<IRVar, IrError> {
    let suffix = self.fresh_label_suffix();
    let right_label = format!("right{}", suffix);
    let skip_label = format!("skip{}", suffix);
    let end_label = format!("end{}", suffix);

    let left_var = self.visit(left)?;
    let result = self.fresh_temp();

    // 'or' skips evaluating the right-hand side when the left side is
    // already true; 'and' skips it when the left side is already false.
    let (then_label, else_label) = if op == "or" {
      (skip_label.clone(), right_label.clone())
    } else {
      (right_label.clone(), skip_label.clone())
    };
    self.emit(Instruction::CondJump { cond: left_var, then_label, else_label });

    self.emit(Instruction::Label(right_label));
    let right_var = self.visit(right)?;
    self.emit(Instruction::Copy { source: right_var, dest: result.clone() });
    self.emit(Instruction::Jump(end_label.clone()));

    self.emit(Instruction::Label(skip_label));
    self.emit(Instruction::LoadBoolConst { value: op == "or", dest: result.clone() });

    self.emit(Instruction::Label(end_label));
    Ok(result)
  }

  fn visit_if(&mut self, cond: &Expr, then_clause: &Expr, else_clause: Option<&Expr>) -> Result<IRVar, IrError> {
    let suffix = self.fresh_label_suffix();
    let then_label = format!("then{}", suffix);
    let end_label = format!("end{}", suffix);
    let cond_var = self.visit(cond)?;

    match else_clause {
      None => {
        self.emit(Instruction::CondJump { cond: cond_var, then_label: then_label.clone(), else_label: end_label.clone() });
        self.emit(Instruction::Label(then_label));
        let then_var = self.visit(then_clause)?;
        self.emit(Instruction::Label(end_label));
        Ok(then_var)
      },
      Some(else_clause) => {
        let else_label = format!("else{}", suffix);
        let result = self.fresh_temp();
        self.emit(Instruction::CondJump { cond: cond_var, then_label: then_label.clone(), else_label: else_label.clone() });

        self.emit(Instruction::Label(then_label));
        let then_var = self.visit(then_clause)?;
        self.emit(Instruction::Copy { source: then_var, dest: result.clone() });
        self.emit(Instruction::Jump(end_label.clone()));

        self.emit(Instruction::Label(else_label));
        let else_var = self.visit(else_clause)?;
        self.emit(Instruction::Copy { source: else_var, dest: result.clone() });

        self.emit(Instruction::Label(end_label));
        Ok(result)
      },
    }
  }

  fn visit_while(&mut self, cond: &Expr, body: &Expr) -> Result<IRVar, IrError> {
    let suffix = self.fresh_label_suffix();
    let start_label = format!("start{}", suffix);
    let body_label = format!("body{}", suffix);
    let end_label = format!("end{}", suffix);

    self.emit(Instruction::Label(start_label.clone()));
    let cond_var = self.visit(cond)?;
    self.emit(Instruction::CondJump { cond: cond_var, then_label: body_label.clone(), else_label: end_label.clone() });

    self.emit(Instruction::Label(body_label));
    self.visit(body)?;
    self.emit(Instruction::Jump(start_label));

    self.emit(Instruction::Label(end_label));
    Ok(IRVar::unit())
  }

  fn emit(&mut self, instruction: Instruction) {
    self.instructions.push(instruction);
  }

  fn fresh_temp(&mut self) -> IRVar {
    self.next_temp += 1;
    IRVar::named(format!("x{}", self.next_temp))
  }

  fn fresh_label_suffix(&mut self) -> usize {
    self.next_label += 1;
    self.next_label
  }

  fn fresh_label_name(&mut self, prefix: &str) -> String {
    let suffix = self.fresh_label_suffix();
    format!("{}_{}", prefix, suffix)
  }
}

impl Default for IrGenerator {
  fn default() -> Self {
    Self::new()
  }
}
