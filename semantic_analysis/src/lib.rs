use diagnostic::error::TypeError;
use logger::Logger;
use parser::{
  ast::{Expr, ExprKind, Literal},
  symbol_table::SymbolTable,
  types::Type,
};

/// Decorates every reachable node's `.type` field and enforces the
/// typing rules. Mirrors this workspace's own `Resolver` in structure —
/// a scope-chain walk over the tree pushing and popping frames around
/// each lexical block — but produces `Type`s instead of use/def
/// diagnostics, since this language has no separate resolution pass.
pub struct TypeChecker {
  scopes: SymbolTable<Type>,
}

impl TypeChecker {
  pub fn new() -> Self {
    Self { scopes: SymbolTable::new() }
  }

  pub fn check_module(module: &Expr) -> Result<(), TypeError> {
    Logger::stage("semantic_analysis");
    let mut checker = TypeChecker::new();
    checker.check(module)?;
    Ok(())
  }

  fn check(&mut self, expr: &Expr) -> Result<Type, TypeError> {
    let ty = self.check_kind(expr)?;
    expr.set_type(ty.clone());
    Ok(ty)
  }

  fn check_kind(&mut self, expr: &Expr) -> Result<Type, TypeError> {
    match &expr.kind {
      ExprKind::Literal(Literal::Bool(_)) => Ok(Type::Bool),
      ExprKind::Literal(Literal::Int(_)) => Ok(Type::Int),
      ExprKind::Literal(Literal::None) => Ok(Type::Unit),

      ExprKind::Identifier(name) => self
        .scopes
        .lookup(name)
        .ok_or_else(|| TypeError::UndefinedVariable(name.clone())),

      ExprKind::BinaryOp { left, op, right } => self.check_binary_op(left, op, right),

      ExprKind::UnaryOp { op, right } => {
        let right_ty = self.check(right)?;
        match (op.as_str(), &right_ty) {
          ("-", Type::Int) => Ok(Type::Int),
          ("not", Type::Bool) => Ok(Type::Bool),
          _ => Err(TypeError::Mismatch(format!(
            "operator '{}' does not apply to {}",
            op, right_ty
          ))),
        }
      },

      ExprKind::IfExpression { cond, then_clause, else_clause } => {
        let cond_ty = self.check(cond)?;
        if cond_ty != Type::Bool {
          return Err(TypeError::Mismatch(format!(
            "if condition must be Bool, found {}",
            cond_ty
          )));
        }
        let then_ty = self.check(then_clause)?;
        match else_clause {
          None => Ok(Type::Unit),
          Some(else_clause) => {
            let else_ty = self.check(else_clause)?;
            if then_ty != else_ty {
              return Err(TypeError::Mismatch(format!(
                "if branches disagree: {} vs {}",
                then_ty, else_ty
              )));
            }
            Ok(then_ty)
          },
        }
      },

      ExprKind::WhileExpression { cond, body } => {
        let cond_ty = self.check(cond)?;
        if cond_ty != Type::Bool {
          return Err(TypeError::Mismatch(format!(
            "while condition must be Bool, found {}",
            cond_ty
          )));
        }
        let body_ty = self.check(body)?;
        if body_ty != Type::Unit {
          return Err(TypeError::Mismatch(format!(
            "while body must have type Unit, found {}",
            body_ty
          )));
        }
        Ok(Type::Unit)
      },

      ExprKind::VariableDeclaration { name, initializer, declared_type } => {
        let init_ty = self.check(initializer)?;
        if let Some(declared) = declared_type {
          if declared != &init_ty {
            return Err(TypeError::Mismatch(format!(
              "variable '{}' declared as {} but initialized with {}",
              name, declared, init_ty
            )));
          }
        }
        self.scopes.define(name.clone(), init_ty);
        Ok(Type::Unit)
      },

      ExprKind::Block(elements) => {
        self.scopes.enter_scope();
        let mut last = Type::Unit;
        for element in elements {
          last = self.check(element)?;
        }
        self.scopes.exit_scope();
        Ok(last)
      },

      ExprKind::Function { name, args } => self.check_call(name, args),

      ExprKind::FunctionDeclaration { .. } => {
        // Module::check_kind handles declarations directly so mutual
        // recursion can be resolved before any body is checked; a bare
        // FunctionDeclaration never reaches this arm on its own.
        unreachable!("function declarations are checked via Module")
      },

      ExprKind::ReturnExpression(value) => self.check(value),

      ExprKind::Module(sequence) => self.check_module_sequence(sequence),
    }
  }

  fn check_binary_op(&mut self, left: &Expr, op: &str, right: &Expr) -> Result<Type, TypeError> {
    if op == "=" {
      let name = match &left.kind {
        ExprKind::Identifier(name) => name.clone(),
        _ => return Err(TypeError::Mismatch("assignment target must be an identifier".to_string())),
      };
      if self.scopes.lookup(&name).is_none() {
        return Err(TypeError::UndefinedVariable(name));
      }
      let right_ty = self.check(right)?;
      left.set_type(right_ty.clone());
      self.scopes.assign(&name, right_ty);
      return Ok(Type::Unit);
    }

    let left_ty = self.check(left)?;
    let right_ty = self.check(right)?;

    match op {
      "+" | "-" | "*" | "/" | "%" if left_ty == Type::Int && right_ty == Type::Int => Ok(Type::Int),
      "<" | ">" | "<=" | ">=" if left_ty == Type::Int && right_ty == Type::Int => Ok(Type::Bool),
      "==" | "!=" if left_ty == right_ty => Ok(Type::Bool),
      "and" | "or" if left_ty == Type::Bool && right_ty == Type::Bool => Ok(Type::Bool),
      _ => Err(TypeError::Mismatch(format!(
        "operator '{}' does not apply to {} and {}",
        op, left_ty, right_ty
      ))),
    }
  }

  fn check_call(&mut self, name: &str, args: &[Expr]) -> Result<Type, TypeError> {
    match name {
      "print_int" => {
        self.check_intrinsic_arity(name, args, 1)?;
        let arg_ty = self.check(&args[0])?;
        if arg_ty != Type::Int {
          return Err(TypeError::Mismatch(format!("print_int expects Int, found {}", arg_ty)));
        }
        Ok(Type::Unit)
      },
      "print_bool" => {
        self.check_intrinsic_arity(name, args, 1)?;
        let arg_ty = self.check(&args[0])?;
        if arg_ty != Type::Bool {
          return Err(TypeError::Mismatch(format!("print_bool expects Bool, found {}", arg_ty)));
        }
        Ok(Type::Unit)
      },
      "read_int" => {
        self.check_intrinsic_arity(name, args, 0)?;
        Ok(Type::Int)
      },
      _ => {
        let fn_ty = self
          .scopes
          .lookup(name)
          .ok_or_else(|| TypeError::UndefinedFunction(name.to_string()))?;
        let Type::Function { params, return_type } = fn_ty else {
          return Err(TypeError::Mismatch(format!("'{}' is not callable", name)));
        };
        if params.len() != args.len() {
          return Err(TypeError::ArityMismatch {
            name: name.to_string(),
            expected: params.len(),
            found: args.len(),
          });
        }
        for (param_ty, arg) in params.iter().zip(args) {
          let arg_ty = self.check(arg)?;
          if &arg_ty != param_ty {
            return Err(TypeError::Mismatch(format!(
              "call to '{}' expects {}, found {}",
              name, param_ty, arg_ty
            )));
          }
        }
        Ok(*return_type)
      },
    }
  }

  fn check_intrinsic_arity(&self, name: &str, args: &[Expr], expected: usize) -> Result<(), TypeError> {
    if args.len() != expected {
      return Err(TypeError::ArityMismatch {
        name: name.to_string(),
        expected,
        found: args.len(),
      });
    }
    Ok(())
  }

  fn check_module_sequence(&mut self, sequence: &[Expr]) -> Result<Type, TypeError> {
    let (main, functions) = sequence.split_first().expect("Module always has a main expression");

    for function in functions {
      let ExprKind::FunctionDeclaration { name, params, return_type, .. } = &function.kind else {
        continue;
      };
      let fn_ty = Type::function(params.iter().map(|(_, ty)| ty.clone()).collect(), return_type.clone());
      self.scopes.define(name.clone(), fn_ty);
    }

    let main_ty = self.check(main)?;
    main.set_type(main_ty.clone());

    for function in functions {
      self.check_function_declaration(function)?;
    }

    Ok(main_ty)
  }

  fn check_function_declaration(&mut self, function: &Expr) -> Result<(), TypeError> {
    let ExprKind::FunctionDeclaration { name, params, body, return_type } = &function.kind else {
      unreachable!("caller guarantees FunctionDeclaration");
    };

    self.scopes.enter_scope();
    for (param_name, param_ty) in params {
      self.scopes.define(param_name.clone(), param_ty.clone());
    }
    let body_ty = self.check(body)?;
    self.scopes.exit_scope();

    if &body_ty != return_type {
      return Err(TypeError::Mismatch(format!(
        "function '{}' declared to return {} but body has type {}",
        name, return_type, body_ty
      )));
    }
    function.set_type(return_type.clone());
    Ok(())
  }
}

impl Default for TypeChecker {
  fn default() -> Self {
    Self::new()
  }
}
