use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead};
use std::rc::Rc;

use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode};
use parser::ast::{Expr, ExprKind, Literal};
use thiserror::Error;

/// Errors that can only be discovered at run time, not by type checking:
/// this language has exactly one such error, malformed input to
/// `read_int`.
#[derive(Debug, Error)]
pub enum RuntimeError {
  #[error("read_int: '{0}' is not a valid integer")]
  BadInput(String),
  #[error("undefined variable '{0}'")]
  UndefinedVariable(String),
}

impl From<RuntimeError> for Diagnostic {
  fn from(err: RuntimeError) -> Self {
    Diagnostic::new(DiagnosticCode::IoError, err.to_string())
  }
}

/// Runtime value. Unlike the IR/codegen stages, which spill everything
/// to the stack as raw 64-bit words, the interpreter keeps values typed
/// since it never leaves the Rust heap.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Int(i64),
  Bool(bool),
  Unit,
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Int(v) => write!(f, "{}", v),
      Value::Bool(v) => write!(f, "{}", v),
      Value::Unit => write!(f, "unit"),
    }
  }
}

impl Value {
  fn truthy(&self) -> bool {
    matches!(self, Value::Bool(true))
  }
}

/// A lexical scope frame. Blocks push a child pointing back at their
/// enclosing scope; function calls start a fresh top-level frame with
/// no parent, since this language has no closures.
struct Env {
  values: HashMap<String, Value>,
  parent: Option<Rc<RefCell<Env>>>,
}

impl Env {
  fn root() -> Rc<RefCell<Env>> {
    Rc::new(RefCell::new(Env { values: HashMap::new(), parent: None }))
  }

  fn child_of(parent: &Rc<RefCell<Env>>) -> Rc<RefCell<Env>> {
    Rc::new(RefCell::new(Env { values: HashMap::new(), parent: Some(parent.clone()) }))
  }

  fn define(&mut self, name: String, value: Value) {
    self.values.insert(name, value);
  }

  fn get(&self, name: &str) -> Option<Value> {
    if let Some(v) = self.values.get(name) {
      return Some(v.clone());
    }
    self.parent.as_ref().and_then(|p| p.borrow().get(name))
  }

  fn assign(&mut self, name: &str, value: Value) -> bool {
    if self.values.contains_key(name) {
      self.values.insert(name.to_string(), value);
      true
    } else if let Some(parent) = &self.parent {
      parent.borrow_mut().assign(name, value)
    } else {
      false
    }
  }
}

/// Mirrors this workspace's own interpreter's `InterpreterError::Return`
/// pattern: a `return` unwinds through ordinary `?` propagation rather
/// than a side channel, distinguished from a genuine runtime error so
/// the function-call boundary can catch one and let the other escape.
enum Flow {
  Return(Value),
  Error(RuntimeError),
}

impl From<RuntimeError> for Flow {
  fn from(err: RuntimeError) -> Self {
    Flow::Error(err)
  }
}

type EvalResult = Result<Value, Flow>;

/// Tree-walking evaluator over the same typed [`Expr`] produced by the
/// other stages. Exists alongside the compiler pipeline as a way to run
/// a program without an assembler or linker on hand.
pub struct Interpreter<'a> {
  functions: HashMap<&'a str, &'a Expr>,
}

impl<'a> Interpreter<'a> {
  pub fn run(module: &'a Expr) -> Result<(), RuntimeError> {
    let ExprKind::Module(items) = &module.kind else {
      panic!("interpreter must be given a Module node");
    };
    let (main, functions) = items.split_first().expect("module always has a main expression");

    let mut functions_by_name = HashMap::new();
    for function in functions {
      if let ExprKind::FunctionDeclaration { name, .. } = &function.kind {
        functions_by_name.insert(name.as_str(), function);
      }
    }
    let interpreter = Interpreter { functions: functions_by_name };

    let env = Env::root();
    match interpreter.eval(main, &env) {
      Ok(_) => Ok(()),
      Err(Flow::Return(_)) => Ok(()),
      Err(Flow::Error(err)) => Err(err),
    }
  }

  fn eval(&self, expr: &'a Expr, env: &Rc<RefCell<Env>>) -> EvalResult {
    match &expr.kind {
      ExprKind::Literal(Literal::Int(v)) => Ok(Value::Int(*v)),
      ExprKind::Literal(Literal::Bool(v)) => Ok(Value::Bool(*v)),
      ExprKind::Literal(Literal::None) => Ok(Value::Unit),

      ExprKind::Identifier(name) => env
        .borrow()
        .get(name)
        .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone()).into()),

      ExprKind::BinaryOp { left, op, right } => self.eval_binary(left, op, right, env),

      ExprKind::UnaryOp { op, right } => {
        let value = self.eval(right, env)?;
        match (op.as_str(), value) {
          ("-", Value::Int(v)) => Ok(Value::Int(-v)),
          ("not", Value::Bool(v)) => Ok(Value::Bool(!v)),
          (op, value) => unreachable!("type checker should reject unary '{}' on {:?}", op, value),
        }
      },

      ExprKind::IfExpression { cond, then_clause, else_clause } => {
        if self.eval(cond, env)?.truthy() {
          self.eval(then_clause, env)
        } else {
          match else_clause {
            Some(branch) => self.eval(branch, env),
            None => Ok(Value::Unit),
          }
        }
      },

      ExprKind::WhileExpression { cond, body } => {
        while self.eval(cond, env)?.truthy() {
          self.eval(body, env)?;
        }
        Ok(Value::Unit)
      },

      ExprKind::VariableDeclaration { name, initializer, .. } => {
        let value = self.eval(initializer, env)?;
        env.borrow_mut().define(name.clone(), value);
        Ok(Value::Unit)
      },

      ExprKind::Block(elements) => {
        let scope = Env::child_of(env);
        let mut last = Value::Unit;
        for element in elements {
          last = self.eval(element, &scope)?;
        }
        Ok(last)
      },

      ExprKind::Function { name, args } => self.eval_call(name, args, env),

      ExprKind::FunctionDeclaration { .. } => Ok(Value::Unit),

      ExprKind::ReturnExpression(value) => {
        let value = self.eval(value, env)?;
        Err(Flow::Return(value))
      },

      ExprKind::Module(_) => unreachable!("a Module only ever appears at the root"),
    }
  }

  fn eval_binary(&self, left: &'a Expr, op: &str, right: &'a Expr, env: &Rc<RefCell<Env>>) -> EvalResult {
    if op == "=" {
      let ExprKind::Identifier(name) = &left.kind else {
        unreachable!("type checker only allows '=' with an identifier on the left");
      };
      let value = self.eval(right, env)?;
      env.borrow_mut().assign(name, value.clone());
      return Ok(value);
    }
    if op == "and" {
      let lhs = self.eval(left, env)?;
      if !lhs.truthy() {
        return Ok(Value::Bool(false));
      }
      return self.eval(right, env);
    }
    if op == "or" {
      let lhs = self.eval(left, env)?;
      if lhs.truthy() {
        return Ok(Value::Bool(true));
      }
      return self.eval(right, env);
    }

    let lhs = self.eval(left, env)?;
    let rhs = self.eval(right, env)?;
    match (op, lhs, rhs) {
      ("+", Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
      ("-", Value::Int(a), Value::Int(b)) => Ok(Value::Int(a - b)),
      ("*", Value::Int(a), Value::Int(b)) => Ok(Value::Int(a * b)),
      ("/", Value::Int(a), Value::Int(b)) => Ok(Value::Int(a / b)),
      ("%", Value::Int(a), Value::Int(b)) => Ok(Value::Int(a % b)),
      ("<", Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a < b)),
      (">", Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a > b)),
      ("<=", Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a <= b)),
      (">=", Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a >= b)),
      ("==", a, b) => Ok(Value::Bool(a == b)),
      ("!=", a, b) => Ok(Value::Bool(a != b)),
      (op, a, b) => unreachable!("type checker should reject '{}' on {:?}, {:?}", op, a, b),
    }
  }

  fn eval_call(&self, name: &str, args: &'a [Expr], env: &Rc<RefCell<Env>>) -> EvalResult {
    match name {
      "print_int" => {
        let value = self.eval(&args[0], env)?;
        println!("{}", value);
        Ok(Value::Unit)
      },
      "print_bool" => {
        let value = self.eval(&args[0], env)?;
        println!("{}", value);
        Ok(Value::Unit)
      },
      "read_int" => {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok();
        let trimmed = line.trim();
        trimmed
          .parse::<i64>()
          .map(Value::Int)
          .map_err(|_| RuntimeError::BadInput(trimmed.to_string()).into())
      },
      _ => {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
          values.push(self.eval(arg, env)?);
        }
        self.call_function(name, values)
      },
    }
  }

  fn call_function(&self, name: &str, args: Vec<Value>) -> EvalResult {
    let declaration = self
      .functions
      .get(name)
      .unwrap_or_else(|| panic!("type checker should have rejected unknown function '{}'", name));
    let ExprKind::FunctionDeclaration { params, body, .. } = &declaration.kind else {
      unreachable!("functions map only ever holds FunctionDeclaration nodes");
    };

    let call_env = Env::root();
    for ((param_name, _), value) in params.iter().zip(args) {
      call_env.borrow_mut().define(param_name.clone(), value);
    }

    // A body that falls off the end without an explicit `return` yields
    // Unit, the same as the IR stage, which only ever writes a result
    // through a `ReturnExpression` and otherwise discards the body's
    // trailing value.
    match self.eval(body, &call_env) {
      Ok(_) => Ok(Value::Unit),
      Err(Flow::Return(value)) => Ok(value),
      Err(err @ Flow::Error(_)) => Err(err),
    }
  }
}
