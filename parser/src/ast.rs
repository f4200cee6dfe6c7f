use std::cell::RefCell;
use std::fmt;

use crate::types::Type;

/// A literal value. `None` is the implicit "no value" produced by an
/// elided block tail or a trailing semicolon; it always types as `Unit`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
  Int(i64),
  Bool(bool),
  None,
}

/// One node of the expression tree. `ty` is the single interior-mutable
/// field the type checker writes exactly once per reachable node — every
/// other field is set once, at parse time, and never touched again. This
/// is the one place this workspace accepts interior mutability rather
/// than a side table keyed by node id, since the tree is owned
/// exclusively by the parser and only ever borrowed afterward.
#[derive(Debug)]
pub struct Expr {
  pub kind: ExprKind,
  pub ty: RefCell<Type>,
}

impl Expr {
  pub fn new(kind: ExprKind) -> Self {
    Self {
      kind,
      ty: RefCell::new(Type::Unit),
    }
  }

  pub fn get_type(&self) -> Type {
    self.ty.borrow().clone()
  }

  pub fn set_type(&self, ty: Type) {
    *self.ty.borrow_mut() = ty;
  }

  pub fn literal_none() -> Self {
    Expr::new(ExprKind::Literal(Literal::None))
  }

  /// Per spec.md's `ends_with_block` predicate: whether this node's last
  /// child is (or itself is) a `Block`, used by the parser to decide
  /// whether a trailing `;` is optional.
  pub fn ends_with_block(&self) -> bool {
    match &self.kind {
      ExprKind::Block(_) => true,
      ExprKind::IfExpression { then_clause, else_clause, .. } => else_clause
        .as_ref()
        .map(|e| e.ends_with_block())
        .unwrap_or_else(|| then_clause.ends_with_block()),
      ExprKind::WhileExpression { body, .. } => body.ends_with_block(),
      ExprKind::UnaryOp { right, .. } => right.ends_with_block(),
      ExprKind::BinaryOp { right, .. } => right.ends_with_block(),
      ExprKind::FunctionDeclaration { .. } => true,
      _ => false,
    }
  }
}

/// The closed sum of expression-tree node shapes.
#[derive(Debug)]
pub enum ExprKind {
  Literal(Literal),
  Identifier(String),
  BinaryOp {
    left: Box<Expr>,
    op: String,
    right: Box<Expr>,
  },
  UnaryOp {
    op: String,
    right: Box<Expr>,
  },
  IfExpression {
    cond: Box<Expr>,
    then_clause: Box<Expr>,
    else_clause: Option<Box<Expr>>,
  },
  WhileExpression {
    cond: Box<Expr>,
    body: Box<Expr>,
  },
  VariableDeclaration {
    name: String,
    initializer: Box<Expr>,
    declared_type: Option<Type>,
  },
  Block(Vec<Expr>),
  /// A call site, e.g. `sq(5)`.
  Function {
    name: String,
    args: Vec<Expr>,
  },
  FunctionDeclaration {
    name: String,
    params: Vec<(String, Type)>,
    body: Box<Expr>,
    return_type: Type,
  },
  ReturnExpression(Box<Expr>),
  /// Top level: element 0 is the implicit main expression, the rest are
  /// `FunctionDeclaration`s in source order.
  Module(Vec<Expr>),
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.kind)
  }
}

impl fmt::Display for ExprKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ExprKind::Literal(Literal::Int(v)) => write!(f, "{}", v),
      ExprKind::Literal(Literal::Bool(v)) => write!(f, "{}", v),
      ExprKind::Literal(Literal::None) => write!(f, "none"),
      ExprKind::Identifier(name) => write!(f, "{}", name),
      ExprKind::BinaryOp { left, op, right } => write!(f, "({} {} {})", left, op, right),
      ExprKind::UnaryOp { op, right } => write!(f, "({} {})", op, right),
      ExprKind::IfExpression { cond, then_clause, else_clause } => match else_clause {
        Some(e) => write!(f, "if {} then {} else {}", cond, then_clause, e),
        None => write!(f, "if {} then {}", cond, then_clause),
      },
      ExprKind::WhileExpression { cond, body } => write!(f, "while {} do {}", cond, body),
      ExprKind::VariableDeclaration { name, initializer, .. } => {
        write!(f, "var {} = {}", name, initializer)
      },
      ExprKind::Block(exprs) => {
        write!(f, "{{ ")?;
        for e in exprs {
          write!(f, "{}; ", e)?;
        }
        write!(f, "}}")
      },
      ExprKind::Function { name, args } => {
        write!(f, "{}(", name)?;
        for (i, a) in args.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{}", a)?;
        }
        write!(f, ")")
      },
      ExprKind::FunctionDeclaration { name, params, body, return_type } => {
        write!(f, "fun {}(", name)?;
        for (i, (pname, pty)) in params.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{}: {}", pname, pty)?;
        }
        write!(f, "): {} {}", return_type, body)
      },
      ExprKind::ReturnExpression(value) => write!(f, "return {}", value),
      ExprKind::Module(exprs) => {
        for e in exprs {
          writeln!(f, "{}", e)?;
        }
        Ok(())
      },
    }
  }
}
