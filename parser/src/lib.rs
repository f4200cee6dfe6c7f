pub mod ast;
pub mod symbol_table;
pub mod types;

use diagnostic::error::ParseError;
use lexer::token::{Token, TokenKind};
use logger::Logger;

use ast::{Expr, ExprKind, Literal};
use types::Type;

const COMPARISON_OPS: &[&str] = &["<", ">", "==", ">=", "<=", "!=", "%"];
const ADDITIVE_OPS: &[&str] = &["+", "-"];
const MULTIPLICATIVE_OPS: &[&str] = &["*", "/"];

/// Hand-written recursive-descent parser with a single positional
/// cursor, in the style of this workspace's own `Parser` — one method
/// per precedence level, walking from the loosest binding (`or`/`and`)
/// down to `factor`.
pub struct Parser {
  tokens: Vec<Token>,
  current: usize,
}

impl Parser {
  pub fn new(tokens: Vec<Token>) -> Self {
    Self { tokens, current: 0 }
  }

  pub fn parse_module(tokens: Vec<Token>) -> Result<Expr, ParseError> {
    Logger::stage("parser");
    let mut parser = Parser::new(tokens);
    let module = parser.module()?;
    Ok(module)
  }

  fn peek(&self) -> Token {
    self.tokens.get(self.current).cloned().unwrap_or_else(Token::end)
  }

  fn peek_text(&self, text: &str) -> bool {
    let t = self.peek();
    t.kind != TokenKind::End && t.text == text
  }

  fn is_end_of_block(&self) -> bool {
    let t = self.peek();
    t.kind == TokenKind::End || t.text == "}"
  }

  fn advance(&mut self) -> Token {
    let token = self.peek();
    if token.kind != TokenKind::End {
      self.current += 1;
    }
    token
  }

  fn consume(&mut self, expected: &str) -> Result<Token, ParseError> {
    let token = self.peek();
    if token.text == expected {
      Ok(self.advance())
    } else if token.kind == TokenKind::End {
      Err(ParseError::UnexpectedEnd(expected.to_string()))
    } else {
      Err(ParseError::UnexpectedToken {
        expected: expected.to_string(),
        found: token.text,
      })
    }
  }

  fn expect_identifier(&mut self) -> Result<String, ParseError> {
    let token = self.peek();
    if token.kind == TokenKind::Identifier {
      self.advance();
      Ok(token.text)
    } else if token.kind == TokenKind::End {
      Err(ParseError::UnexpectedEnd("identifier".to_string()))
    } else {
      Err(ParseError::UnexpectedToken {
        expected: "identifier".to_string(),
        found: token.text,
      })
    }
  }

  fn expect_type_name(&mut self) -> Result<Type, ParseError> {
    let name = self.expect_identifier()?;
    Type::from_name(&name).ok_or_else(|| ParseError::UnexpectedToken {
      expected: "type name".to_string(),
      found: name,
    })
  }

  // module := (function_decl)* expressions
  fn module(&mut self) -> Result<Expr, ParseError> {
    let mut functions = Vec::new();
    while self.peek_text("fun") {
      functions.push(self.function_decl()?);
    }

    let body = self.expressions()?;

    if self.peek().kind != TokenKind::End {
      return Err(ParseError::UnexpectedToken {
        expected: "end of input".to_string(),
        found: self.peek().text,
      });
    }

    let main = if body.len() == 1 {
      body.into_iter().next().unwrap()
    } else {
      Expr::new(ExprKind::Block(body))
    };

    let mut sequence = vec![main];
    sequence.extend(functions);
    Ok(Expr::new(ExprKind::Module(sequence)))
  }

  // expressions := (expr (';' | <ends_with_block>))* expr?
  fn expressions(&mut self) -> Result<Vec<Expr>, ParseError> {
    let mut out = Vec::new();

    while !self.is_end_of_block() {
      let expr = self.expr()?;

      if self.is_end_of_block() {
        out.push(expr);
        break;
      }

      if self.peek_text(";") {
        self.advance();
        out.push(expr);
        if self.is_end_of_block() {
          out.push(Expr::literal_none());
          break;
        }
      } else if expr.ends_with_block() {
        out.push(expr);
      } else if self.peek().kind == TokenKind::End {
        return Err(ParseError::UnexpectedEnd("';'".to_string()));
      } else {
        return Err(ParseError::UnexpectedToken {
          expected: "';'".to_string(),
          found: self.peek().text,
        });
      }
    }

    Ok(out)
  }

  fn expr(&mut self) -> Result<Expr, ParseError> {
    if self.peek().is_keyword("var") {
      return self.var_decl();
    }
    self.assignment()
  }

  // var_decl := 'var' Identifier (':' TypeName)? '=' expr
  fn var_decl(&mut self) -> Result<Expr, ParseError> {
    self.consume("var")?;
    let name = self.expect_identifier()?;
    let declared_type = if self.peek_text(":") {
      self.advance();
      Some(self.expect_type_name()?)
    } else {
      None
    };
    self.consume("=")?;
    let initializer = self.expr()?;
    Ok(Expr::new(ExprKind::VariableDeclaration {
      name,
      initializer: Box::new(initializer),
      declared_type,
    }))
  }

  // assignment := or_expr ('=' expr)?     — right-assoc, only when LHS is Identifier
  fn assignment(&mut self) -> Result<Expr, ParseError> {
    let left = self.or_expr()?;
    if self.peek_text("=") && matches!(left.kind, ExprKind::Identifier(_)) {
      self.advance();
      let right = self.expr()?;
      return Ok(Expr::new(ExprKind::BinaryOp {
        left: Box::new(left),
        op: "=".to_string(),
        right: Box::new(right),
      }));
    }
    Ok(left)
  }

  // or_expr := and_cmp ( ('or'|'and') expr )*
  fn or_expr(&mut self) -> Result<Expr, ParseError> {
    let mut left = self.and_cmp()?;
    while self.peek().is_keyword("or") || self.peek().is_keyword("and") {
      let op = self.advance().text;
      let right = self.expr()?;
      left = Expr::new(ExprKind::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
      });
    }
    Ok(left)
  }

  // and_cmp := poly ( ('<'|'>'|'=='|'>='|'<='|'!='|'%') (poly|block) )*
  fn and_cmp(&mut self) -> Result<Expr, ParseError> {
    let mut left = self.poly()?;
    while COMPARISON_OPS.contains(&self.peek().text.as_str()) {
      let op = self.advance().text;
      let right = if self.peek_text("{") { self.block()? } else { self.poly()? };
      left = Expr::new(ExprKind::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
      });
    }
    Ok(left)
  }

  // poly := term ( ('+'|'-') term )*
  fn poly(&mut self) -> Result<Expr, ParseError> {
    let mut left = self.term()?;
    while ADDITIVE_OPS.contains(&self.peek().text.as_str()) {
      let op = self.advance().text;
      let right = self.term()?;
      left = Expr::new(ExprKind::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
      });
    }
    Ok(left)
  }

  // term := factor ( ('*'|'/') factor )*
  fn term(&mut self) -> Result<Expr, ParseError> {
    let mut left = self.factor()?;
    while MULTIPLICATIVE_OPS.contains(&self.peek().text.as_str()) {
      let op = self.advance().text;
      let right = self.factor()?;
      left = Expr::new(ExprKind::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
      });
    }
    Ok(left)
  }

  fn factor(&mut self) -> Result<Expr, ParseError> {
    let token = self.peek();

    if token.kind == TokenKind::Punctuation && token.text == "(" {
      self.advance();
      let inner = self.expr()?;
      self.consume(")")?;
      return Ok(inner);
    }
    if token.is_keyword("if") {
      return self.if_expr();
    }
    if token.is_keyword("while") {
      return self.while_expr();
    }
    if token.is_keyword("not") || (token.kind == TokenKind::Operator && token.text == "-") {
      return self.unary();
    }
    if token.is_keyword("return") {
      return self.return_stmt();
    }
    if token.kind == TokenKind::IntLiteral {
      self.advance();
      let value: i64 = token.text.parse().map_err(|_| ParseError::UnexpectedToken {
        expected: "integer literal".to_string(),
        found: token.text.clone(),
      })?;
      return Ok(Expr::new(ExprKind::Literal(Literal::Int(value))));
    }
    if token.kind == TokenKind::Punctuation && token.text == "{" {
      return self.block();
    }
    if token.kind == TokenKind::Identifier {
      return self.ident_or_call();
    }

    if token.kind == TokenKind::End {
      return Err(ParseError::UnexpectedEnd("expression".to_string()));
    }

    Err(ParseError::UnexpectedToken {
      expected: "expression".to_string(),
      found: token.text,
    })
  }

  // if_expr := 'if' expr 'then' expr ('else' expr)?
  fn if_expr(&mut self) -> Result<Expr, ParseError> {
    self.consume("if")?;
    let cond = self.expr()?;
    self.consume("then")?;
    let then_clause = self.expr()?;
    let else_clause = if self.peek().is_keyword("else") {
      self.advance();
      Some(Box::new(self.expr()?))
    } else {
      None
    };
    Ok(Expr::new(ExprKind::IfExpression {
      cond: Box::new(cond),
      then_clause: Box::new(then_clause),
      else_clause,
    }))
  }

  // while_expr := 'while' expr 'do' expr
  fn while_expr(&mut self) -> Result<Expr, ParseError> {
    self.consume("while")?;
    let cond = self.expr()?;
    self.consume("do")?;
    let mut body = self.expr()?;

    // `while` desugaring: a non-block body followed by ';' is wrapped
    // as Block([body, Literal(None)]) to force its result to Unit.
    if !matches!(body.kind, ExprKind::Block(_)) && self.peek_text(";") {
      self.advance();
      body = Expr::new(ExprKind::Block(vec![body, Expr::literal_none()]));
    }

    Ok(Expr::new(ExprKind::WhileExpression {
      cond: Box::new(cond),
      body: Box::new(body),
    }))
  }

  // unary := ('not'|'-') unary
  fn unary(&mut self) -> Result<Expr, ParseError> {
    let op_token = self.advance();
    let op = if op_token.is_keyword("not") { "not".to_string() } else { op_token.text };
    let right = self.unary_operand()?;
    Ok(Expr::new(ExprKind::UnaryOp { op, right: Box::new(right) }))
  }

  fn unary_operand(&mut self) -> Result<Expr, ParseError> {
    let token = self.peek();
    if token.is_keyword("not") || (token.kind == TokenKind::Operator && token.text == "-") {
      self.unary()
    } else {
      self.factor()
    }
  }

  // return_stmt := 'return' expr ';'
  fn return_stmt(&mut self) -> Result<Expr, ParseError> {
    self.consume("return")?;
    let value = self.expr()?;
    self.consume(";")?;
    Ok(Expr::new(ExprKind::ReturnExpression(Box::new(value))))
  }

  // ident_or_call := Identifier | 'true' | 'false' | Identifier '(' args? ')'
  fn ident_or_call(&mut self) -> Result<Expr, ParseError> {
    let token = self.advance();
    if token.text == "true" {
      return Ok(Expr::new(ExprKind::Literal(Literal::Bool(true))));
    }
    if token.text == "false" {
      return Ok(Expr::new(ExprKind::Literal(Literal::Bool(false))));
    }

    if self.peek_text("(") {
      self.advance();
      let mut args = Vec::new();
      if !self.peek_text(")") {
        args.push(self.expr()?);
        while self.peek_text(",") {
          self.advance();
          args.push(self.expr()?);
        }
      }
      self.consume(")")?;
      return Ok(Expr::new(ExprKind::Function { name: token.text, args }));
    }

    Ok(Expr::new(ExprKind::Identifier(token.text)))
  }

  // block := '{' expressions '}'
  fn block(&mut self) -> Result<Expr, ParseError> {
    self.consume("{")?;
    let body = self.expressions()?;
    self.consume("}")?;
    Ok(Expr::new(ExprKind::Block(body)))
  }

  // function_decl := 'fun' Identifier '(' params? ')' (':' TypeName)? block
  fn function_decl(&mut self) -> Result<Expr, ParseError> {
    self.consume("fun")?;
    let name = self.expect_identifier()?;
    self.consume("(")?;
    let mut params = Vec::new();
    if !self.peek_text(")") {
      params.push(self.typed_param()?);
      while self.peek_text(",") {
        self.advance();
        params.push(self.typed_param()?);
      }
    }
    self.consume(")")?;
    let return_type = if self.peek_text(":") {
      self.advance();
      self.expect_type_name()?
    } else {
      Type::Unit
    };
    let body = self.block()?;
    Ok(Expr::new(ExprKind::FunctionDeclaration {
      name,
      params,
      body: Box::new(body),
      return_type,
    }))
  }

  fn typed_param(&mut self) -> Result<(String, Type), ParseError> {
    let name = self.expect_identifier()?;
    self.consume(":")?;
    let ty = self.expect_type_name()?;
    Ok((name, ty))
  }
}
