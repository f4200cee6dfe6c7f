pub mod token;

use diagnostic::{error::LexError, DiagnosticEngine};
use logger::Logger;
use token::{Token, TokenKind};

const TWO_CHAR_OPERATORS: &[&str] = &["==", "<=", ">=", "!="];
const ONE_CHAR_OPERATORS: &[char] = &['+', '-', '*', '/', '=', '>', '<', '%'];
const PUNCTUATION: &[char] = &['(', ')', '{', '}', ',', ';', ':'];

/// Hand-written char-dispatch tokenizer: no regex engine, one source
/// pass, longest-match-by-first-pattern at every position. Mirrors this
/// workspace's own `Scanner` in shape (`source`/`start`/`current` cursor
/// fields) but emits the flat `Token { kind, text }` model this
/// language's parser expects instead of a position-tagged `Token`/
/// `Literal` pair.
pub struct Lexer {
  source: Vec<char>,
  start: usize,
  current: usize,
}

impl Lexer {
  pub fn new(source: &str) -> Self {
    Self {
      source: source.chars().collect(),
      start: 0,
      current: 0,
    }
  }

  /// Scans the whole source into an ordered token list. Errors are
  /// emitted to `engine` and the offending character is skipped so
  /// scanning can continue and report more than one lexical error per
  /// run.
  pub fn tokenize(source: &str, engine: &mut DiagnosticEngine) -> Vec<Token> {
    Logger::stage("lexer");
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
      lexer.skip_whitespace_and_comments();
      if lexer.is_at_end() {
        break;
      }
      lexer.start = lexer.current;
      match lexer.next_token() {
        Some(token) => tokens.push(token),
        None => {
          let bad = lexer.advance().unwrap();
          engine.emit(LexError::UnexpectedChar(bad).into());
        },
      }
    }

    tokens
  }

  fn next_token(&mut self) -> Option<Token> {
    let c = self.peek()?;

    if c.is_ascii_digit() {
      return Some(self.tokenize_int());
    }
    if c.is_ascii_alphabetic() || c == '_' {
      return Some(self.tokenize_identifier());
    }
    if let Some(op) = self.tokenize_two_char_operator() {
      return Some(op);
    }
    if ONE_CHAR_OPERATORS.contains(&c) {
      self.advance();
      return Some(Token::new(TokenKind::Operator, c.to_string()));
    }
    if PUNCTUATION.contains(&c) {
      self.advance();
      return Some(Token::new(TokenKind::Punctuation, c.to_string()));
    }

    None
  }

  fn tokenize_two_char_operator(&mut self) -> Option<Token> {
    let rest: String = self.source[self.current..].iter().take(2).collect();
    for candidate in TWO_CHAR_OPERATORS {
      if rest.starts_with(candidate) {
        self.advance();
        self.advance();
        return Some(Token::new(TokenKind::Operator, *candidate));
      }
    }
    None
  }

  fn tokenize_int(&mut self) -> Token {
    while let Some(c) = self.peek() {
      if c.is_ascii_digit() {
        self.advance();
      } else {
        break;
      }
    }
    Token::new(TokenKind::IntLiteral, self.current_lexeme())
  }

  fn tokenize_identifier(&mut self) -> Token {
    while let Some(c) = self.peek() {
      if c.is_ascii_alphanumeric() || c == '_' {
        self.advance();
      } else {
        break;
      }
    }
    Token::new(TokenKind::Identifier, self.current_lexeme())
  }

  fn skip_whitespace_and_comments(&mut self) {
    loop {
      match self.peek() {
        Some(c) if c.is_whitespace() => {
          self.advance();
        },
        Some('/') if self.peek_at(1) == Some('/') => self.skip_to_eol(),
        Some('#') => self.skip_to_eol(),
        _ => break,
      }
    }
  }

  fn skip_to_eol(&mut self) {
    while let Some(c) = self.peek() {
      if c == '\n' {
        break;
      }
      self.advance();
    }
  }

  fn current_lexeme(&self) -> String {
    self.source[self.start..self.current].iter().collect()
  }

  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn peek(&self) -> Option<char> {
    self.source.get(self.current).copied()
  }

  fn peek_at(&self, offset: usize) -> Option<char> {
    self.source.get(self.current + offset).copied()
  }

  fn advance(&mut self) -> Option<char> {
    let c = self.peek();
    if c.is_some() {
      self.current += 1;
    }
    c
  }
}
