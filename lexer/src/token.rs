/// Which of the four lexical categories a [`Token`] belongs to, plus the
/// synthetic `End` kind the parser conjures at end-of-stream — the
/// tokenizer itself never produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  IntLiteral,
  Identifier,
  Operator,
  Punctuation,
  End,
}

/// A single lexeme: its kind and the exact matched text. Keywords
/// (`if`, `then`, `else`, `while`, `do`, `var`, `fun`, `return`, `and`,
/// `or`, `not`, `true`, `false`) are lexed as `Identifier` — only the
/// parser distinguishes them, by comparing `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
}

impl Token {
  pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
    Self {
      kind,
      text: text.into(),
    }
  }

  pub fn end() -> Self {
    Self {
      kind: TokenKind::End,
      text: String::new(),
    }
  }

  pub fn is_keyword(&self, word: &str) -> bool {
    self.kind == TokenKind::Identifier && self.text == word
  }
}
