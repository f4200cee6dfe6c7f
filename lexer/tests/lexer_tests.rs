use diagnostic::DiagnosticEngine;
use lexer::{
  token::{Token, TokenKind},
  Lexer,
};

fn tokenize(src: &str) -> (Vec<Token>, DiagnosticEngine) {
  let mut engine = DiagnosticEngine::new();
  let tokens = Lexer::tokenize(src, &mut engine);
  (tokens, engine)
}

#[test]
fn tokenizes_arithmetic_expression() {
  let (tokens, engine) = tokenize("1 + 2 * 3");
  assert!(!engine.has_errors());
  let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
  assert_eq!(
    kinds,
    vec![
      TokenKind::IntLiteral,
      TokenKind::Operator,
      TokenKind::IntLiteral,
      TokenKind::Operator,
      TokenKind::IntLiteral,
    ]
  );
  let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
  assert_eq!(texts, vec!["1", "+", "2", "*", "3"]);
}

#[test]
fn prefers_two_char_operators_over_one_char() {
  let (tokens, engine) = tokenize("a <= b != c >= d == e");
  assert!(!engine.has_errors());
  let ops: Vec<_> = tokens
    .iter()
    .filter(|t| t.kind == TokenKind::Operator)
    .map(|t| t.text.as_str())
    .collect();
  assert_eq!(ops, vec!["<=", "!=", ">=", "=="]);
}

#[test]
fn keywords_lex_as_identifiers() {
  let (tokens, _) = tokenize("if then else while do var fun return and or not true false");
  assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
}

#[test]
fn skips_whitespace_and_both_comment_styles() {
  let (tokens, engine) = tokenize("1 // a line comment\n+ 2 # a hash comment\n");
  assert!(!engine.has_errors());
  let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
  assert_eq!(texts, vec!["1", "+", "2"]);
}

#[test]
fn punctuation_is_single_character() {
  let (tokens, engine) = tokenize("f(x, y): Int { }");
  assert!(!engine.has_errors());
  let puncts: Vec<_> = tokens
    .iter()
    .filter(|t| t.kind == TokenKind::Punctuation)
    .map(|t| t.text.as_str())
    .collect();
  assert_eq!(puncts, vec!["(", ",", ")", ":", "{", "}"]);
}

#[test]
fn unrecognized_character_emits_lex_error_and_is_skipped() {
  let (tokens, engine) = tokenize("1 @ 2");
  assert!(engine.has_errors());
  let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
  assert_eq!(texts, vec!["1", "2"]);
}

#[test]
fn end_token_is_never_produced_by_the_tokenizer() {
  let (tokens, _) = tokenize("42");
  assert!(tokens.iter().all(|t| t.kind != TokenKind::End));
}
