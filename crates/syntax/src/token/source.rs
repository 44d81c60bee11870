#![allow(non_camel_case_types)]

use logos::Logos;
use span::Span;

use super::{LexError, Token};

/// Token kinds for the source language (the Python-surfaced imperative
/// dialect interpreted by the tree-walking interpreter).
///
/// Indentation carries no grammatical meaning here; blocks are delimited by
/// `:` / `.` and statements terminate with `Tok_NL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Logos)]
pub enum TokenKind {
  #[token("def")]
  Kw_Def,
  #[token("print")]
  Kw_Print,
  #[token("return")]
  Kw_Return,
  #[token("if")]
  Kw_If,
  #[token("else")]
  Kw_Else,
  #[token("while")]
  Kw_While,

  #[token("(")]
  Brk_ParenL,
  #[token(")")]
  Brk_ParenR,
  #[token(":")]
  Tok_Colon,
  #[token(",")]
  Tok_Comma,
  #[token(".")]
  Tok_Dot,

  #[token("=")]
  Op_Equal,
  #[token("==")]
  Op_EqualEqual,
  #[token("<")]
  Op_Less,
  #[token("+")]
  Op_Plus,
  #[token("-")]
  Op_Minus,
  #[token("*")]
  Op_Star,

  /// `a`, `_x`, `foo_bar2`
  #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
  Lit_Ident,
  /// `0`, `120`
  #[regex("[0-9]+")]
  Lit_Int,
  /// `'no escapes inside'`
  #[regex(r"'[^'\n]*'")]
  Lit_String,

  #[token("\n")]
  #[token("\r\n")]
  Tok_NL,

  #[doc(hidden)]
  #[regex(r"[ \t]+", logos::skip)]
  _Whitespace,
  #[doc(hidden)]
  #[regex(r"#[^\n]*", logos::skip)]
  _Comment,

  /// Emitted once after the last real token so the parser never special-cases
  /// the end of input.
  Tok_Eof,

  #[doc(hidden)]
  #[error]
  Tok_Error,
}

impl TokenKind {
  pub fn name(&self) -> &'static str {
    use TokenKind::*;
    match self {
      Kw_Def => "def",
      Kw_Print => "print",
      Kw_Return => "return",
      Kw_If => "if",
      Kw_Else => "else",
      Kw_While => "while",
      Brk_ParenL => "(",
      Brk_ParenR => ")",
      Tok_Colon => ":",
      Tok_Comma => ",",
      Tok_Dot => ".",
      Op_Equal => "=",
      Op_EqualEqual => "==",
      Op_Less => "<",
      Op_Plus => "+",
      Op_Minus => "-",
      Op_Star => "*",
      Lit_Ident => "identifier",
      Lit_Int => "integer",
      Lit_String => "string",
      Tok_NL => "newline",
      _Whitespace | _Comment => "",
      Tok_Eof => "end of input",
      Tok_Error => "invalid token",
    }
  }
}

/// Strip the single-quote delimiters a [`TokenKind::Lit_String`] lexeme was
/// matched with. TinyPie string literals have no escapes, so the inner slice
/// is returned as-is.
pub fn unquote(lexeme: &str) -> &str {
  lexeme
    .strip_prefix('\'')
    .and_then(|s| s.strip_suffix('\''))
    .unwrap_or(lexeme)
}

/// Eagerly tokenise `src`, returning the full token stream plus a trailing
/// `Tok_Eof` sentinel, or every invalid-character error encountered.
pub fn lex(src: &str) -> Result<Vec<Token<'_, TokenKind>>, Vec<LexError>> {
  let mut tokens = Vec::new();
  let mut errors = Vec::new();
  let mut lexer = logos::Lexer::<TokenKind>::new(src);
  while let Some(kind) = lexer.next() {
    let span: Span = lexer.span().into();
    match kind {
      TokenKind::Tok_Error => errors.push(LexError { span }),
      _ => tokens.push(Token {
        kind,
        lexeme: lexer.slice().into(),
        span,
      }),
    }
  }

  if !errors.is_empty() {
    return Err(errors);
  }

  let eof_span = (src.len()..src.len()).into();
  tokens.push(Token {
    kind: TokenKind::Tok_Eof,
    lexeme: "".into(),
    span: eof_span,
  });
  Ok(tokens)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lexes_keywords_and_punctuation() {
    let tokens = lex("def f(x, y):\n  return x + y\n.\n").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds[0], TokenKind::Kw_Def);
    assert_eq!(kinds[1], TokenKind::Lit_Ident);
    assert_eq!(kinds[2], TokenKind::Brk_ParenL);
    assert_eq!(*kinds.last().unwrap(), TokenKind::Tok_Eof);
  }

  #[test]
  fn strips_string_quotes() {
    let tokens = lex("print 'hi'\n").unwrap();
    let s = tokens.iter().find(|t| t.is(TokenKind::Lit_String)).unwrap();
    assert_eq!(unquote(&s.lexeme), "hi");
  }

  #[test]
  fn reports_invalid_character() {
    let err = lex("x = 1 @ 2\n").unwrap_err();
    assert_eq!(err.len(), 1);
  }
}
