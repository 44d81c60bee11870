#![allow(non_camel_case_types)]

use logos::Logos;
use span::Span;

use super::{LexError, Token};

/// Token kinds for the assembly dialect consumed by the assembler.
///
/// Mnemonics (`add`, `call`, `halt`, ...) and labels are not distinguished at
/// the lexer level — both come through as `Lit_Ident` and are told apart by
/// the assembler's opcode table, which is the single source of truth for
/// what counts as an instruction name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Logos)]
pub enum TokenKind {
  #[token(".globals")]
  Dot_Globals,
  #[token(".def")]
  Dot_Def,
  #[token("args")]
  Kw_Args,
  #[token("locals")]
  Kw_Locals,

  #[token(":")]
  Tok_Colon,
  #[token(",")]
  Tok_Comma,
  #[token("=")]
  Op_Equal,

  /// `r0`, `r12`
  #[regex("r[0-9]+")]
  Lit_Reg,
  /// `0`, `120`
  #[regex("-?[0-9]+")]
  Lit_Int,
  #[regex(r"'[^'\n]*'")]
  Lit_String,
  /// mnemonic or label name
  #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
  Lit_Ident,

  #[token("\n")]
  #[token("\r\n")]
  Tok_NL,

  #[doc(hidden)]
  #[regex(r"[ \t]+", logos::skip)]
  _Whitespace,
  #[doc(hidden)]
  #[regex(r"#[^\n]*", logos::skip)]
  _Comment,

  Tok_Eof,

  #[doc(hidden)]
  #[error]
  Tok_Error,
}

impl TokenKind {
  pub fn name(&self) -> &'static str {
    use TokenKind::*;
    match self {
      Dot_Globals => ".globals",
      Dot_Def => ".def",
      Kw_Args => "args",
      Kw_Locals => "locals",
      Tok_Colon => ":",
      Tok_Comma => ",",
      Op_Equal => "=",
      Lit_Reg => "register",
      Lit_Int => "integer",
      Lit_String => "string",
      Lit_Ident => "identifier",
      Tok_NL => "newline",
      _Whitespace | _Comment => "",
      Tok_Eof => "end of input",
      Tok_Error => "invalid token",
    }
  }
}

pub fn unquote(lexeme: &str) -> &str {
  lexeme
    .strip_prefix('\'')
    .and_then(|s| s.strip_suffix('\''))
    .unwrap_or(lexeme)
}

/// Parses a `Lit_Reg` lexeme (`r0`, `r12`, ...) into its register index.
pub fn reg_index(lexeme: &str) -> Option<u32> {
  lexeme.strip_prefix('r').and_then(|n| n.parse().ok())
}

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
  fn lexes_directives_and_registers() {
    let tokens = lex(".globals 1\n.def main:\n  args = 0, locals = 1\n").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds[0], TokenKind::Dot_Globals);
    assert_eq!(kinds[1], TokenKind::Lit_Int);
  }

  #[test]
  fn parses_register_index() {
    assert_eq!(reg_index("r0"), Some(0));
    assert_eq!(reg_index("r12"), Some(12));
    assert_eq!(reg_index("rX"), None);
  }
}
