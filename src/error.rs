//! The unified error type every TinyPie entry point returns.
//!
//! Lexing and parsing both produce a `syntax::Error` (message + span); they
//! are kept in one [`Error::Syntax`] variant here rather than two, since the
//! rendering and handling are identical and the lex/parse distinction adds
//! no behavior once the message text says which stage failed. Assembly
//! errors carry an optional span (an undefined label at end-of-input has no
//! single offending token); interpreter/VM errors refer to already-resolved
//! runtime state, not source positions, so they carry only a message.

use std::fmt;

use diag::{Report, Source};
use span::Span;

#[derive(Debug)]
pub enum Error {
  /// Lexer or parser failure in the source dialect.
  Syntax(Vec<syntax::Error>),
  /// Identifier not found in any enclosing memory space.
  Name(String),
  /// Incompatible operand types for an arithmetic or comparison operation.
  Type(String),
  /// Unknown mnemonic, malformed operand, or an undefined label surviving
  /// to end-of-input.
  Assemble { message: String, span: Option<Span> },
  /// Stack overflow, out-of-bounds `ip`, bad opcode, or bad pool/global
  /// index.
  Runtime(String),
}

impl Error {
  pub fn assemble(message: impl Into<String>, span: impl Into<Span>) -> Self {
    Error::Assemble {
      message: message.into(),
      span: Some(span.into()),
    }
  }

  pub fn assemble_unspanned(message: impl Into<String>) -> Self {
    Error::Assemble {
      message: message.into(),
      span: None,
    }
  }

  /// Renders the error as a labelled source snippet when a span and source
  /// text are available, falling back to a plain `error: {message}` line
  /// otherwise (name/type/runtime errors, or an unspanned assemble error).
  pub fn report(&self, source_name: &str, source_text: &str) -> String {
    match self {
      Error::Syntax(errors) => errors
        .iter()
        .map(|e| {
          Report::error()
            .source(Source::file(source_name, source_text))
            .message(e.message.to_string())
            .span(e.span)
            .build()
            .emit_to_string()
            .unwrap_or_else(|_| format!("error: {e}"))
        })
        .collect::<Vec<_>>()
        .join("\n"),
      Error::Assemble {
        message,
        span: Some(span),
      } => Report::error()
        .source(Source::file(source_name, source_text))
        .message(message.clone())
        .span(*span)
        .build()
        .emit_to_string()
        .unwrap_or_else(|_| format!("error: {message}")),
      other => format!("error: {other}"),
    }
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::Syntax(errors) => {
        for (i, e) in errors.iter().enumerate() {
          if i > 0 {
            writeln!(f)?;
          }
          write!(f, "{e}")?;
        }
        Ok(())
      }
      Error::Name(msg) => write!(f, "name error: {msg}"),
      Error::Type(msg) => write!(f, "type error: {msg}"),
      Error::Assemble { message, .. } => write!(f, "assemble error: {message}"),
      Error::Runtime(msg) => write!(f, "runtime error: {msg}"),
    }
  }
}

impl std::error::Error for Error {}

impl From<Vec<syntax::Error>> for Error {
  fn from(errors: Vec<syntax::Error>) -> Self {
    Error::Syntax(errors)
  }
}
