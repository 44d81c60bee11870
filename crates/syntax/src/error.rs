use beef::lean::Cow;
use span::Span;

#[derive(Clone, Debug)]
pub struct Error {
  pub message: Cow<'static, str>,
  pub span: Span,
}

impl Error {
  pub fn new(message: impl Into<Cow<'static, str>>, span: impl Into<Span>) -> Self {
    Error {
      message: message.into(),
      span: span.into(),
    }
  }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let Error { message, span } = self;
    write!(f, "error at {span}: {message}")
  }
}

impl From<crate::token::LexError> for Error {
  fn from(e: crate::token::LexError) -> Self {
    Error::new("invalid character", e.span)
  }
}
