use std::borrow::Cow;

/// A named piece of source text a [`crate::Report`] points into.
///
/// Every TinyPie diagnostic traces back to a file the CLI read (or `<stdin>`
/// when `tinypie-vm` reads assembly piped in), so unlike a general-purpose
/// diagnostics crate this never needs an anonymous, nameless source; the
/// name is always shown in the `> name:line` header.
#[derive(Clone, Debug)]
pub struct Source<'a> {
  name: Cow<'a, str>,
  str: Cow<'a, str>,
}

impl<'a> Source<'a> {
  pub fn file(name: impl Into<Cow<'a, str>>, str: impl Into<Cow<'a, str>>) -> Self {
    Source {
      name: name.into(),
      str: str.into(),
    }
  }

  pub fn name(&self) -> &str {
    self.name.as_ref()
  }

  pub fn str(&self) -> &str {
    self.str.as_ref()
  }
}
