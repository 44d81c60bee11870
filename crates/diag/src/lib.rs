//! Pretty, colourized error reporting shared by every TinyPie lex/parse/
//! assemble failure, so the tree interpreter, assembler, and VM all print
//! the same labelled-snippet style instead of ad hoc `eprintln!` strings.

pub mod report;
mod snippet;
pub mod source;
mod style;
mod util;

pub use report::Report;
pub use source::Source;
