//! Reads a TinyPie source file and writes a Graphviz DOT graph of its AST to
//! stdout.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[command(name = "tinypie-astviz", about = "Print a DOT graph of a TinyPie AST")]
struct App {
  /// Source file to parse.
  source: PathBuf,
}

fn main() -> ExitCode {
  let app = App::parse();

  let source = match fs::read_to_string(&app.source)
    .with_context(|| format!("could not read {}", app.source.display()))
  {
    Ok(s) => s,
    Err(e) => {
      eprintln!("error: {e:#}");
      return ExitCode::from(1);
    }
  };

  match syntax::parse(&source) {
    Ok(program) => {
      print!("{}", tinypie::astviz::render(&program.root));
      ExitCode::SUCCESS
    }
    Err(errors) => {
      let err = tinypie::Error::from(errors);
      eprintln!("{}", err.report(&app.source.display().to_string(), &source));
      ExitCode::from(2)
    }
  }
}
