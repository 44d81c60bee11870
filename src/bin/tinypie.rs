//! The tree-walking interpreter's CLI entry point: one source file in,
//! `print` output on stdout.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[command(name = "tinypie", about = "Run a TinyPie source file")]
struct App {
  /// Source file to interpret.
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

  match tinypie::run_source(&source, io::stdout()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{}", e.report(&app.source.display().to_string(), &source));
      ExitCode::from(2)
    }
  }
}
