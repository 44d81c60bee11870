//! The bytecode VM's CLI entry point: reads assembly text (from a file or
//! stdin), assembles it, executes it, then optionally prints a disassembly
//! and/or core dump.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[command(name = "tinypie-vm", about = "Assemble and run TinyPie bytecode")]
struct App {
  /// Assembly file to read; reads stdin when omitted.
  #[arg(long)]
  input: Option<PathBuf>,

  /// Print the constant pool and global slots after execution.
  #[arg(long)]
  coredump: bool,

  /// Print a disassembly of the assembled code before executing it.
  #[arg(long)]
  disasm: bool,

  /// Log every executed instruction with its register file and call stack.
  #[arg(long)]
  trace: bool,
}

fn read_input(path: &Option<PathBuf>) -> io::Result<String> {
  match path {
    Some(path) => fs::read_to_string(path),
    None => {
      let mut buf = String::new();
      io::stdin().read_to_string(&mut buf)?;
      Ok(buf)
    }
  }
}

fn main() -> ExitCode {
  let app = App::parse();

  let source = match read_input(&app.input).context("could not read input") {
    Ok(s) => s,
    Err(e) => {
      eprintln!("error: {e:#}");
      return ExitCode::from(1);
    }
  };

  let name = app
    .input
    .as_ref()
    .map(|p| p.display().to_string())
    .unwrap_or_else(|| "<stdin>".to_string());

  let assembled = match tinypie::asm::assemble(&source) {
    Ok(a) => a,
    Err(e) => {
      eprintln!("{}", e.report(&name, &source));
      return ExitCode::from(2);
    }
  };

  if app.disasm {
    match tinypie::disasm::disassemble(&assembled) {
      Ok(text) => print!("{text}"),
      Err(e) => eprintln!("{}", e.report(&name, &source)),
    }
  }

  let mut out = io::stdout();
  let mut vm = tinypie::vm::Vm::new(&assembled, &mut out).with_trace(app.trace);
  let result = vm.run();

  if app.coredump {
    match tinypie::disasm::coredump(&assembled, vm.globals()) {
      Ok(text) => print!("{text}"),
      Err(e) => eprintln!("{}", e.report(&name, &source)),
    }
  }

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{}", e.report(&name, &source));
      ExitCode::from(2)
    }
  }
}
