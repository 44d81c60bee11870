//! TinyPie: a tree-walking interpreter and a register-based bytecode VM for
//! a tiny Python-surfaced imperative language, sharing one [`Value`] type and
//! one [`ops`] module so the two execution paths can never disagree about
//! what an operation means.

pub mod asm;
pub mod astviz;
pub mod disasm;
mod error;
pub mod interp;
pub mod ops;
pub mod pool;
mod value;
pub mod vm;

pub use error::Error;
pub use value::Value;

use std::io::Write;

/// Parses and interprets `source`, writing `print` output to `out`.
pub fn run_source(source: &str, out: impl Write) -> Result<(), Error> {
  let program = syntax::parse(source)?;
  interp::Interpreter::new(&program, out).run()
}

/// Assembles `source` and executes it on the VM, writing `print` output to
/// `out`.
pub fn run_assembly(source: &str, out: impl Write, trace: bool) -> Result<(), Error> {
  let assembled = asm::assemble(source)?;
  vm::Vm::new(&assembled, out).with_trace(trace).run()
}
