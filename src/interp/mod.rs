//! The tree-walking interpreter: an external visitor over the AST built by
//! [`syntax::parser`], holding one global [`MemorySpace`] and a stack of
//! function spaces.

mod space;

pub use space::MemorySpace;

use std::io::Write;
use std::rc::Rc;

use syntax::ast::{ExprKind, StmtKind};
use syntax::{Program, ScopeId};

use crate::ops;
use crate::value::Value;
use crate::Error;

/// The result of executing a statement: either control fell through
/// normally, or a `return` is unwinding toward its enclosing `CALL`.
///
/// Modeling this as a value rather than a Rust-level error or panic means
/// `return` can never accidentally escape past the call that should catch
/// it — every statement-executing function has to explicitly propagate a
/// `Returning` signal upward, and `CALL` is the only place that turns it
/// back into a plain value.
pub enum Signal {
  Normal(Value),
  Returning(Value),
}

pub struct Interpreter<'a, W> {
  program: &'a Program,
  globals: MemorySpace,
  stack: Vec<MemorySpace>,
  out: W,
}

impl<'a, W: Write> Interpreter<'a, W> {
  pub fn new(program: &'a Program, out: W) -> Self {
    Interpreter {
      program,
      globals: MemorySpace::new(),
      stack: Vec::new(),
      out,
    }
  }

  pub fn run(&mut self) -> Result<(), Error> {
    self.exec_stmt(&self.program.root)?;
    Ok(())
  }

  fn current_space(&self) -> Option<&MemorySpace> {
    self.stack.last()
  }

  fn load(&self, name: &str) -> Result<Value, Error> {
    if let Some(space) = self.current_space() {
      if let Some(v) = space.get(name) {
        return Ok(v.clone());
      }
    }
    if let Some(v) = self.globals.get(name) {
      return Ok(v.clone());
    }
    Err(Error::Name(format!("name '{name}' is not defined")))
  }

  /// Stores into the deepest space that already binds `name`, creating it
  /// in the current space otherwise. When called from inside a function,
  /// this means a plain assignment cannot shadow an existing global of the
  /// same name — it mutates the global instead.
  fn assign(&mut self, name: Rc<str>, value: Value) {
    if !self.stack.is_empty() {
      let in_local = self.stack.last().unwrap().contains(&name);
      if in_local {
        self.stack.last_mut().unwrap().set(name, value);
        return;
      }
      if self.globals.contains(&name) {
        self.globals.set(name, value);
        return;
      }
      self.stack.last_mut().unwrap().set(name, value);
    } else {
      self.globals.set(name, value);
    }
  }

  fn exec_stmt(&mut self, stmt: &syntax::ast::Stmt) -> Result<Signal, Error> {
    match &**stmt {
      StmtKind::Block(stmts) => self.exec_block(stmts),
      StmtKind::FuncDef { .. } => Ok(Signal::Normal(Value::Unset)),
      StmtKind::Print(expr) => {
        let value = self.eval(expr)?;
        writeln!(self.out, "{value}").map_err(|e| Error::Runtime(e.to_string()))?;
        Ok(Signal::Normal(Value::Unset))
      }
      StmtKind::Return(expr) => {
        let value = self.eval(expr)?;
        Ok(Signal::Returning(value))
      }
      StmtKind::Assign { name, value } => {
        let value = self.eval(value)?;
        self.assign(name.clone(), value);
        Ok(Signal::Normal(Value::Unset))
      }
      StmtKind::If {
        cond,
        then_branch,
        else_branch,
      } => {
        if ops::truthy(&self.eval(cond)?) {
          self.exec_stmt(then_branch)
        } else if let Some(else_branch) = else_branch {
          self.exec_stmt(else_branch)
        } else {
          Ok(Signal::Normal(Value::Unset))
        }
      }
      StmtKind::While { cond, body } => {
        while ops::truthy(&self.eval(cond)?) {
          match self.exec_stmt(body)? {
            Signal::Normal(_) => continue,
            returning => return Ok(returning),
          }
        }
        Ok(Signal::Normal(Value::Unset))
      }
      StmtKind::ExprStmt(expr) => {
        self.eval(expr)?;
        Ok(Signal::Normal(Value::Unset))
      }
    }
  }

  fn exec_block(&mut self, stmts: &[syntax::ast::Stmt]) -> Result<Signal, Error> {
    for stmt in stmts {
      match self.exec_stmt(stmt)? {
        Signal::Normal(_) => continue,
        returning => return Ok(returning),
      }
    }
    Ok(Signal::Normal(Value::Unset))
  }

  fn eval(&mut self, expr: &syntax::ast::Expr) -> Result<Value, Error> {
    match &**expr {
      ExprKind::Id(name) => self.load(name),
      ExprKind::Int(n) => Ok(Value::Int(*n)),
      ExprKind::Str(s) => Ok(Value::Str(s.clone())),
      ExprKind::Lt(lhs, rhs) => {
        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        Ok(Value::Int(ops::lt(&lhs, &rhs)? as i64))
      }
      ExprKind::Eq(lhs, rhs) => {
        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        Ok(Value::Int(ops::eq(&lhs, &rhs) as i64))
      }
      ExprKind::Add(lhs, rhs) => {
        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        ops::add(&lhs, &rhs)
      }
      ExprKind::Sub(lhs, rhs) => {
        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        ops::sub(&lhs, &rhs)
      }
      ExprKind::Mul(lhs, rhs) => {
        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        ops::mul(&lhs, &rhs)
      }
      ExprKind::Call {
        callee,
        args,
        scope,
      } => self.call(callee, args, *scope),
    }
  }

  /// Arguments are evaluated left-to-right in the *caller's* space before
  /// the callee's space is pushed, and the callee is resolved through the
  /// call site's captured scope rather than at parse time — this is what
  /// lets a function be called before its `def` appears in the source.
  fn call(&mut self, callee: &str, args: &[syntax::ast::Expr], scope: ScopeId) -> Result<Value, Error> {
    let function = self
      .program
      .scopes
      .resolve_function(scope, callee)
      .ok_or_else(|| Error::Name(format!("function '{callee}' is not defined")))?;

    if args.len() != function.params.len() {
      return Err(Error::Type(format!(
        "{}() takes {} argument(s) but {} were given",
        callee,
        function.params.len(),
        args.len()
      )));
    }

    let mut values = Vec::with_capacity(args.len());
    for arg in args {
      values.push(self.eval(arg)?);
    }

    let mut space = MemorySpace::new();
    for (param, value) in function.params.iter().zip(values) {
      space.set(param.clone(), value);
    }

    self.stack.push(space);
    let result = self.exec_stmt(&function.body);
    self.stack.pop();

    match result? {
      Signal::Returning(v) => Ok(v),
      Signal::Normal(_) => Ok(Value::Unset),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn run(src: &str) -> String {
    let program = syntax::parse(src).unwrap();
    let mut out = Vec::new();
    {
      let mut interp = Interpreter::new(&program, &mut out);
      interp.run().unwrap();
    }
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn prints_a_literal() {
    assert_eq!(run("print 5\n"), "5\n");
  }

  #[test]
  fn factorial_via_forward_reference() {
    let src = "print factorial(6)\ndef factorial(x):\n  if x < 2 return 1\n  return x * factorial(x - 1)\n.\n";
    assert_eq!(run(src), "720\n");
  }

  #[test]
  fn while_loop_prints_0_through_9() {
    let src = "i = 0\nwhile i < 10:\n  print i\n  i = i + 1\n.\n";
    let expected: String = (0..10).map(|n| format!("{n}\n")).collect();
    assert_eq!(run(src), expected);
  }

  #[test]
  fn function_mutates_existing_global() {
    let src = "x = 1\ndef bar():\n  x = 7\n.\nbar()\nprint x\n";
    assert_eq!(run(src), "7\n");
  }

  #[test]
  fn undefined_name_is_a_name_error() {
    let program = syntax::parse("print y\n").unwrap();
    let mut out = Vec::new();
    let mut interp = Interpreter::new(&program, &mut out);
    assert!(matches!(interp.run(), Err(Error::Name(_))));
  }

  #[test]
  fn string_plus_int_is_a_type_error() {
    let program = syntax::parse("print 'a' + 1\n").unwrap();
    let mut out = Vec::new();
    let mut interp = Interpreter::new(&program, &mut out);
    assert!(matches!(interp.run(), Err(Error::Type(_))));
  }
}
