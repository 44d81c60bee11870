//! Renders a parsed AST as a Graphviz DOT graph, for `tinypie-astviz`.

use std::fmt::Write;

use syntax::ast::{Expr, ExprKind, Stmt, StmtKind};

pub fn render(root: &Stmt) -> String {
  let mut out = String::new();
  writeln!(out, "digraph ast {{").ok();
  let mut next_id = 0;
  render_stmt(root, &mut out, &mut next_id);
  writeln!(out, "}}").ok();
  out
}

fn node(out: &mut String, next_id: &mut u32, label: &str) -> u32 {
  let id = *next_id;
  *next_id += 1;
  writeln!(out, "  n{id} [label=\"{}\"];", label.replace('"', "\\\"")).ok();
  id
}

fn edge(out: &mut String, from: u32, to: u32) {
  writeln!(out, "  n{from} -> n{to};").ok();
}

fn render_stmt(stmt: &Stmt, out: &mut String, next_id: &mut u32) -> u32 {
  match &**stmt {
    StmtKind::Block(stmts) => {
      let id = node(out, next_id, "BLOCK");
      for s in stmts {
        let child = render_stmt(s, out, next_id);
        edge(out, id, child);
      }
      id
    }
    StmtKind::FuncDef { name, params, body } => {
      let id = node(out, next_id, &format!("FUNC_DEF {name}({})", params.join(", ")));
      let child = render_stmt(body, out, next_id);
      edge(out, id, child);
      id
    }
    StmtKind::Print(expr) => {
      let id = node(out, next_id, "PRINT");
      let child = render_expr(expr, out, next_id);
      edge(out, id, child);
      id
    }
    StmtKind::Return(expr) => {
      let id = node(out, next_id, "RETURN");
      let child = render_expr(expr, out, next_id);
      edge(out, id, child);
      id
    }
    StmtKind::Assign { name, value } => {
      let id = node(out, next_id, &format!("ASSIGN {name}"));
      let child = render_expr(value, out, next_id);
      edge(out, id, child);
      id
    }
    StmtKind::If {
      cond,
      then_branch,
      else_branch,
    } => {
      let id = node(out, next_id, "IF");
      let c = render_expr(cond, out, next_id);
      edge(out, id, c);
      let t = render_stmt(then_branch, out, next_id);
      edge(out, id, t);
      if let Some(else_branch) = else_branch {
        let e = render_stmt(else_branch, out, next_id);
        edge(out, id, e);
      }
      id
    }
    StmtKind::While { cond, body } => {
      let id = node(out, next_id, "WHILE");
      let c = render_expr(cond, out, next_id);
      edge(out, id, c);
      let b = render_stmt(body, out, next_id);
      edge(out, id, b);
      id
    }
    StmtKind::ExprStmt(expr) => render_expr(expr, out, next_id),
  }
}

fn render_expr(expr: &Expr, out: &mut String, next_id: &mut u32) -> u32 {
  match &**expr {
    ExprKind::Id(name) => node(out, next_id, &format!("ID {name}")),
    ExprKind::Int(n) => node(out, next_id, &format!("INT {n}")),
    ExprKind::Str(s) => node(out, next_id, &format!("STRING '{s}'")),
    ExprKind::Call { callee, args, .. } => {
      let id = node(out, next_id, &format!("CALL {callee}"));
      for a in args {
        let child = render_expr(a, out, next_id);
        edge(out, id, child);
      }
      id
    }
    ExprKind::Lt(lhs, rhs) => render_binop(expr.kind_name(), lhs, rhs, out, next_id),
    ExprKind::Eq(lhs, rhs) => render_binop(expr.kind_name(), lhs, rhs, out, next_id),
    ExprKind::Add(lhs, rhs) => render_binop(expr.kind_name(), lhs, rhs, out, next_id),
    ExprKind::Sub(lhs, rhs) => render_binop(expr.kind_name(), lhs, rhs, out, next_id),
    ExprKind::Mul(lhs, rhs) => render_binop(expr.kind_name(), lhs, rhs, out, next_id),
  }
}

fn render_binop(label: &str, lhs: &Expr, rhs: &Expr, out: &mut String, next_id: &mut u32) -> u32 {
  let id = node(out, next_id, label);
  let l = render_expr(lhs, out, next_id);
  edge(out, id, l);
  let r = render_expr(rhs, out, next_id);
  edge(out, id, r);
  id
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_a_digraph_with_matching_node_count() {
    let program = syntax::parse("print 1 + 2\n").unwrap();
    let dot = render(&program.root);
    assert!(dot.starts_with("digraph ast {"));
    assert!(dot.contains("PRINT"));
    assert!(dot.contains("ADD"));
  }
}
