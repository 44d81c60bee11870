use super::parse;
use crate::ast::{ExprKind, StmtKind};

fn root_children(src: &str) -> Vec<StmtKind> {
  let program = parse(src).unwrap();
  match program.root.into_inner() {
    StmtKind::Block(stmts) => stmts.into_iter().map(|s| s.into_inner()).collect(),
    other => panic!("expected root BLOCK, got {other:?}"),
  }
}

#[test]
fn parses_print_literal() {
  let stmts = root_children("print 5\n");
  assert_eq!(stmts.len(), 1);
  match &stmts[0] {
    StmtKind::Print(e) => assert!(matches!(e.as_ref().clone().into_inner(), ExprKind::Int(5))),
    other => panic!("expected PRINT, got {other:?}"),
  }
}

#[test]
fn parses_forward_referenced_call() {
  let stmts = root_children("print factorial(6)\ndef factorial(x):\n  return x\n.\n");
  assert_eq!(stmts.len(), 2);
  assert!(matches!(stmts[0], StmtKind::Print(_)));
  match &stmts[1] {
    StmtKind::FuncDef { name, params, .. } => {
      assert_eq!(&**name, "factorial");
      assert_eq!(params.len(), 1);
    }
    other => panic!("expected FUNC_DEF, got {other:?}"),
  }
}

#[test]
fn single_statement_if_without_block() {
  let stmts = root_children("if x < 2 return 1\n");
  match &stmts[0] {
    StmtKind::If {
      then_branch,
      else_branch,
      ..
    } => {
      assert!(matches!(&***then_branch, StmtKind::Return(_)));
      assert!(else_branch.is_none());
    }
    other => panic!("expected IF, got {other:?}"),
  }
}

#[test]
fn assign_and_call_statement_disambiguated_by_lookahead() {
  let stmts = root_children("x = 1\nfoo(x)\n");
  assert!(matches!(stmts[0], StmtKind::Assign { .. }));
  assert!(matches!(stmts[1], StmtKind::ExprStmt(_)));
}

#[test]
fn reports_unexpected_token() {
  let err = parse("print\n").unwrap_err();
  assert!(!err.is_empty());
}

#[test]
fn reports_unterminated_block() {
  let err = parse("if x < 2:\n  print x\n").unwrap_err();
  assert!(!err.is_empty());
}
