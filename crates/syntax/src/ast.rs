//! The source-language AST.
//!
//! Nodes are a `Spanned<StmtKind>` / `Spanned<ExprKind>` pair of sum types
//! rather than one homogeneous `Node { kind, text, children }` struct — each
//! variant carries exactly the fields its construct needs, which is the more
//! idiomatic shape in Rust than a generic tree walked by string tag.
//! [`StmtKind::kind_name`] and [`ExprKind::kind_name`] reproduce the string
//! tags (`BLOCK`, `CALL`, ...) for callers that still want them, such as the
//! DOT AST visualiser and error messages that name a node kind.

use std::rc::Rc;

use span::Spanned;

use crate::scope::ScopeId;

pub type Stmt = Spanned<StmtKind>;
pub type Expr = Spanned<ExprKind>;

#[derive(Debug, Clone)]
pub enum StmtKind {
  /// A sequence of statements executed in order. The parser builds a single
  /// root `Block` whose children are the program's top-level statements and
  /// function definitions.
  Block(Vec<Stmt>),
  FuncDef {
    name: Rc<str>,
    params: Vec<Rc<str>>,
    /// Shared with the [`crate::scope::FunctionSymbol`] registered for this
    /// function, so both the AST walk and scope-based call resolution see
    /// the same body without copying it.
    body: Rc<Stmt>,
  },
  Print(Box<Expr>),
  Return(Box<Expr>),
  /// Evaluates `value` then stores it into the deepest enclosing memory
  /// space that already binds `name`, falling back to the current space.
  Assign {
    name: Rc<str>,
    value: Box<Expr>,
  },
  If {
    cond: Box<Expr>,
    then_branch: Box<Stmt>,
    else_branch: Option<Box<Stmt>>,
  },
  While {
    cond: Box<Expr>,
    body: Box<Stmt>,
  },
  /// A call used as a statement, its result discarded.
  ExprStmt(Box<Expr>),
}

#[derive(Debug, Clone)]
pub enum ExprKind {
  Id(Rc<str>),
  Int(i64),
  Str(Rc<str>),
  /// Carries the scope the call was parsed in, so the interpreter can
  /// resolve the callee by walking that scope's enclosing chain — this is
  /// what lets a call appear in the source before the `def` it targets.
  Call {
    callee: Rc<str>,
    args: Vec<Expr>,
    scope: ScopeId,
  },
  Lt(Box<Expr>, Box<Expr>),
  Eq(Box<Expr>, Box<Expr>),
  Add(Box<Expr>, Box<Expr>),
  Sub(Box<Expr>, Box<Expr>),
  Mul(Box<Expr>, Box<Expr>),
}

impl StmtKind {
  pub fn kind_name(&self) -> &'static str {
    match self {
      StmtKind::Block(_) => "BLOCK",
      StmtKind::FuncDef { .. } => "FUNC_DEF",
      StmtKind::Print(_) => "PRINT",
      StmtKind::Return(_) => "RETURN",
      StmtKind::Assign { .. } => "ASSIGN",
      StmtKind::If { .. } => "IF",
      StmtKind::While { .. } => "WHILE",
      StmtKind::ExprStmt(e) => e.kind_name(),
    }
  }
}

impl ExprKind {
  pub fn kind_name(&self) -> &'static str {
    match self {
      ExprKind::Id(_) => "ID",
      ExprKind::Int(_) => "INT",
      ExprKind::Str(_) => "STRING",
      ExprKind::Call { .. } => "CALL",
      ExprKind::Lt(..) => "LT",
      ExprKind::Eq(..) => "EQ",
      ExprKind::Add(..) => "ADD",
      ExprKind::Sub(..) => "SUB",
      ExprKind::Mul(..) => "MUL",
    }
  }
}
