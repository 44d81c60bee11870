//! LL(2) recursive-descent parser for the source dialect.
//!
//! Builds the AST and the scope tree in the same pass: entering a `def`
//! pushes a [`FunctionSymbol`] scope and defines its formal parameters,
//! registers the function on the enclosing scope (so later — or earlier —
//! calls can find it), then pushes a nested scope for the body.

use std::rc::Rc;

use span::{Span, Spanned};

use crate::ast::{Expr, ExprKind, Stmt, StmtKind};
use crate::error::Error;
use crate::scope::{FunctionSymbol, ScopeId, ScopeTable};
use crate::token::source::{self, TokenKind};
use crate::token::Token;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A fully parsed program: the scope tree plus a single root `BLOCK` whose
/// children are the top-level statements and function definitions, in
/// source order.
#[derive(Debug)]
pub struct Program {
  pub scopes: ScopeTable,
  pub global: ScopeId,
  pub root: Stmt,
}

pub fn parse(src: &str) -> Result<Program, Vec<Error>> {
  let tokens = source::lex(src)
    .map_err(|errs| errs.into_iter().map(Error::from).collect::<Vec<_>>())?;
  let mut parser = Parser::new(tokens);
  match parser.program() {
    Ok(root) if parser.errors.is_empty() => Ok(Program {
      scopes: parser.scopes,
      global: ScopeTable::global(),
      root,
    }),
    Ok(_) => Err(parser.errors),
    Err(e) => {
      parser.errors.push(e);
      Err(parser.errors)
    }
  }
}

struct Parser<'src> {
  tokens: Vec<Token<'src, TokenKind>>,
  pos: usize,
  errors: Vec<Error>,
  scopes: ScopeTable,
  scope: ScopeId,
}

// On average a single `parse_XXX` frame uses a few hundred bytes of stack;
// this gives a generous margin before deeply nested expressions overflow it.
const MINIMUM_STACK_REQUIRED: usize = 64_000;

#[cfg(not(target_family = "wasm"))]
fn check_recursion_limit(span: Span) -> Result<()> {
  if stacker::remaining_stack()
    .map(|available| available > MINIMUM_STACK_REQUIRED)
    .unwrap_or(true)
  {
    Ok(())
  } else {
    Err(Error::new("nesting limit reached", span))
  }
}

#[cfg(target_family = "wasm")]
fn check_recursion_limit(_span: Span) -> Result<()> {
  Ok(())
}

impl<'src> Parser<'src> {
  fn new(tokens: Vec<Token<'src, TokenKind>>) -> Self {
    Parser {
      tokens,
      pos: 0,
      errors: Vec::new(),
      scopes: ScopeTable::new(),
      scope: ScopeTable::global(),
    }
  }

  fn current(&self) -> &Token<'src, TokenKind> {
    &self.tokens[self.pos]
  }

  fn peek(&self, n: usize) -> &Token<'src, TokenKind> {
    self
      .tokens
      .get(self.pos + n)
      .unwrap_or_else(|| self.tokens.last().unwrap())
  }

  fn previous(&self) -> &Token<'src, TokenKind> {
    &self.tokens[self.pos - 1]
  }

  fn check(&self, kind: TokenKind) -> bool {
    self.current().is(kind)
  }

  fn bump(&mut self) -> &Token<'src, TokenKind> {
    if !self.check(TokenKind::Tok_Eof) {
      self.pos += 1;
    }
    self.previous()
  }

  fn bump_if(&mut self, kind: TokenKind) -> bool {
    if self.check(kind) {
      self.bump();
      true
    } else {
      false
    }
  }

  fn expect(&mut self, kind: TokenKind) -> Result<&Token<'src, TokenKind>> {
    if self.check(kind) {
      Ok(self.bump())
    } else {
      Err(Error::new(
        format!(
          "expected `{}`, found `{}`",
          kind.name(),
          self.current().kind.name()
        ),
        self.current().span,
      ))
    }
  }

  /// Skips one or more blank-line `NL` tokens. Every statement-sequence
  /// loop calls this so an empty line is simply not a statement, rather than
  /// needing its own AST node.
  fn skip_blank_lines(&mut self) {
    while self.bump_if(TokenKind::Tok_NL) {}
  }

  fn span<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<Spanned<T>> {
    let start = self.current().span;
    let value = f(self)?;
    let end = self.previous().span;
    Ok(Spanned::new(start.join(end), value))
  }

  // program → (func_def | statement)+ EOF
  fn program(&mut self) -> Result<Stmt> {
    self.span(|p| {
      let mut stmts = Vec::new();
      p.skip_blank_lines();
      while !p.check(TokenKind::Tok_Eof) {
        let stmt = if p.check(TokenKind::Kw_Def) {
          p.func_def()?
        } else {
          p.statement()?
        };
        stmts.push(stmt);
        p.skip_blank_lines();
      }
      Ok(StmtKind::Block(stmts))
    })
  }

  // func_def → 'def' ID '(' [ID (',' ID)*] ')' slist
  fn func_def(&mut self) -> Result<Stmt> {
    self.span(|p| {
      p.expect(TokenKind::Kw_Def)?;
      let name_tok = p.expect(TokenKind::Lit_Ident)?;
      let name: Rc<str> = Rc::from(name_tok.lexeme.as_ref());

      p.expect(TokenKind::Brk_ParenL)?;
      let mut params: Vec<Rc<str>> = Vec::new();
      if !p.check(TokenKind::Brk_ParenR) {
        loop {
          let param_tok = p.expect(TokenKind::Lit_Ident)?;
          params.push(Rc::from(param_tok.lexeme.as_ref()));
          if !p.bump_if(TokenKind::Tok_Comma) {
            break;
          }
        }
      }
      p.expect(TokenKind::Brk_ParenR)?;

      let enclosing = p.scope;
      let func_scope = p.scopes.push_scope(enclosing);
      for param in &params {
        p.scopes.define_param(func_scope, param.clone());
      }
      let body_scope = p.scopes.push_scope(func_scope);

      p.scope = body_scope;
      let body = p.slist();
      p.scope = enclosing;
      let body = Rc::new(body?);

      p.scopes.define_function(
        enclosing,
        FunctionSymbol {
          name: name.clone(),
          params: params.clone(),
          scope: func_scope,
          body: body.clone(),
        },
      );

      Ok(StmtKind::FuncDef {
        name,
        params,
        body,
      })
    })
  }

  // slist → ':' NL statement+ '.' NL | statement
  fn slist(&mut self) -> Result<Stmt> {
    check_recursion_limit(self.current().span)?;
    if self.bump_if(TokenKind::Tok_Colon) {
      self.span(|p| {
        p.expect(TokenKind::Tok_NL)?;
        p.skip_blank_lines();
        let mut stmts = Vec::new();
        while !p.check(TokenKind::Tok_Dot) {
          if p.check(TokenKind::Tok_Eof) {
            return Err(Error::new(
              "unterminated block, expected `.`",
              p.current().span,
            ));
          }
          stmts.push(p.statement()?);
          p.skip_blank_lines();
        }
        p.expect(TokenKind::Tok_Dot)?;
        p.expect(TokenKind::Tok_NL)?;
        Ok(StmtKind::Block(stmts))
      })
    } else {
      self.statement()
    }
  }

  // statement → 'print' expr NL | 'return' expr NL | call NL
  //           | assign NL | 'if' expr slist ['else' slist]
  //           | 'while' expr slist
  fn statement(&mut self) -> Result<Stmt> {
    check_recursion_limit(self.current().span)?;
    match self.current().kind {
      TokenKind::Kw_Print => self.span(|p| {
        p.bump();
        let value = Box::new(p.expr()?);
        p.expect(TokenKind::Tok_NL)?;
        Ok(StmtKind::Print(value))
      }),
      TokenKind::Kw_Return => self.span(|p| {
        p.bump();
        let value = Box::new(p.expr()?);
        p.expect(TokenKind::Tok_NL)?;
        Ok(StmtKind::Return(value))
      }),
      TokenKind::Kw_If => self.span(|p| {
        p.bump();
        let cond = Box::new(p.expr()?);
        let then_branch = Box::new(p.slist()?);
        let else_branch = if p.bump_if(TokenKind::Kw_Else) {
          Some(Box::new(p.slist()?))
        } else {
          None
        };
        Ok(StmtKind::If {
          cond,
          then_branch,
          else_branch,
        })
      }),
      TokenKind::Kw_While => self.span(|p| {
        p.bump();
        let cond = Box::new(p.expr()?);
        let body = Box::new(p.slist()?);
        Ok(StmtKind::While { cond, body })
      }),
      TokenKind::Lit_Ident if self.peek(1).is(TokenKind::Op_Equal) => self.span(|p| {
        let name_tok = p.bump().clone();
        let name: Rc<str> = Rc::from(name_tok.lexeme.as_ref());
        p.bump();
        let value = Box::new(p.expr()?);
        p.expect(TokenKind::Tok_NL)?;
        Ok(StmtKind::Assign { name, value })
      }),
      TokenKind::Lit_Ident if self.peek(1).is(TokenKind::Brk_ParenL) => self.span(|p| {
        let call = p.call()?;
        p.expect(TokenKind::Tok_NL)?;
        Ok(StmtKind::ExprStmt(Box::new(call)))
      }),
      _ => Err(Error::new(
        format!("unexpected token `{}`", self.current().kind.name()),
        self.current().span,
      )),
    }
  }

  // expr → add (('<'|'==') add)?
  fn expr(&mut self) -> Result<Expr> {
    self.span(|p| {
      let lhs = p.add()?;
      if p.bump_if(TokenKind::Op_Less) {
        let rhs = p.add()?;
        Ok(ExprKind::Lt(Box::new(lhs), Box::new(rhs)))
      } else if p.bump_if(TokenKind::Op_EqualEqual) {
        let rhs = p.add()?;
        Ok(ExprKind::Eq(Box::new(lhs), Box::new(rhs)))
      } else {
        Ok(lhs.into_inner())
      }
    })
  }

  // add → mul (('+'|'-') mul)*
  fn add(&mut self) -> Result<Expr> {
    self.span(|p| {
      let mut lhs = p.mul()?;
      loop {
        if p.bump_if(TokenKind::Op_Plus) {
          let rhs = p.mul()?;
          lhs = Spanned::new(lhs.span.join(rhs.span), ExprKind::Add(Box::new(lhs), Box::new(rhs)));
        } else if p.bump_if(TokenKind::Op_Minus) {
          let rhs = p.mul()?;
          lhs = Spanned::new(lhs.span.join(rhs.span), ExprKind::Sub(Box::new(lhs), Box::new(rhs)));
        } else {
          break;
        }
      }
      Ok(lhs.into_inner())
    })
  }

  // mul → atom ('*' atom)*
  fn mul(&mut self) -> Result<Expr> {
    self.span(|p| {
      let mut lhs = p.atom()?;
      while p.bump_if(TokenKind::Op_Star) {
        let rhs = p.atom()?;
        lhs = Spanned::new(lhs.span.join(rhs.span), ExprKind::Mul(Box::new(lhs), Box::new(rhs)));
      }
      Ok(lhs.into_inner())
    })
  }

  // atom → ID | INT | STRING | call | '(' expr ')'
  fn atom(&mut self) -> Result<Expr> {
    check_recursion_limit(self.current().span)?;
    self.span(|p| match p.current().kind {
      TokenKind::Lit_Ident if p.peek(1).is(TokenKind::Brk_ParenL) => Ok(p.call()?.into_inner()),
      TokenKind::Lit_Ident => {
        let tok = p.bump();
        Ok(ExprKind::Id(Rc::from(tok.lexeme.as_ref())))
      }
      TokenKind::Lit_Int => {
        let tok = p.bump();
        let value: i64 = tok
          .lexeme
          .parse()
          .map_err(|_| Error::new("invalid integer literal", tok.span))?;
        Ok(ExprKind::Int(value))
      }
      TokenKind::Lit_String => {
        let tok = p.bump();
        Ok(ExprKind::Str(Rc::from(source::unquote(&tok.lexeme))))
      }
      TokenKind::Brk_ParenL => {
        p.bump();
        let inner = p.expr()?;
        p.expect(TokenKind::Brk_ParenR)?;
        Ok(inner.into_inner())
      }
      _ => Err(Error::new(
        format!("expected an expression, found `{}`", p.current().kind.name()),
        p.current().span,
      )),
    })
  }

  // call → ID '(' [expr (',' expr)*] ')'
  fn call(&mut self) -> Result<Expr> {
    self.span(|p| {
      let name_tok = p.expect(TokenKind::Lit_Ident)?;
      let callee: Rc<str> = Rc::from(name_tok.lexeme.as_ref());
      let scope = p.scope;

      p.expect(TokenKind::Brk_ParenL)?;
      let mut args = Vec::new();
      if !p.check(TokenKind::Brk_ParenR) {
        loop {
          args.push(p.expr()?);
          if !p.bump_if(TokenKind::Tok_Comma) {
            break;
          }
        }
      }
      p.expect(TokenKind::Brk_ParenR)?;

      Ok(ExprKind::Call {
        callee,
        args,
        scope,
      })
    })
  }
}

#[cfg(test)]
mod tests;
