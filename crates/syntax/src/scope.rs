//! The lexical scope tree built during source parsing.
//!
//! Scopes are addressed by index into a flat table rather than through owned
//! or borrowed pointers, which avoids a parser/scope reference cycle: a
//! `CALL` expression only needs to remember *where* it was parsed (a
//! [`ScopeId`]), and resolves the callee by walking the enclosing chain at
//! interpretation time. The tree is built once during parsing and is
//! immutable afterwards.

use std::collections::HashMap;
use std::rc::Rc;

use span::Spanned;

use crate::ast::StmtKind;

/// Index into a [`ScopeTable`]. Scope 0 is always the global scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

/// A bound local name: a formal parameter of some enclosing function.
#[derive(Debug)]
pub struct VariableSymbol {
  pub name: Rc<str>,
  pub scope: ScopeId,
}

/// A named function, reachable by callers in its owning scope (and nested
/// scopes) regardless of whether the `def` appears before or after the call
/// site in the source text.
#[derive(Debug)]
pub struct FunctionSymbol {
  pub name: Rc<str>,
  pub params: Vec<Rc<str>>,
  /// The scope pushed for the function's own parameters.
  pub scope: ScopeId,
  pub body: Rc<Spanned<StmtKind>>,
}

#[derive(Debug, Default)]
pub struct ScopeData {
  pub enclosing: Option<ScopeId>,
  pub functions: HashMap<Rc<str>, Rc<FunctionSymbol>>,
  pub variables: HashMap<Rc<str>, Rc<VariableSymbol>>,
}

/// Arena of every scope created while parsing one program.
#[derive(Debug, Default)]
pub struct ScopeTable {
  scopes: Vec<ScopeData>,
}

impl ScopeTable {
  pub fn new() -> Self {
    ScopeTable {
      scopes: vec![ScopeData::default()],
    }
  }

  pub fn global() -> ScopeId {
    ScopeId(0)
  }

  pub fn push_scope(&mut self, enclosing: ScopeId) -> ScopeId {
    self.scopes.push(ScopeData {
      enclosing: Some(enclosing),
      ..ScopeData::default()
    });
    ScopeId((self.scopes.len() - 1) as u32)
  }

  pub fn get(&self, id: ScopeId) -> &ScopeData {
    &self.scopes[id.0 as usize]
  }

  fn get_mut(&mut self, id: ScopeId) -> &mut ScopeData {
    &mut self.scopes[id.0 as usize]
  }

  pub fn define_param(&mut self, scope: ScopeId, name: Rc<str>) -> Rc<VariableSymbol> {
    let sym = Rc::new(VariableSymbol {
      name: name.clone(),
      scope,
    });
    self.get_mut(scope).variables.insert(name, sym.clone());
    sym
  }

  pub fn define_function(&mut self, scope: ScopeId, sym: FunctionSymbol) -> Rc<FunctionSymbol> {
    let sym = Rc::new(sym);
    self
      .get_mut(scope)
      .functions
      .insert(sym.name.clone(), sym.clone());
    sym
  }

  /// Walks from `from` up through enclosing scopes, returning the first
  /// function symbol named `name`. This is what makes forward references
  /// work: a `CALL` parsed before the matching `def` still resolves, because
  /// resolution happens by name lookup at interpretation time, not at parse
  /// time.
  pub fn resolve_function(&self, from: ScopeId, name: &str) -> Option<Rc<FunctionSymbol>> {
    let mut current = Some(from);
    while let Some(id) = current {
      let data = self.get(id);
      if let Some(sym) = data.functions.get(name) {
        return Some(sym.clone());
      }
      current = data.enclosing;
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use span::Span;

  fn dummy_body() -> Rc<Spanned<StmtKind>> {
    Rc::new(Spanned::new(Span::default(), StmtKind::Block(Vec::new())))
  }

  #[test]
  fn resolves_function_defined_in_an_ancestor_scope() {
    let mut scopes = ScopeTable::new();
    let global = ScopeTable::global();
    let func_scope = scopes.push_scope(global);
    scopes.define_function(
      global,
      FunctionSymbol {
        name: "f".into(),
        params: vec![],
        scope: func_scope,
        body: dummy_body(),
      },
    );

    let nested = scopes.push_scope(func_scope);
    assert!(scopes.resolve_function(nested, "f").is_some());
    assert!(scopes.resolve_function(nested, "missing").is_none());
  }
}
