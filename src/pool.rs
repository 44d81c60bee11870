//! The constant pool shared between the assembler (which builds it) and the
//! VM/disassembler (which only ever read it).
//!
//! Lookup is by value equality, with one deliberate exception: function
//! descriptors compare equal by name only. That lets `call foo, r1` emitted
//! before the matching `.def foo` share a pool slot with the later
//! definition — the descriptor is patched in place and the pool index never
//! moves.

use std::rc::Rc;

/// `{ name, code_address, arg_count, local_count }`, created by the
/// assembler and referenced by `call` operands.
#[derive(Clone, Debug)]
pub struct FunctionDescriptor {
  pub name: Rc<str>,
  pub code_address: u32,
  pub arg_count: u32,
  pub local_count: u32,
}

#[derive(Clone, Debug)]
pub enum PoolItem {
  Int(i64),
  Str(Rc<str>),
  Func(FunctionDescriptor),
}

impl PoolItem {
  pub fn type_name(&self) -> &'static str {
    match self {
      PoolItem::Int(_) => "int",
      PoolItem::Str(_) => "string",
      PoolItem::Func(_) => "function",
    }
  }
}

impl PartialEq for PoolItem {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (PoolItem::Int(a), PoolItem::Int(b)) => a == b,
      (PoolItem::Str(a), PoolItem::Str(b)) => a == b,
      (PoolItem::Func(a), PoolItem::Func(b)) => a.name == b.name,
      _ => false,
    }
  }
}

impl std::fmt::Display for PoolItem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PoolItem::Int(n) => write!(f, "{n}"),
      PoolItem::Str(s) => write!(f, "{s:?}"),
      PoolItem::Func(d) => write!(f, "{}@{}", d.name, d.code_address),
    }
  }
}

/// Ordered, append-only sequence of pool items. Indices are 0-based and
/// double as the 32-bit `POOL`/`FUNC` operands emitted by the assembler.
#[derive(Clone, Debug, Default)]
pub struct ConstantPool {
  items: Vec<PoolItem>,
}

impl ConstantPool {
  pub fn new() -> Self {
    ConstantPool::default()
  }

  pub fn get(&self, index: u32) -> Option<&PoolItem> {
    self.items.get(index as usize)
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &PoolItem> {
    self.items.iter()
  }

  /// Inserts `item`, reusing an existing equal entry if one exists. Used for
  /// `loadk`/`gload`/`gstore` literal operands.
  pub fn insert(&mut self, item: PoolItem) -> u32 {
    if let Some(index) = self.items.iter().position(|existing| existing == &item) {
      return index as u32;
    }
    self.items.push(item);
    (self.items.len() - 1) as u32
  }

  /// Finds or creates a placeholder `FunctionDescriptor` for `name`, without
  /// touching its address/arity fields. Used when a `call` references a
  /// function that may not have been `.def`-ined yet.
  pub fn insert_function(&mut self, name: &str) -> u32 {
    if let Some(index) = self.position_of_function(name) {
      return index;
    }
    self.items.push(PoolItem::Func(FunctionDescriptor {
      name: Rc::from(name),
      code_address: 0,
      arg_count: 0,
      local_count: 0,
    }));
    (self.items.len() - 1) as u32
  }

  /// Defines (or patches in place) the descriptor for `name` when a `.def`
  /// is encountered. The pool index assigned the first time `name` was
  /// referenced — whether by an earlier forward `call` or an earlier
  /// `.def` — never changes.
  pub fn define_function(
    &mut self,
    name: &str,
    code_address: u32,
    arg_count: u32,
    local_count: u32,
  ) -> u32 {
    let index = self.insert_function(name);
    if let PoolItem::Func(descriptor) = &mut self.items[index as usize] {
      descriptor.code_address = code_address;
      descriptor.arg_count = arg_count;
      descriptor.local_count = local_count;
    }
    index
  }

  fn position_of_function(&self, name: &str) -> Option<u32> {
    self
      .items
      .iter()
      .position(|item| matches!(item, PoolItem::Func(d) if &*d.name == name))
      .map(|i| i as u32)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reuses_equal_literals() {
    let mut pool = ConstantPool::new();
    let a = pool.insert(PoolItem::Int(5));
    let b = pool.insert(PoolItem::Int(5));
    let c = pool.insert(PoolItem::Str("hi".into()));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(pool.len(), 2);
  }

  #[test]
  fn forward_call_shares_slot_with_later_def() {
    let mut pool = ConstantPool::new();
    let forward = pool.insert_function("factorial");
    assert_eq!(pool.len(), 1);

    let defined = pool.define_function("factorial", 42, 1, 0);
    assert_eq!(forward, defined);

    match pool.get(defined).unwrap() {
      PoolItem::Func(d) => assert_eq!(d.code_address, 42),
      other => panic!("expected Func, got {other:?}"),
    }
  }
}
