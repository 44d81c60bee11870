//! One binding environment: the globals, or a single function activation.

use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

#[derive(Default)]
pub struct MemorySpace {
  bindings: HashMap<Rc<str>, Value>,
}

impl MemorySpace {
  pub fn new() -> Self {
    MemorySpace::default()
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.bindings.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.bindings.contains_key(name)
  }

  pub fn set(&mut self, name: Rc<str>, value: Value) {
    self.bindings.insert(name, value);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_then_get_round_trips() {
    let mut space = MemorySpace::new();
    assert!(!space.contains("x"));
    space.set("x".into(), Value::Int(5));
    assert!(space.contains("x"));
    assert!(matches!(space.get("x"), Some(Value::Int(5))));
  }
}
