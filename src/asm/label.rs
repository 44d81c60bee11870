//! Forward-label bookkeeping: a label referenced before its definition emits
//! a placeholder address and records the patch site, to be back-filled once
//! the label's address becomes known.

use indexmap::IndexMap;

#[derive(Default)]
pub struct LabelRecord {
  pub address: Option<u32>,
  pub pending_patch_sites: Vec<usize>,
}

/// Indexed by name, insertion-ordered so an "undefined label" error can be
/// reported in first-referenced order rather than hash order.
#[derive(Default)]
pub struct LabelTable {
  labels: IndexMap<String, LabelRecord>,
}

impl LabelTable {
  pub fn new() -> Self {
    LabelTable::default()
  }

  fn entry(&mut self, name: &str) -> &mut LabelRecord {
    self
      .labels
      .entry(name.to_string())
      .or_insert_with(LabelRecord::default)
  }

  /// Returns the label's address if already known, else `None` and records
  /// `patch_site` to be back-filled on definition.
  pub fn reference(&mut self, name: &str, patch_site: usize) -> Option<u32> {
    let record = self.entry(name);
    match record.address {
      Some(addr) => Some(addr),
      None => {
        record.pending_patch_sites.push(patch_site);
        None
      }
    }
  }

  /// Defines `name` at `address`, returning the patch sites to back-fill.
  /// Panics-free on a redefinition: the caller is expected to check
  /// `is_defined` first and raise an assemble error instead.
  pub fn define(&mut self, name: &str, address: u32) -> Vec<usize> {
    let record = self.entry(name);
    record.address = Some(address);
    std::mem::take(&mut record.pending_patch_sites)
  }

  pub fn is_defined(&self, name: &str) -> bool {
    matches!(self.labels.get(name), Some(r) if r.address.is_some())
  }

  /// Labels still undefined once assembly reaches end-of-input, in the
  /// order they were first referenced.
  pub fn undefined(&self) -> impl Iterator<Item = &str> {
    self
      .labels
      .iter()
      .filter(|(_, r)| r.address.is_none())
      .map(|(name, _)| name.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn forward_reference_then_define_yields_patch_sites() {
    let mut table = LabelTable::new();
    assert_eq!(table.reference("end", 10), None);
    assert_eq!(table.reference("end", 20), None);
    let sites = table.define("end", 42);
    assert_eq!(sites, vec![10, 20]);
    assert_eq!(table.reference("end", 30), Some(42));
  }

  #[test]
  fn undefined_labels_are_reported_in_reference_order() {
    let mut table = LabelTable::new();
    table.reference("b", 0);
    table.reference("a", 1);
    table.define("b", 5);
    let remaining: Vec<_> = table.undefined().collect();
    assert_eq!(remaining, vec!["a"]);
  }
}
