//! Renames decided during resolution, scoped by owning unit.

use std::collections::HashMap;
use strand_common::Ident;

/// Identifies one declaration instance: the same name in two units may end up
/// with two different final names.
///
/// Units are identified by their position in the design, not by
/// [`UnitId`](strand_ir::UnitId), which callers assign and may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolKey {
    /// Position of the owning unit in the design.
    pub unit: usize,
    /// Name before linking.
    pub name: Ident,
}

impl SymbolKey {
    /// Creates a key.
    pub fn new(unit: usize, name: Ident) -> Self {
        Self { unit, name }
    }
}

/// Old `(unit, name)` to new name. Names without an entry are kept.
///
/// Filled by the single-threaded resolver, then shared read-only by the
/// parallel rewriters.
#[derive(Debug, Clone, Default)]
pub struct RenameMap {
    entries: HashMap<SymbolKey, Ident>,
}

impl RenameMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `name` in the unit at position `unit` becomes `new_name`.
    pub fn insert(&mut self, unit: usize, name: Ident, new_name: Ident) {
        self.entries.insert(SymbolKey::new(unit, name), new_name);
    }

    /// The new name of `name` as seen from `unit`, if it was renamed.
    pub fn get(&self, unit: usize, name: Ident) -> Option<Ident> {
        self.entries.get(&SymbolKey::new(unit, name)).copied()
    }

    /// `name` as seen from `unit` after renaming.
    pub fn resolve(&self, unit: usize, name: Ident) -> Ident {
        self.get(unit, name).unwrap_or(name)
    }

    /// Returns `true` if any entry belongs to `unit`.
    pub fn touches(&self, unit: usize) -> bool {
        self.entries.keys().any(|k| k.unit == unit)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is renamed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
