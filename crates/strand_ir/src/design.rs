//! Top-level container handed to the linker.

use crate::ids::UnitId;
use crate::types::TypeDb;
use crate::unit::TranslationUnit;
use serde::{Deserialize, Serialize};
use strand_common::Ident;
use strand_source::Span;

/// All translation units of one linking session plus their shared types.
///
/// Units appear in discovery order; the linker preserves that order when it
/// merges them. After a successful link the design holds exactly one unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Design {
    /// Types shared by every unit.
    pub types: TypeDb,
    /// Units in discovery order.
    pub units: Vec<TranslationUnit>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new empty unit and returns it for population.
    pub fn add_unit(&mut self, namespace: Option<Ident>, span: Span) -> &mut TranslationUnit {
        let id = UnitId::from_raw(self.units.len() as u32);
        let mut unit = TranslationUnit::new(id, span);
        unit.namespace = namespace;
        self.units.push(unit);
        let last = self.units.len() - 1;
        &mut self.units[last]
    }

    /// Finds a unit by identity.
    pub fn unit(&self, id: UnitId) -> Option<&TranslationUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Number of units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}
