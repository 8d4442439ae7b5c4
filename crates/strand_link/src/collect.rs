//! Per-unit symbol collection (Phase A).

use std::fmt;
use strand_common::Ident;
use strand_ir::{OpId, OpKind, TranslationUnit, WalkAction};
use tracing::trace;

/// The two symbol spaces the linker resolves independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Classes and external classes.
    Class,
    /// Hardware modules and external modules.
    Module,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Class => write!(f, "class"),
            SymbolKind::Module => write!(f, "module"),
        }
    }
}

/// A named top-level declaration of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Symbol name.
    pub name: Ident,
    /// The declaring operation.
    pub op: OpId,
}

/// Class and module declarations of one unit, in body order.
#[derive(Debug, Default)]
pub struct UnitSymbols {
    /// Class definitions and external classes.
    pub classes: Vec<SymbolEntry>,
    /// Module definitions and external modules.
    pub modules: Vec<SymbolEntry>,
    /// Operations erased because they were neither classes nor modules.
    pub debris_erased: usize,
}

/// Partitions the top-level declarations of `unit` into classes and modules
/// and erases every other top-level operation.
pub fn collect_symbols(unit: &mut TranslationUnit) -> UnitSymbols {
    let mut symbols = UnitSymbols::default();
    let unit_id = unit.id;
    let debris_erased = unit.walk_mut(|id, op| {
        let entry = |name| SymbolEntry { name, op: id };
        match &op.kind {
            OpKind::Class(def) | OpKind::ClassExtern(def) => {
                symbols.classes.push(entry(def.name));
                WalkAction::Skip
            }
            OpKind::Module(def) => {
                symbols.modules.push(entry(def.name));
                WalkAction::Skip
            }
            OpKind::ModuleExtern(decl) => {
                symbols.modules.push(entry(decl.name));
                WalkAction::Skip
            }
            OpKind::Object { .. } | OpKind::Generic { .. } => {
                trace!(unit = unit_id.as_raw(), op = id.as_raw(), "erasing top-level debris");
                WalkAction::Erase
            }
        }
    });
    symbols.debris_erased = debris_erased;
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_ir::{ClassDef, ModuleDef, ModuleExtern, Operation, UnitId, Visibility};
    use strand_source::Span;

    fn id(n: u32) -> Ident {
        Ident::from_raw(n)
    }

    fn class(n: u32) -> Operation {
        Operation::class(
            ClassDef {
                name: id(n),
                params: Vec::new(),
                fields: Vec::new(),
            },
            Span::DUMMY,
        )
    }

    #[test]
    fn partitions_and_erases_debris() {
        let mut unit = TranslationUnit::new(UnitId::from_raw(0), Span::DUMMY);
        let nested = unit.alloc(Operation::generic(id(90), Span::DUMMY));
        let debris = unit.push(Operation::generic(id(91), Span::DUMMY).with_region(vec![nested]));
        let foo = unit.push(class(1));
        let adder = unit.push(Operation::module_extern(
            ModuleExtern {
                name: id(2),
                ports: Vec::new(),
            },
            Span::DUMMY,
        ));
        let mux = unit.push(Operation::module(
            ModuleDef {
                name: id(3),
                visibility: Visibility::Private,
                ports: Vec::new(),
            },
            Span::DUMMY,
        ));

        let symbols = collect_symbols(&mut unit);
        assert_eq!(symbols.classes, vec![SymbolEntry { name: id(1), op: foo }]);
        assert_eq!(
            symbols.modules,
            vec![
                SymbolEntry { name: id(2), op: adder },
                SymbolEntry { name: id(3), op: mux },
            ]
        );
        assert_eq!(symbols.debris_erased, 2);
        assert!(!unit.ops.contains(debris));
        assert!(!unit.ops.contains(nested));
        assert_eq!(unit.body(), &[foo, adder, mux]);
    }

    #[test]
    fn declaration_bodies_are_not_scanned() {
        let mut unit = TranslationUnit::new(UnitId::from_raw(0), Span::DUMMY);
        let inner = unit.alloc(Operation::generic(id(9), Span::DUMMY));
        unit.push(class(1).with_region(vec![inner]));
        let symbols = collect_symbols(&mut unit);
        assert_eq!(symbols.debris_erased, 0);
        assert!(unit.ops.contains(inner));
    }

    #[test]
    fn kind_display() {
        assert_eq!(SymbolKind::Class.to_string(), "class");
        assert_eq!(SymbolKind::Module.to_string(), "module");
    }
}
