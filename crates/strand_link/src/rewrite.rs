//! Reference rewriting (Phase C).

use crate::rename::RenameMap;
use std::collections::HashMap;
use strand_ir::{OpKind, TranslationUnit, TypeDb, TypeId, WalkAction};
use tracing::trace;

/// Old type to renamed type, for one unit.
pub type TypeRemap = HashMap<TypeId, TypeId>;

/// Precomputes, for each of the first `unit_count` unit positions, how every
/// existing type changes under that unit's class renames.
///
/// Runs before the parallel rewrite so the workers never touch the shared
/// [`TypeDb`].
pub fn build_type_remaps(types: &mut TypeDb, unit_count: usize, renames: &RenameMap) -> Vec<TypeRemap> {
    let existing: Vec<TypeId> = types.ids().collect();
    (0..unit_count)
        .map(|unit| {
            let mut remap = TypeRemap::new();
            if !renames.touches(unit) {
                return remap;
            }
            for &id in &existing {
                let renamed = types.substitute_classes(id, &mut |name| renames.get(unit, name));
                if renamed != id {
                    remap.insert(id, renamed);
                }
            }
            remap
        })
        .collect()
}

/// What rewriting one unit did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// External declarations erased.
    pub externs_erased: usize,
    /// Operations erased in total, including those nested in externals.
    pub ops_erased: usize,
    /// Declarations that received a new name.
    pub renames_applied: usize,
}

/// Applies the renames of the unit at position `index` to `unit` and erases
/// its external declarations.
///
/// Every remaining operation is visited once: a renamed declaration takes
/// its new name, objects follow their class, every symbol reference
/// attribute and every type slot is substituted through the unit's renames.
pub fn rewrite_unit(
    index: usize,
    unit: &mut TranslationUnit,
    renames: &RenameMap,
    remap: &TypeRemap,
) -> RewriteStats {
    let mut stats = RewriteStats::default();
    let ops_erased = unit.walk_mut(|id, op| {
        if op.is_extern() {
            trace!(unit = index, op = id.as_raw(), "erasing external declaration");
            stats.externs_erased += 1;
            return WalkAction::Erase;
        }
        if let Some(old) = op.symbol_name() {
            if let Some(new) = renames.get(index, old) {
                trace!(
                    unit = index,
                    from = old.as_raw(),
                    to = new.as_raw(),
                    "renaming declaration"
                );
                op.set_symbol_name(new);
                stats.renames_applied += 1;
            }
        }
        if let OpKind::Object { class_name, .. } = &mut op.kind {
            *class_name = renames.resolve(index, *class_name);
        }
        op.for_each_type_mut(&mut |ty| {
            if let Some(&renamed) = remap.get(&*ty) {
                *ty = renamed;
            }
        });
        op.for_each_symbol_ref_mut(&mut |name| *name = renames.resolve(index, *name));
        WalkAction::Advance
    });
    stats.ops_erased = ops_erased;
    stats
}
