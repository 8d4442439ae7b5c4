//! Splicing rewritten units into one.

use strand_ir::{TranslationUnit, UnitId};
use strand_source::Span;
use tracing::trace;

/// Moves the top-level operations of every unit, in unit order, into one new
/// unit and drops the emptied wrappers.
pub fn merge_units(units: Vec<TranslationUnit>) -> TranslationUnit {
    let mut merged = TranslationUnit::new(UnitId::from_raw(0), Span::DUMMY);
    for unit in units {
        trace!(
            unit = unit.id.as_raw(),
            declarations = unit.body().len(),
            "splicing unit"
        );
        merged.splice(unit);
    }
    merged
}
