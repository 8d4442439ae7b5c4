//! Object-model linker: merges independently produced translation units into
//! one namespace.
//!
//! Linking runs in four steps over a [`Design`]:
//!
//! 1. **Collect** (parallel, per unit): partition top-level declarations into
//!    classes and modules; erase everything else.
//! 2. **Resolve** (sequential): group declarations by name across units. A
//!    name with external declarations must have exactly one compatible
//!    definition and is never renamed; colliding private definitions are
//!    renamed apart.
//! 3. **Rewrite** (parallel, per unit): apply the renames to declarations,
//!    object instantiations, symbol references and class types; erase
//!    external declarations.
//! 4. **Merge**: splice every unit, in order, into one unit.
//!
//! The merged unit is optionally re-checked for dangling symbol uses. Any
//! failure leaves the design without output and returns a [`LinkError`] after
//! emitting the diagnostics to the sink.
//!
//! # Usage
//!
//! ```ignore
//! let summary = link_design(&mut design, &config.link, &interner, &sink)?;
//! ```

#![warn(missing_docs)]

pub mod collect;
pub mod error;
pub mod errors;
pub mod merge;
pub mod namespace;
pub mod rename;
pub mod resolve;
pub mod rewrite;
pub mod verify;

pub use collect::{collect_symbols, SymbolKind, UnitSymbols};
pub use error::LinkError;
pub use namespace::Namespace;
pub use rename::{RenameMap, SymbolKey};
pub use resolve::{DeclRef, GlobalNameTable, Resolver};

use rayon::prelude::*;
use strand_common::{Ident, InternalError, Interner};
use strand_config::{LinkConfig, RenamePolicy};
use strand_diagnostics::DiagnosticSink;
use strand_ir::{Design, TranslationUnit, TypeDb};
use tracing::{debug, info, trace};

/// What a successful link did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    /// Units merged.
    pub units: usize,
    /// Top-level operations erased because they were neither classes nor
    /// modules, counting nested operations.
    pub debris_erased: usize,
    /// External declarations erased.
    pub externs_erased: usize,
    /// Declarations that received a fresh name.
    pub renames_applied: usize,
    /// Top-level declarations in the merged unit.
    pub declarations: usize,
}

/// Links every unit of `design` into one.
///
/// On success `design.units` holds exactly the merged unit. On failure the
/// cause has been emitted to `sink` and no merged unit is produced.
pub fn link_design(
    design: &mut Design,
    config: &LinkConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<LinkSummary, LinkError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| InternalError::new(format!("failed to start link workers: {e}")))?;
    pool.install(|| link_in_pool(design, config, interner, sink))
}

fn link_in_pool(
    design: &mut Design,
    config: &LinkConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<LinkSummary, LinkError> {
    namespace::assign_unit_namespaces(&mut design.units, &config.namespace_prefix, interner);

    let symbols: Vec<UnitSymbols> = design.units.par_iter_mut().map(collect_symbols).collect();
    let debris_erased: usize = symbols.iter().map(|s| s.debris_erased).sum();
    debug!(
        units = design.units.len(),
        debris_erased,
        "collected symbols"
    );

    let renames = resolve_symbols(&design.units, &design.types, &symbols, config, interner, sink)?;
    debug!(renames = renames.len(), "resolved symbols");

    let remaps = rewrite::build_type_remaps(&mut design.types, design.units.len(), &renames);
    let stats: Vec<rewrite::RewriteStats> = design
        .units
        .par_iter_mut()
        .enumerate()
        .zip(remaps.par_iter())
        .map(|((index, unit), remap)| rewrite::rewrite_unit(index, unit, &renames, remap))
        .collect();
    let externs_erased: usize = stats.iter().map(|s| s.externs_erased).sum();
    let renames_applied: usize = stats.iter().map(|s| s.renames_applied).sum();
    debug!(externs_erased, renames_applied, "rewrote units");

    let units = std::mem::take(&mut design.units);
    let unit_count = units.len();
    let merged = merge::merge_units(units);

    if config.verify {
        verify_merged(&merged, design, interner, sink)?;
    }

    let summary = LinkSummary {
        units: unit_count,
        debris_erased,
        externs_erased,
        renames_applied,
        declarations: merged.body().len(),
    };
    design.units.push(merged);
    info!(
        units = summary.units,
        declarations = summary.declarations,
        renames = summary.renames_applied,
        "linked design"
    );
    Ok(summary)
}

/// Builds the global name tables and resolves modules, then classes,
/// stopping at the first failing name.
fn resolve_symbols(
    units: &[TranslationUnit],
    types: &TypeDb,
    symbols: &[UnitSymbols],
    config: &LinkConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<RenameMap, LinkError> {
    let mut namespace = Namespace::new();
    let mut classes = GlobalNameTable::new();
    let mut modules = GlobalNameTable::new();
    for (unit, unit_symbols) in symbols.iter().enumerate() {
        for entry in &unit_symbols.classes {
            classes.insert(entry.name, DeclRef { unit, op: entry.op });
            namespace.reserve(interner.resolve(entry.name));
        }
        for entry in &unit_symbols.modules {
            modules.insert(entry.name, DeclRef { unit, op: entry.op });
            namespace.reserve(interner.resolve(entry.name));
        }
    }
    debug!(
        modules = modules.len(),
        classes = classes.len(),
        collisions = modules.collisions().count() + classes.collisions().count(),
        "built global name tables"
    );

    let mut renames = RenameMap::new();
    if modules.is_empty() && classes.is_empty() {
        return Ok(renames);
    }
    let resolver = Resolver::new(units, types, interner, sink);
    for (name, decls) in modules.iter() {
        if resolver.resolve_modules(name, decls)? {
            for decl in renamed_occurrences(decls, config.rename_policy) {
                let fresh = namespace.allocate(interner.resolve(name), None);
                record_rename(&mut renames, *decl, name, &fresh, interner);
            }
        }
    }
    for (name, decls) in classes.iter() {
        if resolver.resolve_classes(name, decls)? {
            for decl in renamed_occurrences(decls, config.rename_policy) {
                let unit = units
                    .get(decl.unit)
                    .ok_or_else(|| InternalError::new(format!("missing unit #{}", decl.unit)))?;
                let tag = unit.namespace.ok_or_else(|| {
                    InternalError::new(format!("unit #{} has no namespace tag", decl.unit))
                })?;
                let fresh = namespace.allocate(interner.resolve(name), Some(interner.resolve(tag)));
                record_rename(&mut renames, *decl, name, &fresh, interner);
            }
        }
    }
    Ok(renames)
}

fn renamed_occurrences(decls: &[DeclRef], policy: RenamePolicy) -> &[DeclRef] {
    match policy {
        RenamePolicy::KeepFirst => decls.get(1..).unwrap_or(&[]),
        RenamePolicy::RenameAll => decls,
    }
}

fn record_rename(
    renames: &mut RenameMap,
    decl: DeclRef,
    name: Ident,
    fresh: &str,
    interner: &Interner,
) {
    trace!(
        unit = decl.unit,
        from = interner.resolve(name),
        to = fresh,
        "allocated fresh name"
    );
    renames.insert(decl.unit, name, interner.get_or_intern(fresh));
}

fn verify_merged(
    merged: &TranslationUnit,
    design: &Design,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<(), LinkError> {
    let errors = verify::verify_unit(merged, &design.types, interner);
    let Some(first) = errors.first() else {
        return Ok(());
    };
    let name = interner.resolve(first.name).to_string();
    debug!(errors = errors.len(), "linked design failed verification");
    sink.emit_all(errors.into_iter().map(|e| e.diagnostic));
    Err(LinkError::InvalidSymbolUse { name })
}
