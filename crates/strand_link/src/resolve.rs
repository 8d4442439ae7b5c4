//! Global symbol resolution (Phase B).
//!
//! Declarations of every unit are grouped by name. For each name the resolver
//! decides whether the occurrences are link-compatible and whether renaming is
//! needed to keep them apart. Classes and modules are resolved separately by
//! the same scheme: a name with external declarations is public and needs
//! exactly one structurally compatible definition; a name with only private
//! definitions is disambiguated by renaming.

use crate::collect::SymbolKind;
use crate::error::LinkError;
use crate::errors::{self, DefinitionSite};
use std::collections::HashMap;
use strand_common::{Ident, InternalError, Interner};
use strand_diagnostics::DiagnosticSink;
use strand_ir::{ClassDef, ModuleDef, OpId, OpKind, Operation, PortInfo, TranslationUnit, TypeDb, Visibility};
use strand_source::Span;

/// One occurrence of a name: the unit (by position) and its declaring op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclRef {
    /// Position of the owning unit in the design.
    pub unit: usize,
    /// The declaring operation.
    pub op: OpId,
}

/// Name to every declaration sharing it, across all units.
///
/// Names iterate in first-seen order, so resolution (and the fresh names it
/// hands out) is deterministic.
#[derive(Debug, Default)]
pub struct GlobalNameTable {
    order: Vec<Ident>,
    entries: HashMap<Ident, Vec<DeclRef>>,
}

impl GlobalNameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `decl` to the occurrences of `name`.
    pub fn insert(&mut self, name: Ident, decl: DeclRef) {
        let decls = self.entries.entry(name).or_default();
        if decls.is_empty() {
            self.order.push(name);
        }
        decls.push(decl);
    }

    /// Occurrences of `name`, in unit order.
    pub fn get(&self, name: Ident) -> &[DeclRef] {
        self.entries.get(&name).map_or(&[], Vec::as_slice)
    }

    /// Every name with its occurrences, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (Ident, &[DeclRef])> + '_ {
        self.order.iter().map(|&name| (name, self.get(name)))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no name was recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names with more than one occurrence.
    pub fn collisions(&self) -> impl Iterator<Item = Ident> + '_ {
        self.iter()
            .filter(|(_, decls)| decls.len() > 1)
            .map(|(name, _)| name)
    }
}

/// Read-only view of the design used while checking one name at a time.
pub struct Resolver<'a> {
    units: &'a [TranslationUnit],
    types: &'a TypeDb,
    interner: &'a Interner,
    sink: &'a DiagnosticSink,
}

enum ClassMismatch {
    Interface(String),
    Uncovered(Ident),
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over `units`.
    pub fn new(
        units: &'a [TranslationUnit],
        types: &'a TypeDb,
        interner: &'a Interner,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            units,
            types,
            interner,
            sink,
        }
    }

    fn op(&self, decl: DeclRef) -> Result<&'a Operation, InternalError> {
        let unit = self.units.get(decl.unit).ok_or_else(|| {
            InternalError::new(format!("declaration refers to missing unit #{}", decl.unit))
        })?;
        unit.ops.try_get(decl.op).ok_or_else(|| {
            InternalError::new(format!(
                "declaration refers to erased operation {} in unit #{}",
                decl.op.as_raw(),
                decl.unit
            ))
        })
    }

    /// Checks every module declaration of `name`.
    ///
    /// Returns whether the occurrences must be renamed apart. On failure the
    /// diagnostic has been emitted.
    pub fn resolve_modules(&self, name: Ident, decls: &[DeclRef]) -> Result<bool, LinkError> {
        let text = self.interner.resolve(name);
        let mut externs: Vec<(Span, &[PortInfo])> = Vec::new();
        let mut definitions: Vec<(Span, &ModuleDef)> = Vec::new();
        for &decl in decls {
            let op = self.op(decl)?;
            match &op.kind {
                OpKind::ModuleExtern(ext) => externs.push((op.span, ext.ports.as_slice())),
                OpKind::Module(def) => definitions.push((op.span, def)),
                _ => {
                    return Err(InternalError::new(format!(
                        "`{text}` collected as a module but is not one"
                    ))
                    .into())
                }
            }
        }

        let any_public = definitions
            .iter()
            .any(|(_, def)| def.visibility == Visibility::Public);
        if definitions.len() > 1 && any_public {
            let others: Vec<DefinitionSite> = definitions[1..]
                .iter()
                .map(|(span, def)| DefinitionSite {
                    span: *span,
                    public: def.visibility == Visibility::Public,
                })
                .collect();
            self.sink.emit(errors::error_ambiguous_public_module(
                text,
                definitions[0].0,
                &others,
            ));
            return Err(LinkError::AmbiguousPublicSymbol {
                name: text.to_string(),
            });
        }

        if externs.is_empty() {
            return Ok(definitions.len() != 1);
        }

        if definitions.len() != 1 {
            let extern_spans: Vec<Span> = externs.iter().map(|(span, _)| *span).collect();
            let def_spans: Vec<Span> = definitions.iter().map(|(span, _)| *span).collect();
            self.sink.emit(errors::error_unresolved_external(
                SymbolKind::Module,
                text,
                &extern_spans,
                &def_spans,
            ));
            return Err(LinkError::UnresolvableExternalReference {
                kind: SymbolKind::Module,
                name: text.to_string(),
                definitions: definitions.len(),
            });
        }

        let (def_span, def) = definitions[0];
        for (span, ports) in &externs {
            if let Some(detail) = self.port_mismatch(&def.ports, ports) {
                self.sink.emit(errors::error_declaration_mismatch(
                    SymbolKind::Module,
                    text,
                    *span,
                    def_span,
                    &detail,
                ));
                return Err(LinkError::StructuralMismatch {
                    kind: SymbolKind::Module,
                    name: text.to_string(),
                });
            }
        }
        Ok(false)
    }

    /// Checks every class declaration of `name`. Same contract as
    /// [`resolve_modules`](Self::resolve_modules).
    pub fn resolve_classes(&self, name: Ident, decls: &[DeclRef]) -> Result<bool, LinkError> {
        let text = self.interner.resolve(name);
        let mut externs: Vec<(Span, &ClassDef)> = Vec::new();
        let mut definitions: Vec<(Span, &ClassDef)> = Vec::new();
        for &decl in decls {
            let op = self.op(decl)?;
            match &op.kind {
                OpKind::ClassExtern(ext) => externs.push((op.span, ext)),
                OpKind::Class(def) => definitions.push((op.span, def)),
                _ => {
                    return Err(InternalError::new(format!(
                        "`{text}` collected as a class but is not one"
                    ))
                    .into())
                }
            }
        }

        if externs.is_empty() {
            return Ok(definitions.len() != 1);
        }

        if definitions.len() != 1 {
            let extern_spans: Vec<Span> = externs.iter().map(|(span, _)| *span).collect();
            let def_spans: Vec<Span> = definitions.iter().map(|(span, _)| *span).collect();
            self.sink.emit(errors::error_unresolved_external(
                SymbolKind::Class,
                text,
                &extern_spans,
                &def_spans,
            ));
            return Err(LinkError::UnresolvableExternalReference {
                kind: SymbolKind::Class,
                name: text.to_string(),
                definitions: definitions.len(),
            });
        }

        let (def_span, def) = definitions[0];
        for (span, decl) in &externs {
            match self.class_mismatch(def, decl) {
                None => {}
                Some(ClassMismatch::Interface(detail)) => {
                    self.sink.emit(errors::error_declaration_mismatch(
                        SymbolKind::Class,
                        text,
                        *span,
                        def_span,
                        &detail,
                    ));
                    return Err(LinkError::StructuralMismatch {
                        kind: SymbolKind::Class,
                        name: text.to_string(),
                    });
                }
                Some(ClassMismatch::Uncovered(field)) => {
                    let field = self.interner.resolve(field);
                    self.sink.emit(errors::error_incomplete_declaration(
                        text, field, *span, def_span,
                    ));
                    return Err(LinkError::IncompleteDeclaration {
                        name: text.to_string(),
                        field: field.to_string(),
                    });
                }
            }
        }
        Ok(false)
    }

    /// Describes the first difference between two port lists.
    fn port_mismatch(&self, def: &[PortInfo], decl: &[PortInfo]) -> Option<String> {
        if def.len() != decl.len() {
            return Some(format!(
                "the number of ports is not equal, {} vs {}",
                def.len(),
                decl.len()
            ));
        }
        let (index, (l, r)) = def
            .iter()
            .zip(decl)
            .enumerate()
            .find(|(_, (l, r))| l != r)?;
        let detail = if l.name != r.name {
            format!(
                "{index}-th port name is not equal, `{}` vs `{}`",
                self.interner.resolve(l.name),
                self.interner.resolve(r.name)
            )
        } else if l.direction != r.direction {
            format!(
                "{index}-th port direction is not equal, {} vs {}",
                l.direction.keyword(),
                r.direction.keyword()
            )
        } else {
            format!(
                "{index}-th port type is not equal, {} vs {}",
                self.types.display(l.ty, self.interner),
                self.types.display(r.ty, self.interner)
            )
        };
        Some(detail)
    }

    /// Compares an external class declaration against the definition.
    fn class_mismatch(&self, def: &ClassDef, decl: &ClassDef) -> Option<ClassMismatch> {
        if def.params.len() != decl.params.len() {
            return Some(ClassMismatch::Interface(format!(
                "the number of arguments is not equal, {} vs {}",
                def.params.len(),
                decl.params.len()
            )));
        }
        for (index, (l, r)) in def.params.iter().zip(&decl.params).enumerate() {
            if l.ty != r.ty {
                return Some(ClassMismatch::Interface(format!(
                    "{index}-th argument type is not equal, {} vs {}",
                    self.types.display(l.ty, self.interner),
                    self.types.display(r.ty, self.interner)
                )));
            }
        }
        for field in &decl.fields {
            let field_name = self.interner.resolve(field.name);
            match def.field(field.name) {
                None => {
                    return Some(ClassMismatch::Interface(format!(
                        "declaration has a field `{field_name}` but not found in its definition"
                    )))
                }
                Some(found) if found.ty != field.ty => {
                    return Some(ClassMismatch::Interface(format!(
                        "declaration has a field `{field_name}` but types don't match, {} vs {}",
                        self.types.display(found.ty, self.interner),
                        self.types.display(field.ty, self.interner)
                    )))
                }
                Some(_) => {}
            }
        }
        def.fields
            .iter()
            .find(|f| decl.field(f.name).is_none())
            .map(|f| ClassMismatch::Uncovered(f.name))
    }
}
