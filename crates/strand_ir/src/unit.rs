//! Translation units: independently produced containers of declarations.

use crate::arena::Arena;
use crate::ids::{OpId, UnitId};
use crate::op::Operation;
use serde::{Deserialize, Serialize};
use strand_common::Ident;
use strand_source::Span;

/// What a mutable walk does after visiting an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Descend into the operation's regions.
    Advance,
    /// Keep the operation but do not visit its children.
    Skip,
    /// Erase the operation together with everything nested inside it.
    Erase,
}

/// One translation unit.
///
/// Operations live in the unit's own arena so that units can be mutated
/// independently (and in parallel). `body` lists the top-level declarations
/// in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Identity within the design.
    pub id: UnitId,
    /// Namespace tag used to derive fresh names for renamed classes.
    pub namespace: Option<Ident>,
    /// Location of the unit wrapper.
    pub span: Span,
    /// Every live operation of the unit.
    pub ops: Arena<OpId, Operation>,
    /// Top-level operations in order.
    pub body: Vec<OpId>,
}

impl TranslationUnit {
    /// Creates an empty unit.
    pub fn new(id: UnitId, span: Span) -> Self {
        Self {
            id,
            namespace: None,
            span,
            ops: Arena::new(),
            body: Vec::new(),
        }
    }

    /// Sets the namespace tag.
    pub fn with_namespace(mut self, namespace: Ident) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Appends a top-level operation.
    pub fn push(&mut self, op: Operation) -> OpId {
        let id = self.ops.alloc(op);
        self.body.push(id);
        id
    }

    /// Allocates a nested operation. The caller links it into a parent region.
    pub fn alloc(&mut self, op: Operation) -> OpId {
        self.ops.alloc(op)
    }

    /// Returns the operation behind `id`.
    pub fn op(&self, id: OpId) -> &Operation {
        &self.ops[id]
    }

    /// Returns the operation behind `id` mutably.
    pub fn op_mut(&mut self, id: OpId) -> &mut Operation {
        &mut self.ops[id]
    }

    /// Top-level operation ids in order.
    pub fn body(&self) -> &[OpId] {
        &self.body
    }

    /// Top-level operations in order.
    pub fn top_level(&self) -> impl Iterator<Item = (OpId, &Operation)> {
        self.body.iter().map(|&id| (id, &self.ops[id]))
    }

    /// Number of live operations at every nesting depth.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if the unit has no top-level operations.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Erases `id` and its nested operations, unlinking it from the body or
    /// from its parent region. Returns the number of operations removed.
    pub fn erase(&mut self, id: OpId) -> usize {
        if !self.ops.contains(id) {
            return 0;
        }
        let removed = self.erase_subtree(id);
        self.body.retain(|&op| op != id);
        let parents: Vec<OpId> = self
            .ops
            .iter()
            .filter(|(_, op)| op.regions.iter().any(|r| r.contains(&id)))
            .map(|(parent, _)| parent)
            .collect();
        for parent in parents {
            for region in &mut self.ops[parent].regions {
                region.retain(|&op| op != id);
            }
        }
        removed
    }

    fn erase_subtree(&mut self, id: OpId) -> usize {
        let Some(op) = self.ops.remove(id) else {
            return 0;
        };
        1 + op
            .regions
            .into_iter()
            .flatten()
            .map(|child| self.erase_subtree(child))
            .sum::<usize>()
    }

    /// Visits every operation once in pre-order, body first, letting `f`
    /// decide per operation whether to descend, skip or erase it.
    ///
    /// Erased operations are unlinked from their parent before the walk
    /// returns. Returns the number of operations removed.
    pub fn walk_mut(&mut self, mut f: impl FnMut(OpId, &mut Operation) -> WalkAction) -> usize {
        let body = std::mem::take(&mut self.body);
        let mut erased = 0;
        self.body = self.walk_list(body, &mut f, &mut erased);
        erased
    }

    fn walk_list(
        &mut self,
        list: Vec<OpId>,
        f: &mut impl FnMut(OpId, &mut Operation) -> WalkAction,
        erased: &mut usize,
    ) -> Vec<OpId> {
        let mut kept = Vec::with_capacity(list.len());
        for id in list {
            match f(id, &mut self.ops[id]) {
                WalkAction::Erase => *erased += self.erase_subtree(id),
                WalkAction::Skip => kept.push(id),
                WalkAction::Advance => {
                    let regions = std::mem::take(&mut self.ops[id].regions);
                    let regions = regions
                        .into_iter()
                        .map(|region| self.walk_list(region, f, erased))
                        .collect();
                    self.ops[id].regions = regions;
                    kept.push(id);
                }
            }
        }
        kept
    }

    /// Visits every operation once in pre-order without mutating anything.
    pub fn walk(&self, f: &mut impl FnMut(OpId, &Operation)) {
        for &id in &self.body {
            self.walk_from(id, f);
        }
    }

    fn walk_from(&self, id: OpId, f: &mut impl FnMut(OpId, &Operation)) {
        let op = &self.ops[id];
        f(id, op);
        for &child in op.regions.iter().flatten() {
            self.walk_from(child, f);
        }
    }

    /// Moves every top-level operation of `other`, with everything nested
    /// inside it, to the end of this unit's body. Relative order is kept.
    pub fn splice(&mut self, mut other: TranslationUnit) {
        let body = std::mem::take(&mut other.body);
        for id in body {
            if let Some(moved) = self.adopt(&mut other, id) {
                self.body.push(moved);
            }
        }
    }

    fn adopt(&mut self, other: &mut TranslationUnit, id: OpId) -> Option<OpId> {
        let mut op = other.ops.remove(id)?;
        op.regions = std::mem::take(&mut op.regions)
            .into_iter()
            .map(|region| {
                region
                    .into_iter()
                    .filter_map(|child| self.adopt(other, child))
                    .collect()
            })
            .collect();
        Some(self.ops.alloc(op))
    }
}
