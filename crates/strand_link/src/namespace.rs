//! Collision-free name allocation for one linking run.

use std::collections::{HashMap, HashSet};
use strand_common::{Ident, Interner};
use strand_ir::TranslationUnit;

/// Registry of every name claimed during a link.
///
/// Every existing class and module name is reserved before resolution starts,
/// so a fresh name never shadows a declaration from another unit.
#[derive(Debug, Default)]
pub struct Namespace {
    taken: HashSet<String>,
    next_index: HashMap<String, usize>,
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` as taken. Reserving twice is harmless.
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// Returns `true` if `name` has been reserved or allocated.
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Returns `base` if it is free, otherwise the first free candidate of
    /// `base_suffix`, `base_suffix_0`, `base_suffix_1`, ... (with a suffix) or
    /// `base_0`, `base_1`, ... (without). The result is reserved before it is
    /// returned.
    pub fn allocate(&mut self, base: &str, suffix: Option<&str>) -> String {
        if self.claim(base) {
            return base.to_string();
        }
        let stem = match suffix {
            Some(suffix) => {
                let candidate = format!("{base}_{suffix}");
                if self.claim(&candidate) {
                    return candidate;
                }
                candidate
            }
            None => base.to_string(),
        };
        loop {
            let index = self.next_index.entry(stem.clone()).or_insert(0);
            let candidate = format!("{stem}_{index}");
            *index += 1;
            if self.claim(&candidate) {
                return candidate;
            }
        }
    }

    fn claim(&mut self, name: &str) -> bool {
        if self.taken.contains(name) {
            return false;
        }
        self.taken.insert(name.to_string());
        true
    }
}

/// Gives every unit without a namespace tag the tag `<prefix>_<n>`, counting
/// only untagged units, in unit order.
pub fn assign_unit_namespaces(units: &mut [TranslationUnit], prefix: &str, interner: &Interner) {
    let mut counter = 0usize;
    for unit in units.iter_mut().filter(|u| u.namespace.is_none()) {
        let tag: Ident = interner.get_or_intern(&format!("{prefix}_{counter}"));
        unit.namespace = Some(tag);
        counter += 1;
    }
}
