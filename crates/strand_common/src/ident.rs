//! Interned identifiers for symbol names, field names and opcodes.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// An interned name.
///
/// Every symbol, port, field and opcode name in the IR is an `Ident`: a `u32`
/// key into the session [`Interner`]. Comparing two names is a single integer
/// comparison, which is what makes the global symbol tables of the linker cheap
/// to build.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Creates an `Ident` from a raw key. Intended for deserialization and tests.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw key.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `try_from_usize` only produces keys that fit in a `u32`, and
// `into_usize` is the inverse of that conversion.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Thread-safe string interner shared by all phases of a linking session.
///
/// The collector and rewriter read it from worker threads; the resolver
/// interns freshly allocated names into it from the single resolution thread.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns `s`, returning the existing key if it was seen before.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Returns the key for `s` without interning it.
    pub fn get(&self, s: &str) -> Option<Ident> {
        self.rodeo.get(s)
    }

    /// Resolves an [`Ident`] back to its text.
    ///
    /// # Panics
    ///
    /// Panics if `ident` was not produced by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }

    /// Returns the number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let interner = Interner::new();
        let a = interner.get_or_intern("adder");
        let b = interner.get_or_intern("adder");
        assert_eq!(a, b);
        assert_eq!(interner.resolve(a), "adder");
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn get_does_not_intern() {
        let interner = Interner::new();
        assert!(interner.get("mux2").is_none());
        assert!(interner.is_empty());
        let id = interner.get_or_intern("mux2");
        assert_eq!(interner.get("mux2"), Some(id));
    }

    #[test]
    fn distinct_names_distinct_keys() {
        let interner = Interner::new();
        assert_ne!(
            interner.get_or_intern("Foo"),
            interner.get_or_intern("Foo_ns")
        );
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;

        let interner = Arc::new(Interner::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let interner = Arc::clone(&interner);
                std::thread::spawn(move || interner.get_or_intern("shared"))
            })
            .collect();
        let ids: Vec<Ident> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn serde_keeps_raw_key() {
        let id = Ident::from_raw(17);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "17");
        let back: Ident = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_raw(), 17);
    }
}
