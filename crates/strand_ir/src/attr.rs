//! Attributes attached to operations.

use serde::{Deserialize, Serialize};
use strand_common::Ident;

/// A constant attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribute {
    /// Integer constant.
    Int(i64),
    /// String constant.
    Str(String),
    /// Boolean constant.
    Bool(bool),
    /// Reference to a top-level symbol by name (`@adder`).
    SymbolRef(Ident),
    /// Ordered list of attributes.
    Array(Vec<Attribute>),
    /// Named attribute dictionary.
    Dict(Vec<NamedAttr>),
}

/// A `name = value` attribute entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAttr {
    /// Attribute key.
    pub name: Ident,
    /// Attribute value.
    pub value: Attribute,
}

impl NamedAttr {
    /// Creates an entry.
    pub fn new(name: Ident, value: Attribute) -> Self {
        Self { name, value }
    }
}

impl Attribute {
    /// Calls `f` on every symbol reference inside this attribute, descending
    /// through arrays and dictionaries.
    pub fn for_each_symbol_ref(&self, f: &mut impl FnMut(Ident)) {
        match self {
            Attribute::SymbolRef(name) => f(*name),
            Attribute::Array(items) => {
                for item in items {
                    item.for_each_symbol_ref(f);
                }
            }
            Attribute::Dict(entries) => {
                for entry in entries {
                    entry.value.for_each_symbol_ref(f);
                }
            }
            Attribute::Int(_) | Attribute::Str(_) | Attribute::Bool(_) => {}
        }
    }

    /// Mutable counterpart of [`for_each_symbol_ref`](Self::for_each_symbol_ref).
    pub fn for_each_symbol_ref_mut(&mut self, f: &mut impl FnMut(&mut Ident)) {
        match self {
            Attribute::SymbolRef(name) => f(name),
            Attribute::Array(items) => {
                for item in items {
                    item.for_each_symbol_ref_mut(f);
                }
            }
            Attribute::Dict(entries) => {
                for entry in entries {
                    entry.value.for_each_symbol_ref_mut(f);
                }
            }
            Attribute::Int(_) | Attribute::Str(_) | Attribute::Bool(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(a: Ident, b: Ident, key: Ident) -> Attribute {
        Attribute::Array(vec![
            Attribute::Int(3),
            Attribute::SymbolRef(a),
            Attribute::Dict(vec![NamedAttr::new(key, Attribute::SymbolRef(b))]),
        ])
    }

    #[test]
    fn collects_nested_refs() {
        let (a, b, key) = (Ident::from_raw(1), Ident::from_raw(2), Ident::from_raw(3));
        let mut seen = Vec::new();
        nested(a, b, key).for_each_symbol_ref(&mut |n| seen.push(n));
        assert_eq!(seen, vec![a, b]);
    }

    #[test]
    fn rewrites_nested_refs() {
        let (a, b, key) = (Ident::from_raw(1), Ident::from_raw(2), Ident::from_raw(3));
        let renamed = Ident::from_raw(9);
        let mut attr = nested(a, b, key);
        attr.for_each_symbol_ref_mut(&mut |n| {
            if *n == b {
                *n = renamed;
            }
        });
        assert_eq!(attr, nested(a, renamed, key));
    }

    #[test]
    fn constants_have_no_refs() {
        let mut count = 0;
        Attribute::Str("adder".into()).for_each_symbol_ref(&mut |_| count += 1);
        Attribute::Bool(true).for_each_symbol_ref(&mut |_| count += 1);
        assert_eq!(count, 0);
    }
}
