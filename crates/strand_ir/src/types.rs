//! Interned value types of the object model.
//!
//! Every type in a design is interned into the shared [`TypeDb`], so two
//! occurrences of the same type always carry the same [`TypeId`] and structural
//! comparisons of port and field lists reduce to id comparisons.

use crate::ids::TypeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strand_common::{Ident, Interner};

/// A value type carried by ports, fields, parameters and operation results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A fixed-width hardware integer (`i8`, `si16`).
    Int {
        /// Bit width.
        width: u32,
        /// Signedness.
        signed: bool,
    },
    /// An arbitrary-precision integer.
    Integer,
    /// A boolean.
    Bool,
    /// A string.
    Str,
    /// A homogeneous list.
    List {
        /// Element type.
        element: TypeId,
    },
    /// A key/value map.
    Map {
        /// Key type.
        key: TypeId,
        /// Value type.
        value: TypeId,
    },
    /// A fixed tuple of types.
    Tuple {
        /// Element types in order.
        elements: Vec<TypeId>,
    },
    /// An instance of the named class. Renaming a class rewrites this name.
    Class {
        /// Symbol name of the class.
        name: Ident,
    },
    /// A hierarchical path into the instance tree.
    Path,
    /// Any value.
    Any,
}

/// Central store of interned types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Type>", from = "Vec<Type>")]
pub struct TypeDb {
    types: Vec<Type>,
    lookup: HashMap<Type, TypeId>,
}

impl TypeDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `ty`, returning the existing id if an identical type is present.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.lookup.get(&ty) {
            return id;
        }
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(ty.clone());
        self.lookup.insert(ty, id);
        id
    }

    /// Returns the id of `ty` if it was interned before.
    pub fn lookup(&self, ty: &Type) -> Option<TypeId> {
        self.lookup.get(ty).copied()
    }

    /// Returns the type behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of bounds.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.as_raw() as usize]
    }

    /// Ids of every interned type, in interning order.
    pub fn ids(&self) -> impl Iterator<Item = TypeId> {
        (0..self.types.len() as u32).map(TypeId::from_raw)
    }

    /// Returns the number of interned types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Rebuilds `id` with every class name `n` replaced by `rename(n)` where it
    /// returns `Some`. Returns `id` itself when no class name inside it changes.
    pub fn substitute_classes(
        &mut self,
        id: TypeId,
        rename: &mut impl FnMut(Ident) -> Option<Ident>,
    ) -> TypeId {
        let rebuilt = match self.get(id).clone() {
            Type::Class { name } => match rename(name) {
                Some(new_name) if new_name != name => Type::Class { name: new_name },
                _ => return id,
            },
            Type::List { element } => {
                let new = self.substitute_classes(element, rename);
                if new == element {
                    return id;
                }
                Type::List { element: new }
            }
            Type::Map { key, value } => {
                let new_key = self.substitute_classes(key, rename);
                let new_value = self.substitute_classes(value, rename);
                if new_key == key && new_value == value {
                    return id;
                }
                Type::Map {
                    key: new_key,
                    value: new_value,
                }
            }
            Type::Tuple { elements } => {
                let new: Vec<TypeId> = elements
                    .iter()
                    .map(|&e| self.substitute_classes(e, rename))
                    .collect();
                if new == elements {
                    return id;
                }
                Type::Tuple { elements: new }
            }
            Type::Int { .. } | Type::Integer | Type::Bool | Type::Str | Type::Path | Type::Any => {
                return id
            }
        };
        self.intern(rebuilt)
    }

    /// Calls `f` for every class name mentioned anywhere inside `id`.
    pub fn for_each_class(&self, id: TypeId, f: &mut impl FnMut(Ident)) {
        match self.get(id) {
            Type::Class { name } => f(*name),
            Type::List { element } => self.for_each_class(*element, f),
            Type::Map { key, value } => {
                self.for_each_class(*key, f);
                self.for_each_class(*value, f);
            }
            Type::Tuple { elements } => {
                for &e in elements {
                    self.for_each_class(e, f);
                }
            }
            Type::Int { .. } | Type::Integer | Type::Bool | Type::Str | Type::Path | Type::Any => {}
        }
    }

    /// Renders `id` in the textual IR form, e.g. `list<class<@Foo>>`.
    pub fn display(&self, id: TypeId, interner: &Interner) -> String {
        match self.get(id) {
            Type::Int { width, signed } => {
                format!("{}i{width}", if *signed { "s" } else { "" })
            }
            Type::Integer => "integer".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Str => "string".to_string(),
            Type::List { element } => format!("list<{}>", self.display(*element, interner)),
            Type::Map { key, value } => format!(
                "map<{}, {}>",
                self.display(*key, interner),
                self.display(*value, interner)
            ),
            Type::Tuple { elements } => {
                let parts: Vec<String> = elements
                    .iter()
                    .map(|&e| self.display(e, interner))
                    .collect();
                format!("tuple<{}>", parts.join(", "))
            }
            Type::Class { name } => format!("class<@{}>", interner.resolve(*name)),
            Type::Path => "path".to_string(),
            Type::Any => "any".to_string(),
        }
    }
}

impl From<TypeDb> for Vec<Type> {
    fn from(db: TypeDb) -> Self {
        db.types
    }
}

impl From<Vec<Type>> for TypeDb {
    fn from(types: Vec<Type>) -> Self {
        let lookup = types
            .iter()
            .enumerate()
            .map(|(i, ty)| (ty.clone(), TypeId::from_raw(i as u32)))
            .collect();
        Self { types, lookup }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const I8: Type = Type::Int {
        width: 8,
        signed: false,
    };

    #[test]
    fn intern_deduplicates() {
        let mut db = TypeDb::new();
        let a = db.intern(I8);
        let b = db.intern(I8);
        assert_eq!(a, b);
        assert_eq!(db.len(), 1);
        assert_eq!(*db.get(a), I8);
    }

    #[test]
    fn lookup_does_not_intern() {
        let mut db = TypeDb::new();
        assert!(db.lookup(&Type::Bool).is_none());
        let id = db.intern(Type::Bool);
        assert_eq!(db.lookup(&Type::Bool), Some(id));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn substitute_nested_class() {
        let interner = Interner::new();
        let foo = interner.get_or_intern("Foo");
        let foo_b = interner.get_or_intern("Foo_b");
        let mut db = TypeDb::new();
        let class = db.intern(Type::Class { name: foo });
        let list = db.intern(Type::List { element: class });

        let renamed = db.substitute_classes(list, &mut |n| (n == foo).then_some(foo_b));
        assert_ne!(renamed, list);
        assert_eq!(db.display(renamed, &interner), "list<class<@Foo_b>>");
        assert_eq!(db.display(list, &interner), "list<class<@Foo>>");
    }

    #[test]
    fn substitute_without_match_keeps_id() {
        let interner = Interner::new();
        let foo = interner.get_or_intern("Foo");
        let bar = interner.get_or_intern("Bar");
        let mut db = TypeDb::new();
        let i8 = db.intern(I8);
        let class = db.intern(Type::Class { name: foo });
        let map = db.intern(Type::Map {
            key: i8,
            value: class,
        });
        let before = db.len();
        assert_eq!(
            db.substitute_classes(map, &mut |n| (n == bar).then_some(foo)),
            map
        );
        assert_eq!(db.len(), before);
    }

    #[test]
    fn for_each_class_visits_tuple_members() {
        let interner = Interner::new();
        let a = interner.get_or_intern("A");
        let b = interner.get_or_intern("B");
        let mut db = TypeDb::new();
        let ca = db.intern(Type::Class { name: a });
        let cb = db.intern(Type::Class { name: b });
        let list = db.intern(Type::List { element: cb });
        let tuple = db.intern(Type::Tuple {
            elements: vec![ca, list],
        });
        let mut seen = Vec::new();
        db.for_each_class(tuple, &mut |n| seen.push(n));
        assert_eq!(seen, vec![a, b]);
    }

    #[test]
    fn display_forms() {
        let interner = Interner::new();
        let mut db = TypeDb::new();
        let si16 = db.intern(Type::Int {
            width: 16,
            signed: true,
        });
        let s = db.intern(Type::Str);
        let tuple = db.intern(Type::Tuple {
            elements: vec![si16, s],
        });
        assert_eq!(db.display(si16, &interner), "si16");
        assert_eq!(db.display(tuple, &interner), "tuple<si16, string>");
    }

    #[test]
    fn serde_rebuilds_lookup() {
        let mut db = TypeDb::new();
        let i8 = db.intern(I8);
        let list = db.intern(Type::List { element: i8 });
        let json = serde_json::to_string(&db).unwrap();
        let mut back: TypeDb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.intern(Type::List { element: i8 }), list);
        assert_eq!(back.len(), 2);
    }
}
