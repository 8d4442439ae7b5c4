//! Post-link check of symbol uses in the merged unit.
//!
//! After merging, top-level names must be unique, every class instantiation
//! must match a class definition, every class type must name a class that
//! survived, and every symbol reference attribute must name a top-level
//! declaration. Failures here mean some rename was applied to the wrong
//! unit, or a reference escaped renaming or pointed at an erased external
//! stub.

use crate::errors;
use std::collections::HashMap;
use strand_common::{Ident, Interner};
use strand_diagnostics::Diagnostic;
use strand_ir::{ClassDef, OpKind, Operation, TranslationUnit, Type, TypeDb, TypeId};
use strand_source::Span;

/// One invalid use found by [`verify_unit`].
#[derive(Debug, Clone)]
pub struct SymbolUseError {
    /// The symbol that was misused or is missing.
    pub name: Ident,
    /// Ready-to-emit diagnostic.
    pub diagnostic: Diagnostic,
}

struct Verifier<'a> {
    types: &'a TypeDb,
    interner: &'a Interner,
    symbols: HashMap<Ident, Span>,
    classes: HashMap<Ident, &'a ClassDef>,
    errors: Vec<SymbolUseError>,
}

/// Checks every operation of `unit`, in pre-order.
pub fn verify_unit(unit: &TranslationUnit, types: &TypeDb, interner: &Interner) -> Vec<SymbolUseError> {
    let mut verifier = Verifier {
        types,
        interner,
        symbols: HashMap::new(),
        classes: HashMap::new(),
        errors: Vec::new(),
    };
    for (_, op) in unit.top_level() {
        if let Some(name) = op.symbol_name() {
            if let Some(&first) = verifier.symbols.get(&name) {
                let text = interner.resolve(name);
                verifier.report(name, errors::error_duplicate_symbol(text, op.span, first));
                continue;
            }
            verifier.symbols.insert(name, op.span);
        }
        if let OpKind::Class(def) = &op.kind {
            verifier.classes.insert(def.name, def);
        }
    }
    unit.walk(&mut |_, op| verifier.check(op));
    verifier.errors
}

impl<'a> Verifier<'a> {
    fn report(&mut self, name: Ident, diagnostic: Diagnostic) {
        self.errors.push(SymbolUseError { name, diagnostic });
    }

    fn check(&mut self, op: &Operation) {
        let mut reported = Vec::new();
        if let OpKind::Object {
            class_name,
            actual_params,
        } = &op.kind
        {
            if !self.check_object(op, *class_name, actual_params) {
                reported.push(*class_name);
            }
        }

        let mut missing_classes = Vec::new();
        op.for_each_type(&mut |ty| {
            self.types.for_each_class(ty, &mut |name| {
                if !self.classes.contains_key(&name)
                    && !reported.contains(&name)
                    && !missing_classes.contains(&name)
                {
                    missing_classes.push(name);
                }
            })
        });
        for name in missing_classes {
            let text = self.interner.resolve(name);
            self.report(name, errors::error_undefined_symbol("class", text, op.span));
        }

        let mut missing_symbols = Vec::new();
        for attr in &op.attrs {
            attr.value.for_each_symbol_ref(&mut |name| {
                if !self.symbols.contains_key(&name) && !missing_symbols.contains(&name) {
                    missing_symbols.push(name);
                }
            });
        }
        for name in missing_symbols {
            let text = self.interner.resolve(name);
            self.report(name, errors::error_undefined_symbol("symbol", text, op.span));
        }
    }

    /// Returns `false` if the class itself is missing.
    fn check_object(&mut self, op: &Operation, class_name: Ident, actuals: &[TypeId]) -> bool {
        let text = self.interner.resolve(class_name);
        let Some(class) = self.classes.get(&class_name).copied() else {
            self.report(class_name, errors::error_undefined_symbol("class", text, op.span));
            return false;
        };

        if class.params.len() != actuals.len() {
            let detail = format!(
                "takes {} parameters but {} were given",
                class.params.len(),
                actuals.len()
            );
            self.report(class_name, errors::error_object_mismatch(text, &detail, op.span));
        } else if let Some((index, (formal, &actual))) = class
            .params
            .iter()
            .zip(actuals)
            .enumerate()
            .find(|(_, (formal, actual))| formal.ty != **actual)
        {
            let detail = format!(
                "expects {} for parameter {index} but got {}",
                self.types.display(formal.ty, self.interner),
                self.types.display(actual, self.interner)
            );
            self.report(class_name, errors::error_object_mismatch(text, &detail, op.span));
        }

        let expected = self.types.lookup(&Type::Class { name: class_name });
        let result_ok = match op.result_types.as_slice() {
            [result] => Some(*result) == expected,
            _ => false,
        };
        if !result_ok {
            let produced: Vec<String> = op
                .result_types
                .iter()
                .map(|&ty| self.types.display(ty, self.interner))
                .collect();
            let detail = format!(
                "must produce `class<@{text}>` but produces `{}`",
                produced.join(", ")
            );
            self.report(class_name, errors::error_object_mismatch(text, &detail, op.span));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{E305, E306, E307};
    use strand_ir::{Attribute, FormalParam, ModuleDef, UnitId, Visibility};
    use strand_source::{FileId, Span};

    struct Fixture {
        interner: Interner,
        types: TypeDb,
        unit: TranslationUnit,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                interner: Interner::new(),
                types: TypeDb::new(),
                unit: TranslationUnit::new(UnitId::from_raw(0), Span::DUMMY),
            }
        }

        fn ident(&self, s: &str) -> Ident {
            self.interner.get_or_intern(s)
        }

        fn class_with_param(&mut self, name: &str) -> (Ident, TypeId, TypeId) {
            let name = self.ident(name);
            let int = self.types.intern(Type::Integer);
            let class_ty = self.types.intern(Type::Class { name });
            let def = ClassDef {
                name,
                params: vec![FormalParam {
                    name: self.ident("width"),
                    ty: int,
                }],
                fields: Vec::new(),
            };
            self.unit.push(Operation::class(def, Span::DUMMY));
            (name, int, class_ty)
        }

        fn verify(&self) -> Vec<SymbolUseError> {
            verify_unit(&self.unit, &self.types, &self.interner)
        }
    }

    #[test]
    fn well_formed_object_passes() {
        let mut fx = Fixture::new();
        let (foo, int, foo_ty) = fx.class_with_param("Foo");
        fx.unit.push(Operation::object(foo, vec![int], foo_ty, Span::DUMMY));
        assert!(fx.verify().is_empty());
    }

    #[test]
    fn missing_class_reported_once() {
        let mut fx = Fixture::new();
        let ghost = fx.ident("Ghost");
        let ghost_ty = fx.types.intern(Type::Class { name: ghost });
        fx.unit.push(Operation::object(ghost, Vec::new(), ghost_ty, Span::DUMMY));
        let errors = fx.verify();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].name, ghost);
        assert_eq!(errors[0].diagnostic.code, E305);
        assert_eq!(
            errors[0].diagnostic.message,
            "class `Ghost` is not defined in the linked design"
        );
    }

    #[test]
    fn parameter_count_mismatch() {
        let mut fx = Fixture::new();
        let (foo, _, foo_ty) = fx.class_with_param("Foo");
        fx.unit.push(Operation::object(foo, Vec::new(), foo_ty, Span::DUMMY));
        let errors = fx.verify();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].diagnostic.code, E306);
        assert!(errors[0].diagnostic.message.ends_with("takes 1 parameters but 0 were given"));
    }

    #[test]
    fn parameter_type_mismatch() {
        let mut fx = Fixture::new();
        let (foo, _, foo_ty) = fx.class_with_param("Foo");
        let s = fx.types.intern(Type::Str);
        fx.unit.push(Operation::object(foo, vec![s], foo_ty, Span::DUMMY));
        let errors = fx.verify();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .diagnostic
            .message
            .ends_with("expects integer for parameter 0 but got string"));
    }

    #[test]
    fn wrong_result_type() {
        let mut fx = Fixture::new();
        let (foo, int, _) = fx.class_with_param("Foo");
        fx.unit.push(Operation::object(foo, vec![int], int, Span::DUMMY));
        let errors = fx.verify();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .diagnostic
            .message
            .ends_with("must produce `class<@Foo>` but produces `integer`"));
    }

    #[test]
    fn dangling_symbol_ref() {
        let mut fx = Fixture::new();
        let inst = fx.unit.alloc(
            Operation::generic(fx.ident("hw.instance"), Span::DUMMY)
                .with_attr(fx.ident("moduleName"), Attribute::SymbolRef(fx.ident("adder"))),
        );
        fx.unit.push(
            Operation::module(
                ModuleDef {
                    name: fx.ident("top"),
                    visibility: Visibility::Public,
                    ports: Vec::new(),
                },
                Span::DUMMY,
            )
            .with_region(vec![inst]),
        );
        let errors = fx.verify();
        assert_eq!(errors.len(), 1);
        assert_eq!(fx.interner.resolve(errors[0].name), "adder");
        assert_eq!(
            errors[0].diagnostic.message,
            "symbol `adder` is not defined in the linked design"
        );
    }

    #[test]
    fn dangling_class_type() {
        let mut fx = Fixture::new();
        let ghost = fx.ident("Ghost");
        let ghost_ty = fx.types.intern(Type::Class { name: ghost });
        let list = fx.types.intern(Type::List { element: ghost_ty });
        fx.unit
            .push(Operation::generic(fx.ident("om.constant"), Span::DUMMY).with_result(list));
        let errors = fx.verify();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].name, ghost);
    }

    #[test]
    fn duplicate_top_level_name() {
        let mut fx = Fixture::new();
        let module = |fx: &Fixture, start| {
            Operation::module(
                ModuleDef {
                    name: fx.ident("mux2"),
                    visibility: Visibility::Private,
                    ports: Vec::new(),
                },
                Span::new(FileId::from_raw(0), start, start + 4),
            )
        };
        let first = module(&fx, 0);
        let second = module(&fx, 10);
        fx.unit.push(first);
        fx.unit.push(second);
        let errors = fx.verify();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].diagnostic.code, E307);
        assert_eq!(errors[0].diagnostic.primary_span.start, 10);
        let note = errors[0].diagnostic.secondary_labels().next().unwrap();
        assert_eq!(note.span.start, 0);
    }
}
