//! Operations and their kinds.
//!
//! Top-level declarations (classes, hardware modules and their external
//! stubs) and nested operations share one [`Operation`] type; the closed
//! [`OpKind`] sum type carries the kind-specific payload.

use crate::attr::{Attribute, NamedAttr};
use crate::ids::{OpId, TypeId};
use serde::{Deserialize, Serialize};
use strand_common::Ident;
use strand_source::Span;

/// Visibility of a module definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Visible to other units; never silently renamed.
    Public,
    /// Local to its unit; may be renamed to resolve collisions.
    Private,
}

/// Direction of a module port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Data flows into the module.
    Input,
    /// Data flows out of the module.
    Output,
    /// Bidirectional.
    InOut,
}

impl PortDirection {
    /// Keyword used in the textual IR.
    pub fn keyword(self) -> &'static str {
        match self {
            PortDirection::Input => "in",
            PortDirection::Output => "out",
            PortDirection::InOut => "inout",
        }
    }
}

/// One entry of a module port list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    /// Port name.
    pub name: Ident,
    /// Port direction.
    pub direction: PortDirection,
    /// Port type.
    pub ty: TypeId,
}

impl PortInfo {
    /// Creates a port.
    pub fn new(name: Ident, direction: PortDirection, ty: TypeId) -> Self {
        Self {
            name,
            direction,
            ty,
        }
    }
}

/// A formal parameter of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalParam {
    /// Parameter name.
    pub name: Ident,
    /// Parameter type.
    pub ty: TypeId,
}

/// A named, typed field of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassField {
    /// Field name.
    pub name: Ident,
    /// Field type.
    pub ty: TypeId,
    /// Where the field is declared.
    pub span: Span,
}

/// Interface of a class: used both by definitions and by external stubs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Symbol name.
    pub name: Ident,
    /// Formal parameters in order.
    pub params: Vec<FormalParam>,
    /// Fields in declaration order.
    pub fields: Vec<ClassField>,
}

impl ClassDef {
    /// Finds the field called `name`.
    pub fn field(&self, name: Ident) -> Option<&ClassField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A hardware module definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDef {
    /// Symbol name.
    pub name: Ident,
    /// Public or private.
    pub visibility: Visibility,
    /// Ports in order.
    pub ports: Vec<PortInfo>,
}

/// An external hardware module stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleExtern {
    /// Symbol name.
    pub name: Ident,
    /// Ports in order.
    pub ports: Vec<PortInfo>,
}

/// Kind-specific payload of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    /// Class definition with a body.
    Class(ClassDef),
    /// External class declaration; interface only.
    ClassExtern(ClassDef),
    /// Hardware module definition.
    Module(ModuleDef),
    /// External hardware module declaration.
    ModuleExtern(ModuleExtern),
    /// Instantiation of a class by name.
    Object {
        /// Name of the instantiated class.
        class_name: Ident,
        /// Types of the actual parameters, in order.
        actual_params: Vec<TypeId>,
    },
    /// Any other operation, identified by its opcode.
    Generic {
        /// Opcode name, e.g. `hw.instance`.
        opcode: Ident,
    },
}

/// One node of the IR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Kind and payload.
    pub kind: OpKind,
    /// Source location.
    pub span: Span,
    /// Attribute dictionary.
    pub attrs: Vec<NamedAttr>,
    /// Result value types.
    pub result_types: Vec<TypeId>,
    /// Nested regions, each an ordered list of child operations.
    pub regions: Vec<Vec<OpId>>,
}

impl Operation {
    fn with_kind(kind: OpKind, span: Span) -> Self {
        Self {
            kind,
            span,
            attrs: Vec::new(),
            result_types: Vec::new(),
            regions: Vec::new(),
        }
    }

    /// A class definition.
    pub fn class(def: ClassDef, span: Span) -> Self {
        Self::with_kind(OpKind::Class(def), span)
    }

    /// An external class declaration.
    pub fn class_extern(decl: ClassDef, span: Span) -> Self {
        Self::with_kind(OpKind::ClassExtern(decl), span)
    }

    /// A module definition.
    pub fn module(def: ModuleDef, span: Span) -> Self {
        Self::with_kind(OpKind::Module(def), span)
    }

    /// An external module declaration.
    pub fn module_extern(decl: ModuleExtern, span: Span) -> Self {
        Self::with_kind(OpKind::ModuleExtern(decl), span)
    }

    /// An object instantiation producing a value of type `result`.
    pub fn object(class_name: Ident, actual_params: Vec<TypeId>, result: TypeId, span: Span) -> Self {
        Self::with_kind(
            OpKind::Object {
                class_name,
                actual_params,
            },
            span,
        )
        .with_result(result)
    }

    /// An operation of any other kind.
    pub fn generic(opcode: Ident, span: Span) -> Self {
        Self::with_kind(OpKind::Generic { opcode }, span)
    }

    /// Adds an attribute.
    pub fn with_attr(mut self, name: Ident, value: Attribute) -> Self {
        self.attrs.push(NamedAttr::new(name, value));
        self
    }

    /// Adds a result type.
    pub fn with_result(mut self, ty: TypeId) -> Self {
        self.result_types.push(ty);
        self
    }

    /// Adds a region holding `children`.
    pub fn with_region(mut self, children: Vec<OpId>) -> Self {
        self.regions.push(children);
        self
    }

    /// Looks up an attribute by key.
    pub fn attr(&self, name: Ident) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    /// Symbol name of a class or module declaration.
    pub fn symbol_name(&self) -> Option<Ident> {
        match &self.kind {
            OpKind::Class(def) | OpKind::ClassExtern(def) => Some(def.name),
            OpKind::Module(def) => Some(def.name),
            OpKind::ModuleExtern(decl) => Some(decl.name),
            OpKind::Object { .. } | OpKind::Generic { .. } => None,
        }
    }

    /// Replaces the symbol name of a declaration. No effect on other kinds.
    pub fn set_symbol_name(&mut self, name: Ident) {
        match &mut self.kind {
            OpKind::Class(def) | OpKind::ClassExtern(def) => def.name = name,
            OpKind::Module(def) => def.name = name,
            OpKind::ModuleExtern(decl) => decl.name = name,
            OpKind::Object { .. } | OpKind::Generic { .. } => {}
        }
    }

    /// Returns `true` for external class and module declarations.
    pub fn is_extern(&self) -> bool {
        matches!(self.kind, OpKind::ClassExtern(_) | OpKind::ModuleExtern(_))
    }

    /// Calls `f` on every type slot of this operation: results, ports,
    /// parameters, fields and object arguments.
    pub fn for_each_type_mut(&mut self, f: &mut impl FnMut(&mut TypeId)) {
        for ty in &mut self.result_types {
            f(ty);
        }
        match &mut self.kind {
            OpKind::Class(def) | OpKind::ClassExtern(def) => {
                for param in &mut def.params {
                    f(&mut param.ty);
                }
                for field in &mut def.fields {
                    f(&mut field.ty);
                }
            }
            OpKind::Module(ModuleDef { ports, .. }) | OpKind::ModuleExtern(ModuleExtern { ports, .. }) => {
                for port in ports {
                    f(&mut port.ty);
                }
            }
            OpKind::Object { actual_params, .. } => {
                for ty in actual_params {
                    f(ty);
                }
            }
            OpKind::Generic { .. } => {}
        }
    }

    /// Read-only counterpart of [`for_each_type_mut`](Self::for_each_type_mut).
    pub fn for_each_type(&self, f: &mut impl FnMut(TypeId)) {
        self.result_types.iter().for_each(|&ty| f(ty));
        match &self.kind {
            OpKind::Class(def) | OpKind::ClassExtern(def) => {
                def.params.iter().for_each(|p| f(p.ty));
                def.fields.iter().for_each(|field| f(field.ty));
            }
            OpKind::Module(ModuleDef { ports, .. }) | OpKind::ModuleExtern(ModuleExtern { ports, .. }) => {
                ports.iter().for_each(|p| f(p.ty));
            }
            OpKind::Object { actual_params, .. } => actual_params.iter().for_each(|&ty| f(ty)),
            OpKind::Generic { .. } => {}
        }
    }

    /// Calls `f` on every symbol reference among the attributes.
    pub fn for_each_symbol_ref_mut(&mut self, f: &mut impl FnMut(&mut Ident)) {
        for attr in &mut self.attrs {
            attr.value.for_each_symbol_ref_mut(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> Ident {
        Ident::from_raw(n)
    }

    fn adder_ports() -> Vec<PortInfo> {
        let i8 = TypeId::from_raw(0);
        vec![
            PortInfo::new(id(10), PortDirection::Input, i8),
            PortInfo::new(id(11), PortDirection::Input, i8),
            PortInfo::new(id(12), PortDirection::Output, i8),
        ]
    }

    #[test]
    fn symbol_names() {
        let module = Operation::module(
            ModuleDef {
                name: id(1),
                visibility: Visibility::Private,
                ports: adder_ports(),
            },
            Span::DUMMY,
        );
        let stub = Operation::module_extern(
            ModuleExtern {
                name: id(1),
                ports: adder_ports(),
            },
            Span::DUMMY,
        );
        let generic = Operation::generic(id(2), Span::DUMMY);
        assert_eq!(module.symbol_name(), Some(id(1)));
        assert_eq!(stub.symbol_name(), Some(id(1)));
        assert_eq!(generic.symbol_name(), None);
        assert!(stub.is_extern());
        assert!(!module.is_extern());
    }

    #[test]
    fn rename_declaration() {
        let mut class = Operation::class(
            ClassDef {
                name: id(1),
                params: Vec::new(),
                fields: Vec::new(),
            },
            Span::DUMMY,
        );
        class.set_symbol_name(id(7));
        assert_eq!(class.symbol_name(), Some(id(7)));

        let mut generic = Operation::generic(id(2), Span::DUMMY);
        generic.set_symbol_name(id(7));
        assert_eq!(generic.kind, OpKind::Generic { opcode: id(2) });
    }

    #[test]
    fn type_slots_cover_payload_and_results() {
        let mut op = Operation::class(
            ClassDef {
                name: id(1),
                params: vec![FormalParam {
                    name: id(2),
                    ty: TypeId::from_raw(1),
                }],
                fields: vec![ClassField {
                    name: id(3),
                    ty: TypeId::from_raw(2),
                    span: Span::DUMMY,
                }],
            },
            Span::DUMMY,
        )
        .with_result(TypeId::from_raw(3));
        let mut seen = Vec::new();
        op.for_each_type_mut(&mut |ty| seen.push(ty.as_raw()));
        assert_eq!(seen, vec![3, 1, 2]);

        let mut read_only = Vec::new();
        op.for_each_type(&mut |ty| read_only.push(ty.as_raw()));
        assert_eq!(read_only, seen);
    }

    #[test]
    fn object_builder() {
        let obj = Operation::object(
            id(1),
            vec![TypeId::from_raw(0)],
            TypeId::from_raw(4),
            Span::DUMMY,
        );
        assert_eq!(obj.result_types, vec![TypeId::from_raw(4)]);
        assert!(matches!(obj.kind, OpKind::Object { class_name, .. } if class_name == id(1)));
    }

    #[test]
    fn attribute_lookup_and_refs() {
        let mut op = Operation::generic(id(1), Span::DUMMY)
            .with_attr(id(2), Attribute::SymbolRef(id(5)))
            .with_attr(id(3), Attribute::Int(4));
        assert_eq!(op.attr(id(3)), Some(&Attribute::Int(4)));
        assert!(op.attr(id(9)).is_none());
        op.for_each_symbol_ref_mut(&mut |n| *n = id(6));
        assert_eq!(op.attr(id(2)), Some(&Attribute::SymbolRef(id(6))));
    }

    #[test]
    fn direction_keywords() {
        assert_eq!(PortDirection::Input.keyword(), "in");
        assert_eq!(PortDirection::Output.keyword(), "out");
        assert_eq!(PortDirection::InOut.keyword(), "inout");
    }
}
