//! The object-model IR consumed and produced by the linker.
//!
//! A [`Design`] is a list of [`TranslationUnit`]s plus a shared [`TypeDb`].
//! Each unit owns an [`Arena`] of [`Operation`]s addressed by stable [`OpId`]s;
//! top-level declarations are listed in the unit body, nested operations hang
//! off their parent's regions. Operation kinds form a closed sum type
//! ([`OpKind`]) so every traversal matches them exhaustively.

#![warn(missing_docs)]

pub mod arena;
pub mod attr;
pub mod design;
pub mod ids;
pub mod op;
pub mod types;
pub mod unit;

pub use arena::{Arena, ArenaId};
pub use attr::{Attribute, NamedAttr};
pub use design::Design;
pub use ids::{OpId, TypeId, UnitId};
pub use op::{
    ClassDef, ClassField, FormalParam, ModuleDef, ModuleExtern, OpKind, Operation, PortDirection,
    PortInfo, Visibility,
};
pub use types::{Type, TypeDb};
pub use unit::{TranslationUnit, WalkAction};
