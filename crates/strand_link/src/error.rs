//! The typed failure returned by [`link_design`](crate::link_design).

use crate::collect::SymbolKind;
use strand_common::InternalError;

/// Why a link run produced no output.
///
/// The matching diagnostic, with every contributing location, has already
/// been emitted to the sink when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// Several public module definitions share a name.
    #[error("module `{name}` has multiple public definitions")]
    AmbiguousPublicSymbol {
        /// The shared name.
        name: String,
    },

    /// External declarations exist but the definition count is not one.
    #[error("{kind} `{name}` is declared as external but has {definitions} definitions")]
    UnresolvableExternalReference {
        /// Class or module.
        kind: SymbolKind,
        /// The declared name.
        name: String,
        /// How many definitions were found.
        definitions: usize,
    },

    /// An external declaration disagrees with the definition's interface.
    #[error("{kind} `{name}` declaration doesn't match the definition")]
    StructuralMismatch {
        /// Class or module.
        kind: SymbolKind,
        /// The declared name.
        name: String,
    },

    /// A class definition has a field an external declaration does not list.
    #[error("declaration of class `{name}` does not cover field `{field}`")]
    IncompleteDeclaration {
        /// Class name.
        name: String,
        /// The uncovered field.
        field: String,
    },

    /// The merged unit refers to a symbol it does not define, defines a
    /// top-level name twice, or instantiates a class with the wrong
    /// parameters.
    #[error("invalid use of symbol `{name}` in the linked design")]
    InvalidSymbolUse {
        /// The offending symbol.
        name: String,
    },

    /// A linker invariant did not hold.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
