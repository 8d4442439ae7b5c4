//! Diagnostic codes and builders for link failures.
//!
//! `E300`--`E304` are resolution failures; `E305`--`E307` come from the
//! post-link check of the merged unit.

use crate::collect::SymbolKind;
use strand_diagnostics::{Category, Diagnostic, DiagnosticCode};
use strand_source::Span;

/// Multiple public module definitions share a name.
pub const E300: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 300,
};

/// External declaration without a definition.
pub const E301: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 301,
};

/// External declaration with several definitions.
pub const E302: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 302,
};

/// Declaration interface differs from the definition.
pub const E303: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 303,
};

/// Definition field missing from a class declaration.
pub const E304: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 304,
};

/// Reference to a symbol the linked unit does not define.
pub const E305: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 305,
};

/// Object instantiation inconsistent with its class.
pub const E306: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 306,
};

/// Two top-level declarations of the linked unit share a name.
pub const E307: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 307,
};

/// A definition of a symbol, with whether it is public.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionSite {
    /// Where it is defined.
    pub span: Span,
    /// Public modules cannot be renamed.
    pub public: bool,
}

/// Several public modules share `name`. Reported at the first definition.
pub fn error_ambiguous_public_module(
    name: &str,
    first: Span,
    others: &[DefinitionSite],
) -> Diagnostic {
    let diag = Diagnostic::error(
        E300,
        format!(
            "module `{name}` is declared as a public module but there are multiple public modules defined with the same name"
        ),
        first,
    );
    others.iter().fold(diag, |diag, site| {
        let note = if site.public {
            format!("module `{name}` is declared here as public")
        } else {
            format!("module `{name}` is defined here")
        };
        diag.with_secondary(site.span, note)
    })
}

/// External declarations of `name` without exactly one definition. Reported
/// at the first external declaration.
pub fn error_unresolved_external(
    kind: SymbolKind,
    name: &str,
    externs: &[Span],
    definitions: &[Span],
) -> Diagnostic {
    let (code, reason) = if definitions.is_empty() {
        (E301, "there is no definition")
    } else {
        (E302, "there are multiple definitions")
    };
    let primary = externs.first().copied().unwrap_or(Span::DUMMY);
    let mut diag = Diagnostic::error(
        code,
        format!("{kind} `{name}` is declared as an external {kind} but {reason}"),
        primary,
    );
    for &span in externs.iter().skip(1) {
        diag = diag.with_secondary(span, format!("{kind} `{name}` is declared here as well"));
    }
    for &span in definitions {
        diag = diag.with_secondary(span, format!("{kind} `{name}` is defined here"));
    }
    diag
}

/// The declaration at `decl` disagrees with the definition at `def`.
pub fn error_declaration_mismatch(
    kind: SymbolKind,
    name: &str,
    decl: Span,
    def: Span,
    detail: &str,
) -> Diagnostic {
    Diagnostic::error(
        E303,
        format!("failed to link {kind} `{name}` since declaration doesn't match the definition: {detail}"),
        decl,
    )
    .with_secondary(def, "definition is here")
}

/// The class declaration at `decl` does not list `field` of the definition.
pub fn error_incomplete_declaration(name: &str, field: &str, decl: Span, def: Span) -> Diagnostic {
    Diagnostic::error(
        E304,
        format!(
            "failed to link class `{name}` since declaration doesn't match the definition: definition has a field `{field}` but not found in this declaration"
        ),
        decl,
    )
    .with_secondary(def, "definition is here")
}

/// A reference to `name` that nothing in the linked unit defines.
pub fn error_undefined_symbol(kind: &str, name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E305, format!("{kind} `{name}` is not defined in the linked design"), span)
}

/// An object instantiation of class `name` that does not fit the class.
pub fn error_object_mismatch(name: &str, detail: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E306, format!("object of class `{name}` {detail}"), span)
}

/// A second top-level declaration of `name` at `span`, the first being at
/// `first`.
pub fn error_duplicate_symbol(name: &str, span: Span, first: Span) -> Diagnostic {
    Diagnostic::error(E307, format!("symbol `{name}` is defined more than once in the linked design"), span)
        .with_secondary(first, "first definition is here")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_diagnostics::LabelStyle;
    use strand_source::FileId;

    fn span(n: u32) -> Span {
        Span::new(FileId::from_raw(0), n, n + 1)
    }

    #[test]
    fn code_formats() {
        assert_eq!(format!("{E300}"), "E300");
        assert_eq!(format!("{E306}"), "E306");
    }

    #[test]
    fn missing_definition_notes_other_externs() {
        let d = error_unresolved_external(SymbolKind::Module, "adder", &[span(1), span(2)], &[]);
        assert_eq!(d.code, E301);
        assert_eq!(
            d.message,
            "module `adder` is declared as an external module but there is no definition"
        );
        assert_eq!(d.primary_span, span(1));
        let notes: Vec<&str> = d.secondary_labels().map(|l| l.message.as_str()).collect();
        assert_eq!(notes, vec!["module `adder` is declared here as well"]);
    }

    #[test]
    fn multiple_definitions_note_every_definition() {
        let d = error_unresolved_external(SymbolKind::Class, "Foo", &[span(1)], &[span(5), span(6)]);
        assert_eq!(d.code, E302);
        assert!(d.message.ends_with("there are multiple definitions"));
        assert_eq!(d.secondary_labels().count(), 2);
        assert!(d.labels.iter().all(|l| l.style == LabelStyle::Secondary));
    }

    #[test]
    fn ambiguous_public_notes() {
        let d = error_ambiguous_public_module(
            "top",
            span(1),
            &[
                DefinitionSite {
                    span: span(2),
                    public: true,
                },
                DefinitionSite {
                    span: span(3),
                    public: false,
                },
            ],
        );
        assert_eq!(d.code, E300);
        let notes: Vec<&str> = d.secondary_labels().map(|l| l.message.as_str()).collect();
        assert_eq!(
            notes,
            vec![
                "module `top` is declared here as public",
                "module `top` is defined here"
            ]
        );
    }

    #[test]
    fn mismatch_points_at_definition() {
        let d = error_declaration_mismatch(
            SymbolKind::Module,
            "adder",
            span(1),
            span(9),
            "0-th port type is not equal, i8 vs i16",
        );
        assert_eq!(d.code, E303);
        assert!(d.message.contains("0-th port type is not equal"));
        let def = d.secondary_labels().next().unwrap();
        assert_eq!(def.span, span(9));
        assert_eq!(def.message, "definition is here");
    }

    #[test]
    fn incomplete_declaration_names_field() {
        let d = error_incomplete_declaration("Foo", "y", span(1), span(2));
        assert_eq!(d.code, E304);
        assert!(d.message.contains("definition has a field `y`"));
    }
}
