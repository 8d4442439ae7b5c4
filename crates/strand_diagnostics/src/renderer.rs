//! Text and JSON rendering of diagnostics.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use std::fmt::Write;
use strand_source::{SourceDb, Span};

/// Formats one diagnostic for output.
pub trait DiagnosticRenderer {
    /// Renders `diag`, resolving locations through `source_db`.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// Rustc-style rendering:
///
/// ```text
/// error[E301]: module `adder` is declared as an external module but there is no definition
///   --> units/a.mlir:4:3
///    |
///  4 |   hw.module.extern @adder(in %a: i8)
///    |   ^^^^^^^^^^^^^^^^
/// note: module `adder` is declared here as well
///   --> units/b.mlir:2:3
/// ```
pub struct TerminalRenderer {
    /// Wrap severities in ANSI colour codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, ansi: &str) -> String {
        if self.color {
            format!("\x1b[{ansi}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn location(&self, out: &mut String, span: Span, source_db: &SourceDb, caption: &str) {
        let Some(resolved) = source_db.resolve_span(span) else {
            return;
        };
        let _ = writeln!(out, "  --> {resolved}");
        let Some(file) = source_db.file(span.file) else {
            return;
        };
        let gutter = resolved.line.to_string();
        let pad = " ".repeat(gutter.len());
        let carets = "^".repeat(span.len().max(1) as usize);
        let indent = " ".repeat(resolved.col as usize - 1);
        let _ = writeln!(out, "{pad} |");
        let _ = writeln!(out, "{gutter} | {}", file.line_text(span.start));
        if caption.is_empty() {
            let _ = writeln!(out, "{pad} | {indent}{carets}");
        } else {
            let _ = writeln!(out, "{pad} | {indent}{carets} {caption}");
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();
        let header = format!("{}[{}]", diag.severity, diag.code);
        let header = if diag.severity.is_error() {
            self.paint(&header, "1;31")
        } else {
            self.paint(&header, "1;33")
        };
        let _ = writeln!(out, "{header}: {}", diag.message);

        let caption = diag
            .labels
            .iter()
            .find(|l| l.style == LabelStyle::Primary)
            .map(|l| l.message.as_str())
            .unwrap_or("");
        self.location(&mut out, diag.primary_span, source_db, caption);

        for label in diag.secondary_labels() {
            let _ = writeln!(out, "{}: {}", self.paint("note", "1;36"), label.message);
            self.location(&mut out, label.span, source_db, "");
        }
        for note in &diag.notes {
            let _ = writeln!(out, "   = note: {note}");
        }
        out
    }
}

/// Renders each diagnostic as one JSON object, for editors and CI tooling.
///
/// Locations are emitted both as raw spans and, when resolvable, as
/// `path:line:col` strings.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let location = |span: Span| {
            source_db
                .resolve_span(span)
                .map(|r| serde_json::Value::String(r.to_string()))
                .unwrap_or(serde_json::Value::Null)
        };
        let labels: Vec<serde_json::Value> = diag
            .labels
            .iter()
            .map(|l| {
                serde_json::json!({
                    "style": l.style,
                    "message": l.message,
                    "span": l.span,
                    "location": location(l.span),
                })
            })
            .collect();
        serde_json::json!({
            "severity": diag.severity.to_string(),
            "code": diag.code.to_string(),
            "message": diag.message,
            "span": diag.primary_span,
            "location": location(diag.primary_span),
            "labels": labels,
            "notes": diag.notes,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::label::Label;

    const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

    fn two_file_db() -> (SourceDb, Span, Span) {
        let mut db = SourceDb::new();
        let a = db.add_source(
            "a.mlir",
            "module {\n  hw.module.extern @adder(in %a: i8)\n}\n".to_string(),
        );
        let b = db.add_source(
            "b.mlir",
            "module {\n  hw.module.extern @adder(in %a: i8)\n}\n".to_string(),
        );
        (db, Span::new(a, 11, 27), Span::new(b, 11, 27))
    }

    #[test]
    fn terminal_shows_primary_and_notes() {
        let (db, first, second) = two_file_db();
        let diag = Diagnostic::error(
            E301,
            "module `adder` is declared as an external module but there is no definition",
            first,
        )
        .with_secondary(second, "module `adder` is declared here as well");

        let out = TerminalRenderer::new(false).render(&diag, &db);
        assert!(out.starts_with("error[E301]: module `adder`"));
        assert!(out.contains("--> a.mlir:2:3"));
        assert!(out.contains("note: module `adder` is declared here as well"));
        assert!(out.contains("--> b.mlir:2:3"));
        assert!(out.contains("^^^^^^^^^^^^^^^^"));
    }

    #[test]
    fn terminal_skips_dummy_locations() {
        let db = SourceDb::new();
        let diag = Diagnostic::error(E301, "no location", Span::DUMMY)
            .with_note("synthesized by a pass");
        let out = TerminalRenderer::new(false).render(&diag, &db);
        assert!(!out.contains("-->"));
        assert!(out.contains("= note: synthesized by a pass"));
    }

    #[test]
    fn terminal_color_codes() {
        let db = SourceDb::new();
        let diag = Diagnostic::error(E301, "x", Span::DUMMY);
        let out = TerminalRenderer::new(true).render(&diag, &db);
        assert!(out.starts_with("\x1b[1;31merror[E301]\x1b[0m"));
    }

    #[test]
    fn json_is_parseable() {
        let (db, first, second) = two_file_db();
        let diag = Diagnostic::error(E301, "missing definition", first)
            .with_label(Label::primary(first, "declared here"))
            .with_secondary(second, "and here");
        let out = JsonRenderer.render(&diag, &db);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["code"], "E301");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["location"], "a.mlir:2:3");
        assert_eq!(value["labels"].as_array().unwrap().len(), 2);
        assert_eq!(value["labels"][1]["location"], "b.mlir:2:3");
    }
}
