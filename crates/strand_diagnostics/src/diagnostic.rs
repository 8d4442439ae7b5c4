//! The [`Diagnostic`] value and its builder methods.

use crate::code::DiagnosticCode;
use crate::label::{Label, LabelStyle};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use strand_source::Span;

/// A user-facing message with a primary location and related locations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Stable code.
    pub code: DiagnosticCode,
    /// Main message.
    pub message: String,
    /// Location the message is about.
    pub primary_span: Span,
    /// Annotated locations, primary and secondary.
    pub labels: Vec<Label>,
    /// Free-form footnotes without a location.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            primary_span: span,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Creates an error.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Error, code, message, span)
    }

    /// Creates a warning.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Warning, code, message, span)
    }

    /// Appends a label.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Appends a secondary label at `span`.
    pub fn with_secondary(self, span: Span, message: impl Into<String>) -> Self {
        self.with_label(Label::secondary(span, message))
    }

    /// Appends a location-free note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Iterates over the secondary labels in insertion order.
    pub fn secondary_labels(&self) -> impl Iterator<Item = &Label> {
        self.labels
            .iter()
            .filter(|l| l.style == LabelStyle::Secondary)
    }
}
