//! Structured diagnostics: creation, accumulation and rendering.
//!
//! A [`Diagnostic`] carries a severity, a code, a message, a primary location
//! and any number of secondary [`Label`]s pointing at related locations (the
//! "declared here as well" notes of a link failure). Worker threads push
//! diagnostics into a shared [`DiagnosticSink`]; a [`DiagnosticRenderer`] turns
//! them into terminal text or JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
