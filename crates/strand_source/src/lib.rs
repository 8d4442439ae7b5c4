//! Source locations for IR operations and diagnostics.
//!
//! Every operation in a translation unit carries a [`Span`] pointing back into
//! the file it was loaded from. The [`SourceDb`] owns the file text and turns
//! spans into line/column positions when diagnostics are rendered.

#![warn(missing_docs)]

pub mod source_db;
pub mod span;

pub use source_db::{ResolvedSpan, SourceDb, SourceFile};
pub use span::{FileId, Span};
