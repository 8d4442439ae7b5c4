//! Shared foundational types used across the Strand linker toolchain.
//!
//! This crate provides interned symbol identifiers and the internal error type
//! that every other crate uses to report compiler bugs.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, Interner};
pub use result::{InternalError, StrandResult};
