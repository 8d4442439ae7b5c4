//! The set of source files loaded in a session, with line/column lookup.

use crate::span::{FileId, Span};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// One loaded file.
pub struct SourceFile {
    /// Identifier within the owning [`SourceDb`].
    pub id: FileId,
    /// Path on disk, or a synthetic name for in-memory sources.
    pub path: PathBuf,
    /// Full file text.
    pub content: String,
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                content
                    .bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// Converts a byte offset to a 1-based `(line, column)` pair.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        (line as u32 + 1, offset - self.line_starts[line] + 1)
    }

    /// Returns the full text of the line containing `offset`, without the newline.
    pub fn line_text(&self, offset: u32) -> &str {
        let (line, _) = self.line_col(offset);
        let start = self.line_starts[line as usize - 1] as usize;
        let end = self
            .line_starts
            .get(line as usize)
            .map_or(self.content.len(), |&next| next as usize - 1);
        self.content[start..end].trim_end_matches('\r')
    }
}

/// A span resolved to a path and 1-based line/column coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Path of the file.
    pub file_path: PathBuf,
    /// Line of the first byte.
    pub line: u32,
    /// Column of the first byte.
    pub col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path.display(), self.line, self.col)
    }
}

/// Owns every source file of a linking session.
#[derive(Default)]
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a file from disk and registers it.
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_source(path, content))
    }

    /// Registers in-memory text under `name`.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, name.into(), content));
        id
    }

    /// Returns the file with the given id, or `None` for dummy/unknown ids.
    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.as_raw() as usize)
    }

    /// Resolves the start of `span` to line/column coordinates.
    ///
    /// Returns `None` for dummy spans and spans into unknown files.
    pub fn resolve_span(&self, span: Span) -> Option<ResolvedSpan> {
        let file = self.file(span.file)?;
        let (line, col) = file.line_col(span.start);
        Some(ResolvedSpan {
            file_path: file.path.clone(),
            line,
            col,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT_A: &str = "module {\n  hw.module.extern @adder(in %a: i8)\n}\n";

    #[test]
    fn line_col_lookup() {
        let mut db = SourceDb::new();
        let id = db.add_source("a.mlir", UNIT_A.to_string());
        let file = db.file(id).unwrap();
        assert_eq!(file.line_col(0), (1, 1));
        assert_eq!(file.line_col(9), (2, 1));
        assert_eq!(file.line_col(11), (2, 3));
    }

    #[test]
    fn line_text_strips_newline() {
        let mut db = SourceDb::new();
        let id = db.add_source("a.mlir", UNIT_A.to_string());
        let file = db.file(id).unwrap();
        assert_eq!(file.line_text(11), "  hw.module.extern @adder(in %a: i8)");
        assert_eq!(file.line_text(0), "module {");
    }

    #[test]
    fn resolve_span_display() {
        let mut db = SourceDb::new();
        let id = db.add_source("units/a.mlir", UNIT_A.to_string());
        let resolved = db.resolve_span(Span::new(id, 11, 20)).unwrap();
        assert_eq!(resolved.to_string(), "units/a.mlir:2:3");
    }

    #[test]
    fn dummy_span_does_not_resolve() {
        let db = SourceDb::new();
        assert!(db.resolve_span(Span::DUMMY).is_none());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.mlir");
        std::fs::write(&path, "om.class @Foo() {}\n").unwrap();
        let mut db = SourceDb::new();
        let id = db.load_file(&path).unwrap();
        assert_eq!(db.file(id).unwrap().content, "om.class @Foo() {}\n");
    }
}
