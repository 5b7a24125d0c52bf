//! Source locations handed over by the analysis engine.
//!
//! - `Span`: byte range in one source file
//! - `NodeRef`: the syntax node a diagnostic attaches to
//! - `SourceMap`: owns source text so spans can be rendered as `path:line:col`
//!
//! # Examples
//!
//! ```
//! # use devcap_foundation::span::*;
//! # use std::path::PathBuf;
//! let mut map = SourceMap::new();
//! let file_id = map.add_file(PathBuf::from("main.py"), "import log\nlog.add()".to_string());
//! let span = Span::new(file_id, 11, 14);
//!
//! assert_eq!(map.snippet(&span), Some("log"));
//! assert_eq!(map.line_col(&span), Some((2, 1)));
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Byte range in a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Index into `SourceMap` files
    pub file_id: u16,
    /// Byte offset of the first character
    pub start: u32,
    /// Byte offset one past the last character
    pub end: u32,
}

impl Span {
    pub fn new(file_id: u16, start: u32, end: u32) -> Self {
        Self {
            file_id,
            start,
            end,
        }
    }

    /// Length in bytes; zero for inverted ranges.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The syntax node a compatibility diagnostic is attached to.
///
/// `name` carries the identifier exactly as the user wrote it when the node
/// is a plain name (`pin_speaker` in `microbit.pin_speaker`). It is `None` for
/// any other node shape, such as a call or subscript expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NodeRef {
    /// A name node with its written identifier.
    pub fn name(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            name: Some(name.into()),
        }
    }

    /// Any node that is not a plain name.
    pub fn expr(span: Span) -> Self {
        Self { span, name: None }
    }

    /// The written identifier, if this node is a name node.
    pub fn written_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Source files referenced by spans.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

/// One source file with its line index.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
    /// Byte offset of each line start; `line_starts[0] == 0`
    line_starts: Vec<u32>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file and return the id spans should use for it.
    ///
    /// # Panics
    ///
    /// Panics if more than `u16::MAX` files are added.
    pub fn add_file(&mut self, path: PathBuf, source: String) -> u16 {
        let file_id = u16::try_from(self.files.len()).expect("too many source files");
        self.files.push(SourceFile::new(path, source));
        file_id
    }

    pub fn file(&self, span: &Span) -> Option<&SourceFile> {
        self.files.get(span.file_id as usize)
    }

    pub fn file_path(&self, span: &Span) -> Option<&Path> {
        self.file(span).map(|f| f.path.as_path())
    }

    /// Text covered by a span, if the span lies inside its file.
    pub fn snippet(&self, span: &Span) -> Option<&str> {
        self.file(span)?
            .source
            .get(span.start as usize..span.end as usize)
    }

    /// 1-based (line, column) of a span's start.
    ///
    /// `None` when the file is unknown or the span starts past its end.
    pub fn line_col(&self, span: &Span) -> Option<(u32, u32)> {
        let file = self.file(span)?;
        (span.start as usize <= file.source.len()).then(|| file.line_col(span.start))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl SourceFile {
    pub fn new(path: PathBuf, source: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self {
            path,
            source,
            line_starts,
        }
    }

    /// 1-based (line, column) for a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let column = offset - self.line_starts[line_index];
        (line_index as u32 + 1, column + 1)
    }

    /// Text of a 1-based line without its trailing newline.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let index = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(index)? as usize;
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| *next as usize - 1)
            .unwrap_or(self.source.len());
        self.source
            .get(start..end)
            .map(|text| text.trim_end_matches('\r'))
    }
}
