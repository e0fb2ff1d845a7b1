//! file: core/src/location.rs
//! description: source positions and the location resolver.
//!
//! `Location` is a resolved (file, line, column) triple. Syntax tree nodes
//! only carry a byte `TextRange` recorded by the parser; `SourceMap` turns
//! those ranges into `Location`s for the first and last token of a node.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize)]
pub struct Location {
    /// The file in which the location is found.
    pub file: String,
    /// The line number of the location (1-based).
    pub line: usize,
    /// The column number of the location (1-based).
    pub column: usize,
}

impl Location {
    /// Creates a new `Location`.
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self { file: file.into(), line, column }
    }

    /// A location inside `file` that does not point at any token.
    pub fn unknown(file: impl Into<String>) -> Self {
        Self::new(file, 0, 0)
    }

    pub fn is_unknown(&self) -> bool {
        self.line == 0
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize)]
pub struct Span {
    /// The location of the first token.
    pub start: Location,
    /// The location of the last token (its first character).
    pub end: Location,
}

impl Span {
    /// Creates a new `Span` from two `Location`s.
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Byte range of a node in the source text.
///
/// `start..end` is the half-open extent of the node as matched by the
/// grammar and may run over trailing whitespace and comments. `last` is the
/// offset of the first byte of the node's last token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TextRange {
    pub start: usize,
    pub last: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, last: usize, end: usize) -> Self {
        Self { start, last, end }
    }

    /// Smallest range covering both inputs, if both are known. The last token
    /// is taken from whichever range reaches further.
    pub fn join(a: Option<TextRange>, b: Option<TextRange>) -> Option<TextRange> {
        match (a, b) {
            (Some(a), Some(b)) => {
                let last = if b.end >= a.end { b.last } else { a.last };
                Some(TextRange::new(a.start.min(b.start), last, a.end.max(b.end)))
            }
            _ => None,
        }
    }
}

/// Anything that remembers where it came from in the source.
pub trait Located {
    fn range(&self) -> Option<TextRange>;
}

/// Maps byte offsets to `Location`s.
///
/// The map is read-only once built, so one instance can serve a whole
/// compilation.
#[derive(Debug, Clone)]
pub struct SourceMap<'src> {
    file: String,
    text: &'src str,
}

impl<'src> SourceMap<'src> {
    pub fn new(file: impl Into<String>, text: &'src str) -> Self {
        SourceMap { file: file.into(), text }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Resolve a byte offset into a line/column location. Offsets past the
    /// end clamp to the end of the text; offsets inside a character are
    /// unknown.
    pub fn location(&self, offset: usize) -> Location {
        match pest::Position::new(self.text, offset.min(self.text.len())) {
            Some(position) => {
                let (line, column) = position.line_col();
                Location::new(self.file.clone(), line, column)
            }
            None => Location::unknown(self.file.clone()),
        }
    }

    /// Location of the first token of `node`.
    pub fn start_loc(&self, node: &impl Located) -> Location {
        match node.range() {
            Some(range) => self.location(range.start),
            None => Location::unknown(self.file.clone()),
        }
    }

    /// Location of the last token of `node`.
    pub fn end_loc(&self, node: &impl Located) -> Location {
        match node.range() {
            Some(range) => self.location(range.last),
            None => Location::unknown(self.file.clone()),
        }
    }

    pub fn span(&self, node: &impl Located) -> Span {
        Span::new(self.start_loc(node), self.end_loc(node))
    }
}
