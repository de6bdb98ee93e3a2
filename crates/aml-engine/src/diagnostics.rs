//! Non-fatal warnings collected while parsing and generating.
//!
//! Nothing in the compiler fails on malformed markup. Irregularities are
//! recovered from and recorded as [`Diagnostic`]s, which callers may log or
//! show to an author previewing their own message.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A block was still open at end of input and was closed automatically.
    UnterminatedBlock,
    /// A closing tag matched a block deeper in the stack; the blocks above it
    /// were closed automatically.
    MismatchedClose,
    /// A closing tag matched no open block and was kept as text.
    StrayClose,
    /// An opening tag exceeded the nesting limit and was kept as text.
    DepthLimit,
    /// A chess move could not be applied.
    ChessMove,
    /// A chess position string was invalid.
    ChessPosition,
    /// A wiki link target does not exist yet.
    UnresolvedWikiLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Byte offset into the source text.
    pub offset: usize,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.offset, self.message)
    }
}
