//! The token value type.
//!
//! A token is a kind plus a half-open byte extent into an owning text, and
//! optionally a lexical-error tag. Tokens are copy-cheap values; the token
//! stored in a syntax-tree leaf is a separate copy of the one in the token
//! sequence, and mutations must be applied to both (see
//! [`TextStructureView::mutate_tokens`](super::text_structure::TextStructureView::mutate_tokens)).

use std::fmt;
use std::ops::Range;

use crate::lexing::tokens::TokenKind;

/// Classification of a malformed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexicalError {
    UnterminatedString,
    UnterminatedBlockComment,
    UnexpectedCharacter,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalError::UnterminatedString => write!(f, "unterminated string literal"),
            LexicalError::UnterminatedBlockComment => write!(f, "unterminated block comment"),
            LexicalError::UnexpectedCharacter => write!(f, "unexpected character"),
        }
    }
}

/// A typed token with a byte extent into its owning text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub extent: Range<usize>,
    pub error: Option<LexicalError>,
}

impl Token {
    pub fn new(kind: TokenKind, extent: Range<usize>) -> Self {
        Self {
            kind,
            extent,
            error: None,
        }
    }

    pub fn with_error(kind: TokenKind, extent: Range<usize>, error: LexicalError) -> Self {
        Self {
            kind,
            extent,
            error: Some(error),
        }
    }

    /// The EOF sentinel for a text of the given length.
    pub fn eof(end: usize) -> Self {
        Self::new(TokenKind::Eof, end..end)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Byte offset where the token begins.
    pub fn left(&self) -> usize {
        self.extent.start
    }

    /// Byte offset one past where the token ends.
    pub fn right(&self) -> usize {
        self.extent.end
    }

    pub fn len(&self) -> usize {
        self.extent.end - self.extent.start
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_empty()
    }

    /// The text this token denotes within `contents`.
    pub fn text<'t>(&self, contents: &'t str) -> &'t str {
        &contents[self.extent.clone()]
    }

    /// Compares kind and denoted text, ignoring location.
    pub fn equivalent_without_location(
        &self,
        contents: &str,
        other: &Token,
        other_contents: &str,
    ) -> bool {
        self.kind == other.kind && self.text(contents) == other.text(other_contents)
    }

    /// Shifts the extent left by `offset`; used when the owning text is
    /// narrowed to a substring.
    pub(crate) fn shift_left(&mut self, offset: usize) {
        self.extent = (self.extent.start - offset)..(self.extent.end - offset);
    }

    /// Shifts the extent right by `offset`; used when rebasing into a
    /// superstring.
    pub(crate) fn shift_right(&mut self, offset: usize) {
        self.extent = (self.extent.start + offset)..(self.extent.end + offset);
    }

    /// Renders the token with its denoted text for diagnostics.
    pub fn describe(&self, contents: &str) -> String {
        format!(
            "({:?} @{}..{}: \"{}\")",
            self.kind,
            self.extent.start,
            self.extent.end,
            self.text(contents).escape_debug()
        )
    }
}
