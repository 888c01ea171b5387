//! Factories for constructing fake (but valid) text structures in tests,
//! without running a lexer or parser.

use crate::lexing::tokens::{is_comment, is_whitespace, TokenKind};

use super::text_structure::TextStructure;
use super::token::Token;
use super::token_stream::{init_token_stream_view, TokenSequence};

pub fn make_token(kind: TokenKind, lo: usize, hi: usize) -> Token {
    Token::new(kind, lo..hi)
}

/// Builds a token sequence from `(kind, lo, hi)` triples. No EOF is
/// appended; use [`make_text_structure`] for a fully terminated structure.
pub fn make_tokens(specs: &[(TokenKind, usize, usize)]) -> TokenSequence {
    specs
        .iter()
        .map(|&(kind, lo, hi)| make_token(kind, lo, hi))
        .collect()
}

/// Builds a consistent `TextStructure` over `text` from `(kind, lo, hi)`
/// triples: appends the EOF sentinel, installs a filtered view (whitespace
/// and comments removed), and computes the per-line token index.
pub fn make_text_structure(text: &str, specs: &[(TokenKind, usize, usize)]) -> TextStructure {
    let mut structure = TextStructure::new(text);
    let length = text.len();
    let view = structure.mutable_data();
    *view.mutable_token_stream() = make_tokens(specs);
    view.mutable_token_stream().push(Token::eof(length));
    *view.mutable_token_stream_view() = init_token_stream_view(view.token_stream());
    view.filter_tokens(|t| !is_whitespace(t.kind) && !is_comment(t.kind));
    view.calculate_first_tokens_per_line();
    structure
        .internal_consistency_check()
        .expect("factory-built structure is consistent");
    structure
}
