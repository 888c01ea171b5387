//! SystemVerilog lexing: the token vocabulary, token classifications used by
//! the formatter and equivalence checkers, and the logos-based tokenizer.

pub mod lexer;
pub mod tokens;

pub use lexer::{lex, lex_into_structure};
pub use tokens::{
    format_token_class, is_comment, is_whitespace, FormatTokenClass, TokenKind,
};
