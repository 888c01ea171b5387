//! Raw tokenization using the logos lexer.
//!
//! This is the entry point where source strings become token streams. The
//! logos grammar stays small: identifiers are lexed as one pattern and
//! keywords are recognized by table lookup afterwards, and the two
//! unbounded-length forms (strings, block comments) are scanned by
//! callbacks. Malformed input never aborts the lexer; it yields tokens
//! tagged with a lexical-error class so that downstream analyses can carry
//! byte-accurate diagnostics.

use logos::{FilterResult, Logos};

use crate::text::text_structure::TextStructure;
use crate::text::token::{LexicalError, Token};
use crate::text::token_stream::{init_token_stream_view, TokenSequence};

use super::tokens::{is_comment, is_whitespace, keyword_kind, TokenKind};

fn lex_block_comment(lex: &mut logos::Lexer<RawToken>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(position) => {
            lex.bump(position + 2);
            FilterResult::Emit(())
        }
        None => {
            // Unterminated: consume to end of input, fail the token so the
            // driver can tag it.
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

fn lex_string_literal(lex: &mut logos::Lexer<RawToken>) -> FilterResult<(), ()> {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                lex.bump(i + 1);
                return FilterResult::Emit(());
            }
            b'\\' if i + 1 < bytes.len() => i += 2,
            b'\n' => break,
            _ => i += 1,
        }
    }
    lex.bump(i);
    FilterResult::Error(())
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\r]+")]
    Whitespace,
    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    EolComment,
    #[token("/*", lex_block_comment)]
    BlockComment,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_$]*")]
    Word,
    #[regex(r"\\[^ \t\r\n]+")]
    EscapedIdentifier,
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*")]
    SystemTfIdentifier,

    #[token("`define")]
    PpDefine,
    #[token("`ifdef")]
    PpIfdef,
    #[token("`ifndef")]
    PpIfndef,
    #[token("`else")]
    PpElse,
    #[token("`endif")]
    PpEndif,
    #[token("`include")]
    PpInclude,
    #[regex(r"`[a-zA-Z_][a-zA-Z0-9_]*")]
    MacroIdentifier,

    #[regex(r"[0-9][0-9_]*")]
    DecNumber,
    #[regex(r"'[sS]?[dDbBoOhH][0-9a-fA-FxXzZ_?]+")]
    BasedNumber,
    #[regex(r"'[01xXzZ]")]
    UnbasedNumber,
    #[token("\"", lex_string_literal)]
    StringLiteral,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("::")]
    ScopeRes,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("#")]
    Hash,
    #[token("@")]
    At,
    #[token("'")]
    Apostrophe,
    #[token("=")]
    Equals,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("===")]
    CaseEq,
    #[token("!==")]
    CaseNotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("**")]
    Power,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("->")]
    Arrow,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
}

fn kind_from_raw(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Whitespace => TokenKind::Whitespace,
        RawToken::Newline => TokenKind::Newline,
        RawToken::EolComment => TokenKind::EolComment,
        RawToken::BlockComment => TokenKind::BlockComment,
        RawToken::Word => keyword_kind(slice).unwrap_or(TokenKind::Identifier),
        RawToken::EscapedIdentifier => TokenKind::EscapedIdentifier,
        RawToken::SystemTfIdentifier => TokenKind::SystemTfIdentifier,
        RawToken::PpDefine => TokenKind::PpDefine,
        RawToken::PpIfdef => TokenKind::PpIfdef,
        RawToken::PpIfndef => TokenKind::PpIfndef,
        RawToken::PpElse => TokenKind::PpElse,
        RawToken::PpEndif => TokenKind::PpEndif,
        RawToken::PpInclude => TokenKind::PpInclude,
        RawToken::MacroIdentifier => TokenKind::MacroIdentifier,
        RawToken::DecNumber => TokenKind::DecNumber,
        RawToken::BasedNumber => TokenKind::BasedNumber,
        RawToken::UnbasedNumber => TokenKind::UnbasedNumber,
        RawToken::StringLiteral => TokenKind::StringLiteral,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::ScopeRes => TokenKind::ScopeRes,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Question => TokenKind::Question,
        RawToken::Hash => TokenKind::Hash,
        RawToken::At => TokenKind::At,
        RawToken::Apostrophe => TokenKind::Apostrophe,
        RawToken::Equals => TokenKind::Equals,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::CaseEq => TokenKind::CaseEq,
        RawToken::CaseNotEq => TokenKind::CaseNotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::OrOr => TokenKind::OrOr,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Power => TokenKind::Power,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
    }
}

// Failed matches keep their span; classify them by their leading text so
// the error class survives into the token stream.
fn error_token(slice: &str, extent: std::ops::Range<usize>) -> Token {
    if slice.starts_with("/*") {
        Token::with_error(
            TokenKind::BlockComment,
            extent,
            LexicalError::UnterminatedBlockComment,
        )
    } else if slice.starts_with('"') {
        Token::with_error(
            TokenKind::StringLiteral,
            extent,
            LexicalError::UnterminatedString,
        )
    } else {
        Token::with_error(
            TokenKind::Unexpected,
            extent,
            LexicalError::UnexpectedCharacter,
        )
    }
}

/// Tokenizes source text into a sequence terminated with an EOF sentinel.
/// Each token's extent is a byte range into `text`.
pub fn lex(text: &str) -> TokenSequence {
    let mut lexer = RawToken::lexer(text);
    let mut tokens = TokenSequence::new();
    while let Some(result) = lexer.next() {
        let extent = lexer.span();
        match result {
            Ok(raw) => tokens.push(Token::new(kind_from_raw(raw, lexer.slice()), extent)),
            Err(()) => tokens.push(error_token(lexer.slice(), extent)),
        }
    }
    tokens.push(Token::eof(text.len()));
    tokens
}

/// Lexes `text` into a fully initialized `TextStructure`: token sequence,
/// parser-facing filtered view (whitespace and comments removed), and
/// per-line token index.
pub fn lex_into_structure(text: &str) -> TextStructure {
    let mut structure = TextStructure::new(text);
    let view = structure.mutable_data();
    let tokens = lex(view.contents());
    *view.mutable_token_stream() = tokens;
    *view.mutable_token_stream_view() = init_token_stream_view(view.token_stream());
    view.filter_tokens(|t| !is_whitespace(t.kind) && !is_comment(t.kind));
    view.calculate_first_tokens_per_line();
    structure
}
