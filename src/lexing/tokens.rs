//! Token vocabulary and classification predicates.
//!
//! `TokenKind` is the full set of token types that can appear in a token
//! stream, covering the SystemVerilog subset this crate lexes plus a few
//! kinds that are only synthesized downstream (EOF, the macro-call closing
//! parenthesis marker). Keywords are recognized from identifier text by
//! lookup rather than in the lexer grammar, which keeps the raw lexer small.
//!
//! The classification predicates here drive the spacing annotator and the
//! equivalence presets; they are the single source of truth for questions
//! like "is this token whitespace" or "does this token open a group".

use serde::{Deserialize, Serialize};

/// Every kind of token a `TokenSequence` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Layout
    Whitespace,
    Newline,

    // Comments
    EolComment,
    BlockComment,

    // Identifiers and literals
    Identifier,
    EscapedIdentifier,
    SystemTfIdentifier,
    MacroIdentifier,
    DecNumber,
    BasedNumber,
    UnbasedNumber,
    StringLiteral,

    // Keywords
    Module,
    Endmodule,
    Begin,
    End,
    If,
    Else,
    For,
    Case,
    Endcase,
    Default,
    Function,
    Endfunction,
    Task,
    Endtask,
    Assign,
    Wire,
    Reg,
    Logic,
    Parameter,
    Localparam,
    Typedef,
    Struct,
    Enum,
    Always,
    AlwaysComb,
    AlwaysFf,
    Initial,
    Posedge,
    Negedge,
    Return,
    Generate,
    Endgenerate,
    Package,
    Endpackage,
    Class,
    Endclass,
    Interface,
    Endinterface,
    Constraint,
    Coverpoint,
    New,
    Wait,
    Void,

    // Preprocessor
    PpDefine,
    PpDefineBody,
    PpIfdef,
    PpIfndef,
    PpElse,
    PpEndif,
    PpInclude,

    // Grouping
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Punctuation and operators
    Semicolon,
    Comma,
    Dot,
    Colon,
    ScopeRes,
    Question,
    Hash,
    At,
    Apostrophe,
    Equals,
    EqEq,
    NotEq,
    CaseEq,
    CaseNotEq,
    LtEq,
    GtEq,
    Lt,
    Gt,
    AndAnd,
    OrOr,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Power,
    Shl,
    Shr,
    Arrow,
    PlusPlus,
    MinusMinus,

    /// An unexpanded macro-call argument; synthesized by macro-aware
    /// consumers, never by the lexer. Carriers of these are re-analyzed and
    /// spliced back by the deferred-expansion protocol.
    MacroArg,

    /// Closing parenthesis of a macro call that ends its line; synthesized by
    /// macro-aware consumers, never by the lexer.
    MacroCallCloseToEndLine,

    /// End-of-stream sentinel; carries the text's end offset.
    Eof,

    /// A byte sequence the lexer could not match.
    Unexpected,
}

/// Looks up the keyword kind for identifier-shaped text.
pub fn keyword_kind(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let kind = match text {
        "module" => Module,
        "endmodule" => Endmodule,
        "begin" => Begin,
        "end" => End,
        "if" => If,
        "else" => Else,
        "for" => For,
        "case" => Case,
        "endcase" => Endcase,
        "default" => Default,
        "function" => Function,
        "endfunction" => Endfunction,
        "task" => Task,
        "endtask" => Endtask,
        "assign" => Assign,
        "wire" => Wire,
        "reg" => Reg,
        "logic" => Logic,
        "parameter" => Parameter,
        "localparam" => Localparam,
        "typedef" => Typedef,
        "struct" => Struct,
        "enum" => Enum,
        "always" => Always,
        "always_comb" => AlwaysComb,
        "always_ff" => AlwaysFf,
        "initial" => Initial,
        "posedge" => Posedge,
        "negedge" => Negedge,
        "return" => Return,
        "generate" => Generate,
        "endgenerate" => Endgenerate,
        "package" => Package,
        "endpackage" => Endpackage,
        "class" => Class,
        "endclass" => Endclass,
        "interface" => Interface,
        "endinterface" => Endinterface,
        "constraint" => Constraint,
        "coverpoint" => Coverpoint,
        "new" => New,
        "wait" => Wait,
        "void" => Void,
        _ => return None,
    };
    Some(kind)
}

pub fn is_whitespace(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Whitespace | TokenKind::Newline)
}

pub fn is_comment(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::EolComment | TokenKind::BlockComment)
}

pub fn is_identifier_like(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::EscapedIdentifier
            | TokenKind::SystemTfIdentifier
            | TokenKind::MacroIdentifier
    )
}

pub fn is_keyword(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Module
            | Endmodule
            | Begin
            | End
            | If
            | Else
            | For
            | Case
            | Endcase
            | Default
            | Function
            | Endfunction
            | Task
            | Endtask
            | Assign
            | Wire
            | Reg
            | Logic
            | Parameter
            | Localparam
            | Typedef
            | Struct
            | Enum
            | Always
            | AlwaysComb
            | AlwaysFf
            | Initial
            | Posedge
            | Negedge
            | Return
            | Generate
            | Endgenerate
            | Package
            | Endpackage
            | Class
            | Endclass
            | Interface
            | Endinterface
            | Constraint
            | Coverpoint
            | New
            | Wait
            | Void
    )
}

/// Keywords that close a block and should start their own line.
pub fn is_end_keyword(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        End | Endmodule
            | Endcase
            | Endfunction
            | Endtask
            | Endgenerate
            | Endpackage
            | Endclass
            | Endinterface
    )
}

pub fn is_preprocessor_keyword(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        PpDefine | PpIfdef | PpIfndef | PpElse | PpEndif | PpInclude
    )
}

/// Operators that may appear in unary prefix position. Ambiguous operators
/// (`+`, `-`, `&`, `|`, `^`, `~`, `!`) are included; syntax-tree context
/// decides whether an occurrence actually is a prefix.
pub fn is_unary_operator(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Bang | Tilde | Amp | Pipe | Caret | Plus | Minus | PlusPlus | MinusMinus
    )
}

/// Keywords that can be used like a function or method call.
pub fn is_keyword_callable(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::New | TokenKind::Wait)
}

/// Coarse classification of tokens for formatting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTokenClass {
    Keyword,
    Identifier,
    NumericLiteral,
    NumericBase,
    StringLiteral,
    BinaryOperator,
    UnaryOperator,
    Hierarchy,
    OpenGroup,
    CloseGroup,
    EolComment,
    BlockComment,
    Punctuation,
    Eof,
    Unknown,
}

/// Maps a token kind to its formatting class.
pub fn format_token_class(kind: TokenKind) -> FormatTokenClass {
    use TokenKind::*;
    match kind {
        k if is_keyword(k) => FormatTokenClass::Keyword,
        Identifier | EscapedIdentifier | SystemTfIdentifier | MacroIdentifier => {
            FormatTokenClass::Identifier
        }
        DecNumber | UnbasedNumber => FormatTokenClass::NumericLiteral,
        BasedNumber => FormatTokenClass::NumericBase,
        StringLiteral => FormatTokenClass::StringLiteral,
        EolComment => FormatTokenClass::EolComment,
        BlockComment => FormatTokenClass::BlockComment,
        Dot | ScopeRes => FormatTokenClass::Hierarchy,
        LParen | LBracket | LBrace => FormatTokenClass::OpenGroup,
        RParen | RBracket | RBrace | MacroCallCloseToEndLine => FormatTokenClass::CloseGroup,
        Equals | EqEq | NotEq | CaseEq | CaseNotEq | LtEq | GtEq | Lt | Gt | AndAnd | OrOr
        | Amp | Pipe | Caret | Plus | Minus | Star | Slash | Percent | Power | Shl | Shr
        | Arrow => FormatTokenClass::BinaryOperator,
        Bang | Tilde | PlusPlus | MinusMinus => FormatTokenClass::UnaryOperator,
        Semicolon | Comma | Colon | Question | Hash | At | Apostrophe => {
            FormatTokenClass::Punctuation
        }
        Eof => FormatTokenClass::Eof,
        _ => FormatTokenClass::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_kind("module"), Some(TokenKind::Module));
        assert_eq!(keyword_kind("always_ff"), Some(TokenKind::AlwaysFf));
        assert_eq!(keyword_kind("modul"), None);
        assert_eq!(keyword_kind("Module"), None);
    }

    #[test]
    fn test_whitespace_and_comment_classes() {
        assert!(is_whitespace(TokenKind::Whitespace));
        assert!(is_whitespace(TokenKind::Newline));
        assert!(!is_whitespace(TokenKind::EolComment));
        assert!(is_comment(TokenKind::EolComment));
        assert!(is_comment(TokenKind::BlockComment));
        assert!(!is_comment(TokenKind::Identifier));
    }

    #[test]
    fn test_end_keywords() {
        assert!(is_end_keyword(TokenKind::End));
        assert!(is_end_keyword(TokenKind::Endmodule));
        assert!(!is_end_keyword(TokenKind::Begin));
        assert!(!is_end_keyword(TokenKind::Else));
    }

    #[test]
    fn test_format_classes() {
        assert_eq!(
            format_token_class(TokenKind::Module),
            FormatTokenClass::Keyword
        );
        assert_eq!(
            format_token_class(TokenKind::Identifier),
            FormatTokenClass::Identifier
        );
        assert_eq!(
            format_token_class(TokenKind::DecNumber),
            FormatTokenClass::NumericLiteral
        );
        assert_eq!(
            format_token_class(TokenKind::BasedNumber),
            FormatTokenClass::NumericBase
        );
        assert_eq!(
            format_token_class(TokenKind::ScopeRes),
            FormatTokenClass::Hierarchy
        );
        assert_eq!(
            format_token_class(TokenKind::LBrace),
            FormatTokenClass::OpenGroup
        );
        assert_eq!(
            format_token_class(TokenKind::Tilde),
            FormatTokenClass::UnaryOperator
        );
    }
}
