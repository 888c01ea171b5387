//! Lexical equivalence of two token streams.
//!
//! Both streams are filtered by a keep predicate and compared element-wise
//! under a caller-supplied equality. On mismatch, the first differing token
//! (or the first excess token of the longer stream) is reported to the
//! error sink with enough detail to localize it.
//!
//! Two presets cover the common verification flows:
//!
//! - *format-equivalent*: whitespace dropped, kind and text compared. The
//!   formatter must preserve everything but whitespace.
//! - *obfuscation-equivalent*: whitespace kept (it must match exactly);
//!   identifiers and comments compare by kind and text length only, so
//!   renamed identifiers of equal length compare equal; all other tokens
//!   compare by exact text.

use std::fmt::Write;

use crate::lexing::lexer::lex;
use crate::lexing::tokens::{is_comment, is_identifier_like, is_whitespace};
use crate::text::token::Token;
use crate::text::token_stream::TokenSequence;

/// Filters both sequences with `keep`, then compares them under `equal`.
/// Returns true if the filtered streams are equivalent; otherwise writes a
/// first-difference report to `errs`.
pub fn lexically_equivalent(
    left: &TokenSequence,
    left_text: &str,
    right: &TokenSequence,
    right_text: &str,
    keep: impl Fn(&Token) -> bool,
    equal: impl Fn(&Token, &str, &Token, &str) -> bool,
    errs: &mut impl Write,
) -> bool {
    let left_filtered: Vec<&Token> = left.iter().filter(|t| keep(t)).collect();
    let right_filtered: Vec<&Token> = right.iter().filter(|t| keep(t)).collect();

    let left_size = left_filtered.len();
    let right_size = right_filtered.len();
    let size_match = left_size == right_size;
    if !size_match {
        let _ = writeln!(
            errs,
            "Mismatch in token sequence lengths: {} vs. {}",
            left_size, right_size
        );
    }

    // Compare element-by-element up to the common length.
    let min_size = left_size.min(right_size);
    let mismatch = (0..min_size)
        .find(|&i| !equal(left_filtered[i], left_text, right_filtered[i], right_text));

    match mismatch {
        None => {
            if size_match {
                return true;
            }
            if left_size < right_size {
                let _ = writeln!(
                    errs,
                    "First excess token in right sequence: {}",
                    right_filtered[min_size].describe(right_text)
                );
            } else {
                let _ = writeln!(
                    errs,
                    "First excess token in left sequence: {}",
                    left_filtered[min_size].describe(left_text)
                );
            }
            false
        }
        Some(index) => {
            let _ = writeln!(
                errs,
                "First mismatched token [{}]: {} vs. {}",
                index,
                left_filtered[index].describe(left_text),
                right_filtered[index].describe(right_text)
            );
            false
        }
    }
}

/// Equivalence modulo whitespace: the property a formatter must preserve.
pub fn format_equivalent(left_text: &str, right_text: &str, errs: &mut impl Write) -> bool {
    let left = lex(left_text);
    let right = lex(right_text);
    lexically_equivalent(
        &left,
        left_text,
        &right,
        right_text,
        |t| !is_whitespace(t.kind),
        |l, lt, r, rt| l.equivalent_without_location(lt, r, rt),
        errs,
    )
}

/// Equivalence modulo renaming: the property an obfuscator must preserve.
/// Whitespace must match exactly; identifiers and comments need only match
/// in kind and length.
pub fn obfuscation_equivalent(left_text: &str, right_text: &str, errs: &mut impl Write) -> bool {
    let left = lex(left_text);
    let right = lex(right_text);
    lexically_equivalent(
        &left,
        left_text,
        &right,
        right_text,
        |_| true,
        |l, lt, r, rt| {
            if l.kind != r.kind {
                return false;
            }
            if is_identifier_like(l.kind) || is_comment(l.kind) {
                l.len() == r.len()
            } else {
                l.text(lt) == r.text(rt)
            }
        },
        errs,
    )
}
