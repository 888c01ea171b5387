//! End-to-end equivalence checks: formatter-style whitespace changes and
//! obfuscator-style renames over real lexed text.

use svtext::analysis::equivalence::{format_equivalent, obfuscation_equivalent};
use svtext::lexing::lexer::lex;
use svtext::lexing::tokens::TokenKind;
use svtext::strings::random::random_equal_length_identifier;

const SAMPLE: &str = "\
module counter (
  input logic clk,
  output logic [7:0] count
);
  always_ff @(posedge clk) begin
    count <= count + 8'h01;  // wraps
  end
endmodule
";

// A crude stand-in for a formatter: re-emit tokens with single spaces,
// keeping the newline an end-of-line comment needs to stay terminated.
fn squeeze_whitespace(text: &str) -> String {
    let mut out = String::new();
    let mut prev_was_eol_comment = false;
    for token in lex(text) {
        if svtext::lexing::tokens::is_whitespace(token.kind) || token.is_eof() {
            continue;
        }
        if !out.is_empty() {
            out.push(if prev_was_eol_comment { '\n' } else { ' ' });
        }
        out.push_str(token.text(text));
        prev_was_eol_comment = token.kind == TokenKind::EolComment;
    }
    out
}

// A crude stand-in for an obfuscator: rename identifiers in place,
// preserving byte positions of everything else.
fn rename_identifiers(text: &str) -> String {
    let mut out = String::new();
    for token in lex(text) {
        if token.is_eof() {
            break;
        }
        let original = token.text(text);
        if token.kind == TokenKind::Identifier {
            out.push_str(&random_equal_length_identifier(original));
        } else {
            out.push_str(original);
        }
    }
    out
}

#[test]
fn test_format_equivalence_of_reflowed_text() {
    let reflowed = squeeze_whitespace(SAMPLE);
    let mut errs = String::new();
    assert!(
        format_equivalent(SAMPLE, &reflowed, &mut errs),
        "reflowed text should be format-equivalent: {}",
        errs
    );
}

#[test]
fn test_format_equivalence_rejects_dropped_token() {
    let mut truncated = SAMPLE.to_string();
    truncated.truncate(truncated.rfind("endmodule").unwrap());
    let mut errs = String::new();
    assert!(!format_equivalent(SAMPLE, &truncated, &mut errs));
    assert!(errs.contains("Mismatch in token sequence lengths"));
}

#[test]
fn test_obfuscation_equivalence_of_renamed_text() {
    let renamed = rename_identifiers(SAMPLE);
    assert_eq!(renamed.len(), SAMPLE.len());
    let mut errs = String::new();
    assert!(
        obfuscation_equivalent(SAMPLE, &renamed, &mut errs),
        "renamed text should be obfuscation-equivalent: {}",
        errs
    );
}

#[test]
fn test_obfuscation_equivalence_rejects_whitespace_change() {
    let renamed = rename_identifiers(SAMPLE);
    let respaced = renamed.replacen("  ", " ", 1);
    let mut errs = String::new();
    assert!(!obfuscation_equivalent(SAMPLE, &respaced, &mut errs));
}

#[test]
fn test_format_and_obfuscation_disagree_on_renames() {
    let renamed = rename_identifiers(SAMPLE);
    let mut errs = String::new();
    // Renaming passes the obfuscation check but fails the format check.
    assert!(obfuscation_equivalent(SAMPLE, &renamed, &mut errs));
    assert!(!format_equivalent(SAMPLE, &renamed, &mut errs));
}
