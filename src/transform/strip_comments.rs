//! Removal or masking of comments in source text.
//!
//! Everything that is not a comment passes through byte-for-byte, including
//! lexical error tokens. Comments are either deleted (`replacement: None`)
//! or have their bytes replaced (`Some(char)`), preserving newlines so that
//! line numbers in the output still line up with the input. Replacing with
//! a space keeps all byte offsets identical; any other replacement retains
//! the comment delimiters and masks only the body.

use std::fmt::Write;

use crate::lexing::lexer::lex;
use crate::lexing::tokens::TokenKind;
use crate::strings::comment::strip_comment;
use crate::strings::range::substring_offsets;

// Replace non-newline characters (tabs included) with the replacement.
fn replace_non_newlines(text: &str, output: &mut String, replacement: char) {
    for c in text.chars() {
        output.push(if c == '\n' { '\n' } else { replacement });
    }
}

fn push_repeated(output: &mut String, count: usize, c: char) {
    for _ in 0..count {
        output.push(c);
    }
}

/// Strips comments from `content` into `output`.
pub fn strip_verilog_comments(content: &str, output: &mut String, replacement: Option<char>) {
    tracing::debug!("stripping comments");
    for token in lex(content) {
        if token.is_eof() {
            break;
        }
        let text = token.text(content);
        match token.kind {
            TokenKind::EolComment => match replacement {
                None => {
                    // The following '\n' is a separate token, so deleting
                    // the comment cannot fuse neighboring tokens.
                }
                Some(' ') => {
                    // An EOL comment never contains '\n'.
                    push_repeated(output, text.len(), ' ');
                }
                Some(mask) => {
                    // Retain the "//" but erase everything thereafter.
                    let body = strip_comment(text);
                    let body_range = substring_offsets(body, text)
                        .expect("stripped comment body lies within the comment");
                    let _ = output.write_str(&text[..body_range.start]);
                    push_repeated(output, body.len(), mask);
                }
            },
            TokenKind::BlockComment => match replacement {
                None => {
                    // One space prevents accidental token fusion in cases
                    // like "a/**/b".
                    output.push(' ');
                }
                Some(' ') => {
                    replace_non_newlines(text, output, ' ');
                }
                Some(mask) => {
                    // Retain the "/*" and "*/" but erase the body.
                    let body = strip_comment(text);
                    let body_range = substring_offsets(body, text)
                        .expect("stripped comment body lies within the comment");
                    let _ = output.write_str(&text[..body_range.start]);
                    replace_non_newlines(body, output, mask);
                    let _ = output.write_str(&text[body_range.end..]);
                }
            },
            _ => {
                // Preserve all other text, including lexical error tokens.
                let _ = output.write_str(text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(content: &str, replacement: Option<char>) -> String {
        let mut output = String::new();
        strip_verilog_comments(content, &mut output, replacement);
        output
    }

    #[test]
    fn test_no_comments_unchanged() {
        let text = "module m;\n  wire x;\nendmodule\n";
        assert_eq!(strip(text, None), text);
        assert_eq!(strip(text, Some(' ')), text);
    }

    #[test]
    fn test_delete_eol_comment() {
        assert_eq!(strip("wire x;  // note\n", None), "wire x;  \n");
    }

    #[test]
    fn test_space_eol_comment_preserves_offsets() {
        let text = "wire x;  // note\nwire y;\n";
        let stripped = strip(text, Some(' '));
        assert_eq!(stripped.len(), text.len());
        let expected = format!("wire x;  {}\nwire y;\n", " ".repeat(7));
        assert_eq!(stripped, expected);
    }

    #[test]
    fn test_mask_eol_comment_keeps_delimiter() {
        assert_eq!(strip("x; // ab\n", Some('.')), "x; //...\n");
    }

    #[test]
    fn test_delete_block_comment_leaves_space() {
        assert_eq!(strip("a/**/b", None), "a b");
    }

    #[test]
    fn test_space_block_comment_preserves_newlines() {
        let text = "x /* a\n b */ y";
        // "/* a" and " b */" become spaces; the newline survives.
        assert_eq!(strip(text, Some(' ')), "x     \n      y");
    }

    #[test]
    fn test_mask_block_comment_keeps_delimiters() {
        assert_eq!(strip("a /*bc*/ d", Some('.')), "a /*..*/ d");
    }

    #[test]
    fn test_string_contents_untouched() {
        let text = "x = \"// not a comment\";\n";
        assert_eq!(strip(text, Some(' ')), text);
    }
}
