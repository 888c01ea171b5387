//! Stripping of comment syntax from comment token text.
//!
//! Both comment styles are handled: end-of-line comments (`// ...`, with any
//! number of extra leading slashes) and block comments (`/* ... */`, with any
//! number of extra `*` padding on either end). The returned slices always lie
//! within the input text so that byte-offset arithmetic stays valid.

fn count_leading_chars(text: &str, c: char) -> usize {
    text.find(|ch| ch != c).unwrap_or(text.len())
}

fn count_trailing_chars(text: &str, c: char) -> usize {
    text.chars().rev().take_while(|&ch| ch == c).count()
}

// Strips away leading `/**` and trailing `**/` from block comments.
// Precondition: `text` begins with "/*" and ends with "*/".
fn strip_block_comment(text: &str) -> &str {
    // Adjust for multiple *'s like /**** and ****/ .
    // Strip off /* and */ first and then remove leading/trailing *'s.
    let lpos = count_leading_chars(&text[2..], '*') + 2;
    let text_slice = &text[..text.len() - 2];
    let rtrim = count_trailing_chars(text_slice, '*') + 2;
    let rpos = text.len() - rtrim;
    if lpos > rpos {
        // This can occur if the comment looks like: /*******/
        if lpos == 2 && rpos == 1 {
            // /*/ is not a valid block comment, so do not strip it.
            return text;
        }
        return &text[2..2];
    }
    &text[lpos..rpos]
}

/// Strips the comment markers off `text`, returning the body as a sub-slice.
/// Text that is not a well-formed comment is returned unchanged.
pub fn strip_comment(text: &str) -> &str {
    if text.len() < 2 {
        return text; // cannot be a comment
    }
    if let Some(rest) = text.strip_prefix("//") {
        let ltrim = count_leading_chars(rest, '/') + 2;
        return &text[ltrim..];
    }
    if text.starts_with("/*") && text.ends_with("*/") {
        return strip_block_comment(text);
    }
    text
}

/// Strips comment markers and surrounding whitespace padding.
pub fn strip_comment_and_space_padding(text: &str) -> &str {
    strip_comment(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_eol_comment() {
        assert_eq!(strip_comment("// hello"), " hello");
        assert_eq!(strip_comment("//hello"), "hello");
        assert_eq!(strip_comment("////hello"), "hello");
        assert_eq!(strip_comment("//"), "");
    }

    #[test]
    fn test_strip_block_comment() {
        assert_eq!(strip_comment("/* hello */"), " hello ");
        assert_eq!(strip_comment("/*hello*/"), "hello");
        assert_eq!(strip_comment("/***hello***/"), "hello");
        assert_eq!(strip_comment("/**/"), "");
        assert_eq!(strip_comment("/*******/"), "");
    }

    #[test]
    fn test_degenerate_cases() {
        // /*/ is not a valid block comment.
        assert_eq!(strip_comment("/*/"), "/*/");
        assert_eq!(strip_comment("x"), "x");
        assert_eq!(strip_comment(""), "");
        assert_eq!(strip_comment("not a comment"), "not a comment");
    }

    #[test]
    fn test_strip_and_pad() {
        assert_eq!(strip_comment_and_space_padding("//  hello  "), "hello");
        assert_eq!(strip_comment_and_space_padding("/*  hello  */"), "hello");
        assert_eq!(
            strip_comment_and_space_padding("// verilog_format: off"),
            "verilog_format: off"
        );
    }

    #[test]
    fn test_result_is_subrange() {
        use crate::strings::range::is_subrange;
        let text = "/* body */";
        assert!(is_subrange(strip_comment(text), text));
        let eol = "// body";
        assert!(is_subrange(strip_comment(eol), eol));
    }
}
