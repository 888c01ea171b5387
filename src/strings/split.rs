//! Line splitting helpers.

/// Splits on `'\n'` without keeping terminators. A trailing newline yields a
/// final empty element, so the result always has one element per line start.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Splits into lines, keeping the `'\n'` terminator attached to each line.
/// A final fragment without a terminator is kept as-is; empty input yields no
/// lines. This is the shape the diff engine consumes, where rejoining the
/// pieces must reproduce the input byte-for-byte.
pub fn split_lines_keep_line_terminator(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest_start = 0;
    for (pos, _) in text.match_indices('\n') {
        lines.push(&text[rest_start..=pos]);
        rest_start = pos + 1;
    }
    if rest_start < text.len() {
        lines.push(&text[rest_start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("a"), vec!["a"]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_split_keep_terminator() {
        assert_eq!(split_lines_keep_line_terminator(""), Vec::<&str>::new());
        assert_eq!(split_lines_keep_line_terminator("a"), vec!["a"]);
        assert_eq!(split_lines_keep_line_terminator("a\n"), vec!["a\n"]);
        assert_eq!(split_lines_keep_line_terminator("a\nbc"), vec!["a\n", "bc"]);
        assert_eq!(
            split_lines_keep_line_terminator("a\n\nbc\n"),
            vec!["a\n", "\n", "bc\n"]
        );
    }

    #[test]
    fn test_keep_terminator_round_trips() {
        let text = "one\ntwo\n\nthree";
        let joined: String = split_lines_keep_line_terminator(text).concat();
        assert_eq!(joined, text);
    }
}
