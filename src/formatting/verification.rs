//! Formatter output verification.
//!
//! Two independent safety checks gate accepting formatter output: the
//! formatted text must be lexically equivalent to the input modulo
//! whitespace, and re-formatting the output must converge (produce the
//! same text again). On failure, a diff localizing the problem is written
//! to the error sink.

use std::fmt::Write;

use crate::analysis::equivalence::format_equivalent;
use crate::diff::unified::{line_diffs_to_unified_diff, LineDiffs};

/// Checks that `formatted` preserves the lexical content of `original`.
/// On failure writes the first difference and a unified diff to `errs`.
pub fn verify_format_equivalence(
    original: &str,
    formatted: &str,
    errs: &mut impl Write,
) -> bool {
    if format_equivalent(original, formatted, errs) {
        return true;
    }
    let _ = writeln!(errs, "Formatted output is not equivalent to the input:");
    let diffs = LineDiffs::new(original, formatted);
    let _ = line_diffs_to_unified_diff(errs, &diffs, 1, None, None);
    false
}

/// Checks that formatting is idempotent: formatting `formatted` again
/// produced `reformatted` equal to it. On failure writes a unified diff of
/// the two renderings to `errs`.
pub fn verify_format_convergence(
    formatted: &str,
    reformatted: &str,
    errs: &mut impl Write,
) -> bool {
    if formatted == reformatted {
        return true;
    }
    let _ = writeln!(errs, "Reformatting does not converge:");
    let diffs = LineDiffs::new(formatted, reformatted);
    let _ = line_diffs_to_unified_diff(errs, &diffs, 1, None, None);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalence_passes_whitespace_changes() {
        let mut errs = String::new();
        assert!(verify_format_equivalence(
            "wire   x;\n",
            "wire x;\n",
            &mut errs
        ));
        assert!(errs.is_empty());
    }

    #[test]
    fn test_equivalence_fails_with_diff() {
        let mut errs = String::new();
        assert!(!verify_format_equivalence("wire x;\n", "wire y;\n", &mut errs));
        assert!(errs.contains("First mismatched token"));
        assert!(errs.contains("-wire x;"));
        assert!(errs.contains("+wire y;"));
    }

    #[test]
    fn test_convergence() {
        let mut errs = String::new();
        assert!(verify_format_convergence("wire x;\n", "wire x;\n", &mut errs));
        assert!(!verify_format_convergence("wire x;\n", "wire  x;\n", &mut errs));
        assert!(errs.contains("does not converge"));
    }
}
