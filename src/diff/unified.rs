//! Line-oriented diffs and unified-diff rendering.
//!
//! `LineDiffs` splits two texts into terminator-preserving lines and diffs
//! them as token sequences. The hunk splitter groups edits with surrounding
//! context for `@@ -a,b +c,d @@` patch output.

use std::fmt::{self, Write};

use crate::strings::position::LineNumberSet;
use crate::strings::split::split_lines_keep_line_terminator;

use super::editscript::{diff_tokens, Edit, Edits, Operation};

fn edit_operation_to_line_marker(operation: Operation) -> char {
    match operation {
        Operation::Delete => '-',
        Operation::Equals => ' ',
        Operation::Insert => '+',
    }
}

/// Line-by-line diff of two texts.
pub struct LineDiffs<'a> {
    pub before_text: &'a str,
    pub after_text: &'a str,
    pub before_lines: Vec<&'a str>,
    pub after_lines: Vec<&'a str>,
    pub edits: Edits,
}

impl<'a> LineDiffs<'a> {
    pub fn new(before_text: &'a str, after_text: &'a str) -> Self {
        let before_lines = split_lines_keep_line_terminator(before_text);
        let after_lines = split_lines_keep_line_terminator(after_text);
        let edits = diff_tokens(&before_lines, &after_lines);
        Self {
            before_text,
            after_text,
            before_lines,
            after_lines,
            edits,
        }
    }

    /// Prints one edit's lines, each prefixed with the operation marker.
    pub fn print_edit(&self, out: &mut impl Write, edit: &Edit) -> fmt::Result {
        let marker = edit_operation_to_line_marker(edit.operation);
        let lines = if edit.operation == Operation::Insert {
            &self.after_lines[edit.start..edit.end]
        } else {
            &self.before_lines[edit.start..edit.end]
        };
        for line in lines {
            write!(out, "{}{}", marker, line)?;
        }
        // The final fragment of a text may lack its terminator.
        if let Some(last) = lines.last() {
            if !last.ends_with('\n') {
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for LineDiffs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edit in &self.edits {
            self.print_edit(f, edit)?;
        }
        Ok(())
    }
}

/// Collects the 1-based line numbers added by the edit script.
pub fn diff_edits_to_added_line_numbers(edits: &Edits) -> LineNumberSet {
    let mut added_lines = LineNumberSet::new();
    for edit in edits {
        if edit.operation == Operation::Insert {
            added_lines.add((edit.start as i32 + 1, edit.end as i32 + 1));
        }
    }
    added_lines
}

/// Splits an edit script into patch hunks: at each Equals edit longer than
/// twice the context, the current hunk is closed with a trailing context
/// slice and a new hunk opened with a leading one. A final hunk holding
/// only an Equals edit is dropped, and every hunk's trailing Equals is
/// trimmed to the context size.
pub fn diff_edits_to_patch_hunks(edits: &Edits, common_context: usize) -> Vec<Edits> {
    let split_threshold = common_context * 2;
    let mut hunks: Vec<Edits> = vec![Edits::new()];
    for edit in edits {
        let current_hunk = hunks.last_mut().expect("hunks is never empty");
        if edit.operation == Operation::Equals {
            let edit_size = edit.end - edit.start;
            if current_hunk.is_empty() {
                // For the head end-piece the threshold is the context
                // size itself, not the split threshold.
                if edit_size > common_context {
                    current_hunk.push(Edit {
                        operation: edit.operation,
                        start: edit.end - common_context,
                        end: edit.end,
                    });
                } else {
                    current_hunk.push(*edit);
                }
            } else if edit_size > split_threshold {
                // Close off the current hunk and start the next one.
                current_hunk.push(Edit {
                    operation: edit.operation,
                    start: edit.start,
                    end: edit.start + common_context,
                });
                hunks.push(vec![Edit {
                    operation: edit.operation,
                    start: edit.end - common_context,
                    end: edit.end,
                }]);
            } else {
                // This may still be oversized; the final pass trims excess
                // Equals edits in tail position.
                current_hunk.push(*edit);
            }
        } else {
            current_hunk.push(*edit);
        }
    }

    // The last hunk may have been started before knowing it was last;
    // remove it if it is a no-op.
    let last_is_noop = hunks
        .last()
        .is_some_and(|hunk| hunk.len() == 1 && hunk[0].operation == Operation::Equals);
    if last_is_noop {
        hunks.pop();
    }

    for hunk in &mut hunks {
        if let Some(tail) = hunk.last_mut() {
            if tail.operation == Operation::Equals && tail.end - tail.start > common_context {
                tail.end = tail.start + common_context;
            }
        }
    }
    hunks
}

/// Renders a unified diff with the given amount of context. When only
/// `file_a` is given, the conventional `a/` and `b/` prefixes are applied
/// to the header.
pub fn line_diffs_to_unified_diff(
    out: &mut impl Write,
    linediffs: &LineDiffs<'_>,
    common_context: usize,
    file_a: Option<&str>,
    file_b: Option<&str>,
) -> fmt::Result {
    let hunks = diff_edits_to_patch_hunks(&linediffs.edits, common_context);
    if hunks.is_empty() {
        return Ok(());
    }

    match (file_a, file_b) {
        (Some(a), None) => {
            writeln!(out, "--- a/{}", a)?;
            writeln!(out, "+++ b/{}", a)?;
        }
        (Some(a), Some(b)) => {
            writeln!(out, "--- {}", a)?;
            writeln!(out, "+++ {}", b)?;
        }
        _ => {}
    }

    let mut added_lines_count: i64 = 0;
    for hunk in &hunks {
        let mut hunk_before_lines: i64 = 0;
        let mut hunk_added_lines: i64 = 0;
        for edit in hunk {
            let size = (edit.end - edit.start) as i64;
            match edit.operation {
                Operation::Insert => hunk_added_lines += size,
                Operation::Delete => {
                    hunk_before_lines += size;
                    hunk_added_lines -= size;
                }
                Operation::Equals => hunk_before_lines += size,
            }
        }
        let hunk_after_lines = hunk_before_lines + hunk_added_lines;

        let front_start = hunk[0].start as i64;
        write!(out, "@@ -{}", front_start + 1)?;
        if hunk_before_lines > 1 {
            write!(out, ",{}", hunk_before_lines)?;
        }
        write!(out, " +{}", front_start + added_lines_count + 1)?;
        if hunk_after_lines > 1 {
            write!(out, ",{}", hunk_after_lines)?;
        }
        writeln!(out, " @@")?;

        added_lines_count += hunk_added_lines;

        for edit in hunk {
            linediffs.print_edit(out, edit)?;

            // Last line from either side, with the final '\n' missing?
            let missing_newline = if edit.operation == Operation::Insert {
                edit.end == linediffs.after_lines.len() && !linediffs.after_text.ends_with('\n')
            } else {
                edit.end == linediffs.before_lines.len() && !linediffs.before_text.ends_with('\n')
            };
            if missing_newline && edit.end > edit.start {
                writeln!(out, "\\ No newline at end of file")?;
            }
        }
    }
    Ok(())
}
