//! Minimal edit scripts between token sequences, and unified-diff
//! rendering of line diffs.

pub mod editscript;
pub mod unified;

pub use editscript::{diff_tokens, Edit, Edits, Operation};
pub use unified::{
    diff_edits_to_added_line_numbers, diff_edits_to_patch_hunks, line_diffs_to_unified_diff,
    LineDiffs,
};
