//! Formatting support: the pre-format token model, inter-token spacing and
//! break annotation, comment-directed disable ranges, and re-format
//! verification.

pub mod annotator;
pub mod comment_controls;
pub mod format_token;
pub mod style;
pub mod tree_annotator;
pub mod verification;

pub use annotator::annotate_formatting_information;
pub use comment_controls::{
    disable_formatting_ranges, enabled_lines_to_disabled_byte_ranges,
    format_whitespace_with_disabled_byte_ranges,
};
pub use format_token::{InterTokenInfo, PreFormatToken, SpacingOptions};
pub use style::FormatStyle;
