//! String-range utilities: substring offset math, comment stripping,
//! line/column translation, and typed offset sets.

pub mod comment;
pub mod line_column_map;
pub mod memory_map;
pub mod position;
pub mod random;
pub mod range;
pub mod split;

pub use comment::{strip_comment, strip_comment_and_space_padding};
pub use line_column_map::{LineColumn, LineColumnMap, LineColumnRange};
pub use memory_map::StringMemoryMap;
pub use position::{ByteOffsetSet, LineNumberSet};
pub use range::{is_subrange, substring_offsets};
pub use split::{split_lines, split_lines_keep_line_terminator};
