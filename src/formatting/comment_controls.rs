//! Comment-directed formatter disable ranges.
//!
//! Two independent sources of "disabled" byte ranges are combined by union:
//! `verilog_format: off`/`on` comment directives, and the inversion of a
//! user-supplied set of enabled line numbers. The whitespace emission
//! protocol at the bottom renders inter-token space with respect to those
//! ranges: disabled sub-ranges pass through verbatim, enabled sub-ranges
//! keep only their newline count for the reflow engine to work against.

use std::fmt::Write;

use crate::lexing::tokens::{is_comment, TokenKind};
use crate::strings::comment::strip_comment_and_space_padding;
use crate::strings::line_column_map::LineColumnMap;
use crate::strings::position::{ByteOffsetSet, LineNumberSet};
use crate::text::token_stream::TokenSequence;
use crate::util::interval_set::IntervalSet;

use super::format_token::SpacingOptions;

const TRIGGER: &str = "verilog_format:";

/// Scans tokens for `verilog_format: off`/`on` directives and returns the
/// set of byte ranges in which formatting is disabled.
///
/// "off" opens a disabled range at the end of its comment (for end-of-line
/// comments, after the trailing newline, so the comment itself remains
/// formatted); "on" closes the range at the end of its comment. A nested
/// "off" is ignored (first wins), and an unclosed "off" extends to the end
/// of the buffer.
pub fn disable_formatting_ranges(text: &str, tokens: &TokenSequence) -> ByteOffsetSet {
    let mut begin_disable_offset: Option<usize> = None;
    let mut disable_set = ByteOffsetSet::new();
    for token in tokens {
        if !is_comment(token.kind) {
            continue;
        }
        let commands = strip_comment_and_space_padding(token.text(text));
        let commands = match commands.strip_prefix(TRIGGER) {
            None => continue,
            Some(rest) => rest,
        };
        match commands.split_whitespace().next() {
            Some("off") => {
                if begin_disable_offset.is_none() {
                    let mut begin = token.right();
                    if token.kind == TokenKind::EolComment {
                        begin += 1; // cover the trailing '\n'
                    }
                    begin_disable_offset = Some(begin);
                } // else ignore
            }
            Some("on") => {
                if let Some(begin) = begin_disable_offset.take() {
                    let end = token.right();
                    if begin != end {
                        disable_set.add((begin as i32, end as i32));
                    }
                } // else ignore
            }
            _ => {}
        }
    }
    // If the disabling interval remains open, close it at end-of-buffer.
    if let Some(begin) = begin_disable_offset {
        if begin <= text.len() {
            disable_set.add((begin as i32, text.len() as i32));
        }
    }
    disable_set
}

/// Translates a set of *enabled* 1-based line numbers into the byte ranges
/// where formatting is disabled. An empty set means all lines are enabled,
/// disabling nothing.
pub fn enabled_lines_to_disabled_byte_ranges(
    line_numbers: &LineNumberSet,
    line_column_map: &LineColumnMap,
) -> ByteOffsetSet {
    if line_numbers.is_empty() {
        return ByteOffsetSet::new();
    }
    // Translate lines to byte offsets (strictly monotonic), clamping line
    // numbers into the valid range.
    let max_line = line_column_map.line_count() as i32;
    let byte_offsets: IntervalSet<i32> = line_numbers.monotonic_transform(|line_number| {
        // line numbers are 1-based; offset_at_line is 0-based
        let n = line_number.clamp(1, max_line);
        line_column_map.offset_at_line((n - 1) as usize) as i32
    });
    // Invert to get the disabled ranges.
    let mut byte_offsets = ByteOffsetSet::from(byte_offsets);
    let end_byte = line_column_map.last_line_offset() as i32;
    byte_offsets.complement((0, end_byte));
    byte_offsets
}

fn newline_count(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

/// Renders the whitespace span `[space_start, space_end)` of `text_base`
/// with respect to the disabled ranges: disabled sub-ranges verbatim (when
/// `include_disabled_ranges`), enabled sub-ranges reduced to their newline
/// count. `break_decision` is the layout decision already made for the
/// token on the right of the span: when it is a mandatory wrap and the
/// enabled portion yielded no newline (and the span is not at the start of
/// the file), a single newline is emitted so the wrap still happens.
pub fn format_whitespace_with_disabled_byte_ranges(
    text_base: &str,
    space_start: usize,
    space_end: usize,
    disabled_ranges: &ByteOffsetSet,
    include_disabled_ranges: bool,
    break_decision: SpacingOptions,
    out: &mut impl Write,
) {
    debug_assert!(space_start <= space_end && space_end <= text_base.len());
    let start = space_start as i32;
    let end = space_end as i32;
    let mut enabled_ranges = ByteOffsetSet::from_ranges([(start, end)]);
    enabled_ranges.difference_set(disabled_ranges);
    let must_wrap = break_decision == SpacingOptions::MustWrap;
    tracing::trace!(space_start, space_end, "formatting whitespace span");

    // Special case for an empty span.
    if space_start == space_end && space_start != 0 {
        if must_wrap && !disabled_ranges.contains(start) {
            let _ = out.write_char('\n');
            return;
        }
    }

    // Traverse alternating disabled and enabled ranges.
    let mut partially_enabled = false;
    let mut total_enabled_newlines = 0;
    let mut next_start = space_start;
    for range in enabled_ranges.iter() {
        let (range_start, range_end) = (range.min as usize, range.max as usize);
        if include_disabled_ranges {
            // Print the original spacing of the disabled interval.
            let disabled = &text_base[next_start..range_start];
            let _ = out.write_str(disabled);
            total_enabled_newlines += newline_count(disabled);
        }
        {
            // Enabled intervals keep only their newlines.
            let enabled = &text_base[range_start..range_end];
            let count = newline_count(enabled);
            for _ in 0..count {
                let _ = out.write_char('\n');
            }
            partially_enabled = true;
            total_enabled_newlines += count;
        }
        next_start = range_end;
    }
    if include_disabled_ranges {
        // Any disabled interval left over prints verbatim.
        let final_disabled = &text_base[next_start..space_end];
        let _ = out.write_str(final_disabled);
        total_enabled_newlines += newline_count(final_disabled);
    }
    // A mandatory wrap whose enabled sub-ranges produced no newline still
    // gets one.
    if must_wrap && partially_enabled && total_enabled_newlines == 0 && space_start != 0 {
        let _ = out.write_char('\n');
    }
}
