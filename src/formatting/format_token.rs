//! Pre-format token model: tokens decorated with inter-token spacing
//! constraints and break decisions, consumed by the line-wrapping engine.

use std::fmt;

use crate::lexing::tokens::{format_token_class, FormatTokenClass};
use crate::strings::position::ByteOffsetSet;
use crate::text::token::Token;

/// Constraint on the space between a token and its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpacingOptions {
    /// Let the wrap optimizer choose.
    #[default]
    Undecided,
    /// Must stay on the predecessor's line.
    MustAppend,
    /// Must start a new line.
    MustWrap,
    /// Must stay on the line, aligned by the alignment engine.
    AppendAligned,
    /// Emit the original inter-token spacing verbatim.
    Preserve,
}

impl fmt::Display for SpacingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpacingOptions::Undecided => "undecided",
            SpacingOptions::MustAppend => "must-append",
            SpacingOptions::MustWrap => "must-wrap",
            SpacingOptions::AppendAligned => "append-aligned",
            SpacingOptions::Preserve => "preserve",
        };
        write!(f, "{}", name)
    }
}

/// Spacing and break information attached to the gap *before* a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterTokenInfo {
    pub spaces_required: usize,
    pub break_penalty: i32,
    pub break_decision: SpacingOptions,

    /// Byte offset where the original inter-token spacing begins (the end
    /// of the previous token's text); used by `Preserve` rendering.
    pub preserved_space_start: Option<usize>,
}

impl Default for InterTokenInfo {
    fn default() -> Self {
        Self {
            spaces_required: 0,
            break_penalty: 0,
            break_decision: SpacingOptions::Undecided,
            preserved_space_start: None,
        }
    }
}

/// A token scheduled for formatting, with its class and the decision state
/// for the spacing before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreFormatToken {
    pub token: Token,
    pub class: FormatTokenClass,
    pub before: InterTokenInfo,
}

impl PreFormatToken {
    pub fn new(token: Token) -> Self {
        let class = format_token_class(token.kind);
        Self {
            token,
            class,
            before: InterTokenInfo::default(),
        }
    }

    /// The original spacing between the previous token and this one, as a
    /// slice of the base text.
    pub fn original_leading_spaces<'t>(&self, base_text: &'t str) -> &'t str {
        match self.before.preserved_space_start {
            None => "",
            Some(start) => &base_text[start..self.token.left()],
        }
    }

    /// Length of the leading spacing this token will be rendered with.
    pub fn leading_spaces_length(&self, base_text: &str) -> usize {
        if self.before.break_decision == SpacingOptions::Preserve
            && self.before.preserved_space_start.is_some()
        {
            return self.original_leading_spaces(base_text).len();
        }
        self.before.spaces_required
    }
}

/// Builds pre-format tokens from a token slice, wiring each token's
/// preserved-space range to the end of its predecessor. The spacing before
/// the first token starts at offset 0. Does not cover spacing between the
/// last token and EOF.
pub fn connect_pre_format_tokens(tokens: &[Token]) -> Vec<PreFormatToken> {
    let mut previous_end = 0;
    tokens
        .iter()
        .map(|token| {
            let mut ftoken = PreFormatToken::new(token.clone());
            ftoken.before.preserved_space_start = Some(previous_end);
            previous_end = token.right();
            ftoken
        })
        .collect()
}

// Index range of format tokens overlapping the byte-offset interval.
fn find_format_tokens_in_byte_offset_range(
    ftokens: &[PreFormatToken],
    first_index: usize,
    byte_range: (usize, usize),
) -> std::ops::Range<usize> {
    let begin = first_index
        + ftokens[first_index..].partition_point(|ft| ft.token.left() < byte_range.0);
    let end = begin + ftokens[begin..].partition_point(|ft| ft.token.right() <= byte_range.1);
    begin..end
}

/// Marks format tokens covered by the disabled byte ranges as preserving
/// their original spacing, so disabled regions pass through unformatted.
pub fn preserve_spaces_on_disabled_token_ranges(
    ftokens: &mut [PreFormatToken],
    disabled_byte_ranges: &ByteOffsetSet,
    base_text: &str,
) {
    // Intervals are monotonic and non-overlapping, so each search may start
    // where the previous one ended.
    let mut saved_index = 0;
    for interval in disabled_byte_ranges.iter() {
        let byte_range = (interval.min.max(0) as usize, interval.max.max(0) as usize);
        tracing::trace!(?byte_range, "disabling format tokens in byte range");
        let disable_range =
            find_format_tokens_in_byte_offset_range(ftokens, saved_index, byte_range);

        // When the disabled range immediately follows an end-of-line
        // comment, the comment's trailing '\n' is printed by the wrap
        // decision already in effect; consume it from the preserved
        // spacing so rendering the disabled excerpt does not produce a
        // redundant newline.
        if let Some(first) = ftokens[disable_range.clone()].first_mut() {
            if first.before.break_decision == SpacingOptions::MustWrap {
                if let Some(start) = first.before.preserved_space_start {
                    if base_text[start..].starts_with('\n') {
                        first.before.preserved_space_start = Some(start + 1);
                    }
                }
            }
        }

        for ftoken in &mut ftokens[disable_range.clone()] {
            ftoken.before.break_decision = SpacingOptions::Preserve;
        }

        saved_index = disable_range.end;
    }
}
