//! The coherent bundle of text, tokens, filtered view, line index, and
//! syntax tree.
//!
//! `TextStructure` owns the backing text; `TextStructureView` holds the
//! token sequence, the filtered token view, the per-line token index, and
//! the syntax tree, all referring into one slice of that text. Token and
//! leaf extents are byte ranges relative to the view's current contents.
//!
//! Trimming, rebasing, and subtree expansion are the only operations that
//! mutate an already-analyzed view; each re-establishes the structural
//! invariants and ends with an integrity check that is fatal on violation,
//! because a silently inconsistent view corrupts every downstream consumer.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::strings::line_column_map::{LineColumn, LineColumnMap, LineColumnRange};
use crate::strings::range::substring_offsets;
use crate::strings::split::split_lines;

use super::syntax_tree::ConcreteSyntaxTree;
use super::token::Token;
use super::token_stream::{
    filter_token_stream_view_in_place, terminate_token_stream, TokenSequence, TokenStreamView,
};
use super::tree_utils::{
    leftmost_leaf, mutate_leaves, rightmost_leaf, subtree_at_path_mut, trim_syntax_tree,
};

/// A failed structural invariant. Surfacing one of these means a mutation
/// left the view inconsistent; the mutating operations treat it as fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    TokenRange(String),
    LineRange(String),
    SyntaxTree(String),
    Ownership(String),
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyError::TokenRange(msg) => write!(f, "token range check failed: {}", msg),
            ConsistencyError::LineRange(msg) => write!(f, "line range check failed: {}", msg),
            ConsistencyError::SyntaxTree(msg) => write!(f, "syntax tree check failed: {}", msg),
            ConsistencyError::Ownership(msg) => write!(f, "ownership check failed: {}", msg),
        }
    }
}

impl std::error::Error for ConsistencyError {}

/// Deferred in-place expansion of the syntax tree: a recorded child slot in
/// the parent tree, plus the separately-analyzed substring whose tree will
/// replace that slot.
#[derive(Debug)]
pub struct DeferredExpansion {
    /// Child-index path from the root to the slot to expand (leaf or node).
    pub insertion_point: Vec<usize>,

    /// Analysis of the substring that corresponds to the insertion point.
    pub subanalysis: TextStructure,
}

/// Map of byte offsets to deferred expansions. Collecting expansions and
/// processing them in bulk is cheaper than splicing each one as it is
/// encountered.
pub type NodeExpansionMap = BTreeMap<usize, DeferredExpansion>;

/// Sequences of tokens and a tree over one slice of backing text.
#[derive(Debug)]
pub struct TextStructureView {
    // Backing buffer shared with the owning TextStructure.
    text: Arc<str>,

    // The slice of `text` spanned by the token sequence and syntax tree.
    window: Range<usize>,

    // Tokens covering the window, terminated with an EOF sentinel.
    tokens: TokenSequence,

    // Filtered view of `tokens` (indices into it).
    tokens_view: TokenStreamView,

    // Index of token positions that begin each line; length line-count + 1,
    // with a final entry equal to tokens.len().
    line_token_map: Vec<usize>,

    // Tree representation of the window's contents.
    syntax_tree: ConcreteSyntaxTree,

    // Lazily computed line map; invalidated on any content mutation.
    lines_info: OnceCell<LineColumnMap>,
}

impl TextStructureView {
    pub(crate) fn new(text: Arc<str>, window: Range<usize>) -> Self {
        Self {
            text,
            window,
            tokens: TokenSequence::new(),
            tokens_view: TokenStreamView::new(),
            line_token_map: Vec::new(),
            syntax_tree: None,
            lines_info: OnceCell::new(),
        }
    }

    /// The text slice spanned by this view's tokens and tree.
    pub fn contents(&self) -> &str {
        &self.text[self.window.clone()]
    }

    /// Line-by-line view of the contents (split on `'\n'`).
    pub fn lines(&self) -> Vec<&str> {
        split_lines(self.contents())
    }

    pub fn syntax_tree(&self) -> &ConcreteSyntaxTree {
        &self.syntax_tree
    }

    pub fn mutable_syntax_tree(&mut self) -> &mut ConcreteSyntaxTree {
        &mut self.syntax_tree
    }

    pub fn token_stream(&self) -> &TokenSequence {
        &self.tokens
    }

    pub fn mutable_token_stream(&mut self) -> &mut TokenSequence {
        &mut self.tokens
    }

    pub fn token_stream_view(&self) -> &TokenStreamView {
        &self.tokens_view
    }

    pub fn mutable_token_stream_view(&mut self) -> &mut TokenStreamView {
        &mut self.tokens_view
    }

    /// The line map, computed on first use. Not thread-safe to prime
    /// concurrently with mutation; the owner primes it before sharing.
    pub fn line_column_map(&self) -> &LineColumnMap {
        self.lines_info
            .get_or_init(|| LineColumnMap::new(self.contents()))
    }

    /// Given a byte offset, return the line and column.
    pub fn line_col_at_offset(&self, offset: usize) -> LineColumn {
        self.line_column_map().line_col_at_offset(offset)
    }

    /// Given a token, return the line/column range it covers.
    pub fn get_range_for_token(&self, token: &Token) -> LineColumnRange {
        if token.is_eof() {
            // Tests pass in artificial EOF tokens not generated from this
            // view, so resolve EOF directly to the end of contents.
            let eof_pos = self.line_col_at_offset(self.contents().len());
            return LineColumnRange::new(eof_pos, eof_pos);
        }
        LineColumnRange::new(
            self.line_col_at_offset(token.left()),
            self.line_col_at_offset(token.right()),
        )
    }

    /// Given a text snippet that must be a sub-slice of `contents()`, return
    /// the line/column range it covers.
    pub fn get_range_for_text(&self, text: &str) -> LineColumnRange {
        let offsets = substring_offsets(text, self.contents())
            .expect("text snippet is not a substring of contents");
        LineColumnRange::new(
            self.line_col_at_offset(offsets.start),
            self.line_col_at_offset(offsets.end),
        )
    }

    pub fn line_token_map(&self) -> &[usize] {
        &self.line_token_map
    }

    /// The EOF sentinel for the current contents.
    pub fn eof_token(&self) -> Token {
        Token::eof(self.contents().len())
    }

    /// Given a line/column, return the token spanning that position, or EOF
    /// if the position is out of range.
    pub fn find_token_at(&self, pos: LineColumn) -> Token {
        for token in self.tokens_on_line(pos.line) {
            if self.get_range_for_token(token).contains(pos) {
                return token.clone();
            }
        }
        self.eof_token()
    }

    /// Computes the token index that starts each line, plus a final
    /// `tokens.len()` sentinel, so the map always has line-count + 1
    /// entries.
    pub fn calculate_first_tokens_per_line(&mut self) {
        let line_starts = self.line_column_map().line_starts().to_vec();
        self.line_token_map.clear();
        self.line_token_map.reserve(line_starts.len() + 1);
        let mut token_index = 0;
        for offset in line_starts {
            token_index += self.tokens[token_index..].partition_point(|t| t.left() < offset);
            self.line_token_map.push(token_index);
        }
        self.line_token_map.push(self.tokens.len());
    }

    /// Returns the index range of tokens whose extents begin in
    /// `[lower, upper)`, found with two binary searches.
    pub fn token_range_spanning_offsets(&self, lower: usize, upper: usize) -> Range<usize> {
        let left = self.tokens.partition_point(|t| t.left() < lower);
        let right = left + self.tokens[left..].partition_point(|t| t.left() < upper);
        left..right
    }

    /// Returns the index range of tokens that start on the given 0-based
    /// line. A multi-line token belongs to the line where it begins.
    /// Precondition: [`calculate_first_tokens_per_line`](Self::calculate_first_tokens_per_line)
    /// has been called.
    pub fn token_range_on_line(&self, lineno: usize) -> Range<usize> {
        if lineno + 1 < self.line_token_map.len() {
            self.line_token_map[lineno]..self.line_token_map[lineno + 1]
        } else {
            self.tokens.len()..self.tokens.len()
        }
    }

    /// The tokens that start on the given 0-based line.
    pub fn tokens_on_line(&self, lineno: usize) -> &[Token] {
        &self.tokens[self.token_range_on_line(lineno)]
    }

    /// Removes tokens not satisfying the keep predicate from the filtered
    /// view. May be called successively with different predicates.
    pub fn filter_tokens(&mut self, keep: impl Fn(&Token) -> bool) {
        filter_token_stream_view_in_place(&self.tokens, &mut self.tokens_view, keep);
    }

    /// Applies `mutator` to every token in the sequence, and to the separate
    /// token copies held by the syntax tree's leaves, keeping both in sync.
    pub fn mutate_tokens(&mut self, mutator: &mut dyn FnMut(&mut Token)) {
        for token in &mut self.tokens {
            mutator(token);
        }
        // The filtered view holds indices, which are unaffected.
        mutate_leaves(&mut self.syntax_tree, mutator);
    }

    /// Repoints every token extent into `supertext`, whose window contains
    /// this view's text at `offset`. Used when ownership of the syntax tree
    /// is about to be transferred to a new owner.
    pub fn rebase_tokens_to_superstring(
        &mut self,
        supertext: Arc<str>,
        superwindow: Range<usize>,
        offset: usize,
    ) {
        tracing::trace!(offset, "rebasing tokens to superstring");
        self.mutate_tokens(&mut |token| token.shift_right(offset));
        // Adopt the superstring to maintain the range invariants.
        self.text = supertext;
        self.window = superwindow;
        self.invalidate_lines_info();
    }

    /// Narrows the view of text, tokens, and syntax tree to the subtree
    /// spanning `[left_offset, left_offset + length)`. The resulting state
    /// looks as if only that snippet had been analyzed as a particular
    /// construct of the larger grammar.
    pub fn focus_on_subtree_spanning_substring(&mut self, left_offset: usize, length: usize) {
        tracing::debug!(left_offset, length, "focus on subtree spanning substring");
        let right_offset = left_offset + length;
        trim_syntax_tree(&mut self.syntax_tree, &(left_offset..right_offset));
        self.trim_tokens_to_substring(left_offset, right_offset);
        // Shift the surviving leaves into substring coordinates.
        mutate_leaves(&mut self.syntax_tree, &mut |token| {
            token.shift_left(left_offset)
        });
        self.trim_contents(left_offset, length);
        self.invalidate_lines_info();
        self.calculate_first_tokens_per_line();
        self.check_integrity();
    }

    // Reduces the token sequence to the tokens spanned by
    // [left_offset, right_offset), rebased to substring coordinates and
    // terminated with an EOF sentinel. The filtered view is rebuilt by index
    // arithmetic into the new sequence.
    fn trim_tokens_to_substring(&mut self, left_offset: usize, right_offset: usize) {
        tracing::trace!(left_offset, right_offset, "trim tokens to substring");
        let trim_range = self.token_range_spanning_offsets(left_offset, right_offset);

        // The view indices that fall within the kept token range.
        let view_begin = self.tokens_view.partition_point(|&i| i < trim_range.start);
        let view_end = view_begin
            + self.tokens_view[view_begin..].partition_point(|&i| i < trim_range.end);

        let mut trimmed: TokenSequence = self.tokens[trim_range.clone()].to_vec();

        // If the last token straddles the end of range (possible with a
        // lexical error), trim its tail, bounded by right_offset.
        if let Some(last) = trimmed.last_mut() {
            if last.right() > right_offset {
                tracing::trace!(
                    overhang = last.right() - right_offset,
                    "last token overhangs end of range"
                );
                last.extent = last.extent.start..right_offset;
            }
        }

        for token in &mut trimmed {
            token.shift_left(left_offset);
        }
        terminate_token_stream(&mut trimmed);

        let index_difference = trim_range.start;
        let trimmed_view: TokenStreamView = self.tokens_view[view_begin..view_end]
            .iter()
            .map(|&index| index - index_difference)
            .collect();

        self.tokens = trimmed;
        self.tokens_view = trimmed_view;
    }

    fn trim_contents(&mut self, left_offset: usize, length: usize) {
        assert!(left_offset + length <= self.window.len());
        let start = self.window.start + left_offset;
        self.window = start..start + length;
    }

    fn invalidate_lines_info(&mut self) {
        self.lines_info = OnceCell::new();
    }

    /// Resets all fields; the view then spans an empty slice.
    pub fn clear(&mut self) {
        self.syntax_tree = None;
        self.invalidate_lines_info();
        self.line_token_map.clear();
        self.tokens_view.clear();
        self.tokens.clear();
        self.window = self.window.start..self.window.start;
    }

    /// Bulk-substitutes syntax tree slots with the trees of separately
    /// analyzed substrings, splicing their token streams into this view's
    /// sequence at the recorded offsets. The subanalyses are consumed.
    pub fn expand_subtrees(&mut self, expansions: &mut NodeExpansionMap) {
        tracing::debug!(count = expansions.len(), "expanding subtrees");
        let mut combined_tokens = TokenSequence::new();
        // Collect integer indices and reconstruct the view only after the
        // combined sequence stops growing, so no entry is invalidated by
        // reallocation.
        let mut combined_view_indices: Vec<usize> = Vec::new();
        let mut token_cursor = 0usize;
        let mut view_cursor = 0usize;
        for (&offset, expansion) in expansions.iter_mut() {
            self.consume_deferred_expansion(
                &mut token_cursor,
                &mut view_cursor,
                expansion,
                &mut combined_tokens,
                &mut combined_view_indices,
                offset,
            );
        }

        // Copy the remaining tokens beyond the last expansion point.
        copy_tokens_and_view(
            &mut combined_tokens,
            &mut combined_view_indices,
            &self.tokens[token_cursor..],
            &self.tokens_view[view_cursor..],
            token_cursor,
        );

        self.tokens = combined_tokens;
        self.tokens_view = combined_view_indices;
        self.calculate_first_tokens_per_line();
        self.check_integrity();
    }

    // Incrementally copies the token slice up to one expansion point,
    // rebases the subanalysis into this buffer, splices its tokens and view,
    // and moves its tree into the recorded slot. Advances both cursors past
    // the replaced token.
    fn consume_deferred_expansion(
        &mut self,
        token_cursor: &mut usize,
        view_cursor: &mut usize,
        expansion: &mut DeferredExpansion,
        combined_tokens: &mut TokenSequence,
        combined_view_indices: &mut Vec<usize>,
        offset: usize,
    ) {
        let next_token = *token_cursor
            + self.tokens[*token_cursor..].partition_point(|t| t.left() < offset);
        assert!(
            next_token < self.tokens.len(),
            "expansion offset {} lies beyond the token stream",
            offset
        );
        let next_view = *view_cursor
            + self.tokens_view[*view_cursor..]
                .partition_point(|&index| self.tokens[index].left() < offset);
        assert!(
            next_view < self.tokens_view.len(),
            "expansion offset {} lies beyond the filtered token view",
            offset
        );

        // Copy tokens and the partial view up to this expansion point.
        copy_tokens_and_view(
            combined_tokens,
            combined_view_indices,
            &self.tokens[*token_cursor..next_token],
            &self.tokens_view[*view_cursor..next_view],
            *token_cursor,
        );

        // Adjust the subanalysis's token locations to point into this text.
        let sub_view = expansion.subanalysis.mutable_data();
        let sub_len = sub_view.contents().len();
        assert!(
            !Arc::ptr_eq(&sub_view.text, &self.text),
            "subanalysis must own a separate copy of its text before rebasing"
        );
        assert_eq!(
            sub_view.contents(),
            &self.contents()[offset..offset + sub_len],
            "subanalysis text does not match the parent slice at its offset"
        );
        sub_view.rebase_tokens_to_superstring(self.text.clone(), self.window.clone(), offset);

        // Remove the subanalysis's EOF sentinel (and its view entry); it
        // must not be spliced into the result.
        if sub_view.tokens.last().is_some_and(|t| t.is_eof()) {
            let eof_index = sub_view.tokens.len() - 1;
            sub_view.tokens.pop();
            while sub_view.tokens_view.last() == Some(&eof_index) {
                sub_view.tokens_view.pop();
            }
        }
        copy_tokens_and_view(
            combined_tokens,
            combined_view_indices,
            &sub_view.tokens,
            &sub_view.tokens_view,
            0,
        );

        // Transfer the subanalysis tree into the recorded slot.
        let subtree = sub_view.syntax_tree.take();
        let slot = subtree_at_path_mut(&mut self.syntax_tree, &expansion.insertion_point)
            .expect("expansion insertion point resolves to a slot in the parent tree");
        *slot = subtree;
        expansion.subanalysis.mutable_data().clear();

        // Advance one past the expansion point to skip the replaced token.
        *token_cursor = next_token + 1;
        *view_cursor = next_view + 1;
    }

    /// Verifies that token extents and view/line indices lie within this
    /// view's bounds. The extremities are checked, not every element.
    pub fn fast_token_range_consistency_check(&self) -> Result<(), ConsistencyError> {
        let limit = self.contents().len();
        if self.tokens.is_empty() {
            return Ok(());
        }
        let first = &self.tokens[0];
        if first.left() > limit {
            return Err(ConsistencyError::TokenRange(format!(
                "first token offset {} points past end of contents ({})",
                first.left(),
                limit
            )));
        }
        if let Some(last) = self.tokens.iter().rev().find(|t| !t.is_eof()) {
            if last.right() > limit {
                return Err(ConsistencyError::TokenRange(format!(
                    "token offset points past end of contents, delta={}",
                    last.right() - limit
                )));
            }
        }
        if !self.tokens_view.is_empty() {
            let first_index = self.tokens_view[0];
            let last_index = self.tokens_view[self.tokens_view.len() - 1];
            if first_index >= self.tokens.len() {
                return Err(ConsistencyError::TokenRange(
                    "first view index points past end of token array".to_string(),
                ));
            }
            if last_index >= self.tokens.len() {
                return Err(ConsistencyError::TokenRange(
                    "last view index points past end of token array".to_string(),
                ));
            }
        }
        if !self.line_token_map.is_empty() {
            if self.line_token_map[0] != 0 {
                return Err(ConsistencyError::TokenRange(
                    "per-line token map does not start at the beginning of the token sequence"
                        .to_string(),
                ));
            }
            if self.line_token_map[self.line_token_map.len() - 1] != self.tokens.len() {
                return Err(ConsistencyError::TokenRange(
                    "per-line token map does not end at the end of the token sequence".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Verifies the lazily computed line map against the contents.
    pub fn fast_line_range_consistency_check(&self) -> Result<(), ConsistencyError> {
        if let Some(map) = self.lines_info.get() {
            if map.line_starts().first() != Some(&0) {
                return Err(ConsistencyError::LineRange(
                    "first line does not match beginning of text".to_string(),
                ));
            }
            if map.last_line_offset() > self.contents().len() {
                return Err(ConsistencyError::LineRange(
                    "last line start points past end of text".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Verifies that the extreme leaves of the syntax tree lie within the
    /// contents.
    pub fn syntax_tree_consistency_check(&self) -> Result<(), ConsistencyError> {
        if let Some(root) = self.syntax_tree.as_deref() {
            let left = match leftmost_leaf(root) {
                None => return Ok(()),
                Some(leaf) => leaf,
            };
            let right = rightmost_leaf(root)
                .expect("a tree with a leftmost leaf also has a rightmost leaf");
            let limit = self.contents().len();
            if left.token.left() > limit {
                return Err(ConsistencyError::SyntaxTree(
                    "leftmost tree leaf points past end of contents".to_string(),
                ));
            }
            if right.token.right() > limit {
                return Err(ConsistencyError::SyntaxTree(
                    "rightmost tree leaf points past end of contents".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// All of this view's consistency checks combined.
    pub fn internal_consistency_check(&self) -> Result<(), ConsistencyError> {
        self.fast_line_range_consistency_check()?;
        self.fast_token_range_consistency_check()?;
        self.syntax_tree_consistency_check()
    }

    // A broken invariant is a programmer error; crash rather than let it
    // corrupt downstream analyses.
    fn check_integrity(&self) {
        if let Err(error) = self.internal_consistency_check() {
            panic!("internal consistency check failed: {}", error);
        }
    }
}

// Translates view indices into indices of the destination sequence, then
// appends the token slice. `source_base` is the index of `token_source[0]`
// in the sequence the view indices refer to.
fn copy_tokens_and_view(
    destination: &mut TokenSequence,
    view_indices: &mut Vec<usize>,
    token_source: &[Token],
    view_source: &[usize],
    source_base: usize,
) {
    for &view_index in view_source {
        view_indices.push(destination.len() + (view_index - source_base));
    }
    destination.extend(token_source.iter().cloned());
}

/// Owns a backing text and one analysis view of it.
#[derive(Debug)]
pub struct TextStructure {
    // This buffer backs every extent in the view.
    owned_contents: Arc<str>,
    data: TextStructureView,
}

impl TextStructure {
    pub fn new(contents: impl Into<String>) -> Self {
        let owned: Arc<str> = Arc::from(contents.into());
        let window = 0..owned.len();
        let structure = Self {
            owned_contents: owned.clone(),
            data: TextStructureView::new(owned, window),
        };
        if let Err(error) = structure.internal_consistency_check() {
            panic!("internal consistency check failed in constructor: {}", error);
        }
        structure
    }

    pub fn data(&self) -> &TextStructureView {
        &self.data
    }

    pub fn mutable_data(&mut self) -> &mut TextStructureView {
        &mut self.data
    }

    pub fn syntax_tree(&self) -> &ConcreteSyntaxTree {
        self.data.syntax_tree()
    }

    /// Verifies that the view still aliases the owned buffer. A cleared view
    /// (empty window) is exempt, matching the state left behind after its
    /// analysis was consumed by an expansion.
    pub fn string_view_consistency_check(&self) -> Result<(), ConsistencyError> {
        if self.data.window.is_empty() {
            return Ok(());
        }
        if !Arc::ptr_eq(&self.data.text, &self.owned_contents) {
            return Err(ConsistencyError::Ownership(
                "view contents do not alias the owned text; \
                 extents may reference another buffer"
                    .to_string(),
            ));
        }
        if self.data.window.end > self.owned_contents.len() {
            return Err(ConsistencyError::Ownership(
                "view window exceeds the owned text".to_string(),
            ));
        }
        Ok(())
    }

    /// Verifies ownership plus all of the view's internal invariants.
    pub fn internal_consistency_check(&self) -> Result<(), ConsistencyError> {
        self.string_view_consistency_check()?;
        self.data.internal_consistency_check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::tokens::TokenKind;
    use crate::text::syntax_tree::{leaf, node, NodeKind};
    use crate::text::token_stream::init_token_stream_view;

    // Builds "hello world" with tokens [hello][SP][world][EOF].
    fn hello_world() -> TextStructure {
        let mut structure = TextStructure::new("hello world");
        let view = structure.mutable_data();
        view.mutable_token_stream().extend([
            Token::new(TokenKind::Identifier, 0..5),
            Token::new(TokenKind::Whitespace, 5..6),
            Token::new(TokenKind::Identifier, 6..11),
            Token::eof(11),
        ]);
        *view.mutable_token_stream_view() = init_token_stream_view(view.token_stream());
        view.filter_tokens(|t| t.kind != TokenKind::Whitespace);
        view.calculate_first_tokens_per_line();
        structure.internal_consistency_check().unwrap();
        structure
    }

    #[test]
    fn test_construction_invariants() {
        let structure = hello_world();
        let view = structure.data();
        assert_eq!(view.contents(), "hello world");
        assert_eq!(view.line_token_map(), &[0, 4]);
        assert_eq!(view.token_stream_view(), &vec![0, 2, 3]);
    }

    #[test]
    fn test_token_range_spanning_offsets() {
        let structure = hello_world();
        let view = structure.data();
        assert_eq!(view.token_range_spanning_offsets(0, 11), 0..3);
        assert_eq!(view.token_range_spanning_offsets(5, 11), 1..3);
        assert_eq!(view.token_range_spanning_offsets(6, 11), 2..3);
        assert_eq!(view.token_range_spanning_offsets(0, 5), 0..1);
    }

    #[test]
    fn test_focus_on_substring() {
        let mut structure = hello_world();
        let view = structure.mutable_data();
        view.focus_on_subtree_spanning_substring(6, 5);
        assert_eq!(view.contents(), "world");
        assert_eq!(
            view.token_stream(),
            &vec![Token::new(TokenKind::Identifier, 0..5), Token::eof(5)]
        );
        assert_eq!(view.token_stream_view(), &vec![0]);
        structure.internal_consistency_check().unwrap();
    }

    #[test]
    fn test_focus_trims_overhanging_token() {
        let mut structure = TextStructure::new("abcdef");
        let view = structure.mutable_data();
        view.mutable_token_stream().extend([
            Token::new(TokenKind::Identifier, 0..2),
            Token::new(TokenKind::Unexpected, 2..6),
            Token::eof(6),
        ]);
        *view.mutable_token_stream_view() = init_token_stream_view(view.token_stream());
        view.calculate_first_tokens_per_line();
        // Keep [0, 4); the error token @2..6 overhangs and is clamped.
        view.focus_on_subtree_spanning_substring(0, 4);
        assert_eq!(view.contents(), "abcd");
        assert_eq!(
            view.token_stream(),
            &vec![
                Token::new(TokenKind::Identifier, 0..2),
                Token::new(TokenKind::Unexpected, 2..4),
                Token::eof(4),
            ]
        );
    }

    #[test]
    fn test_mutate_tokens_updates_leaves() {
        let mut structure = hello_world();
        let view = structure.mutable_data();
        *view.mutable_syntax_tree() = node(
            NodeKind::Expression,
            vec![
                leaf(Token::new(TokenKind::Identifier, 0..5)),
                leaf(Token::new(TokenKind::Identifier, 6..11)),
            ],
        );
        let mut touched = 0;
        view.mutate_tokens(&mut |token| {
            if token.kind == TokenKind::Identifier {
                touched += 1;
            }
        });
        // Two in the sequence plus two separate copies in the tree.
        assert_eq!(touched, 4);
    }

    #[test]
    fn test_rebase_to_superstring() {
        let parent = TextStructure::new("xx hello world yy");
        let mut sub = TextStructure::new("hello");
        let view = sub.mutable_data();
        view.mutable_token_stream().extend([
            Token::new(TokenKind::Identifier, 0..5),
            Token::eof(5),
        ]);
        view.rebase_tokens_to_superstring(
            parent.owned_contents.clone(),
            0..parent.owned_contents.len(),
            3,
        );
        assert_eq!(view.contents(), "xx hello world yy");
        assert_eq!(view.token_stream()[0].extent, 3..8);
        assert_eq!(view.token_stream()[0].text(view.contents()), "hello");
    }

    #[test]
    fn test_find_token_at() {
        let structure = hello_world();
        let view = structure.data();
        let token = view.find_token_at(LineColumn::new(0, 8));
        assert_eq!(token.extent, 6..11);
        assert!(view.find_token_at(LineColumn::new(5, 0)).is_eof());
    }

    #[test]
    fn test_clear() {
        let mut structure = hello_world();
        structure.mutable_data().clear();
        assert_eq!(structure.data().contents(), "");
        assert!(structure.data().token_stream().is_empty());
        structure.internal_consistency_check().unwrap();
    }
}
