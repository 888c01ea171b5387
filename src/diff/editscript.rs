//! Minimal edit scripts between two random-access sequences.
//!
//! Returns the minimal number of edit operations (copy, delete, insert)
//! needed to transform one sequence of tokens into another, per Myers 1986:
//! "An O(ND) Difference Algorithm and Its Variations". The strategy
//! recursively peels off the common prefix and suffix, applies substring
//! fast paths, and otherwise finds the middle snake by walking interleaved
//! forward and reverse D-paths until they meet, then recurses on both
//! halves.

use serde::Serialize;

/// Edit operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Operation {
    Equals,
    Delete,
    Insert,
}

/// One edit over a half-open index interval `[start, end)`.
/// Indices for `Equals` and `Delete` point into the first sequence,
/// `Insert` into the second. Concatenating `Equals` and `Delete` slices
/// reconstructs the first sequence; `Equals` and `Insert` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Edit {
    pub operation: Operation,
    pub start: usize,
    pub end: usize,
}

pub type Edits = Vec<Edit>;

/// Computes the edits required to transform `tokens1` into `tokens2`.
/// Every token of both sequences belongs to exactly one edit.
pub fn diff_tokens<T: PartialEq>(tokens1: &[T], tokens2: &[T]) -> Edits {
    let mut edits = Edits::new();
    Differ { tokens1, tokens2 }.generate(
        0,
        tokens1.len() as i64,
        0,
        tokens2.len() as i64,
        &mut edits,
    );
    edits
}

// Appends an edit, fusing with the previous edit when contiguous.
fn append_edit(operation: Operation, start: i64, end: i64, edits: &mut Edits) {
    let (start, end) = (start as usize, end as usize);
    if let Some(last) = edits.last_mut() {
        if last.operation == operation && last.end == start {
            last.end = end;
            return;
        }
    }
    edits.push(Edit {
        operation,
        start,
        end,
    });
}

// Inserts an edit at `index`, fusing with a neighbor when contiguous.
fn insert_edit_at(index: usize, operation: Operation, start: i64, end: i64, edits: &mut Edits) {
    let (start, end) = (start as usize, end as usize);
    if index > 0 {
        let prev = &mut edits[index - 1];
        if prev.operation == operation && prev.end == start {
            prev.end = end;
            return;
        }
    }
    if index < edits.len() {
        let next = &mut edits[index];
        if next.operation == operation && next.start == end {
            next.start = start;
            return;
        }
    }
    edits.insert(
        index,
        Edit {
            operation,
            start,
            end,
        },
    );
}

struct Differ<'a, T> {
    tokens1: &'a [T],
    tokens2: &'a [T],
}

impl<T: PartialEq> Differ<'_, T> {
    // Recursive driver: peel common affixes, compute the middle block, then
    // restore the affixes as Equals edits.
    fn generate(&self, b1: i64, e1: i64, b2: i64, e2: i64, edits: &mut Edits) {
        let span1 = &self.tokens1[b1 as usize..e1 as usize];
        let span2 = &self.tokens2[b2 as usize..e2 as usize];

        // Equality speedup.
        if span1.len() == span2.len() && span1 == span2 {
            if !span1.is_empty() {
                append_edit(Operation::Equals, b1, e1, edits);
            }
            return;
        }

        let prefix_size = span1
            .iter()
            .zip(span2)
            .take_while(|(a, b)| a == b)
            .count() as i64;
        let suffix_size = span1[prefix_size as usize..]
            .iter()
            .rev()
            .zip(span2[prefix_size as usize..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count() as i64;

        // Remember the current location so the prefix can be inserted.
        let edits_size = edits.len();

        self.compute(
            b1 + prefix_size,
            e1 - suffix_size,
            b2 + prefix_size,
            e2 - suffix_size,
            edits,
        );

        if prefix_size != 0 {
            insert_edit_at(edits_size, Operation::Equals, b1, b1 + prefix_size, edits);
        }
        if suffix_size != 0 {
            append_edit(Operation::Equals, e1 - suffix_size, e1, edits);
        }
    }

    // Precondition: the spans share no prefix or suffix and are not equal.
    fn compute(&self, b1: i64, e1: i64, b2: i64, e2: i64, edits: &mut Edits) {
        let length1 = e1 - b1;
        let length2 = e2 - b2;
        if length1 == 0 && length2 != 0 {
            append_edit(Operation::Insert, b2, e2, edits);
            return;
        }
        if length2 == 0 && length1 != 0 {
            append_edit(Operation::Delete, b1, e1, edits);
            return;
        }
        if length1 > length2 {
            let haystack = &self.tokens1[b1 as usize..e1 as usize];
            let needle = &self.tokens2[b2 as usize..e2 as usize];
            if let Some(position) = find_subsequence(haystack, needle) {
                // tokens2 is a proper substring of tokens1: delete the rest.
                let offset = b1 + position as i64;
                let offset_end = offset + length2;
                append_edit(Operation::Delete, b1, offset, edits);
                append_edit(Operation::Equals, offset, offset_end, edits);
                append_edit(Operation::Delete, offset_end, e1, edits);
                return;
            }
            if length2 == 1 {
                // Single-token span; after the substring check the
                // operation cannot be Equals.
                append_edit(Operation::Delete, b1, e1, edits);
                append_edit(Operation::Insert, b2, e2, edits);
                return;
            }
        } else if length2 > length1 {
            let haystack = &self.tokens2[b2 as usize..e2 as usize];
            let needle = &self.tokens1[b1 as usize..e1 as usize];
            if let Some(position) = find_subsequence(haystack, needle) {
                // tokens1 is a proper substring of tokens2: insert the rest.
                let offset = b2 + position as i64;
                append_edit(Operation::Insert, b2, offset, edits);
                append_edit(Operation::Equals, b1, e1, edits); // index into tokens1
                append_edit(Operation::Insert, offset + length1, e2, edits);
                return;
            }
            if length1 == 1 {
                append_edit(Operation::Delete, b1, e1, edits);
                append_edit(Operation::Insert, b2, e2, edits);
                return;
            }
        }

        self.bisect(b1, e1, b2, e2, edits);
    }

    // Finds the middle snake and recurses on both halves; if the paths
    // never meet, the spans share nothing and the whole block is replaced.
    fn bisect(&self, b1: i64, e1: i64, b2: i64, e2: i64, edits: &mut Edits) {
        let (x1, y1) = self.bisect_split_points(b1, e1, b2, e2);
        if x1 >= 0 {
            self.generate(b1, b1 + x1, b2, b2 + y1, edits);
            self.generate(b1 + x1, e1, b2 + y1, e2, edits);
        } else {
            append_edit(Operation::Delete, b1, e1, edits);
            append_edit(Operation::Insert, b2, e2, edits);
        }
    }

    // Walks forward and reverse D-paths over an interleaved path array
    // until they collide, returning split points in each sequence, or
    // (-1, -1) when there is no common token at all.
    fn bisect_split_points(&self, b1: i64, e1: i64, b2: i64, e2: i64) -> (i64, i64) {
        let length1 = e1 - b1;
        let length2 = e2 - b2;
        let max_d = (length1 + length2 + 1) / 2;
        let v_offset = max_d;
        let v_size = 2 * max_d;
        let w_size = 2 * v_size;
        // Forward and reverse x-values interleave for cache friendliness.
        let mut w = vec![-1i64; (w_size + 4) as usize];

        w[(2 * v_offset + 2) as usize] = 0;
        w[(2 * v_offset + 3) as usize] = 0;
        let delta = length1 - length2;

        // If the total number of tokens is odd, the front path collides
        // with the reverse path.
        let front = delta % 2 != 0;

        // Offsets trimming the k loops when a path runs off the grid.
        let mut k1start = 0i64;
        let mut k1end = 0i64;
        let mut k2start = 0i64;
        let mut k2end = 0i64;

        let mut x1: i64;
        let mut y1: i64;

        for d in 0..max_d {
            // Walk the front path one step.
            let mut k1 = -d + k1start;
            while k1 <= d - k1end {
                let k1_offset = v_offset + k1;
                if k1 == -d
                    || (k1 != d && w[(2 * k1_offset - 2) as usize] < w[(2 * k1_offset + 2) as usize])
                {
                    x1 = w[(2 * k1_offset + 2) as usize];
                } else {
                    x1 = w[(2 * k1_offset - 2) as usize] + 1;
                }
                y1 = x1 - k1;
                while x1 < length1
                    && y1 < length2
                    && self.tokens1[(b1 + x1) as usize] == self.tokens2[(b2 + y1) as usize]
                {
                    x1 += 1;
                    y1 += 1;
                }
                w[(2 * k1_offset) as usize] = x1;
                if x1 > length1 {
                    // Ran off the right of the graph.
                    k1end += 2;
                } else if y1 > length2 {
                    // Ran off the bottom of the graph.
                    k1start += 2;
                } else if front {
                    let k2_offset = v_offset + delta - k1;
                    if k2_offset >= 0 && k2_offset < v_size && w[(2 * k2_offset + 1) as usize] != -1
                    {
                        // Mirror x2 onto the top-left coordinate system.
                        let x2 = length1 - w[(2 * k2_offset + 1) as usize];
                        if x1 >= x2 {
                            // Overlap detected.
                            return (x1, y1);
                        }
                    }
                }
                k1 += 2;
            }

            // Walk the reverse path one step.
            let mut k2 = -d + k2start;
            while k2 <= d - k2end {
                let k2_offset = v_offset + k2;
                let mut x2: i64;
                if k2 == -d
                    || (k2 != d && w[(2 * k2_offset - 1) as usize] < w[(2 * k2_offset + 3) as usize])
                {
                    x2 = w[(2 * k2_offset + 3) as usize];
                } else {
                    x2 = w[(2 * k2_offset - 1) as usize] + 1;
                }
                let mut y2 = x2 - k2;
                while x2 < length1
                    && y2 < length2
                    && self.tokens1[(b1 + length1 - x2 - 1) as usize]
                        == self.tokens2[(b2 + length2 - y2 - 1) as usize]
                {
                    x2 += 1;
                    y2 += 1;
                }
                w[(2 * k2_offset + 1) as usize] = x2;
                if x2 > length1 {
                    // Ran off the left of the graph.
                    k2end += 2;
                } else if y2 > length2 {
                    // Ran off the top of the graph.
                    k2start += 2;
                } else if !front {
                    let k1_offset = v_offset + delta - k2;
                    if k1_offset >= 0 && k1_offset < v_size && w[(2 * k1_offset) as usize] != -1 {
                        x1 = w[(2 * k1_offset) as usize];
                        y1 = v_offset + x1 - k1_offset;
                        // Mirror x2 onto the top-left coordinate system.
                        x2 = length1 - x2;
                        if x1 >= x2 {
                            // Overlap detected.
                            return (x1, y1);
                        }
                    }
                }
                k2 += 2;
            }
        }
        (-1, -1)
    }
}

// Position of `needle` within `haystack`, or None. Empty needles do not
// occur here; callers only search with a strictly shorter, non-empty span.
fn find_subsequence<T: PartialEq>(haystack: &[T], needle: &[T]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
