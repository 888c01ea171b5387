//! Type-safe offset and line-number sets.
//!
//! Both types wrap `IntervalSet<i32>`. They are deliberately distinct types
//! rather than aliases so that byte-offset and line-number domains cannot be
//! mixed up at a call site; mismatches are caught as type errors.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::util::interval::{parse_inclusive_range, Interval, IntervalParseError};
use crate::util::interval_set::IntervalSet;

/// Collection of ranges of byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByteOffsetSet(IntervalSet<i32>);

impl ByteOffsetSet {
    pub fn new() -> Self {
        Self(IntervalSet::new())
    }

    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Interval<i32>>,
    {
        Self(IntervalSet::from_ranges(ranges))
    }
}

impl From<IntervalSet<i32>> for ByteOffsetSet {
    fn from(set: IntervalSet<i32>) -> Self {
        Self(set)
    }
}

impl Deref for ByteOffsetSet {
    type Target = IntervalSet<i32>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ByteOffsetSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl fmt::Display for ByteOffsetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Collection of ranges of 1-based line numbers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineNumberSet(IntervalSet<i32>);

impl LineNumberSet {
    pub fn new() -> Self {
        Self(IntervalSet::new())
    }

    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Interval<i32>>,
    {
        Self(IntervalSet::from_ranges(ranges))
    }

    /// Parses a sequence of range specifications, each either a single value
    /// ("4") or an inclusive range ("2-7", like page numbers for printing).
    /// Overlapping and adjoining ranges are automatically merged. Blank
    /// specifications are ignored.
    pub fn parse<I, S>(specs: I) -> Result<Self, IntervalParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for spec in specs {
            let spec = spec.as_ref();
            if spec.is_empty() {
                continue;
            }
            match spec.split_once('-') {
                None => {
                    let line: i32 = spec.parse().map_err(|_| IntervalParseError {
                        input: spec.to_string(),
                    })?;
                    set.add_value(line);
                }
                Some((first, last)) => {
                    set.add(parse_inclusive_range(first, last)?);
                }
            }
        }
        Ok(set)
    }
}

impl From<IntervalSet<i32>> for LineNumberSet {
    fn from(set: IntervalSet<i32>) -> Self {
        Self(set)
    }
}

impl Deref for LineNumberSet {
    type Target = IntervalSet<i32>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LineNumberSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl fmt::Display for LineNumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_offset_set_init() {
        let s = ByteOffsetSet::from_ranges([(0, 1), (4, 7), (8, 10)]);
        assert!(s.contains(0));
        assert!(!s.contains(1));
        assert!(s.contains(5));
        assert!(s.contains(9));
    }

    #[test]
    fn test_line_number_set_parse_single_values() {
        let s = LineNumberSet::parse(["3", "5"]).unwrap();
        assert!(s.contains(3));
        assert!(!s.contains(4));
        assert!(s.contains(5));
    }

    #[test]
    fn test_line_number_set_parse_ranges() {
        let s = LineNumberSet::parse(["2-4", "4-6"]).unwrap();
        // Merged into one inclusive range 2..=6.
        assert_eq!(s.len(), 1);
        assert!(s.contains(2));
        assert!(s.contains(6));
        assert!(!s.contains(7));
    }

    #[test]
    fn test_line_number_set_parse_ignores_blanks() {
        let s = LineNumberSet::parse(["", "7"]).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_line_number_set_parse_error() {
        assert!(LineNumberSet::parse(["x"]).is_err());
        assert!(LineNumberSet::parse(["1-y"]).is_err());
    }
}
