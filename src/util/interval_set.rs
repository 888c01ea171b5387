//! Sets of integral values stored as disjoint half-open intervals.
//!
//! Membership is represented as an ordered collection of non-overlapping,
//! non-empty `[min, max)` intervals. Mutating operations automatically fuse
//! abutting intervals, so the representation is canonical: two sets holding
//! the same values always compare equal.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

use rand::Rng;

use super::interval::Interval;

/// A set of values of `T`, stored as disjoint `[min, max)` intervals keyed by
/// their lower bounds. Lookup is a binary search over interval lower bounds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntervalSet<T: Ord + Copy> {
    // Invariants: all intervals are non-overlapping, non-empty, and fused
    // (prev.max < next.min).
    intervals: BTreeMap<T, T>,
}

impl<T: Ord + Copy> IntervalSet<T> {
    pub fn new() -> Self {
        Self {
            intervals: BTreeMap::new(),
        }
    }

    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Interval<T>>,
    {
        let mut set = Self::new();
        for range in ranges {
            set.add(range.into());
        }
        set
    }

    /// Returns the number of disjoint intervals that compose this set.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Interval<T>> + '_ {
        self.intervals
            .iter()
            .map(|(&min, &max)| Interval::new(min, max))
    }

    /// Returns the interval containing `value`, if any.
    pub fn find_value(&self, value: T) -> Option<Interval<T>> {
        let (&min, &max) = self.intervals.range(..=value).next_back()?;
        (value < max).then(|| Interval::new(min, max))
    }

    /// Returns the interval entirely containing `interval`, if any.
    /// Nothing contains an empty interval.
    pub fn find_interval(&self, interval: &Interval<T>) -> Option<Interval<T>> {
        assert!(interval.is_valid());
        if interval.is_empty() {
            return None;
        }
        let found = self.find_value(interval.min)?;
        (interval.max <= found.max).then_some(found)
    }

    /// Returns true if `value` is a member of an interval in the set.
    pub fn contains(&self, value: T) -> bool {
        self.find_value(value).is_some()
    }

    /// Returns true if `[lower, upper)` is entirely contained by one interval.
    pub fn contains_range(&self, lower: T, upper: T) -> bool {
        self.find_interval(&Interval::new(lower, upper)).is_some()
    }

    /// Returns the first interval that spans or follows `value`.
    pub fn lower_bound(&self, value: T) -> Option<Interval<T>> {
        if let Some(found) = self.find_value(value) {
            return Some(found);
        }
        self.upper_bound(value)
    }

    /// Returns the first interval whose lower bound follows `value`.
    pub fn upper_bound(&self, value: T) -> Option<Interval<T>> {
        self.intervals
            .range((Bound::Excluded(value), Bound::Unbounded))
            .next()
            .map(|(&min, &max)| Interval::new(min, max))
    }

    /// Adds an interval to the set, fusing any intervals it overlaps or abuts.
    /// Adding an empty interval changes nothing.
    pub fn add(&mut self, interval: impl Into<Interval<T>>) {
        let interval = interval.into();
        assert!(interval.is_valid(), "backwards interval");
        if interval.is_empty() {
            return;
        }

        // The set of existing intervals touching [min, max] is contiguous.
        // Start the scan at the predecessor when it reaches up to min.
        let scan_start = match self.intervals.range(..=interval.min).next_back() {
            Some((&min, &max)) if max >= interval.min => min,
            _ => interval.min,
        };
        let mut new_min = interval.min;
        let mut new_max = interval.max;
        let mut absorbed = Vec::new();
        for (&min, &max) in self.intervals.range(scan_start..=interval.max) {
            if max >= interval.min {
                absorbed.push(min);
                new_min = new_min.min(min);
                new_max = new_max.max(max);
            }
        }
        for key in absorbed {
            self.intervals.remove(&key);
        }
        self.intervals.insert(new_min, new_max);
        self.check_integrity();
    }

    /// Removes an interval from the set, splitting any interval it lands
    /// strictly inside. Removing an empty interval changes nothing.
    pub fn difference(&mut self, interval: impl Into<Interval<T>>) {
        let interval = interval.into();
        assert!(interval.is_valid(), "backwards interval");
        if interval.is_empty() || self.intervals.is_empty() {
            return;
        }

        let scan_start = match self.intervals.range(..=interval.min).next_back() {
            Some((&min, &max)) if max > interval.min => min,
            _ => interval.min,
        };
        let mut removed = Vec::new();
        let mut lower_remnant = None;
        let mut upper_remnant = None;
        for (&min, &max) in self
            .intervals
            .range((Bound::Included(scan_start), Bound::Excluded(interval.max)))
        {
            removed.push(min);
            if min < interval.min {
                lower_remnant = Some(Interval::new(min, interval.min));
            }
            if max > interval.max {
                upper_remnant = Some(Interval::new(interval.max, max));
            }
        }
        for key in removed {
            self.intervals.remove(&key);
        }
        for remnant in [lower_remnant, upper_remnant].into_iter().flatten() {
            self.intervals.insert(remnant.min, remnant.max);
        }
        self.check_integrity();
    }

    /// Subtracts all intervals in the other set from this one.
    pub fn difference_set(&mut self, other: &IntervalSet<T>) {
        for interval in other.iter() {
            self.difference(interval);
        }
    }

    /// Adds all intervals of the other set to this one.
    pub fn union(&mut self, other: &IntervalSet<T>) {
        for interval in other.iter() {
            self.add(interval);
        }
    }

    /// Inverts the set of values with respect to the given interval bound.
    pub fn complement(&mut self, bound: impl Into<Interval<T>>) {
        let mut temp = IntervalSet::from_ranges([bound.into()]);
        temp.difference_set(self);
        std::mem::swap(self, &mut temp);
    }

    /// Point-to-point transforms one interval set into another using a
    /// strictly monotonic function (which may be inverting). Intervals that
    /// collapse to empty under range compression are dropped.
    pub fn monotonic_transform<S: Ord + Copy>(&self, func: impl Fn(T) -> S) -> IntervalSet<S> {
        let mut result = IntervalSet::new();
        for interval in self.iter() {
            let mut left = func(interval.min);
            let mut right = func(interval.max);
            if left == right {
                continue;
            }
            if left > right {
                std::mem::swap(&mut left, &mut right);
            }
            result.intervals.insert(left, right);
        }
        result.check_integrity();
        result
    }

    // Checks the representation invariants: valid, non-empty, ordered,
    // fully fused intervals.
    fn check_integrity(&self) {
        let mut prev_max: Option<T> = None;
        for (&min, &max) in &self.intervals {
            assert!(min < max, "interval set holds an empty or invalid interval");
            if let Some(prev) = prev_max {
                assert!(prev < min, "interval set holds unfused intervals");
            }
            prev_max = Some(max);
        }
    }
}

impl<T> IntervalSet<T>
where
    T: Ord + Copy + std::ops::Add<Output = T> + From<u8>,
{
    /// Adds a single value to the set.
    pub fn add_value(&mut self, value: T) {
        self.add(Interval::new(value, value + T::from(1u8)));
    }

    /// Removes a single value from the set.
    pub fn difference_value(&mut self, value: T) {
        self.difference(Interval::new(value, value + T::from(1u8)));
    }
}

impl<T> IntervalSet<T>
where
    T: Ord + Copy + Into<i64>,
{
    /// Returns the sum of the sizes of all intervals, i.e. the number of
    /// values the set represents.
    pub fn sum_of_sizes(&self) -> u64 {
        self.iter()
            .map(|iv| (iv.max.into() - iv.min.into()) as u64)
            .sum()
    }
}

impl<T> IntervalSet<T>
where
    T: Ord + Copy + Into<i64> + TryFrom<i64>,
    <T as TryFrom<i64>>::Error: fmt::Debug,
{
    /// Returns a generator drawing uniformly distributed members of this set.
    /// The distribution is a snapshot of the current contents; subsequent
    /// mutations of the set do not affect the returned generator, and the set
    /// may be dropped while the generator lives on.
    pub fn uniform_random_generator(&self) -> impl Fn() -> T {
        assert!(
            !self.is_empty(),
            "non-empty interval set required for random generator"
        );
        // Cumulative distribution table for weighted sampling by interval size.
        let mut cumulative: u64 = 0;
        let table: Vec<(u64, i64)> = self
            .iter()
            .map(|iv| {
                let entry = (cumulative, iv.min.into());
                cumulative += (iv.max.into() - iv.min.into()) as u64;
                entry
            })
            .collect();
        let total = cumulative;
        move || {
            let rand = rand::thread_rng().gen_range(0..total);
            // The offset past the cumulative weight is already uniform within
            // the chosen interval.
            let index = table.partition_point(|&(weight, _)| weight <= rand) - 1;
            let (weight, min) = table[index];
            T::try_from(min + (rand - weight) as i64).expect("sampled value fits element type")
        }
    }
}

impl IntervalSet<i32> {
    /// Formats all intervals as comma-separated inclusive ranges, e.g. "2-5,9".
    pub fn format_inclusive(&self, compact: bool, delim: char) -> String {
        self.iter()
            .map(|iv| iv.format_inclusive(compact, delim))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<T: Ord + Copy, I: Into<Interval<T>>> FromIterator<I> for IntervalSet<T> {
    fn from_iter<It: IntoIterator<Item = I>>(iter: It) -> Self {
        Self::from_ranges(iter)
    }
}

impl<T: Ord + Copy + fmt::Display> fmt::Display for IntervalSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for interval in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", interval)?;
            first = false;
        }
        Ok(())
    }
}
