//! Property-based tests for the interval-set algebra.

use proptest::prelude::*;

use svtext::util::interval::Interval;
use svtext::util::interval_set::IntervalSet;

fn interval_strategy() -> impl Strategy<Value = Interval<i32>> {
    (0i32..64, 0i32..16).prop_map(|(min, len)| Interval::new(min, min + len))
}

fn interval_set_strategy() -> impl Strategy<Value = IntervalSet<i32>> {
    prop::collection::vec(interval_strategy(), 0..8)
        .prop_map(|ranges| IntervalSet::from_ranges(ranges))
}

proptest! {
    #[test]
    fn union_membership_is_disjunction(
        a in interval_set_strategy(),
        b in interval_set_strategy(),
        x in -4i32..90,
    ) {
        let mut union = a.clone();
        union.union(&b);
        prop_assert_eq!(union.contains(x), a.contains(x) || b.contains(x));
    }

    #[test]
    fn difference_membership_is_conjunction(
        a in interval_set_strategy(),
        b in interval_set_strategy(),
        x in -4i32..90,
    ) {
        let mut difference = a.clone();
        difference.difference_set(&b);
        prop_assert_eq!(difference.contains(x), a.contains(x) && !b.contains(x));
    }

    #[test]
    fn difference_with_self_is_empty(a in interval_set_strategy()) {
        let mut difference = a.clone();
        difference.difference_set(&a);
        prop_assert!(difference.is_empty());
    }

    #[test]
    fn added_interval_contains_exactly_its_subranges(
        a in interval_set_strategy(),
        added in interval_strategy(),
        probe in interval_strategy(),
    ) {
        let mut with_added = a.clone();
        with_added.add(added);
        if !probe.is_empty() && added.contains_interval(&probe) {
            prop_assert!(with_added.contains_range(probe.min, probe.max));
        }
        // Everything previously contained is still contained.
        if !probe.is_empty() && a.contains_range(probe.min, probe.max) {
            prop_assert!(with_added.contains_range(probe.min, probe.max));
        }
    }

    #[test]
    fn complement_is_involution(a in interval_set_strategy()) {
        // The generated sets lie within the bound, so complementing twice
        // restores the original exactly.
        let bound = Interval::new(-8, 96);
        let mut twice = a.clone();
        twice.complement(bound);
        twice.complement(bound);
        prop_assert_eq!(&twice, &a);
    }

    #[test]
    fn monotonic_transform_preserves_membership(
        a in interval_set_strategy(),
        x in -4i32..90,
    ) {
        let shifted = a.monotonic_transform(|v| v + 1000);
        prop_assert_eq!(a.contains(x), shifted.contains(x + 1000));
    }

    #[test]
    fn sum_of_sizes_counts_members(a in interval_set_strategy()) {
        let count = (-8..96).filter(|&x| a.contains(x)).count() as u64;
        prop_assert_eq!(a.sum_of_sizes(), count);
    }

    #[test]
    fn random_generator_draws_members(a in interval_set_strategy()) {
        prop_assume!(!a.is_empty());
        let generator = a.uniform_random_generator();
        for _ in 0..8 {
            prop_assert!(a.contains(generator()));
        }
    }
}
