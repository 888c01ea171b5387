//! Random identifier generation for obfuscation flows.

use once_cell::sync::Lazy;

use crate::util::interval_set::IntervalSet;

static ALPHA_CHARS: Lazy<IntervalSet<i32>> = Lazy::new(|| {
    IntervalSet::from_ranges([('a' as i32, 'z' as i32 + 1), ('A' as i32, 'Z' as i32 + 1)])
});

static ALPHA_NUM_CHARS: Lazy<IntervalSet<i32>> = Lazy::new(|| {
    IntervalSet::from_ranges([
        ('a' as i32, 'z' as i32 + 1),
        ('A' as i32, 'Z' as i32 + 1),
        ('0' as i32, '9' as i32 + 1),
    ])
});

pub fn random_alpha_char() -> char {
    let generator = ALPHA_CHARS.uniform_random_generator();
    char::from_u32(generator() as u32).expect("alpha character set yields valid chars")
}

pub fn random_alpha_num_char() -> char {
    let generator = ALPHA_NUM_CHARS.uniform_random_generator();
    char::from_u32(generator() as u32).expect("alphanumeric character set yields valid chars")
}

/// Returns a random identifier with the same length as `input`: a leading
/// alphabetic character followed by alphanumeric characters. Used by
/// obfuscation, where renamed identifiers must preserve token lengths.
pub fn random_equal_length_identifier(input: &str) -> String {
    assert!(!input.is_empty());
    let mut s = String::with_capacity(input.len());
    s.push(random_alpha_char());
    for _ in 1..input.len() {
        s.push(random_alpha_num_char());
    }
    s
}
