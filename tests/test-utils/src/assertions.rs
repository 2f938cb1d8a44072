//! Custom assertions for testing

use std::fmt::Debug;

/// Assert that two floating point values are approximately equal
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "Values not approximately equal: {left} != {right} (diff: {diff}, tolerance: {tolerance})"
    );
}

/// Assert that a collection is sorted in descending order
pub fn assert_sorted_desc<T: PartialOrd + Debug>(collection: &[T]) {
    for window in collection.windows(2) {
        assert!(
            window[0] >= window[1],
            "Collection not sorted descending at elements: {:?} < {:?}",
            window[0],
            window[1]
        );
    }
}

/// Assert that an error's message contains a specific fragment
pub fn assert_error_contains<E: std::fmt::Display>(error: &E, expected: &str) {
    let error_str = error.to_string();
    assert!(
        error_str.contains(expected),
        "Error message '{error_str}' does not contain '{expected}'"
    );
}

/// Assert that two float slices are bit-identical, NaN included
pub fn assert_bit_identical(left: &[f64], right: &[f64]) {
    assert_eq!(left.len(), right.len(), "Slices differ in length");
    for (i, (l, r)) in left.iter().zip(right).enumerate() {
        assert_eq!(
            l.to_bits(),
            r.to_bits(),
            "Values differ at index {i}: {l} vs {r}"
        );
    }
}
