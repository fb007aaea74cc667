/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```should_panic
/// # use gridmdp::assert_interval;
/// let value = 2.0;
/// assert_interval!(value, 0.0, 1.0);
/// ```
/// This will panic with the message "Invalid value for \`value\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Index of the largest value, ties going to the first one
///
/// **Panics** if `values` is empty
pub(crate) fn argmax(values: &[f64]) -> usize {
    assert!(!values.is_empty(), "`values` is not empty");
    values
        .iter()
        .enumerate()
        .skip(1)
        .fold(0, |best, (i, &v)| if v > values[best] { i } else { best })
}

/// Largest value, or negative infinity if `values` is empty
pub(crate) fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_first_of_ties() {
        assert_eq!(argmax(&[0.0, 1.0, 1.0, -1.0]), 1);
        assert_eq!(argmax(&[0.0, 0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[-3.0]), 0);
    }

    #[test]
    fn max_of_row() {
        assert_eq!(max(&[0.5, -2.0, 3.25]), 3.25);
        assert_eq!(max(&[]), f64::NEG_INFINITY);
    }

    #[test]
    #[should_panic(expected = "Must be in the interval [0, 1]")]
    fn interval_violation_panics() {
        let gamma = 1.5;
        assert_interval!(gamma, 0.0, 1.0);
    }
}
