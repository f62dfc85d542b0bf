//! Crossover series — golden cross and death cross detection.
//!
//! Derived from two moving-average series:
//! - `+1.0` when fast is above slow on this bar and was not on the previous bar
//! - `-1.0` when fast is below slow on this bar and was not on the previous bar
//! - `0.0` otherwise
//! - `NaN` while either input is still undefined on this bar
//!
//! An undefined previous bar counts as "was not above" and "was not below",
//! so a trend already in place when both windows fill fires a signal on the
//! first defined bar. A strict uptrend therefore produces exactly one buy
//! signal right after warm-up.

/// Compute the crossover series from fast and slow MA series.
///
/// Both inputs must have the same length; the output matches it.
pub fn crossover(fast: &[f64], slow: &[f64]) -> Vec<f64> {
    assert_eq!(fast.len(), slow.len(), "crossover input length mismatch");

    let defined = |i: usize| !fast[i].is_nan() && !slow[i].is_nan();

    (0..fast.len())
        .map(|i| {
            if !defined(i) {
                return f64::NAN;
            }
            let above = fast[i] > slow[i];
            let below = fast[i] < slow[i];
            let (prev_above, prev_below) = if i > 0 && defined(i - 1) {
                (fast[i - 1] > slow[i - 1], fast[i - 1] < slow[i - 1])
            } else {
                (false, false)
            };
            if above && !prev_above {
                1.0
            } else if below && !prev_below {
                -1.0
            } else {
                0.0
            }
        })
        .collect()
}
