//! Equity-curve shaping for the report: normalization and the buy-and-hold
//! comparison curve.

use goldcross_core::{Bar, EquityPoint};

/// Rescale a curve to start at 100.
///
/// Returns an empty vector when the input is empty or starts non-positive
/// (nothing meaningful to normalize against).
pub fn normalized(curve: &[EquityPoint]) -> Vec<EquityPoint> {
    let first = match curve.first() {
        Some(p) if p.value > 0.0 => p.value,
        _ => return Vec::new(),
    };
    curve
        .iter()
        .map(|p| EquityPoint {
            ts: p.ts,
            value: 100.0 * p.value / first,
        })
        .collect()
}

/// Buy-and-hold curve from open prices, starting at 100.
pub fn buy_and_hold(bars: &[Bar]) -> Vec<EquityPoint> {
    let first = match bars.first() {
        Some(b) if b.open > 0.0 => b.open,
        _ => return Vec::new(),
    };
    bars.iter()
        .map(|b| EquityPoint {
            ts: b.ts,
            value: 100.0 * b.open / first,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn ts0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| EquityPoint {
                ts: ts0() + Duration::days(i as i64),
                value,
            })
            .collect()
    }

    #[test]
    fn normalized_starts_at_100() {
        let out = normalized(&curve(&[250.0, 275.0, 225.0]));
        assert_eq!(out[0].value, 100.0);
        assert!((out[1].value - 110.0).abs() < 1e-10);
        assert!((out[2].value - 90.0).abs() < 1e-10);
    }

    #[test]
    fn empty_or_degenerate_input_is_empty() {
        assert!(normalized(&[]).is_empty());
        assert!(normalized(&curve(&[0.0, 10.0])).is_empty());
    }

    #[test]
    fn buy_and_hold_uses_opens() {
        let bars: Vec<Bar> = [(10.0, 11.0), (11.0, 12.0), (12.0, 9.0)]
            .iter()
            .enumerate()
            .map(|(i, &(open, close))| Bar {
                ts: ts0() + Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 0.0,
            })
            .collect();
        let out = buy_and_hold(&bars);
        assert_eq!(out[0].value, 100.0);
        assert!((out[1].value - 110.0).abs() < 1e-10);
        assert!((out[2].value - 120.0).abs() < 1e-10);
    }
}
