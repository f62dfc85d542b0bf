//! Period bucketing for the returns chart.
//!
//! The bucket width is chosen from the total backtest duration; yearly and
//! monthly buckets follow the calendar, the faster periodicities use
//! fixed-width windows anchored at the curve start. Resampling takes the
//! last equity value of each bucket.

use chrono::Datelike;
use goldcross_core::EquityPoint;
use serde::{Deserialize, Serialize};

/// Chart bucket width for periodic returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Periodicity {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    PerMin15,
    PerMin,
}

impl Periodicity {
    /// Pick the bucket width for a backtest spanning `days` fractional days.
    pub fn from_days(days: f64) -> Self {
        if days > 5.0 * 365.25 {
            Periodicity::Yearly
        } else if days > 365.25 {
            Periodicity::Monthly
        } else if days > 50.0 {
            Periodicity::Weekly
        } else if days > 5.0 {
            Periodicity::Daily
        } else if days > 0.5 {
            Periodicity::Hourly
        } else if days > 0.05 {
            Periodicity::PerMin15
        } else {
            Periodicity::PerMin
        }
    }

    /// Chart title prefix.
    pub fn label(&self) -> &'static str {
        match self {
            Periodicity::Yearly => "Yearly",
            Periodicity::Monthly => "Monthly",
            Periodicity::Weekly => "Weekly",
            Periodicity::Daily => "Daily",
            Periodicity::Hourly => "Hourly",
            Periodicity::PerMin15 => "Per 15 Min",
            Periodicity::PerMin => "Per minute",
        }
    }

    /// Fixed window width in seconds, `None` for calendar buckets.
    fn window_seconds(&self) -> Option<i64> {
        match self {
            Periodicity::Yearly | Periodicity::Monthly => None,
            Periodicity::Weekly => Some(7 * 24 * 3600),
            Periodicity::Daily => Some(24 * 3600),
            Periodicity::Hourly => Some(3600),
            Periodicity::PerMin15 => Some(15 * 60),
            Periodicity::PerMin => Some(60),
        }
    }
}

/// One bar of the returns chart: the bucket's closing timestamp and its
/// return in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReturn {
    pub ts: chrono::NaiveDateTime,
    pub pct: f64,
}

/// Resample the curve to one value per bucket (the last), then difference
/// into percentage returns. The first bucket has no predecessor and yields
/// no bar.
pub fn periodic_returns(curve: &[EquityPoint], periodicity: Periodicity) -> Vec<PeriodReturn> {
    let closes = resample_last(curve, periodicity);
    closes
        .windows(2)
        .filter(|w| w[1].value != 0.0)
        .map(|w| PeriodReturn {
            ts: w[1].ts,
            pct: 100.0 * (w[1].value - w[0].value) / w[1].value,
        })
        .collect()
}

/// Last equity point of each bucket, in order.
fn resample_last(curve: &[EquityPoint], periodicity: Periodicity) -> Vec<EquityPoint> {
    let start = match curve.first() {
        Some(p) => p.ts,
        None => return Vec::new(),
    };

    let bucket_key = |p: &EquityPoint| -> i64 {
        match periodicity.window_seconds() {
            Some(width) => (p.ts - start).num_seconds() / width,
            None => match periodicity {
                Periodicity::Yearly => p.ts.year() as i64,
                // Monthly: year*12 + month orders buckets across year breaks.
                _ => p.ts.year() as i64 * 12 + p.ts.month() as i64,
            },
        }
    };

    let mut out: Vec<(i64, EquityPoint)> = Vec::new();
    for point in curve {
        let key = bucket_key(point);
        match out.last_mut() {
            Some((last_key, slot)) if *last_key == key => *slot = point.clone(),
            _ => out.push((key, point.clone())),
        }
    }
    out.into_iter().map(|(_, p)| p).collect()
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

    fn daily_curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| EquityPoint {
                ts: ts0() + Duration::days(i as i64),
                value,
            })
            .collect()
    }

    // ── Duration thresholds ──

    #[test]
    fn duration_thresholds() {
        assert_eq!(Periodicity::from_days(6.0 * 365.25), Periodicity::Yearly);
        assert_eq!(Periodicity::from_days(2.0 * 365.25), Periodicity::Monthly);
        assert_eq!(Periodicity::from_days(100.0), Periodicity::Weekly);
        assert_eq!(Periodicity::from_days(30.0), Periodicity::Daily);
        assert_eq!(Periodicity::from_days(2.0), Periodicity::Hourly);
        assert_eq!(Periodicity::from_days(0.2), Periodicity::PerMin15);
        assert_eq!(Periodicity::from_days(0.01), Periodicity::PerMin);
    }

    #[test]
    fn threshold_edges_are_strict() {
        // Exactly at a boundary falls to the finer periodicity.
        assert_eq!(Periodicity::from_days(365.25), Periodicity::Weekly);
        assert_eq!(Periodicity::from_days(50.0), Periodicity::Daily);
        assert_eq!(Periodicity::from_days(5.0), Periodicity::Hourly);
        assert_eq!(Periodicity::from_days(0.5), Periodicity::PerMin15);
        assert_eq!(Periodicity::from_days(0.05), Periodicity::PerMin);
    }

    // ── Resampling ──

    #[test]
    fn weekly_buckets_take_last_value() {
        // 15 daily points: buckets of 7 days → windows [0..7), [7..14), [14..15).
        let values: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let resampled = resample_last(&daily_curve(&values), Periodicity::Weekly);
        assert_eq!(resampled.len(), 3);
        assert_eq!(resampled[0].value, 106.0);
        assert_eq!(resampled[1].value, 113.0);
        assert_eq!(resampled[2].value, 114.0);
    }

    #[test]
    fn monthly_buckets_follow_the_calendar() {
        // 90 days from Jan 1: Jan, Feb, Mar buckets.
        let values: Vec<f64> = (0..90).map(|i| 100.0 + i as f64).collect();
        let resampled = resample_last(&daily_curve(&values), Periodicity::Monthly);
        assert_eq!(resampled.len(), 3);
        // January 2023 ends at index 30 (Jan 31).
        assert_eq!(resampled[0].value, 130.0);
    }

    #[test]
    fn returns_divide_by_current_value() {
        // Two weekly buckets closing at 106 and 113:
        // return = 100 * (113 - 106) / 113.
        let values: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let returns = periodic_returns(&daily_curve(&values), Periodicity::Weekly);
        assert_eq!(returns.len(), 2);
        assert!((returns[0].pct - 100.0 * 7.0 / 113.0).abs() < 1e-10);
    }

    #[test]
    fn single_bucket_yields_no_returns() {
        let returns = periodic_returns(&daily_curve(&[100.0, 101.0]), Periodicity::Weekly);
        assert!(returns.is_empty());
    }

    #[test]
    fn empty_curve_is_empty() {
        assert!(periodic_returns(&[], Periodicity::Daily).is_empty());
    }
}
