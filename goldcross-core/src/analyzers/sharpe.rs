//! Sharpe ratio over monthly returns.
//!
//! The equity curve is bucketed by calendar month (last value per month);
//! excess returns over the monthly-converted risk-free rate are averaged and
//! divided by their sample standard deviation. Not annualized.

use crate::domain::EquityPoint;
use chrono::Datelike;

/// Monthly-timeframe Sharpe ratio with a configurable annual risk-free rate.
#[derive(Debug, Clone)]
pub struct SharpeRatio {
    /// Annual risk-free rate as a fraction (0.01 = 1%).
    pub risk_free_rate: f64,
}

impl Default for SharpeRatio {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.01,
        }
    }
}

impl SharpeRatio {
    pub fn new(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }

    /// Compute the ratio, or `None` when the series spans fewer than three
    /// calendar months (fewer than two monthly returns) or has zero variance.
    pub fn compute(&self, curve: &[EquityPoint]) -> Option<f64> {
        let monthly = monthly_closes(curve);
        if monthly.len() < 3 {
            return None;
        }

        let monthly_rf = (1.0 + self.risk_free_rate).powf(1.0 / 12.0) - 1.0;
        let excess: Vec<f64> = monthly
            .windows(2)
            .map(|w| {
                let ret = if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 };
                ret - monthly_rf
            })
            .collect();

        let mean = excess.iter().sum::<f64>() / excess.len() as f64;
        let variance = excess.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
            / (excess.len() - 1) as f64;
        let std = variance.sqrt();
        if std < 1e-15 {
            return None;
        }
        Some(mean / std)
    }
}

/// Last equity value of each calendar month, in order.
fn monthly_closes(curve: &[EquityPoint]) -> Vec<f64> {
    let mut out: Vec<((i32, u32), f64)> = Vec::new();
    for point in curve {
        let key = (point.ts.year(), point.ts.month());
        match out.last_mut() {
            Some((last_key, value)) if *last_key == key => *value = point.value,
            _ => out.push((key, point.value)),
        }
    }
    out.into_iter().map(|(_, v)| v).collect()
}
