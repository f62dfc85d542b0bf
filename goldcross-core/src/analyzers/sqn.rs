//! System Quality Number.
//!
//! `SQN = sqrt(n) * mean(trade PnL) / std(trade PnL)` over closed trades,
//! with sample standard deviation. Undefined with fewer than two trades or
//! zero PnL variance.

use crate::domain::TradeRecord;

/// Compute the SQN score, or `None` when it is undefined.
pub fn sqn(trades: &[TradeRecord]) -> Option<f64> {
    if trades.len() < 2 {
        return None;
    }
    let n = trades.len() as f64;
    let mean = trades.iter().map(|t| t.pnl).sum::<f64>() / n;
    let variance = trades.iter().map(|t| (t.pnl - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();
    if std < 1e-15 {
        return None;
    }
    Some(n.sqrt() * mean / std)
}
