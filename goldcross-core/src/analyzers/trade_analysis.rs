//! Trade-level statistics: totals and won/lost breakdowns.

use crate::domain::TradeRecord;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over one side of the trade ledger (winners or losers).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSideStats {
    pub count: usize,
    /// Sum of PnL over this side.
    pub pnl_total: f64,
    /// Average PnL, `None` when the side is empty.
    pub pnl_average: Option<f64>,
    /// Extreme PnL for this side: the best win, or the worst loss.
    pub pnl_extreme: Option<f64>,
}

impl TradeSideStats {
    fn collect<'a>(trades: impl Iterator<Item = &'a TradeRecord>, best: bool) -> Self {
        let pnls: Vec<f64> = trades.map(|t| t.pnl).collect();
        if pnls.is_empty() {
            return Self::default();
        }
        let total: f64 = pnls.iter().sum();
        let extreme = pnls
            .iter()
            .copied()
            .reduce(|a, b| if (b > a) == best { b } else { a });
        Self {
            count: pnls.len(),
            pnl_total: total,
            pnl_average: Some(total / pnls.len() as f64),
            pnl_extreme: extreme,
        }
    }
}

/// Trade analysis over a completed run.
///
/// `total` counts every opened trade including any still open; with the
/// engine's forced final-bar liquidation, `total == closed` in practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAnalysis {
    pub total: usize,
    pub closed: usize,
    pub open: usize,
    pub won: TradeSideStats,
    pub lost: TradeSideStats,
}

impl TradeAnalysis {
    pub fn from_trades(trades: &[TradeRecord], open: usize) -> Self {
        let won = TradeSideStats::collect(trades.iter().filter(|t| t.is_winner()), true);
        let lost = TradeSideStats::collect(trades.iter().filter(|t| !t.is_winner()), false);
        Self {
            total: trades.len() + open,
            closed: trades.len(),
            open,
            won,
            lost,
        }
    }

    /// Sum of realized PnL across all closed trades.
    pub fn realized_pnl(&self) -> f64 {
        self.won.pnl_total + self.lost.pnl_total
    }
}
