//! TradeRecord — a completed round-trip trade.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A complete round-trip trade record: entry → exit.
///
/// Only closed trades are recorded; the engine forces liquidation on the final
/// bar, so a finished run never leaves a trade open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    // ── Entry ──
    pub entry_bar: usize,
    pub entry_ts: NaiveDateTime,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_bar: usize,
    pub exit_ts: NaiveDateTime,
    pub exit_price: f64,

    // ── Size / PnL ──
    pub quantity: f64,
    pub pnl: f64,

    // ── Duration ──
    pub bars_held: usize,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    /// Holding time in fractional days.
    pub fn duration_days(&self) -> f64 {
        let secs = (self.exit_ts - self.entry_ts).num_seconds();
        secs as f64 / 86_400.0
    }
}
