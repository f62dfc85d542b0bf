//! Golden Cross strategy — SMA 50/200 crossover, long only.
//!
//! Buys when the fast moving average crosses above the slow one and no
//! position is held; closes the position on the reverse cross, or on the
//! final bar so a run never ends holding an open trade.

use crate::domain::BrokerContext;
use serde::{Deserialize, Serialize};

/// Strategy parameters.
///
/// Every field carries its default so partial config tables deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Fast MA window length.
    #[serde(default = "default_fast")]
    pub fast: usize,
    /// Slow MA window length.
    #[serde(default = "default_slow")]
    pub slow: usize,
    /// Fraction of available cash deployed per entry. Less than 1.0 leaves a
    /// buffer for fills gapping above the signal close.
    #[serde(default = "default_order_pct")]
    pub order_pct: f64,
    /// Market label used in log lines and the report header.
    #[serde(default = "default_market")]
    pub market: String,
}

fn default_fast() -> usize {
    50
}

fn default_slow() -> usize {
    200
}

fn default_order_pct() -> f64 {
    0.95
}

fn default_market() -> String {
    "BTC/USD".to_string()
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            fast: default_fast(),
            slow: default_slow(),
            order_pct: default_order_pct(),
            market: default_market(),
        }
    }
}

impl StrategyParams {
    /// One-line summary for report headers and log output.
    pub fn summary(&self) -> String {
        format!(
            "fast={}, slow={}, order_pct={}, market={}",
            self.fast, self.slow, self.order_pct, self.market
        )
    }
}

/// Per-bar inputs for the decision function. Assembled by the engine loop.
#[derive(Debug, Clone, Copy)]
pub struct BarSnapshot {
    /// Close price of the current bar.
    pub close: f64,
    /// Crossover signal value: +1 / -1 / 0, NaN during warm-up.
    pub signal: f64,
    /// Whether this is the last bar of available data.
    pub is_last: bool,
}

/// Decision returned by the evaluator for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Hold,
    /// Open a long position of `size` units.
    Buy { size: f64 },
    /// Close the entire open position.
    CloseAll,
}

/// The Golden Cross evaluator.
///
/// A pure decision function over (signal, position, cash, price): it holds no
/// state of its own and never mutates the broker.
#[derive(Debug, Clone)]
pub struct GoldenCross {
    params: StrategyParams,
}

impl GoldenCross {
    pub fn new(params: StrategyParams) -> Self {
        assert!(params.fast >= 1, "fast period must be >= 1");
        assert!(
            params.slow > params.fast,
            "slow period must be > fast period"
        );
        assert!(
            params.order_pct > 0.0 && params.order_pct <= 1.0,
            "order_pct must be in (0, 1]"
        );
        Self { params }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Display name used in the report header.
    pub fn name(&self) -> &'static str {
        "GoldenCross"
    }

    /// Bars required before the first signal can exist.
    pub fn warmup_bars(&self) -> usize {
        self.params.slow
    }

    /// Decide what to do on the current bar.
    ///
    /// A NaN signal (warm-up) never trades. Sizing: a fixed fraction of
    /// available cash divided by the current close.
    pub fn decide(&self, snapshot: &BarSnapshot, broker: &BrokerContext) -> Action {
        if !snapshot.close.is_finite() || snapshot.close <= 0.0 {
            return Action::Hold;
        }

        if broker.is_flat() {
            if snapshot.signal > 0.0 {
                let size = self.params.order_pct * broker.cash / snapshot.close;
                if size > 0.0 {
                    return Action::Buy { size };
                }
            }
            return Action::Hold;
        }

        // Position open: exit on the down-cross, or force liquidation when
        // the data ends so statistics never include an unfinished trade.
        if snapshot.signal < 0.0 || snapshot.is_last {
            return Action::CloseAll;
        }
        Action::Hold
    }
}
