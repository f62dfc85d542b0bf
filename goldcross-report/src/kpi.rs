//! KPI set — the flat mapping of named results for a completed run.
//!
//! Computed once from the analyzer outputs and immutable afterwards. Metrics
//! that can be undefined (no closed trades, no losing trades, too-short
//! series) are `Option<f64>` here; the `Display` impl substitutes the `-999`
//! sentinel in text output only.

use chrono::NaiveDateTime;
use goldcross_core::{DrawDown, TradeAnalysis};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable SQN rating.
///
/// Thresholds use `<`, not `<=`: a score of exactly 1.6 is already
/// "Below average".
pub fn sqn_rating(score: f64) -> &'static str {
    if score < 1.6 {
        "Poor"
    } else if score < 1.9 {
        "Below average"
    } else if score < 2.4 {
        "Average"
    } else if score < 2.9 {
        "Good"
    } else if score < 5.0 {
        "Excellent"
    } else if score < 6.9 {
        "Superb"
    } else {
        "Holy Grail"
    }
}

/// Named numeric results for one completed backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiSet {
    // ── PnL ──
    pub start_cash: f64,
    /// Realized profit and loss.
    pub rpl: f64,
    pub result_won_trades: f64,
    pub result_lost_trades: f64,
    /// Gross profit over gross loss magnitude; `None` without any loss.
    pub profit_factor: Option<f64>,
    pub rpl_per_trade: Option<f64>,
    /// Total return in percent of starting cash.
    pub total_return: f64,
    /// Annualized return in percent; `None` when the run spans no time.
    pub annual_return: Option<f64>,
    pub max_money_drawdown: f64,
    pub max_pct_drawdown: f64,

    // ── Trades ──
    pub total_number_trades: usize,
    pub trades_closed: usize,
    pub pct_winning: Option<f64>,
    pub pct_losing: Option<f64>,
    pub avg_money_winning: Option<f64>,
    pub avg_money_losing: Option<f64>,
    pub best_winning_trade: Option<f64>,
    pub worst_losing_trade: Option<f64>,

    // ── Performance ──
    pub sharpe_ratio: Option<f64>,
    pub sqn_score: Option<f64>,
    pub sqn_human: Option<String>,
}

impl KpiSet {
    /// Compute the KPI set from analyzer outputs.
    ///
    /// `period` is the (first, last) bar timestamp of the run. Guarded
    /// against zero closed trades: per-trade metrics become `None` instead
    /// of dividing.
    pub fn compute(
        start_cash: f64,
        trade_analysis: &TradeAnalysis,
        drawdown: &DrawDown,
        sharpe_ratio: Option<f64>,
        sqn_score: Option<f64>,
        period: (NaiveDateTime, NaiveDateTime),
    ) -> Self {
        let rpl = trade_analysis.realized_pnl();
        let total_return = rpl / start_cash;
        let closed = trade_analysis.closed;

        let elapsed_days = (period.1 - period.0).num_seconds() as f64 / 86_400.0;
        let annual_return = if elapsed_days > 0.0 {
            Some(100.0 * (1.0 + total_return).powf(365.25 / elapsed_days) - 100.0)
        } else {
            None
        };

        let per_closed = |value: f64| {
            if closed > 0 {
                Some(value / closed as f64)
            } else {
                None
            }
        };

        let profit_factor = if trade_analysis.lost.pnl_total != 0.0 {
            Some(-1.0 * trade_analysis.won.pnl_total / trade_analysis.lost.pnl_total)
        } else {
            None
        };

        Self {
            start_cash,
            rpl,
            result_won_trades: trade_analysis.won.pnl_total,
            result_lost_trades: trade_analysis.lost.pnl_total,
            profit_factor,
            rpl_per_trade: per_closed(rpl),
            total_return: 100.0 * total_return,
            annual_return,
            max_money_drawdown: drawdown.max_moneydown,
            max_pct_drawdown: drawdown.max_drawdown_pct,
            total_number_trades: trade_analysis.total,
            trades_closed: closed,
            pct_winning: per_closed(100.0 * trade_analysis.won.count as f64),
            pct_losing: per_closed(100.0 * trade_analysis.lost.count as f64),
            avg_money_winning: trade_analysis.won.pnl_average,
            avg_money_losing: trade_analysis.lost.pnl_average,
            best_winning_trade: trade_analysis.won.pnl_extreme,
            worst_losing_trade: trade_analysis.lost.pnl_extreme,
            sharpe_ratio,
            sqn_score,
            sqn_human: sqn_score.map(|s| sqn_rating(s).to_string()),
        }
    }

    /// Whether the run closed no trades at all.
    pub fn has_no_trades(&self) -> bool {
        self.trades_closed == 0
    }
}

/// Sentinel used when formatting an undefined value in text output.
const SENTINEL: f64 = -999.0;

fn opt(value: Option<f64>) -> f64 {
    value.unwrap_or(SENTINEL)
}

impl fmt::Display for KpiSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*** PnL: ***")?;
        writeln!(f, "Start capital         : {:4.2}", self.start_cash)?;
        writeln!(f, "Total net profit      : {:4.2}", self.rpl)?;
        writeln!(f, "Result winning trades : {:4.2}", self.result_won_trades)?;
        writeln!(f, "Result lost trades    : {:4.2}", self.result_lost_trades)?;
        writeln!(f, "Profit factor         : {:4.2}", opt(self.profit_factor))?;
        writeln!(f, "Total return          : {:4.2}%", self.total_return)?;
        writeln!(f, "Annual return         : {:4.2}%", opt(self.annual_return))?;
        writeln!(f, "Max. money drawdown   : {:4.2}", self.max_money_drawdown)?;
        writeln!(f, "Max. percent drawdown : {:4.2}%", self.max_pct_drawdown)?;
        writeln!(f)?;
        writeln!(f, "*** Trades ***")?;
        if self.has_no_trades() {
            writeln!(f, "Number of trades      : 0 (no closed trades)")?;
        } else {
            writeln!(f, "Number of trades      : {}", self.total_number_trades)?;
        }
        writeln!(f, "    %winning          : {:4.2}%", opt(self.pct_winning))?;
        writeln!(f, "    %losing           : {:4.2}%", opt(self.pct_losing))?;
        writeln!(f, "    avg money winning : {:4.2}", opt(self.avg_money_winning))?;
        writeln!(f, "    avg money losing  : {:4.2}", opt(self.avg_money_losing))?;
        writeln!(f, "    best winning trade: {:4.2}", opt(self.best_winning_trade))?;
        writeln!(f, "    worst losing trade: {:4.2}", opt(self.worst_losing_trade))?;
        writeln!(f)?;
        writeln!(f, "*** Performance ***")?;
        writeln!(f, "Sharpe ratio          : {:4.2}", opt(self.sharpe_ratio))?;
        writeln!(f, "SQN score             : {:4.2}", opt(self.sqn_score))?;
        write!(
            f,
            "SQN human             : {}",
            self.sqn_human.as_deref().unwrap_or("-999")
        )
    }
}
