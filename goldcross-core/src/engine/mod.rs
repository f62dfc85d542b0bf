//! Bar-by-bar simulation loop.
//!
//! Explicit sequential loop, one pass over the bars:
//! 1. Fill the market order carried over from the previous bar at this bar's
//!    open.
//! 2. Ask the evaluator for a decision at this bar's close and stage it as a
//!    pending market order.
//! 3. On the final bar only: a pending close fills at the final close so the
//!    forced liquidation lands in-sample; a pending buy expires unfilled
//!    (there is no next open to fill it at).
//! 4. Record equity = cash + position x close.
//!
//! The broker context is owned here and mutated only by fills; the strategy
//! reads it and returns intents.

use crate::domain::{Bar, BrokerContext, EquityPoint, TradeRecord};
use crate::indicators::{crossover, Sma};
use crate::strategy::{Action, BarSnapshot, GoldenCross};
use chrono::NaiveDateTime;

/// Complete output of a simulation run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Portfolio value at every bar close.
    pub equity_curve: Vec<EquityPoint>,
    /// Closed round-trip trades in chronological order.
    pub trades: Vec<TradeRecord>,
    pub bar_count: usize,
    /// Bars before the slow window has filled.
    pub warmup_bars: usize,
    /// Count of non-zero crossover signals over the run.
    pub signal_count: usize,
    /// Cash remaining after the final bar (position is always flat by then).
    pub final_cash: f64,
    pub starting_cash: f64,
}

#[derive(Debug, Clone, Copy)]
enum PendingOrder {
    Buy { size: f64 },
    Close,
}

/// Run the Golden Cross strategy over a bar series.
///
/// `bars` must be non-empty and time-ordered (the loader enforces both).
pub fn run(bars: &[Bar], strategy: &GoldenCross, starting_cash: f64) -> RunResult {
    assert!(!bars.is_empty(), "cannot run a backtest over zero bars");
    assert!(starting_cash > 0.0, "starting cash must be positive");

    let params = strategy.params();
    let fast = Sma::new(params.fast).compute(bars);
    let slow = Sma::new(params.slow).compute(bars);
    let cross = crossover(&fast, &slow);

    let mut broker = BrokerContext::new(starting_cash);
    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(bars.len());
    let mut pending: Option<PendingOrder> = None;
    let mut signal_count = 0usize;

    let n = bars.len();
    for (i, bar) in bars.iter().enumerate() {
        if let Some(order) = pending.take() {
            fill(&mut broker, &mut trades, order, bar.open, i, bar.ts);
        }

        let signal = cross[i];
        if signal != 0.0 && !signal.is_nan() {
            signal_count += 1;
        }

        let snapshot = BarSnapshot {
            close: bar.close,
            signal,
            is_last: i + 1 == n,
        };
        match strategy.decide(&snapshot, &broker) {
            Action::Hold => {}
            Action::Buy { size } => pending = Some(PendingOrder::Buy { size }),
            Action::CloseAll => pending = Some(PendingOrder::Close),
        }

        if i + 1 == n {
            if let Some(PendingOrder::Close) = pending.take() {
                fill(&mut broker, &mut trades, PendingOrder::Close, bar.close, i, bar.ts);
            }
        }

        equity_curve.push(EquityPoint {
            ts: bar.ts,
            value: broker.value(bar.close),
        });
    }

    RunResult {
        equity_curve,
        trades,
        bar_count: n,
        warmup_bars: params.slow,
        signal_count,
        final_cash: broker.cash,
        starting_cash,
    }
}

fn fill(
    broker: &mut BrokerContext,
    trades: &mut Vec<TradeRecord>,
    order: PendingOrder,
    price: f64,
    bar: usize,
    ts: NaiveDateTime,
) {
    match order {
        PendingOrder::Buy { size } => broker.open_long(size, price, bar, ts),
        PendingOrder::Close => {
            if let Some(trade) = broker.close_long(price, bar, ts) {
                trades.push(trade);
            }
        }
    }
}

impl RunResult {
    /// Realized profit and loss over the whole run.
    pub fn realized_pnl(&self) -> f64 {
        self.final_cash - self.starting_cash
    }

    /// First and last bar timestamps of the run.
    pub fn period(&self) -> (NaiveDateTime, NaiveDateTime) {
        (
            self.equity_curve.first().expect("non-empty run").ts,
            self.equity_curve.last().expect("non-empty run").ts,
        )
    }
}
