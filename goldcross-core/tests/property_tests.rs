//! Property tests for engine invariants.
//!
//! Uses proptest to verify, over arbitrary price paths:
//! 1. Warm-up — no entry fill lands before the slow window has filled
//! 2. Accounting — realized PnL always equals the sum of trade PnLs
//! 3. Flat at end — a finished run never holds a position
//! 4. Equity sanity — every equity point is finite and positive

use chrono::{Duration, NaiveDate};
use goldcross_core::{run, Bar, GoldenCross, StrategyParams};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// A positive price path built from a start price and per-bar moves.
fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    (
        50.0..150.0_f64,
        prop::collection::vec(-0.04..0.05_f64, 12..120),
    )
        .prop_map(|(start, moves)| {
            let mut closes = Vec::with_capacity(moves.len() + 1);
            let mut price = start;
            closes.push(price);
            for m in moves {
                price *= 1.0 + m;
                closes.push(price);
            }
            closes
        })
}

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                ts: base + Duration::days(i as i64),
                open,
                high: open.max(close) * 1.01,
                low: open.min(close) * 0.99,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

fn strategy() -> GoldenCross {
    GoldenCross::new(StrategyParams {
        fast: 3,
        slow: 8,
        order_pct: 0.95,
        market: "PROP".to_string(),
    })
}

proptest! {
    /// No entry fill before the slow window has filled.
    #[test]
    fn no_entry_inside_warmup(closes in arb_closes()) {
        let bars = make_bars(&closes);
        let result = run(&bars, &strategy(), 100.0);
        for trade in &result.trades {
            // Earliest signal at index slow-1, earliest fill one bar later.
            prop_assert!(trade.entry_bar >= result.warmup_bars);
        }
    }

    /// Cash deltas and trade PnLs tell the same story.
    #[test]
    fn realized_pnl_equals_trade_sum(closes in arb_closes()) {
        let bars = make_bars(&closes);
        let result = run(&bars, &strategy(), 100.0);
        let pnl_sum: f64 = result.trades.iter().map(|t| t.pnl).sum();
        prop_assert!((result.realized_pnl() - pnl_sum).abs() < 1e-8);
    }

    /// Forced liquidation leaves the account flat: the final equity point
    /// equals final cash.
    #[test]
    fn run_ends_flat(closes in arb_closes()) {
        let bars = make_bars(&closes);
        let result = run(&bars, &strategy(), 100.0);
        let last = result.equity_curve.last().unwrap();
        prop_assert!((last.value - result.final_cash).abs() < 1e-8);
    }

    /// Equity is always finite and positive for positive price paths.
    #[test]
    fn equity_is_finite_and_positive(closes in arb_closes()) {
        let bars = make_bars(&closes);
        let result = run(&bars, &strategy(), 100.0);
        prop_assert_eq!(result.equity_curve.len(), bars.len());
        for point in &result.equity_curve {
            prop_assert!(point.value.is_finite());
            prop_assert!(point.value > 0.0);
        }
    }

    /// Trades are well-formed: entry strictly before exit, in order.
    #[test]
    fn trades_are_ordered_round_trips(closes in arb_closes()) {
        let bars = make_bars(&closes);
        let result = run(&bars, &strategy(), 100.0);
        let mut prev_exit = 0usize;
        for trade in &result.trades {
            prop_assert!(trade.entry_bar < trade.exit_bar || trade.bars_held == 0);
            prop_assert!(trade.entry_bar >= prev_exit);
            prop_assert!(trade.quantity > 0.0);
            prev_exit = trade.exit_bar;
        }
    }
}
