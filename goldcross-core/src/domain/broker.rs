//! BrokerContext — explicit cash and position state owned by the engine loop.

use super::trade::TradeRecord;
use chrono::NaiveDateTime;

/// Mutable broker state for a single-instrument, long-only account.
///
/// The simulation loop owns this struct and applies every fill to it; the
/// strategy evaluator only ever reads it. Holds at most one open lot — no
/// pyramiding, no shorting.
#[derive(Debug, Clone)]
pub struct BrokerContext {
    pub cash: f64,
    starting_cash: f64,
    position: f64,
    entry: Option<EntryLot>,
}

#[derive(Debug, Clone)]
struct EntryLot {
    bar: usize,
    ts: NaiveDateTime,
    price: f64,
}

impl BrokerContext {
    pub fn new(starting_cash: f64) -> Self {
        Self {
            cash: starting_cash,
            starting_cash,
            position: 0.0,
            entry: None,
        }
    }

    pub fn starting_cash(&self) -> f64 {
        self.starting_cash
    }

    /// Units currently held (zero or positive).
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_flat(&self) -> bool {
        self.position == 0.0
    }

    /// Account value at the given mark price: cash + position value.
    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.position * price
    }

    /// Open a long lot at `price`. Size is clamped to what cash can pay for,
    /// so the account can never go negative on a gap above the signal close.
    pub fn open_long(&mut self, mut size: f64, price: f64, bar: usize, ts: NaiveDateTime) {
        debug_assert!(self.is_flat(), "open_long on a non-flat broker");
        if price <= 0.0 || size <= 0.0 {
            return;
        }
        let cost = size * price;
        if cost > self.cash {
            size = self.cash / price;
        }
        self.cash -= size * price;
        self.position = size;
        self.entry = Some(EntryLot { bar, ts, price });
    }

    /// Close the open lot at `price`, returning the completed trade record.
    /// No-op (returns `None`) when flat.
    pub fn close_long(&mut self, price: f64, bar: usize, ts: NaiveDateTime) -> Option<TradeRecord> {
        let entry = self.entry.take()?;
        let quantity = self.position;
        self.cash += quantity * price;
        self.position = 0.0;
        Some(TradeRecord {
            entry_bar: entry.bar,
            entry_ts: entry.ts,
            entry_price: entry.price,
            exit_bar: bar,
            exit_ts: ts,
            exit_price: price,
            quantity,
            pnl: (price - entry.price) * quantity,
            bars_held: bar - entry.bar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn open_and_close_round_trip() {
        let mut broker = BrokerContext::new(100.0);
        broker.open_long(9.5, 10.0, 0, ts(1));
        assert!((broker.cash - 5.0).abs() < 1e-10);
        assert!((broker.position() - 9.5).abs() < 1e-10);
        assert!(!broker.is_flat());

        let trade = broker.close_long(12.0, 3, ts(4)).unwrap();
        assert!((trade.pnl - 19.0).abs() < 1e-10);
        assert_eq!(trade.bars_held, 3);
        assert!(broker.is_flat());
        assert!((broker.cash - 119.0).abs() < 1e-10);
    }

    #[test]
    fn buy_is_clamped_to_available_cash() {
        let mut broker = BrokerContext::new(100.0);
        // Sized at a close of 10 but filled on a gap up to 20.
        broker.open_long(9.5, 20.0, 0, ts(1));
        assert!((broker.position() - 5.0).abs() < 1e-10);
        assert!(broker.cash.abs() < 1e-10);
        assert!(broker.cash >= 0.0);
    }

    #[test]
    fn close_when_flat_is_noop() {
        let mut broker = BrokerContext::new(100.0);
        assert!(broker.close_long(10.0, 0, ts(1)).is_none());
        assert_eq!(broker.cash, 100.0);
    }

    #[test]
    fn value_marks_position_at_price() {
        let mut broker = BrokerContext::new(100.0);
        broker.open_long(5.0, 10.0, 0, ts(1));
        // 50 cash + 5 units * 12 = 110
        assert!((broker.value(12.0) - 110.0).abs() < 1e-10);
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        let mut broker = BrokerContext::new(100.0);
        broker.open_long(0.0, 10.0, 0, ts(1));
        assert!(broker.is_flat());
        broker.open_long(5.0, 0.0, 0, ts(1));
        assert!(broker.is_flat());
        assert_eq!(broker.cash, 100.0);
    }
}
