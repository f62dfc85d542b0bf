//! Domain types shared across the engine and the report layer.

pub mod bar;
pub mod broker;
pub mod trade;

pub use bar::Bar;
pub use broker::BrokerContext;
pub use trade::TradeRecord;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Single point of the equity curve: portfolio value at a bar close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub ts: NaiveDateTime,
    pub value: f64,
}
