//! Maximum drawdown over the equity curve, in money and percent.

use crate::domain::EquityPoint;
use serde::{Deserialize, Serialize};

/// Peak-to-trough drawdown extremes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawDown {
    /// Largest peak-to-trough fall in account currency.
    pub max_moneydown: f64,
    /// Largest peak-to-trough fall as a percentage of the peak.
    pub max_drawdown_pct: f64,
}

impl DrawDown {
    pub fn from_equity(curve: &[EquityPoint]) -> Self {
        let mut peak = f64::NEG_INFINITY;
        let mut max_moneydown = 0.0f64;
        let mut max_drawdown_pct = 0.0f64;

        for point in curve {
            if point.value > peak {
                peak = point.value;
            }
            let moneydown = peak - point.value;
            if moneydown > max_moneydown {
                max_moneydown = moneydown;
            }
            if peak > 0.0 {
                let pct = 100.0 * moneydown / peak;
                if pct > max_drawdown_pct {
                    max_drawdown_pct = pct;
                }
            }
        }

        Self {
            max_moneydown,
            max_drawdown_pct,
        }
    }
}
