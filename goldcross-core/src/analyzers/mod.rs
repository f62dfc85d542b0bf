//! Analyzer suite — statistics computed once from a finished run.
//!
//! Every analyzer is a pure function of the run output (equity curve and/or
//! trade list). Values that can be undefined — Sharpe over a too-short
//! series, SQN with fewer than two trades — are `Option<f64>`, never a
//! sentinel; sentinels belong to text formatting only.

pub mod drawdown;
pub mod sharpe;
pub mod sqn;
pub mod trade_analysis;

pub use drawdown::DrawDown;
pub use sharpe::SharpeRatio;
pub use sqn::sqn;
pub use trade_analysis::{TradeAnalysis, TradeSideStats};
