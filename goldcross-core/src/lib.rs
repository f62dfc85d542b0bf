//! Goldcross Core — engine for the Golden Cross backtester.
//!
//! This crate contains everything needed to turn a CSV price series into a
//! completed backtest run:
//! - Domain types (bars, broker context, trade records, equity points)
//! - CSV data loading with strict timeline validation
//! - Indicators (SMA, crossover series)
//! - The Golden Cross strategy evaluator (a pure decision function)
//! - The bar-by-bar simulation loop with next-open fills
//! - The analyzer suite (trade analysis, drawdown, Sharpe, SQN)

pub mod analyzers;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;

pub use analyzers::{sqn, DrawDown, SharpeRatio, TradeAnalysis};
pub use data::{load_bars, DataError};
pub use domain::{Bar, BrokerContext, EquityPoint, TradeRecord};
pub use engine::{run, RunResult};
pub use strategy::{Action, BarSnapshot, GoldenCross, StrategyParams};
