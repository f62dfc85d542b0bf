//! Strategy evaluation.

pub mod golden_cross;

pub use golden_cross::{Action, BarSnapshot, GoldenCross, StrategyParams};
