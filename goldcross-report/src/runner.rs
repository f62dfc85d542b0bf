//! Backtest runner — wires together data loading, the engine, the analyzer
//! suite, and KPI computation. One entry point, no I/O beyond the input CSV.

use crate::config::{ConfigError, RunConfig};
use crate::kpi::KpiSet;
use goldcross_core::{
    load_bars, run, sqn, Bar, DataError, DrawDown, GoldenCross, RunResult, SharpeRatio,
    TradeAnalysis,
};
use thiserror::Error;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Everything a finished run produces, ready for reporting.
#[derive(Debug)]
pub struct BacktestOutcome {
    pub config: RunConfig,
    pub strategy_name: String,
    pub bars: Vec<Bar>,
    pub result: RunResult,
    pub trade_analysis: TradeAnalysis,
    pub drawdown: DrawDown,
    pub sharpe_ratio: Option<f64>,
    pub sqn_score: Option<f64>,
    pub kpi: KpiSet,
}

/// Load data, run the Golden Cross strategy, and compute all statistics.
pub fn run_golden_cross(config: &RunConfig) -> Result<BacktestOutcome, RunError> {
    config.validate()?;
    let bars = load_bars(&config.data)?;

    let strategy = GoldenCross::new(config.strategy.clone());
    let result = run(&bars, &strategy, config.starting_cash);

    // Forced final-bar liquidation means no trade stays open.
    let trade_analysis = TradeAnalysis::from_trades(&result.trades, 0);
    let drawdown = DrawDown::from_equity(&result.equity_curve);
    let sharpe_ratio = SharpeRatio::default().compute(&result.equity_curve);
    let sqn_score = sqn(&result.trades);

    let kpi = KpiSet::compute(
        config.starting_cash,
        &trade_analysis,
        &drawdown,
        sharpe_ratio,
        sqn_score,
        result.period(),
    );

    Ok(BacktestOutcome {
        config: config.clone(),
        strategy_name: strategy.name().to_string(),
        bars,
        result,
        trade_analysis,
        drawdown,
        sharpe_ratio,
        sqn_score,
        kpi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture_csv(closes: &[f64]) -> std::path::PathBuf {
        let dir = std::env::temp_dir();
        let path = dir.join(format!(
            "goldcross_runner_{}_{}.csv",
            std::process::id(),
            closes.len()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "dt,open,high,low,close,volume").unwrap();
        let base = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        for (i, &close) in closes.iter().enumerate() {
            let open = if i == 0 { close } else { closes[i - 1] };
            let date = base + chrono::Duration::days(i as i64);
            writeln!(
                file,
                "{date},{open},{},{},{close},1000",
                open.max(close) + 1.0,
                open.min(close) - 1.0,
            )
            .unwrap();
        }
        path
    }

    fn small_config(data: std::path::PathBuf) -> RunConfig {
        let mut config = RunConfig {
            data,
            ..RunConfig::default()
        };
        config.strategy.fast = 2;
        config.strategy.slow = 3;
        config
    }

    #[test]
    fn full_run_produces_consistent_outcome() {
        let closes = [10.0, 10.0, 10.0, 10.0, 14.0, 16.0, 14.0, 10.0, 9.0, 9.0];
        let path = write_fixture_csv(&closes);
        let outcome = run_golden_cross(&small_config(path)).unwrap();

        assert_eq!(outcome.strategy_name, "GoldenCross");
        assert_eq!(outcome.bars.len(), 10);
        assert_eq!(outcome.result.equity_curve.len(), 10);
        assert_eq!(outcome.trade_analysis.closed, outcome.result.trades.len());
        assert!(
            (outcome.kpi.rpl - outcome.result.realized_pnl()).abs() < 1e-10,
            "KPI realized PnL must match the engine's cash delta"
        );
    }

    #[test]
    fn invalid_config_is_rejected_before_io() {
        let mut config = small_config("/nonexistent/file.csv".into());
        config.strategy.slow = 1;
        assert!(matches!(
            run_golden_cross(&config),
            Err(RunError::Config(_))
        ));
    }

    #[test]
    fn missing_data_file_is_a_data_error() {
        let config = small_config("/nonexistent/file.csv".into());
        assert!(matches!(run_golden_cross(&config), Err(RunError::Data(_))));
    }
}
