//! Goldcross CLI — run the Golden Cross backtest and write the PDF report.
//!
//! One required positional argument: the output directory. Strategy and run
//! parameters come from an optional TOML config file, overridden by flags.

use anyhow::{Context, Result};
use clap::Parser;
use goldcross_report::{run_golden_cross, BacktestOutcome, PerformanceReport, ReportError, RunConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "goldcross",
    about = "Golden Cross (SMA 50/200) backtest with PDF report"
)]
struct Cli {
    /// Output directory for report.pdf and the chart images. Must exist.
    output_dir: PathBuf,

    /// Input CSV file (dt,open,high,low,close[,volume]).
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML config file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fast MA window length.
    #[arg(long)]
    fast: Option<usize>,

    /// Slow MA window length.
    #[arg(long)]
    slow: Option<usize>,

    /// Fraction of cash deployed per entry, in (0, 1].
    #[arg(long)]
    order_pct: Option<f64>,

    /// Market label for log lines and the report header.
    #[arg(long)]
    market: Option<String>,

    /// Broker starting cash.
    #[arg(long)]
    cash: Option<f64>,

    /// Report header: user name.
    #[arg(long)]
    user: Option<String>,

    /// Report header: memo text.
    #[arg(long)]
    memo: Option<String>,
}

impl Cli {
    /// Merge the config file (or defaults) with the flag overrides.
    fn into_config(self) -> Result<(RunConfig, PathBuf)> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(data) = self.data {
            config.data = data;
        }
        if let Some(fast) = self.fast {
            config.strategy.fast = fast;
        }
        if let Some(slow) = self.slow {
            config.strategy.slow = slow;
        }
        if let Some(order_pct) = self.order_pct {
            config.strategy.order_pct = order_pct;
        }
        if let Some(market) = self.market {
            config.strategy.market = market;
        }
        if let Some(cash) = self.cash {
            config.starting_cash = cash;
        }
        if let Some(user) = self.user {
            config.user = user;
        }
        if let Some(memo) = self.memo {
            config.memo = memo;
        }

        Ok((config, self.output_dir))
    }
}

fn main() {
    // Missing or unparseable arguments exit with code 1 and the usage text.
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        std::process::exit(1);
    });

    match run(cli) {
        Ok(()) => {}
        Err(err) => {
            // The output-directory check keeps the historical behavior of the
            // reporting path: diagnostic on stdout, exit code 0. Every other
            // failure is a real error.
            if let Some(ReportError::OutputDirMissing { path }) =
                err.downcast_ref::<ReportError>()
            {
                println!("*** ERROR: outputdir {} does not exist.", path.display());
                std::process::exit(0);
            }
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (config, output_dir) = cli.into_config()?;

    let outcome = run_golden_cross(&config)
        .with_context(|| format!("backtest over {}", config.data.display()))?;

    print_trades(&outcome);
    println!();
    println!("{}", outcome.kpi);
    println!();

    let artifacts = PerformanceReport::new(&outcome).generate(&output_dir)?;
    println!(
        "See {} for report with backtest results.",
        artifacts.pdf.display()
    );
    Ok(())
}

fn print_trades(outcome: &BacktestOutcome) {
    let market = &outcome.config.strategy.market;
    for trade in &outcome.result.trades {
        println!(
            "{} - *** MKT: {} BUY: {:.8} @ {:.2}",
            trade.entry_ts, market, trade.quantity, trade.entry_price
        );
        println!(
            "{} - *** MKT: {} SELL: {:.8} @ {:.2}",
            trade.exit_ts, market, trade.quantity, trade.exit_price
        );
    }
}
