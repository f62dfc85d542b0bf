//! Performance report orchestrator.
//!
//! Builds the header, renders the two charts, substitutes everything into
//! the HTML template, and composes the PDF. All artifacts land in the
//! output directory, which must already exist.

use crate::charts;
use crate::equity;
use crate::html;
use crate::pdf;
use crate::periodicity::{periodic_returns, Periodicity};
use crate::runner::BacktestOutcome;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output directory does not exist. The CLI treats this case
    /// specially (see its exit-code handling).
    #[error("output directory {path} does not exist")]
    OutputDirMissing { path: PathBuf },

    #[error("chart rendering failed: {reason}")]
    Chart { reason: String },

    #[error("PDF composition failed: {reason}")]
    Pdf { reason: String },

    #[error("failed to write report artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Header fields substituted into the report template.
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub strategy_name: String,
    pub params: String,
    pub file_name: String,
    pub start_date: String,
    pub end_date: String,
    pub name_user: String,
    pub memo_field: String,
    pub processing_date: String,
    pub fingerprint: String,
}

/// Paths of everything the report generator wrote.
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    pub pdf: PathBuf,
    pub html: PathBuf,
    pub equity_curve_png: PathBuf,
    pub return_curve_png: PathBuf,
}

/// Report builder over a finished run.
#[derive(Debug)]
pub struct PerformanceReport<'a> {
    outcome: &'a BacktestOutcome,
    file_name: String,
    user: String,
    memo: String,
}

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl<'a> PerformanceReport<'a> {
    /// Build a report over `outcome`, filling empty header fields with the
    /// traditional defaults.
    pub fn new(outcome: &'a BacktestOutcome) -> Self {
        let file_name = outcome
            .config
            .data
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Not given".to_string());
        let user = match outcome.config.user.trim() {
            "" => "Happy Canary".to_string(),
            u => u.to_string(),
        };
        let memo = match outcome.config.memo.trim() {
            "" => "No comments".to_string(),
            m => m.to_string(),
        };
        Self {
            outcome,
            file_name,
            user,
            memo,
        }
    }

    /// Assemble the header for the templates.
    pub fn header(&self) -> ReportHeader {
        let (start, end) = self.outcome.result.period();
        ReportHeader {
            strategy_name: self.outcome.strategy_name.clone(),
            params: self.outcome.config.strategy.summary(),
            file_name: self.file_name.clone(),
            start_date: start.format(TS_FORMAT).to_string(),
            end_date: end.format(TS_FORMAT).to_string(),
            name_user: self.user.clone(),
            memo_field: self.memo.clone(),
            processing_date: chrono::Local::now()
                .naive_local()
                .format(TS_FORMAT)
                .to_string(),
            fingerprint: self.outcome.config.fingerprint(),
        }
    }

    /// Render charts, HTML, and the PDF into `output_dir`.
    pub fn generate(&self, output_dir: &Path) -> Result<ReportArtifacts, ReportError> {
        if !output_dir.is_dir() {
            return Err(ReportError::OutputDirMissing {
                path: output_dir.to_path_buf(),
            });
        }

        let result = &self.outcome.result;
        let curve = equity::normalized(&result.equity_curve);
        let buy_and_hold = equity::buy_and_hold(&self.outcome.bars);

        let (start, end) = result.period();
        let elapsed_days = (end - start).num_seconds() as f64 / 86_400.0;
        let periodicity = Periodicity::from_days(elapsed_days);
        let returns = periodic_returns(&curve, periodicity);

        let equity_chart = charts::render_equity_chart(&curve, &buy_and_hold)?;
        let return_chart = charts::render_return_chart(&returns, periodicity.label())?;

        let equity_curve_png = output_dir.join("equity_curve.png");
        let return_curve_png = output_dir.join("return_curve.png");
        equity_chart.save_png(&equity_curve_png)?;
        return_chart.save_png(&return_curve_png)?;

        // Absolute file:// URLs so the HTML renders from anywhere.
        let abs_dir = output_dir
            .canonicalize()
            .unwrap_or_else(|_| output_dir.to_path_buf());
        let header = self.header();
        let html_text = html::render(
            &header,
            &self.outcome.kpi,
            &format!("file://{}", abs_dir.join("equity_curve.png").display()),
            &format!("file://{}", abs_dir.join("return_curve.png").display()),
        );
        let html_path = output_dir.join("report.html");
        std::fs::write(&html_path, html_text)?;

        let pdf_path = output_dir.join("report.pdf");
        pdf::write_pdf(
            &pdf_path,
            &header,
            &self.outcome.kpi,
            &equity_chart,
            &return_chart,
        )?;

        Ok(ReportArtifacts {
            pdf: pdf_path,
            html: html_path,
            equity_curve_png,
            return_curve_png,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::runner::run_golden_cross;
    use std::io::Write;

    fn write_fixture_csv(dir: &Path, closes: &[f64]) -> PathBuf {
        let path = dir.join("fixture.csv");
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

    fn outcome_in(dir: &Path) -> BacktestOutcome {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64) + (i % 5) as f64).collect();
        let data = write_fixture_csv(dir, &closes);
        let mut config = RunConfig {
            data,
            user: "Trading John".into(),
            memo: "a.k.a. Golden Cross".into(),
            ..RunConfig::default()
        };
        config.strategy.fast = 5;
        config.strategy.slow = 20;
        run_golden_cross(&config).unwrap()
    }

    #[test]
    fn header_applies_defaults_for_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut outcome = outcome_in(dir.path());
        outcome.config.user = String::new();
        outcome.config.memo = "  ".into();
        let report = PerformanceReport::new(&outcome);
        let header = report.header();
        assert_eq!(header.name_user, "Happy Canary");
        assert_eq!(header.memo_field, "No comments");
        assert_eq!(header.file_name, "fixture.csv");
        assert_eq!(header.strategy_name, "GoldenCross");
    }

    #[test]
    fn missing_output_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = outcome_in(dir.path());
        let report = PerformanceReport::new(&outcome);
        let missing = dir.path().join("does-not-exist");
        match report.generate(&missing) {
            Err(ReportError::OutputDirMissing { path }) => assert_eq!(path, missing),
            other => panic!("expected OutputDirMissing, got {other:?}"),
        }
    }

    #[test]
    fn generate_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = outcome_in(dir.path());
        let report = PerformanceReport::new(&outcome);

        let out = tempfile::tempdir().unwrap();
        let artifacts = report.generate(out.path()).unwrap();

        for path in [
            &artifacts.pdf,
            &artifacts.html,
            &artifacts.equity_curve_png,
            &artifacts.return_curve_png,
        ] {
            let meta = std::fs::metadata(path).unwrap();
            assert!(meta.len() > 0, "empty artifact {}", path.display());
        }

        let html = std::fs::read_to_string(&artifacts.html).unwrap();
        assert!(!html.contains("{{"), "unsubstituted placeholder");
        assert!(html.contains("Trading John"));

        let pdf = std::fs::read(&artifacts.pdf).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
