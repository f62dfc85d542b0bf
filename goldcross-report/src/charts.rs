//! Chart rendering with `plotters`.
//!
//! Charts render into an RGB pixel buffer so the same image can be written
//! to a PNG file and embedded into the PDF without re-decoding. Text uses
//! the bundled DejaVu Sans face, registered once per process.

use crate::periodicity::PeriodReturn;
use crate::report::ReportError;
use goldcross_core::EquityPoint;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::path::Path;
use std::sync::Once;

const WIDTH: u32 = 900;
const HEIGHT: u32 = 480;

/// Rendered chart: raw RGB8 pixels plus dimensions.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl ChartImage {
    /// Write the image to a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), ReportError> {
        image::save_buffer(
            path,
            &self.rgb,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )
        .map_err(|e| ReportError::Chart {
            reason: format!("failed to write {}: {e}", path.display()),
        })
    }
}

static FONT_INIT: Once = Once::new();

/// Register the bundled font under the family name the chart styles use.
fn ensure_fonts() {
    FONT_INIT.call_once(|| {
        let bytes: &'static [u8] = include_bytes!("../assets/DejaVuSans.ttf");
        let _ = register_font("sans-serif", FontStyle::Normal, bytes);
        let _ = register_font("sans-serif", FontStyle::Bold, bytes);
    });
}

fn chart_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Chart {
        reason: e.to_string(),
    }
}

/// Equity curve chart: the strategy curve against buy-and-hold, both
/// normalized to start at 100, with a reference line at 100.
pub fn render_equity_chart(
    curve: &[EquityPoint],
    buy_and_hold: &[EquityPoint],
) -> Result<ChartImage, ReportError> {
    ensure_fonts();
    let mut rgb = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let n = curve.len().max(buy_and_hold.len()).max(2);
        let x_max = (n - 1) as f64;
        let (mut y_min, mut y_max) = (100.0f64, 100.0f64);
        for p in curve.iter().chain(buy_and_hold.iter()) {
            y_min = y_min.min(p.value);
            y_max = y_max.max(p.value);
        }
        let pad = ((y_max - y_min) * 0.05).max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption("Equity curve", ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(56)
            .build_cartesian_2d(0.0..x_max, (y_min - pad)..(y_max + pad))
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|x| {
                let idx = x.round();
                if idx < 0.0 {
                    return String::new();
                }
                curve
                    .get(idx as usize)
                    .or_else(|| buy_and_hold.get(idx as usize))
                    .map(|p| p.ts.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .y_desc("Net Asset Value (start=100)")
            .draw()
            .map_err(chart_err)?;

        // Reference line at the starting value.
        chart
            .draw_series(LineSeries::new(
                [(0.0, 100.0), (x_max, 100.0)],
                &RGBColor(160, 160, 160),
            ))
            .map_err(chart_err)?;

        chart
            .draw_series(LineSeries::new(
                buy_and_hold
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (i as f64, p.value)),
                &RGBColor(110, 110, 110),
            ))
            .map_err(chart_err)?
            .label("Buy & hold")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], RGBColor(110, 110, 110))
            });

        chart
            .draw_series(LineSeries::new(
                curve.iter().enumerate().map(|(i, p)| (i as f64, p.value)),
                &BLUE,
            ))
            .map_err(chart_err)?
            .label("Strategy")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLUE));

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(ChartImage {
        width: WIDTH,
        height: HEIGHT,
        rgb,
    })
}

/// Periodic returns bar chart: green bars up, red bars down.
pub fn render_return_chart(
    returns: &[PeriodReturn],
    title_label: &str,
) -> Result<ChartImage, ReportError> {
    ensure_fonts();
    let mut rgb = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let n = returns.len().max(1);
        let (mut y_min, mut y_max) = (0.0f64, 0.0f64);
        for r in returns {
            y_min = y_min.min(r.pct);
            y_max = y_max.max(r.pct);
        }
        let pad = ((y_max - y_min) * 0.1).max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{title_label} returns"), ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(56)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), (y_min - pad)..(y_max + pad))
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_labels(8.min(n))
            .x_label_formatter(&|x| {
                let idx = x.round();
                if idx < 0.0 {
                    return String::new();
                }
                returns
                    .get(idx as usize)
                    .map(|r| r.ts.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .x_desc("date")
            .y_desc("return (%)")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(returns.iter().enumerate().map(|(i, r)| {
                let color = if r.pct > 0.0 { GREEN } else { RED };
                Rectangle::new(
                    [(i as f64 - 0.4, 0.0), (i as f64 + 0.4, r.pct)],
                    color.filled(),
                )
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(ChartImage {
        width: WIDTH,
        height: HEIGHT,
        rgb,
    })
}
