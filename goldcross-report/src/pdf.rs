//! PDF composition with `printpdf`.
//!
//! Two A4 pages: the header and KPI tables as builtin-font text, then the
//! two chart images. Charts are embedded from the raw RGB buffers the
//! renderer produced — no decode round trip.

use crate::charts::ChartImage;
use crate::kpi::KpiSet;
use crate::report::{ReportError, ReportHeader};
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfLayerReference, Px,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 18.0;
const CHART_DPI: f64 = 150.0;

fn pdf_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Pdf {
        reason: e.to_string(),
    }
}

fn opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Text writer that walks down a page.
struct TextCursor<'a> {
    layer: &'a PdfLayerReference,
    y: f64,
}

impl TextCursor<'_> {
    fn heading(&mut self, text: &str, font: &IndirectFontRef) {
        self.y -= 4.0;
        self.layer.use_text(text, 13.0, Mm(MARGIN), Mm(self.y), font);
        self.y -= 7.0;
    }

    fn row(&mut self, label: &str, value: String, font: &IndirectFontRef) {
        self.layer.use_text(label, 10.0, Mm(MARGIN), Mm(self.y), font);
        self.layer
            .use_text(value, 10.0, Mm(MARGIN + 62.0), Mm(self.y), font);
        self.y -= 5.5;
    }
}

/// Write `report.pdf` to `path`.
pub fn write_pdf(
    path: &Path,
    header: &ReportHeader,
    kpi: &KpiSet,
    equity_chart: &ChartImage,
    return_chart: &ChartImage,
) -> Result<(), ReportError> {
    let (doc, page1, layer1) = PdfDocument::new(
        format!("Backtest report - {}", header.strategy_name),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "report",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    let layer = doc.get_page(page1).get_layer(layer1);
    layer.use_text(
        format!("Backtest report - {}", header.strategy_name),
        18.0,
        Mm(MARGIN),
        Mm(PAGE_HEIGHT - 22.0),
        &bold,
    );

    let mut cursor = TextCursor {
        layer: &layer,
        y: PAGE_HEIGHT - 34.0,
    };

    cursor.row("Strategy", header.strategy_name.clone(), &regular);
    cursor.row("Parameters", header.params.clone(), &regular);
    cursor.row("Input file", header.file_name.clone(), &regular);
    cursor.row(
        "Period",
        format!("{} - {}", header.start_date, header.end_date),
        &regular,
    );
    cursor.row("User", header.name_user.clone(), &regular);
    cursor.row("Memo", header.memo_field.clone(), &regular);
    cursor.row("Generated", header.processing_date.clone(), &regular);

    cursor.heading("PnL", &bold);
    cursor.row("Start capital", format!("{:.2}", kpi.start_cash), &regular);
    cursor.row("Total net profit", format!("{:.2}", kpi.rpl), &regular);
    cursor.row(
        "Result winning trades",
        format!("{:.2}", kpi.result_won_trades),
        &regular,
    );
    cursor.row(
        "Result lost trades",
        format!("{:.2}", kpi.result_lost_trades),
        &regular,
    );
    cursor.row("Profit factor", opt(kpi.profit_factor), &regular);
    cursor.row(
        "Total return",
        format!("{:.2}%", kpi.total_return),
        &regular,
    );
    cursor.row(
        "Annual return",
        kpi.annual_return
            .map(|v| format!("{v:.2}%"))
            .unwrap_or_else(|| "n/a".to_string()),
        &regular,
    );
    cursor.row(
        "Max. money drawdown",
        format!("{:.2}", kpi.max_money_drawdown),
        &regular,
    );
    cursor.row(
        "Max. percent drawdown",
        format!("{:.2}%", kpi.max_pct_drawdown),
        &regular,
    );

    cursor.heading("Trades", &bold);
    if kpi.has_no_trades() {
        cursor.row("Number of trades", "0 (no closed trades)".to_string(), &regular);
    } else {
        cursor.row(
            "Number of trades",
            kpi.total_number_trades.to_string(),
            &regular,
        );
    }
    cursor.row("Trades closed", kpi.trades_closed.to_string(), &regular);
    cursor.row(
        "% winning",
        kpi.pct_winning
            .map(|v| format!("{v:.2}%"))
            .unwrap_or_else(|| "n/a".to_string()),
        &regular,
    );
    cursor.row(
        "% losing",
        kpi.pct_losing
            .map(|v| format!("{v:.2}%"))
            .unwrap_or_else(|| "n/a".to_string()),
        &regular,
    );
    cursor.row("Avg money winning", opt(kpi.avg_money_winning), &regular);
    cursor.row("Avg money losing", opt(kpi.avg_money_losing), &regular);
    cursor.row("Best winning trade", opt(kpi.best_winning_trade), &regular);
    cursor.row("Worst losing trade", opt(kpi.worst_losing_trade), &regular);

    cursor.heading("Performance", &bold);
    cursor.row("Sharpe ratio", opt(kpi.sharpe_ratio), &regular);
    cursor.row("SQN score", opt(kpi.sqn_score), &regular);
    cursor.row(
        "SQN rating",
        kpi.sqn_human.clone().unwrap_or_else(|| "n/a".to_string()),
        &regular,
    );

    layer.use_text(
        format!("run {}", header.fingerprint),
        7.0,
        Mm(MARGIN),
        Mm(12.0),
        &regular,
    );

    // Page 2: charts.
    let (page2, layer2) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "charts");
    let charts_layer = doc.get_page(page2).get_layer(layer2);

    place_chart(&charts_layer, equity_chart, PAGE_HEIGHT - 130.0);
    place_chart(&charts_layer, return_chart, PAGE_HEIGHT - 250.0);

    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(pdf_err)?;
    Ok(())
}

/// Embed one chart, horizontally centered, with its bottom edge at `bottom_mm`.
fn place_chart(layer: &PdfLayerReference, chart: &ChartImage, bottom_mm: f64) {
    let width_mm = chart.width as f64 / CHART_DPI * 25.4;
    let x = (PAGE_WIDTH - width_mm) / 2.0;
    let image = Image::from(ImageXObject {
        width: Px(chart.width as usize),
        height: Px(chart.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: chart.rgb.clone(),
        image_filter: None,
        clipping_bbox: None,
    });
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(bottom_mm)),
            dpi: Some(CHART_DPI),
            ..Default::default()
        },
    );
}
