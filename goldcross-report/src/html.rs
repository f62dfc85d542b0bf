//! HTML report rendering: a fixed template with `{{placeholder}}`
//! substitution. Every placeholder is replaced from the header and KPI set;
//! no templating engine, just string replacement over a known key list.

use crate::kpi::KpiSet;
use crate::report::ReportHeader;

const TEMPLATE: &str = include_str!("../templates/report.html");

/// Format a value to two decimals, or "n/a" when undefined.
fn num(value: f64) -> String {
    format!("{value:.2}")
}

fn opt_num(value: Option<f64>) -> String {
    value.map(num).unwrap_or_else(|| "n/a".to_string())
}

/// Render the report HTML from header data, KPIs, and chart file URLs.
pub fn render(
    header: &ReportHeader,
    kpi: &KpiSet,
    url_equity_curve: &str,
    url_return_curve: &str,
) -> String {
    let pairs: Vec<(&str, String)> = vec![
        ("strategy_name", escape(&header.strategy_name)),
        ("params", escape(&header.params)),
        ("file_name", escape(&header.file_name)),
        ("start_date", header.start_date.clone()),
        ("end_date", header.end_date.clone()),
        ("name_user", escape(&header.name_user)),
        ("memo_field", escape(&header.memo_field)),
        ("processing_date", header.processing_date.clone()),
        ("fingerprint", header.fingerprint.clone()),
        ("start_cash", num(kpi.start_cash)),
        ("rpl", num(kpi.rpl)),
        ("result_won_trades", num(kpi.result_won_trades)),
        ("result_lost_trades", num(kpi.result_lost_trades)),
        ("profit_factor", opt_num(kpi.profit_factor)),
        ("total_return", num(kpi.total_return)),
        ("annual_return", opt_num(kpi.annual_return)),
        ("max_money_drawdown", num(kpi.max_money_drawdown)),
        ("max_pct_drawdown", num(kpi.max_pct_drawdown)),
        ("total_number_trades", kpi.total_number_trades.to_string()),
        ("trades_closed", kpi.trades_closed.to_string()),
        ("pct_winning", opt_num(kpi.pct_winning)),
        ("pct_losing", opt_num(kpi.pct_losing)),
        ("avg_money_winning", opt_num(kpi.avg_money_winning)),
        ("avg_money_losing", opt_num(kpi.avg_money_losing)),
        ("best_winning_trade", opt_num(kpi.best_winning_trade)),
        ("worst_losing_trade", opt_num(kpi.worst_losing_trade)),
        ("sharpe_ratio", opt_num(kpi.sharpe_ratio)),
        ("sqn_score", opt_num(kpi.sqn_score)),
        (
            "sqn_human",
            kpi.sqn_human
                .clone()
                .unwrap_or_else(|| "n/a".to_string()),
        ),
        ("url_equity_curve", url_equity_curve.to_string()),
        ("url_return_curve", url_return_curve.to_string()),
    ];

    let mut html = TEMPLATE.to_string();
    for (key, value) in pairs {
        html = html.replace(&format!("{{{{{key}}}}}"), &value);
    }
    html
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
