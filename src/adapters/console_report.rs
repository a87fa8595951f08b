//! Fixed-width text summaries for the terminal.

use std::fmt::Write;

use crate::domain::metrics::PerformanceReport;
use crate::domain::scan::{ScanReport, SkipReason};

fn pct(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value * 100.0)
    } else {
        "n/a".to_string()
    }
}

fn num(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else if value.is_infinite() {
        let label = if value > 0.0 { "inf" } else { "-inf" };
        label.to_string()
    } else {
        format!("{value:.precision$}")
    }
}

pub fn format_metrics(report: &PerformanceReport) -> String {
    let m = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "=== Performance: {} ===", report.portfolio);
    let _ = writeln!(out, "Total Return:     {}", pct(m.total_return));
    let _ = writeln!(out, "Annual Return:    {}", pct(m.annual_return));
    let _ = writeln!(out, "Volatility:       {}", pct(m.volatility));
    let _ = writeln!(out, "Sharpe Ratio:     {}", num(m.sharpe_ratio, 2));
    let _ = writeln!(out, "Max Drawdown:     -{}", pct(m.max_drawdown));
    let _ = writeln!(out, "Risk-free Rate:   {}", pct(m.risk_free_rate));
    let _ = writeln!(out, "Trading Days:     {}", m.trading_days);
    let _ = writeln!(out, "Total Trades:     {}", m.total_trades);
    let _ = writeln!(
        out,
        "Win / Loss:       {} / {}",
        m.profitable_trades, m.loss_trades
    );
    let _ = writeln!(out, "Win Rate:         {}", pct(m.win_rate));
    let _ = writeln!(out, "Avg Profit:       {}", num(m.avg_profit, 2));
    let _ = writeln!(out, "Avg Loss:         {}", num(m.avg_loss, 2));
    let _ = writeln!(out, "Profit Factor:    {}", num(m.profit_factor, 2));

    if !report.monthly_returns.is_empty() {
        let _ = writeln!(out, "\n--- Monthly Returns ---");
        for month in &report.monthly_returns {
            let _ = writeln!(
                out,
                "{}-{:02}  {:>9}",
                month.year,
                month.month,
                pct(month.compound_return)
            );
        }
    }

    out
}

pub fn format_scan(report: &ScanReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "=== Scan: {} {} to {} ===",
        report.exchange, report.start_date, report.end_date
    );
    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>8} {:>12} {:>8} {:>10} {:>10} {:>6}  {}",
        "code", "price", "chg%", "volume", "vol%", "ma_short", "ma_long", "rsi", "signal"
    );
    for entry in &report.entries {
        let r = &entry.result;
        let _ = writeln!(
            out,
            "{:<8} {:>10} {:>8} {:>12} {:>8} {:>10} {:>10} {:>6}  {}",
            entry.code,
            num(r.price, 2),
            num(r.change_pct, 2),
            r.volume,
            num(r.volatility_pct, 1),
            num(r.levels.ma_short, 2),
            num(r.levels.ma_long, 2),
            num(r.levels.rsi, 1),
            r.signal
        );
    }

    let _ = writeln!(out, "\n--- Signal Counts ---");
    for (signal, count) in report.count_by_signal() {
        let _ = writeln!(out, "{:<30} {}", signal.to_string(), count);
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "\n--- Skipped ---");
        for skipped in &report.skipped {
            let reason = match &skipped.reason {
                SkipReason::NoData => "no data".to_string(),
                SkipReason::FetchError { reason } => format!("fetch failed: {reason}"),
                SkipReason::InsufficientBars { bars, minimum } => {
                    format!("{bars} bars, need {minimum}")
                }
            };
            let _ = writeln!(out, "{:<8} {}", skipped.code, reason);
        }
    }

    out
}
