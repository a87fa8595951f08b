//! OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub code: String,
    pub exchange: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// close / prev_close - 1
    pub fn change_from(&self, prev_close: f64) -> f64 {
        self.close / prev_close - 1.0
    }
}

/// Closing prices of `bars`, in order.
pub fn closes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Fractional close-to-close changes; one shorter than `bars`.
pub fn daily_changes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| w[1].change_from(w[0].close))
        .collect()
}
