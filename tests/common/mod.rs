#![allow(dead_code)]

use chrono::NaiveDate;
use samperf::domain::error::SamperfError;
pub use samperf::domain::ohlcv::OhlcvBar;
use samperf::domain::performance::{PerformanceAccumulator, PerformanceConfig};
use samperf::domain::trade::Trade;
use samperf::ports::data_port::DataPort;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        code: &str,
        _exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SamperfError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(SamperfError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self, _exchange: &str) -> Result<Vec<String>, SamperfError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days from `start`, one bar per close.
pub fn bars_from_closes(code: &str, start: NaiveDate, closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            code: code.to_string(),
            exchange: "ASX".to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000 + i as i64,
        })
        .collect()
}

/// Linear price path of `count` bars, `step` per bar.
pub fn trending_bars(code: &str, start: NaiveDate, count: usize, first: f64, step: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| first + step * i as f64).collect();
    bars_from_closes(code, start, &closes)
}

pub fn trade(d: NaiveDate, code: &str, profit: f64) -> Trade {
    Trade {
        date: d,
        code: code.to_string(),
        profit,
    }
}

/// Records `values` on consecutive days starting at 2024-01-01.
pub fn accumulate(values: &[f64]) -> PerformanceAccumulator {
    let mut acc = PerformanceAccumulator::new(PerformanceConfig::default());
    let start = date(2024, 1, 1);
    for (i, &value) in values.iter().enumerate() {
        acc.record(start + chrono::Duration::days(i as i64), value, vec![])
            .unwrap();
    }
    acc
}

pub fn write_file(dir: &Path, name: &str, content: &str) {
    let mut file = std::fs::File::create(dir.join(name)).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

/// `date,open,high,low,close,volume` CSV text for `bars`.
pub fn price_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    out
}
