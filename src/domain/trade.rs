//! Trade records and portfolio observations.

use chrono::NaiveDate;
use serde::Serialize;

/// A realised trade. Only `profit` feeds the metrics; the rest is for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub code: String,
    pub profit: f64,
}

impl Trade {
    /// Zero-profit trades count as losses.
    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }
}

/// One period's valuation of a portfolio plus the trades closed in that period.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub portfolio_value: f64,
    pub trades: Vec<Trade>,
}

impl Observation {
    pub fn new(date: NaiveDate, portfolio_value: f64) -> Self {
        Observation {
            date,
            portfolio_value,
            trades: Vec::new(),
        }
    }

    pub fn with_trades(mut self, trades: Vec<Trade>) -> Self {
        self.trades = trades;
        self
    }
}
