//! Incremental portfolio performance accumulator.
//!
//! One [`PerformanceAccumulator`] tracks one portfolio. Each [`record`] call
//! appends a dated valuation and the trades closed on that date; metrics are
//! derived on demand through [`compute_metrics`] and never cached.
//!
//! `record` takes `&mut self`, so a shared accumulator needs an external lock
//! (e.g. `RwLock`) for concurrent readers and a writer.
//!
//! Annualisation assumes one observation per trading day
//! (`trading_days_per_year`, 252 by default). Feeding a different cadence
//! needs a matching factor in [`PerformanceConfig`].
//!
//! [`record`]: PerformanceAccumulator::record
//! [`compute_metrics`]: PerformanceAccumulator::compute_metrics

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use super::error::SamperfError;
use super::metrics::{MetricsSnapshot, TradeStats};
use super::trade::{Observation, Trade};

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceConfig {
    pub risk_free_rate: f64,
    pub trading_days_per_year: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            risk_free_rate: 0.02,
            trading_days_per_year: 252.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// (high_watermark - value) / high_watermark
    pub drawdown: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReturn {
    pub year: i32,
    pub month: u32,
    pub compound_return: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceAccumulator {
    config: PerformanceConfig,
    dates: Vec<NaiveDate>,
    equity: Vec<f64>,
    daily_returns: Vec<f64>,
    high_watermark: f64,
    max_drawdown: f64,
    drawdowns: Vec<DrawdownPoint>,
    trades: Vec<Trade>,
    trade_stats: TradeStats,
}

impl PerformanceAccumulator {
    pub fn new(config: PerformanceConfig) -> Self {
        PerformanceAccumulator {
            config,
            ..Default::default()
        }
    }

    /// Appends one observation.
    ///
    /// Rejects a non-finite or non-positive value and a date that does not
    /// follow the previous one. Nothing is modified when an error is returned.
    pub fn record(
        &mut self,
        date: NaiveDate,
        portfolio_value: f64,
        trades: Vec<Trade>,
    ) -> Result<(), SamperfError> {
        if !portfolio_value.is_finite() || portfolio_value <= 0.0 {
            return Err(SamperfError::InvalidObservation {
                date,
                reason: format!("portfolio value must be positive and finite, got {portfolio_value}"),
            });
        }
        if let Some(&previous) = self.dates.last() {
            if date <= previous {
                return Err(SamperfError::NonChronological {
                    previous,
                    current: date,
                });
            }
        }

        if let Some(&prev_value) = self.equity.last() {
            self.daily_returns.push(portfolio_value / prev_value - 1.0);
        }
        self.dates.push(date);
        self.equity.push(portfolio_value);

        self.high_watermark = self.high_watermark.max(portfolio_value);
        let drawdown = (self.high_watermark - portfolio_value) / self.high_watermark;
        self.max_drawdown = self.max_drawdown.max(drawdown);
        self.drawdowns.push(DrawdownPoint {
            date,
            value: portfolio_value,
            drawdown,
        });

        for trade in &trades {
            self.trade_stats.record(trade);
        }
        self.trades.extend(trades);

        tracing::trace!(%date, portfolio_value, drawdown, "recorded observation");
        Ok(())
    }

    pub fn record_observation(&mut self, observation: Observation) -> Result<(), SamperfError> {
        self.record(
            observation.date,
            observation.portfolio_value,
            observation.trades,
        )
    }

    /// Metrics snapshot, or `None` with fewer than two observations.
    pub fn compute_metrics(&self) -> Option<MetricsSnapshot> {
        MetricsSnapshot::compute(self)
    }

    pub fn drawdowns(&self) -> &[DrawdownPoint] {
        &self.drawdowns
    }

    /// Daily returns compounded per calendar month, oldest first.
    ///
    /// Each return is bucketed by the date of the later of its two
    /// observations. Months without a return are absent.
    pub fn monthly_returns(&self) -> Vec<MonthlyReturn> {
        let mut growth: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for (date, r) in self.dates.iter().skip(1).zip(&self.daily_returns) {
            *growth.entry((date.year(), date.month())).or_insert(1.0) *= 1.0 + r;
        }

        growth
            .into_iter()
            .map(|((year, month), factor)| MonthlyReturn {
                year,
                month,
                compound_return: factor - 1.0,
            })
            .collect()
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn equity(&self) -> &[f64] {
        &self.equity
    }

    pub fn daily_returns(&self) -> &[f64] {
        &self.daily_returns
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trade_stats(&self) -> &TradeStats {
        &self.trade_stats
    }

    /// Highest value recorded so far; 0 before the first observation.
    pub fn high_watermark(&self) -> f64 {
        self.high_watermark
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    pub fn len(&self) -> usize {
        self.equity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equity.is_empty()
    }
}
