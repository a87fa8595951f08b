//! Performance metrics and statistics.

use serde::Serialize;

use super::float_serde::serialize_f64;
use super::indicator_helpers::population_stddev;
use super::performance::{DrawdownPoint, MonthlyReturn, PerformanceAccumulator};
use super::trade::Trade;

/// Running win/loss tallies over a trade ledger. Zero-profit trades are losses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeStats {
    pub total_trades: usize,
    pub profitable_trades: usize,
    profit_sum: f64,
    loss_sum: f64,
}

impl TradeStats {
    pub fn record(&mut self, trade: &Trade) {
        self.total_trades += 1;
        if trade.is_profitable() {
            self.profitable_trades += 1;
            self.profit_sum += trade.profit;
        } else {
            self.loss_sum += trade.profit;
        }
    }

    pub fn loss_trades(&self) -> usize {
        self.total_trades - self.profitable_trades
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_trades > 0 {
            self.profitable_trades as f64 / self.total_trades as f64
        } else {
            0.0
        }
    }

    pub fn avg_profit(&self) -> f64 {
        if self.profitable_trades > 0 {
            self.profit_sum / self.profitable_trades as f64
        } else {
            0.0
        }
    }

    /// Mean of losing profits; non-positive.
    pub fn avg_loss(&self) -> f64 {
        let losses = self.loss_trades();
        if losses > 0 {
            self.loss_sum / losses as f64
        } else {
            0.0
        }
    }

    /// |avg_profit / avg_loss|, or +inf when the average loss is zero.
    pub fn profit_factor(&self) -> f64 {
        let avg_loss = self.avg_loss();
        if avg_loss == 0.0 {
            f64::INFINITY
        } else {
            (self.avg_profit() / avg_loss).abs()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_return: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub annual_return: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub volatility: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub profit_factor: f64,
    pub total_trades: usize,
    pub profitable_trades: usize,
    pub loss_trades: usize,
    pub avg_profit: f64,
    pub avg_loss: f64,
    pub risk_free_rate: f64,
    /// Number of daily returns the annualised figures are based on.
    pub trading_days: usize,
}

impl MetricsSnapshot {
    /// `None` until at least two observations have been recorded.
    pub fn compute(acc: &PerformanceAccumulator) -> Option<Self> {
        let equity = acc.equity();
        let returns = acc.daily_returns();
        if equity.len() < 2 {
            return None;
        }

        let config = acc.config();
        let first = equity[0];
        let last = equity[equity.len() - 1];
        let total_return = last / first - 1.0;

        let trading_days = returns.len();
        let annual_return =
            (1.0 + total_return).powf(config.trading_days_per_year / trading_days as f64) - 1.0;

        let volatility = population_stddev(returns)
            .map(|sd| sd * config.trading_days_per_year.sqrt())
            .unwrap_or(0.0);

        let sharpe_ratio = if volatility == 0.0 {
            0.0
        } else {
            (annual_return - config.risk_free_rate) / volatility
        };

        let stats = acc.trade_stats();

        Some(MetricsSnapshot {
            total_return,
            annual_return,
            volatility,
            sharpe_ratio,
            max_drawdown: acc.max_drawdown(),
            win_rate: stats.win_rate(),
            profit_factor: stats.profit_factor(),
            total_trades: stats.total_trades,
            profitable_trades: stats.profitable_trades,
            loss_trades: stats.loss_trades(),
            avg_profit: stats.avg_profit(),
            avg_loss: stats.avg_loss(),
            risk_free_rate: config.risk_free_rate,
            trading_days,
        })
    }
}

/// Everything a report needs about one portfolio.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub portfolio: String,
    pub metrics: MetricsSnapshot,
    pub drawdowns: Vec<DrawdownPoint>,
    pub monthly_returns: Vec<MonthlyReturn>,
    pub trades: Vec<Trade>,
}

impl PerformanceReport {
    pub fn build(portfolio: &str, acc: &PerformanceAccumulator) -> Option<Self> {
        let metrics = acc.compute_metrics()?;
        Some(PerformanceReport {
            portfolio: portfolio.to_string(),
            metrics,
            drawdowns: acc.drawdowns().to_vec(),
            monthly_returns: acc.monthly_returns(),
            trades: acc.trades().to_vec(),
        })
    }
}
