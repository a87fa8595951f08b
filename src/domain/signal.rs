//! Technical signal evaluation for a single instrument.
//!
//! [`evaluate`] reduces a chronological price window to a [`SignalResult`]:
//! the latest price statistics, moving averages, RSI, Bollinger Bands, and a
//! categorical [`Signal`]. Nothing is retained between calls, so instruments
//! can be evaluated independently (and concurrently by the caller).
//!
//! Indicators whose window is longer than the supplied history come back as
//! NaN. A NaN makes every comparison of the rule that reads it false, so an
//! under-filled window falls through to [`Signal::Neutral`].

use serde::Serialize;
use std::fmt;

use crate::domain::float_serde::serialize_f64;
use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator_helpers::population_stddev;
use crate::domain::ohlcv::{OhlcvBar, daily_changes};

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub ma_short: usize,
    pub ma_long: usize,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// Annualisation factor for `volatility_pct`; assumes daily bars.
    pub trading_days_per_year: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            ma_short: 20,
            ma_long: 60,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            trading_days_per_year: 252.0,
        }
    }
}

impl SignalConfig {
    /// Bars needed before every indicator is populated.
    pub fn min_bars(&self) -> usize {
        self.ma_long
            .max(self.ma_short)
            .max(self.bollinger_period)
            .max(self.rsi_period)
    }
}

/// Trading signal, declared in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Oversold,
    Overbought,
    Uptrend,
    Downtrend,
    Neutral,
}

impl Signal {
    pub const ALL: [Signal; 5] = [
        Signal::Oversold,
        Signal::Overbought,
        Signal::Uptrend,
        Signal::Downtrend,
        Signal::Neutral,
    ];

    pub fn action(&self) -> &'static str {
        match self {
            Signal::Oversold => "consider buy",
            Signal::Overbought => "consider sell",
            Signal::Uptrend => "hold",
            Signal::Downtrend => "caution",
            Signal::Neutral => "watch",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::Oversold => "oversold",
            Signal::Overbought => "overbought",
            Signal::Uptrend => "uptrend",
            Signal::Downtrend => "downtrend",
            Signal::Neutral => "neutral",
        };
        write!(f, "{} / {}", label, self.action())
    }
}

/// Latest indicator readings the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TechnicalLevels {
    #[serde(serialize_with = "serialize_f64")]
    pub ma_short: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub ma_long: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub rsi: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub bollinger_upper: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub bollinger_mid: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub bollinger_lower: f64,
}

/// First matching rule wins:
/// 1. below lower band and RSI oversold
/// 2. above upper band and RSI overbought
/// 3. close > short MA > long MA
/// 4. close < short MA < long MA
/// 5. otherwise neutral
pub fn classify(close: f64, levels: &TechnicalLevels, config: &SignalConfig) -> Signal {
    if close < levels.bollinger_lower && levels.rsi < config.rsi_oversold {
        Signal::Oversold
    } else if close > levels.bollinger_upper && levels.rsi > config.rsi_overbought {
        Signal::Overbought
    } else if close > levels.ma_short && levels.ma_short > levels.ma_long {
        Signal::Uptrend
    } else if close < levels.ma_short && levels.ma_short < levels.ma_long {
        Signal::Downtrend
    } else {
        Signal::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalResult {
    #[serde(serialize_with = "serialize_f64")]
    pub price: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub change_pct: f64,
    pub volume: i64,
    #[serde(serialize_with = "serialize_f64")]
    pub volatility_pct: f64,
    #[serde(flatten)]
    pub levels: TechnicalLevels,
    pub signal: Signal,
}

/// Evaluates the latest bar of `bars` (chronological, oldest first).
///
/// An empty window yields an all-NaN result with a neutral signal.
pub fn evaluate(bars: &[OhlcvBar], config: &SignalConfig) -> SignalResult {
    let (price, volume) = bars
        .last()
        .map(|b| (b.close, b.volume))
        .unwrap_or((f64::NAN, 0));

    let change_pct = match bars {
        [.., prev, last] => last.change_from(prev.close) * 100.0,
        _ => f64::NAN,
    };

    let volatility_pct = population_stddev(&daily_changes(bars))
        .map(|sd| sd * config.trading_days_per_year.sqrt() * 100.0)
        .unwrap_or(f64::NAN);

    let (bollinger_upper, bollinger_mid, bollinger_lower) =
        calculate_bollinger(bars, config.bollinger_period, config.bollinger_multiplier)
            .latest_bands();

    let levels = TechnicalLevels {
        ma_short: calculate_sma(bars, config.ma_short).latest(),
        ma_long: calculate_sma(bars, config.ma_long).latest(),
        rsi: calculate_rsi(bars, config.rsi_period).latest(),
        bollinger_upper,
        bollinger_mid,
        bollinger_lower,
    };

    let signal = classify(price, &levels, config);
    tracing::trace!(bars = bars.len(), %signal, "evaluated price window");

    SignalResult {
        price,
        change_pct,
        volume,
        volatility_pct,
        levels,
        signal,
    }
}
