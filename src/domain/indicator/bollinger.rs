//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{mean, population_stddev, rolling_series};
use crate::domain::ohlcv::{OhlcvBar, closes};

pub fn calculate_bollinger(bars: &[OhlcvBar], period: usize, multiplier: f64) -> IndicatorSeries {
    let dates: Vec<_> = bars.iter().map(|b| b.date).collect();
    let indicator_type = IndicatorType::Bollinger {
        period,
        stddev_mult_x100: (multiplier * 100.0).round() as u32,
    };

    rolling_series(&dates, &closes(bars), period, indicator_type, |window| {
        let middle = mean(window).unwrap_or(f64::NAN);
        let stddev = population_stddev(window).unwrap_or(f64::NAN);
        IndicatorValue::Bollinger {
            upper: middle + multiplier * stddev,
            middle,
            lower: middle - multiplier * stddev,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                code: "TEST".into(),
                exchange: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn bollinger_warmup() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3, 2.0);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn bollinger_constant_values_collapse() {
        let series = calculate_bollinger(&make_bars(&[100.0; 5]), 3, 2.0);
        let (upper, middle, lower) = series.latest_bands();
        assert!((middle - 100.0).abs() < f64::EPSILON);
        assert!((upper - 100.0).abs() < f64::EPSILON);
        assert!((lower - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bollinger_basic_calculation() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0]), 3, 2.0);
        let (upper, middle, lower) = series.latest_bands();

        let stddev = (200.0_f64 / 3.0).sqrt();
        assert!((middle - 20.0).abs() < 1e-10);
        assert!((upper - (20.0 + 2.0 * stddev)).abs() < 1e-10);
        assert!((lower - (20.0 - 2.0 * stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0]), 3, 1.0);
        let (upper, middle, lower) = series.latest_bands();

        let stddev = (200.0_f64 / 3.0).sqrt();
        assert!((upper - (middle + stddev)).abs() < 1e-10);
        assert!((lower - (middle - stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_indicator_type() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0]), 20, 2.0);
        assert_eq!(
            series.indicator_type,
            IndicatorType::Bollinger {
                period: 20,
                stddev_mult_x100: 200
            }
        );
    }

    #[test]
    fn bollinger_short_window_is_nan() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0]), 20, 2.0);
        let (upper, middle, lower) = series.latest_bands();
        assert!(upper.is_nan());
        assert!(middle.is_nan());
        assert!(lower.is_nan());
    }

    #[test]
    fn bollinger_symmetry() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0, 25.0]), 3, 2.0);
        let (upper, middle, lower) = series.latest_bands();
        assert!(((upper - middle) - (middle - lower)).abs() < 1e-10);
    }
}
