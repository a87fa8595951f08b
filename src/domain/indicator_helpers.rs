//! Shared helper functions for indicator and metric calculations.

use chrono::NaiveDate;

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

/// Arithmetic mean, or `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N, not N-1).
pub fn population_stddev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - avg;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Applies `f` to every trailing window of `period` samples.
///
/// Point `i` covers `samples[i + 1 - period..=i]`; the first `period - 1`
/// points are invalid and carry `IndicatorValue::Simple(0.0)` as filler.
pub fn rolling_series<F>(
    dates: &[NaiveDate],
    samples: &[f64],
    period: usize,
    indicator_type: IndicatorType,
    f: F,
) -> IndicatorSeries
where
    F: Fn(&[f64]) -> IndicatorValue,
{
    debug_assert_eq!(dates.len(), samples.len());

    let values = dates
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            if period > 0 && i + 1 >= period {
                IndicatorPoint {
                    date,
                    valid: true,
                    value: f(&samples[i + 1 - period..=i]),
                }
            } else {
                IndicatorPoint {
                    date,
                    valid: false,
                    value: IndicatorValue::Simple(0.0),
                }
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
