//! Configuration validation.
//!
//! Validates every config section before a command uses it. Missing optional
//! keys fall back to the defaults of the typed configs.

use crate::domain::error::SamperfError;
use crate::domain::performance::PerformanceConfig;
use crate::domain::scan::parse_codes;
use crate::domain::signal::SignalConfig;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

pub fn validate_performance_config(config: &dyn ConfigPort) -> Result<(), SamperfError> {
    let defaults = PerformanceConfig::default();
    let rate = config.get_double("performance", "risk_free_rate", defaults.risk_free_rate);
    if !(0.0..1.0).contains(&rate) {
        return Err(invalid(
            "performance",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    validate_trading_days(config, "performance", defaults.trading_days_per_year)
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), SamperfError> {
    let defaults = SignalConfig::default();

    for (key, default) in [
        ("ma_short", defaults.ma_short),
        ("ma_long", defaults.ma_long),
        ("rsi_period", defaults.rsi_period),
        ("bollinger_period", defaults.bollinger_period),
    ] {
        if config.get_int("signal", key, default as i64) < 1 {
            return Err(invalid("signal", key, &format!("{key} must be at least 1")));
        }
    }

    let ma_short = config.get_int("signal", "ma_short", defaults.ma_short as i64);
    let ma_long = config.get_int("signal", "ma_long", defaults.ma_long as i64);
    if ma_short >= ma_long {
        return Err(invalid(
            "signal",
            "ma_short",
            "ma_short must be shorter than ma_long",
        ));
    }

    let multiplier = config.get_double(
        "signal",
        "bollinger_multiplier",
        defaults.bollinger_multiplier,
    );
    if !(multiplier.is_finite() && multiplier > 0.0) {
        return Err(invalid(
            "signal",
            "bollinger_multiplier",
            "bollinger_multiplier must be positive",
        ));
    }

    let oversold = config.get_double("signal", "rsi_oversold", defaults.rsi_oversold);
    let overbought = config.get_double("signal", "rsi_overbought", defaults.rsi_overbought);
    if !(0.0..=100.0).contains(&oversold) {
        return Err(invalid(
            "signal",
            "rsi_oversold",
            "rsi_oversold must be between 0 and 100",
        ));
    }
    if !(0.0..=100.0).contains(&overbought) {
        return Err(invalid(
            "signal",
            "rsi_overbought",
            "rsi_overbought must be between 0 and 100",
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            "signal",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }

    validate_trading_days(config, "signal", defaults.trading_days_per_year)
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SamperfError> {
    require_non_empty(config, "data", "directory")?;
    require_non_empty(config, "data", "exchange")?;
    Ok(())
}

/// Codes are required for a scan unless supplied on the command line.
pub fn validate_scan_config(config: &dyn ConfigPort, codes_given: bool) -> Result<(), SamperfError> {
    if !codes_given {
        let codes = require_non_empty(config, "data", "codes")?;
        parse_codes(&codes).map_err(|e| invalid("data", "codes", &e.to_string()))?;
    }

    let lookback = config.get_int("scan", "lookback_days", DEFAULT_LOOKBACK_DAYS);
    if lookback < 1 {
        return Err(invalid(
            "scan",
            "lookback_days",
            "lookback_days must be at least 1",
        ));
    }

    parse_end_date(config)?;
    Ok(())
}

/// Optional `[scan] end_date`; `None` means today.
pub fn parse_end_date(config: &dyn ConfigPort) -> Result<Option<NaiveDate>, SamperfError> {
    match config.get_string("scan", "end_date") {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_date(&s)
            .map(Some)
            .map_err(|_| invalid("scan", "end_date", "invalid end_date format, expected YYYY-MM-DD")),
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
}

fn validate_trading_days(
    config: &dyn ConfigPort,
    section: &str,
    default: f64,
) -> Result<(), SamperfError> {
    let days = config.get_double(section, "trading_days_per_year", default);
    if !(days.is_finite() && days > 0.0) {
        return Err(invalid(
            section,
            "trading_days_per_year",
            "trading_days_per_year must be positive",
        ));
    }
    Ok(())
}

fn require_non_empty(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, SamperfError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(SamperfError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> SamperfError {
    SamperfError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
