//! Market scan across a universe of codes.
//!
//! Parses code lists from configuration, fetches each code's price window,
//! and evaluates the ones with enough history. Codes without usable data are
//! reported as skipped rather than failing the scan.

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::domain::error::SamperfError;
use crate::domain::signal::{Signal, SignalConfig, SignalResult, evaluate};
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ScanError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, ScanError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ScanError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(ScanError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub exchange: String,
    pub codes: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ScanRequest {
    /// Window of `lookback_days` calendar days ending at `end_date`.
    pub fn lookback(
        exchange: &str,
        codes: Vec<String>,
        end_date: NaiveDate,
        lookback_days: i64,
    ) -> Result<Self, SamperfError> {
        let start_date = TimeDelta::try_days(lookback_days)
            .and_then(|span| end_date.checked_sub_signed(span))
            .ok_or_else(|| SamperfError::ConfigInvalid {
                section: "scan".into(),
                key: "lookback_days".into(),
                reason: format!("{lookback_days} days before {end_date} is out of range"),
            })?;

        Ok(ScanRequest {
            exchange: exchange.to_string(),
            codes,
            start_date,
            end_date,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    pub code: String,
    #[serde(flatten)]
    pub result: SignalResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    NoData,
    FetchError { reason: String },
    InsufficientBars { bars: usize, minimum: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub exchange: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub entries: Vec<ScanEntry>,
    pub skipped: Vec<SkippedCode>,
}

impl ScanReport {
    /// Entry count per signal, in classification priority order.
    pub fn count_by_signal(&self) -> BTreeMap<Signal, usize> {
        let mut counts: BTreeMap<Signal, usize> = Signal::ALL.iter().map(|&s| (s, 0)).collect();
        for entry in &self.entries {
            *counts.entry(entry.result.signal).or_insert(0) += 1;
        }
        counts
    }
}

pub fn scan_universe(
    data_port: &dyn DataPort,
    request: &ScanRequest,
    config: &SignalConfig,
) -> Result<ScanReport, SamperfError> {
    let minimum = config.min_bars();
    let exchange = request.exchange.as_str();
    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for code in &request.codes {
        let bars = match data_port.fetch_ohlcv(code, exchange, request.start_date, request.end_date)
        {
            Ok(bars) => bars,
            Err(SamperfError::NoData { .. }) => {
                tracing::warn!(%code, %exchange, "skipping code: no data found");
                skipped.push(SkippedCode {
                    code: code.clone(),
                    reason: SkipReason::NoData,
                });
                continue;
            }
            Err(e) => {
                tracing::warn!(%code, %exchange, error = %e, "skipping code: fetch failed");
                skipped.push(SkippedCode {
                    code: code.clone(),
                    reason: SkipReason::FetchError {
                        reason: e.to_string(),
                    },
                });
                continue;
            }
        };

        if bars.is_empty() {
            tracing::warn!(%code, %exchange, "skipping code: no data found");
            skipped.push(SkippedCode {
                code: code.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        if bars.len() < minimum {
            tracing::warn!(
                %code,
                %exchange,
                bars = bars.len(),
                minimum,
                "skipping code: insufficient bars"
            );
            skipped.push(SkippedCode {
                code: code.clone(),
                reason: SkipReason::InsufficientBars {
                    bars: bars.len(),
                    minimum,
                },
            });
            continue;
        }

        let result = evaluate(&bars, config);
        tracing::debug!(%code, bars = bars.len(), signal = %result.signal, "evaluated");
        entries.push(ScanEntry {
            code: code.clone(),
            result,
        });
    }

    if entries.is_empty() {
        return Err(SamperfError::InsufficientData {
            code: "all".to_string(),
            exchange: exchange.to_string(),
            bars: 0,
            minimum,
        });
    }

    if !skipped.is_empty() {
        tracing::info!(
            evaluated = entries.len(),
            total = request.codes.len(),
            %exchange,
            "scanned partial universe"
        );
    }

    Ok(ScanReport {
        exchange: exchange.to_string(),
        start_date: request.start_date,
        end_date: request.end_date,
        entries,
        skipped,
    })
}
