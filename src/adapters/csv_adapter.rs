//! CSV directory adapter for price bars and portfolio ledgers.
//!
//! Layout of the data directory:
//! - `<CODE>_<EXCHANGE>.csv`: `date,open,high,low,close,volume`
//! - `<portfolio>_equity.csv`: `date,value`
//! - `<portfolio>_trades.csv` (optional): `date,code,profit`

use crate::domain::error::SamperfError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::trade::{Observation, Trade};
use crate::ports::data_port::DataPort;
use crate::ports::ledger_port::LedgerPort;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn price_path(&self, code: &str, exchange: &str) -> PathBuf {
        self.base_path.join(format!("{code}_{exchange}.csv"))
    }

    fn equity_path(&self, portfolio: &str) -> PathBuf {
        self.base_path.join(format!("{portfolio}_equity.csv"))
    }

    fn trades_path(&self, portfolio: &str) -> PathBuf {
        self.base_path.join(format!("{portfolio}_trades.csv"))
    }

    fn read_trades(&self, portfolio: &str) -> Result<Vec<Trade>, SamperfError> {
        let path = self.trades_path(portfolio);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no trades file");
            return Ok(Vec::new());
        }

        let mut trades = Vec::new();
        for record in open_records(&path)? {
            let record = record?;
            trades.push(Trade {
                date: parse_date_field(&record, 0, &path)?,
                code: field(&record, 1, "code", &path)?.trim().to_string(),
                profit: parse_field(&record, 2, "profit", &path)?,
            });
        }
        Ok(trades)
    }
}

fn open_records(
    path: &Path,
) -> Result<impl Iterator<Item = Result<csv::StringRecord, SamperfError>>, SamperfError> {
    let reader = csv::Reader::from_path(path).map_err(|e| SamperfError::Data {
        reason: format!("failed to read {}: {e}", path.display()),
    })?;
    let display = path.display().to_string();
    Ok(reader.into_records().map(move |r| {
        r.map_err(|e| SamperfError::Data {
            reason: format!("CSV parse error in {display}: {e}"),
        })
    }))
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    path: &Path,
) -> Result<&'r str, SamperfError> {
    record.get(index).ok_or_else(|| SamperfError::Data {
        reason: format!("missing {name} column in {}", path.display()),
    })
}

fn parse_field<T>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    path: &Path,
) -> Result<T, SamperfError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field(record, index, name, path)?;
    raw.trim().parse().map_err(|e| SamperfError::Data {
        reason: format!("invalid {name} value {raw:?} in {}: {e}", path.display()),
    })
}

fn parse_date_field(
    record: &csv::StringRecord,
    index: usize,
    path: &Path,
) -> Result<NaiveDate, SamperfError> {
    let raw = field(record, index, "date", path)?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| SamperfError::Data {
        reason: format!("invalid date format {raw:?} in {}: {e}", path.display()),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SamperfError> {
        let path = self.price_path(code, exchange);
        if !path.exists() {
            return Err(SamperfError::NoData {
                code: code.to_string(),
                exchange: exchange.to_string(),
            });
        }
        let mut bars = Vec::new();

        for record in open_records(&path)? {
            let record = record?;
            let date = parse_date_field(&record, 0, &path)?;
            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                code: code.to_string(),
                exchange: exchange.to_string(),
                date,
                open: parse_field(&record, 1, "open", &path)?,
                high: parse_field(&record, 2, "high", &path)?,
                low: parse_field(&record, 3, "low", &path)?,
                close: parse_field(&record, 4, "close", &path)?,
                volume: parse_field(&record, 5, "volume", &path)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        tracing::debug!(%code, %exchange, bars = bars.len(), "loaded price history");
        Ok(bars)
    }

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, SamperfError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SamperfError::Data {
            reason: format!(
                "failed to read directory {}: {e}",
                self.base_path.display()
            ),
        })?;

        let suffix = format!("_{exchange}.csv");
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(&suffix) {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

impl LedgerPort for CsvAdapter {
    fn fetch_observations(&self, portfolio: &str) -> Result<Vec<Observation>, SamperfError> {
        let path = self.equity_path(portfolio);
        let mut by_date: BTreeMap<NaiveDate, Observation> = BTreeMap::new();

        for record in open_records(&path)? {
            let record = record?;
            let date = parse_date_field(&record, 0, &path)?;
            let value: f64 = parse_field(&record, 1, "value", &path)?;
            if by_date.insert(date, Observation::new(date, value)).is_some() {
                return Err(SamperfError::Data {
                    reason: format!("duplicate valuation for {date} in {}", path.display()),
                });
            }
        }

        for trade in self.read_trades(portfolio)? {
            match by_date.get_mut(&trade.date) {
                Some(obs) => obs.trades.push(trade),
                None => {
                    return Err(SamperfError::Data {
                        reason: format!(
                            "trade in {} on {} has no matching valuation",
                            trade.code, trade.date
                        ),
                    });
                }
            }
        }

        let observations: Vec<Observation> = by_date.into_values().collect();
        tracing::debug!(
            %portfolio,
            observations = observations.len(),
            trades = observations.iter().map(|o| o.trades.len()).sum::<usize>(),
            "loaded ledger"
        );
        Ok(observations)
    }
}
