//! Price data access port trait.

use crate::domain::error::SamperfError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `code` within `[start_date, end_date]`, oldest first.
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SamperfError>;

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, SamperfError>;
}
