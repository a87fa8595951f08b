//! Portfolio valuation and trade ledger port trait.

use crate::domain::error::SamperfError;
use crate::domain::trade::Observation;

pub trait LedgerPort {
    /// Observations for `portfolio`, strictly ordered by date.
    fn fetch_observations(&self, portfolio: &str) -> Result<Vec<Observation>, SamperfError>;
}
