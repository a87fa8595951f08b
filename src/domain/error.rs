//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for samperf.
#[derive(Debug, thiserror::Error)]
pub enum SamperfError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid observation on {date}: {reason}")]
    InvalidObservation { date: NaiveDate, reason: String },

    #[error("observation dated {current} does not follow {previous}")]
    NonChronological {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("no data for {code} on {exchange}")]
    NoData { code: String, exchange: String },

    #[error("insufficient data for {code} on {exchange}: have {bars} bars, need {minimum}")]
    InsufficientData {
        code: String,
        exchange: String,
        bars: usize,
        minimum: usize,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SamperfError> for std::process::ExitCode {
    fn from(err: &SamperfError) -> Self {
        let code: u8 = match err {
            SamperfError::Io(_) => 1,
            SamperfError::ConfigParse { .. }
            | SamperfError::ConfigMissing { .. }
            | SamperfError::ConfigInvalid { .. } => 2,
            SamperfError::Data { .. }
            | SamperfError::InvalidObservation { .. }
            | SamperfError::NonChronological { .. } => 3,
            SamperfError::NoData { .. } | SamperfError::InsufficientData { .. } => 5,
            SamperfError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
