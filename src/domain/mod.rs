//! Core domain types and logic.

pub mod ohlcv;
pub mod trade;
pub mod indicator;
pub mod indicator_helpers;
pub mod float_serde;
pub mod performance;
pub mod metrics;
pub mod signal;
pub mod scan;
pub mod config_validation;
pub mod error;
