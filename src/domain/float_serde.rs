//! Serde helpers for floats that may legitimately be NaN or infinite.
//!
//! JSON has no representation for non-finite numbers and `serde_json` writes
//! them as `null`, which would erase the `+inf` profit-factor sentinel and
//! the NaN of an unfilled indicator. These are written as strings instead.

use serde::Serializer;

pub fn serialize_f64<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_infinite() {
        serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
    } else {
        serializer.serialize_f64(*value)
    }
}
