//! # Error Types
//!
//! Validation failures for the domain primitives defined in this crate.
//! Each variant carries the rejected input so that a misconfigured facility
//! file or a bad gate reading can be diagnosed from the message alone.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Vehicle registration does not match the accepted plate format.
    #[error("invalid vehicle id: {0:?} (expected 1-20 ASCII letters, digits or '-')")]
    InvalidVehicleId(String),

    /// Currency code is not three upper-case ASCII letters.
    #[error("invalid currency code: {0:?} (expected 3 upper-case letters, e.g. \"INR\")")]
    InvalidCurrency(String),

    /// Vehicle category string is not recognised.
    #[error("unknown vehicle category: {0:?} (expected two_wheeler or four_wheeler)")]
    UnknownCategory(String),

    /// Timestamp string could not be parsed or was not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A duration that must be strictly positive was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveDuration {
        /// Name of the offending setting.
        field: &'static str,
        /// The rejected value, in seconds.
        value: i64,
    },
}
