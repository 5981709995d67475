//! # Vehicle Category
//!
//! The single definition of the vehicle classes that partition a facility's
//! spot pool. Allocator heaps, config parsing and CLI output all match on
//! this enum exhaustively.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Vehicle class. A spot serves exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    /// Motorcycles, scooters.
    TwoWheeler,
    /// Cars, vans.
    FourWheeler,
}

impl VehicleCategory {
    /// All categories in canonical order.
    pub fn all() -> &'static [VehicleCategory] {
        &[Self::TwoWheeler, Self::FourWheeler]
    }

    /// The snake_case identifier, identical to the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoWheeler => "two_wheeler",
            Self::FourWheeler => "four_wheeler",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::TwoWheeler => "TWO_WHEELER",
            Self::FourWheeler => "FOUR_WHEELER",
        };
        f.write_str(s)
    }
}

impl FromStr for VehicleCategory {
    type Err = ValidationError;

    /// Accepts the snake_case identifier produced by [`VehicleCategory::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two_wheeler" => Ok(Self::TwoWheeler),
            "four_wheeler" => Ok(Self::FourWheeler),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_roundtrip() {
        for category in VehicleCategory::all() {
            let parsed: VehicleCategory = category.as_str().parse().unwrap();
            assert_eq!(*category, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("TWO_WHEELER".parse::<VehicleCategory>().is_err());
        assert!("truck".parse::<VehicleCategory>().is_err());
        assert!("".parse::<VehicleCategory>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for category in VehicleCategory::all() {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(VehicleCategory::TwoWheeler.to_string(), "TWO_WHEELER");
        assert_eq!(VehicleCategory::FourWheeler.to_string(), "FOUR_WHEELER");
    }
}
