//! # Identifier Newtypes
//!
//! Newtype wrappers for the three identifier namespaces of a facility.
//! You cannot pass a `TicketId` where a `SpotId` is expected.
//!
//! `SpotId` ordering matters: the allocator breaks price ties on the lowest
//! spot id, so the derived `Ord` on the inner integer is part of the
//! allocation contract.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum accepted length of a vehicle registration.
const MAX_VEHICLE_ID_LEN: usize = 20;

/// Identifier of a single parking spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(pub u32);

/// Identifier of a ticket issued by a ledger. Monotonic, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub u64);

/// Vehicle registration plate, normalised to upper case.
///
/// Format: 1-20 characters drawn from ASCII letters, digits and `-`.
/// Surrounding whitespace is trimmed before validation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VehicleId(String);

impl SpotId {
    /// The raw spot number.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TicketId {
    /// The ticket issued after this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl VehicleId {
    /// Validate and normalise a registration plate.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= MAX_VEHICLE_ID_LEN
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ValidationError::InvalidVehicleId(raw.as_ref().to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The normalised plate string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VehicleId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VehicleId> for String {
    fn from(id: VehicleId) -> Self {
        id.0
    }
}

impl std::str::FromStr for VehicleId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for SpotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.0)
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{:06}", self.0)
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_id_normalises_case_and_whitespace() {
        let id = VehicleId::new("  ka01-ab1234 ").unwrap();
        assert_eq!(id.as_str(), "KA01-AB1234");
    }

    #[test]
    fn test_vehicle_id_rejects_bad_input() {
        assert!(VehicleId::new("").is_err());
        assert!(VehicleId::new("   ").is_err());
        assert!(VehicleId::new("KA 01").is_err());
        assert!(VehicleId::new("KA01_AB").is_err());
        assert!(VehicleId::new("A".repeat(21)).is_err());
        assert!(VehicleId::new("A".repeat(20)).is_ok());
    }

    #[test]
    fn test_vehicle_id_serde_validates() {
        let ok: VehicleId = serde_json::from_str("\"mh12xy9\"").unwrap();
        assert_eq!(ok.as_str(), "MH12XY9");
        assert!(serde_json::from_str::<VehicleId>("\"bad plate\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"MH12XY9\"");
    }

    #[test]
    fn test_spot_id_ordering_follows_number() {
        assert!(SpotId(1) < SpotId(2));
        assert!(SpotId(9) < SpotId(10));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(SpotId(7).to_string(), "S7");
        assert_eq!(TicketId(42).to_string(), "T000042");
        assert_eq!(TicketId(1).next(), TicketId(2));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Valid plates survive normalisation unchanged apart from case.
        #[test]
        fn vehicle_id_normalisation_is_idempotent(raw in "[a-zA-Z0-9-]{1,20}") {
            let id = VehicleId::new(&raw).unwrap();
            prop_assert_eq!(id.as_str(), raw.to_ascii_uppercase());
            let again = VehicleId::new(id.as_str()).unwrap();
            prop_assert_eq!(again, id);
        }

        /// Anything containing a character outside the plate alphabet is rejected.
        #[test]
        fn vehicle_id_rejects_foreign_chars(
            prefix in "[A-Z0-9]{1,8}",
            bad in "[_./ @#]",
            suffix in "[A-Z0-9]{1,8}",
        ) {
            let raw = format!("{prefix}{bad}{suffix}");
            prop_assert!(VehicleId::new(raw).is_err());
        }
    }
}
