//! # Facility Configuration
//!
//! Loaded once at startup from YAML:
//!
//! ```yaml
//! name: "Central Garage"
//! currency: "INR"
//! billing:
//!   unit_minutes: 60
//! spots:
//!   - { id: 1, category: two_wheeler, price: 10 }
//! blocks:
//!   - { category: four_wheeler, first_id: 11, count: 10, price: 20 }
//! ```
//!
//! `spots` lists individual spots; `blocks` expands into `count` spots with
//! consecutive ids. Both lists are merged, and a repeated id is reported as
//! [`FacilityError::DuplicateId`] when the facility is built.

use chrono::Duration;
use pklot_core::{Amount, Currency, SpotId, VehicleCategory};
use serde::{Deserialize, Serialize};

use crate::billing::{BillingCalculator, DEFAULT_UNIT_MINUTES};
use crate::error::{FacilityError, FacilityResult};
use crate::spot::Spot;

/// Top-level facility configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityConfig {
    /// Display name, used in logs and CLI output.
    pub name: String,
    /// Currency in which spot prices are quoted.
    pub currency: Currency,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub spots: Vec<SpotConfig>,
    #[serde(default)]
    pub blocks: Vec<SpotBlock>,
}

/// Billing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Length of one billing unit, in minutes.
    pub unit_minutes: i64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            unit_minutes: DEFAULT_UNIT_MINUTES,
        }
    }
}

/// A single spot entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotConfig {
    pub id: u32,
    pub category: VehicleCategory,
    /// Price per billing unit in minor currency units.
    pub price: u64,
}

/// A run of identically priced spots with consecutive ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotBlock {
    pub category: VehicleCategory,
    pub first_id: u32,
    pub count: u32,
    pub price: u64,
}

impl FacilityConfig {
    /// Parse a facility YAML document.
    ///
    /// # Errors
    ///
    /// [`FacilityError::Config`] if the YAML is malformed, a field has the
    /// wrong type, or the currency code is invalid.
    pub fn from_yaml(yaml: &str) -> FacilityResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| FacilityError::Config(format!("failed to parse facility YAML: {e}")))
    }

    /// The sample lot from the design notes: ten two-wheeler spots at 10
    /// (ids 1-10) and ten four-wheeler spots at 20 (ids 11-20), billed hourly.
    pub fn demo() -> Self {
        Self {
            name: "Demo Lot".to_string(),
            currency: Currency::inr(),
            billing: BillingConfig::default(),
            spots: Vec::new(),
            blocks: vec![
                SpotBlock {
                    category: VehicleCategory::TwoWheeler,
                    first_id: 1,
                    count: 10,
                    price: 10,
                },
                SpotBlock {
                    category: VehicleCategory::FourWheeler,
                    first_id: 11,
                    count: 10,
                    price: 20,
                },
            ],
        }
    }

    /// The configured billing calculator.
    ///
    /// # Errors
    ///
    /// [`FacilityError::Validation`] if `unit_minutes` is not positive.
    pub fn billing_calculator(&self) -> FacilityResult<BillingCalculator> {
        let minutes = self.billing.unit_minutes;
        if minutes <= 0 {
            return Err(pklot_core::ValidationError::NonPositiveDuration {
                field: "billing.unit_minutes",
                value: minutes.saturating_mul(60),
            }
            .into());
        }
        let unit = Duration::try_minutes(minutes).ok_or_else(|| {
            FacilityError::Config(format!("billing.unit_minutes {minutes} is out of range"))
        })?;
        Ok(BillingCalculator::new(unit)?)
    }

    /// Every configured spot: explicit entries first, then expanded blocks.
    ///
    /// # Errors
    ///
    /// [`FacilityError::Config`] if a block's id range overflows `u32`.
    pub fn expand_spots(&self) -> FacilityResult<Vec<Spot>> {
        let mut spots: Vec<Spot> = self
            .spots
            .iter()
            .map(|s| Spot::new(SpotId(s.id), s.category, Amount(s.price)))
            .collect();

        for block in &self.blocks {
            for offset in 0..block.count {
                let id = block.first_id.checked_add(offset).ok_or_else(|| {
                    FacilityError::Config(format!(
                        "block starting at {} with {} spots overflows the spot id range",
                        block.first_id, block.count
                    ))
                })?;
                spots.push(Spot::new(SpotId(id), block.category, Amount(block.price)));
            }
        }
        Ok(spots)
    }
}
