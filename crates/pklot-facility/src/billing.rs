//! # Billing Calculator
//!
//! Prices a stay as
//!
//! ```text
//! fee = spot.price * max(1, ceil((exit - entry) / unit))
//! ```
//!
//! A stay is always charged at least one unit, and partial units round up.
//! Pure: no clock reads, no ledger access.

use chrono::Duration;
use pklot_core::{Amount, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::{FacilityError, FacilityResult};
use crate::ledger::Ticket;

/// Default billing unit: one hour.
pub const DEFAULT_UNIT_MINUTES: i64 = 60;

/// The priced outcome of a stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// Snapshot of the billed ticket.
    pub ticket: Ticket,
    /// Number of units charged (at least one).
    pub billed_units: u64,
    /// Price per unit, taken from the spot snapshot on the ticket.
    pub rate: Amount,
    /// `rate * billed_units`.
    pub amount: Amount,
}

/// Computes fees for a fixed billing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingCalculator {
    unit_secs: i64,
}

impl BillingCalculator {
    /// # Errors
    ///
    /// [`ValidationError::NonPositiveDuration`] if `unit` is shorter than a
    /// second.
    pub fn new(unit: Duration) -> Result<Self, ValidationError> {
        let unit_secs = unit.num_seconds();
        if unit_secs <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                field: "billing unit",
                value: unit_secs,
            });
        }
        Ok(Self { unit_secs })
    }

    /// Billing unit length.
    pub fn unit(&self) -> Duration {
        Duration::seconds(self.unit_secs)
    }

    /// Fee for a closed ticket.
    ///
    /// # Errors
    ///
    /// - [`FacilityError::InvalidTicket`] if the ticket is still open.
    /// - [`FacilityError::FeeOverflow`] if the amount does not fit.
    pub fn calculate_fee(&self, ticket: &Ticket) -> FacilityResult<Fee> {
        let exit = ticket
            .exit_time()
            .ok_or(FacilityError::InvalidTicket(ticket.id()))?;
        self.price(ticket, exit)
    }

    /// Fee the ticket would incur if closed at `at`. Nothing is mutated.
    ///
    /// # Errors
    ///
    /// Same as [`calculate_fee`](Self::calculate_fee), minus the open-ticket
    /// check. An `at` before entry bills the one-unit minimum.
    pub fn quote(&self, ticket: &Ticket, at: Timestamp) -> FacilityResult<Fee> {
        self.price(ticket, at)
    }

    /// Units billed for a stay of `elapsed`. Negative durations bill the
    /// one-unit minimum.
    pub fn units_for(&self, elapsed: Duration) -> u64 {
        self.billed_units(elapsed.num_seconds().max(0))
    }

    fn price(&self, ticket: &Ticket, until: Timestamp) -> FacilityResult<Fee> {
        let elapsed = until.seconds_since(&ticket.entry_time()).max(0);
        let units = self.billed_units(elapsed);
        let rate = ticket.spot().price;
        let amount = rate
            .checked_mul(units)
            .ok_or(FacilityError::FeeOverflow(ticket.id()))?;
        Ok(Fee {
            ticket: ticket.clone(),
            billed_units: units,
            rate,
            amount,
        })
    }

    /// `max(1, ceil(elapsed / unit))` on non-negative seconds.
    fn billed_units(&self, elapsed_secs: i64) -> u64 {
        let units = (elapsed_secs + self.unit_secs - 1) / self.unit_secs;
        units.max(1) as u64
    }
}

impl Default for BillingCalculator {
    fn default() -> Self {
        Self {
            unit_secs: DEFAULT_UNIT_MINUTES * 60,
        }
    }
}
