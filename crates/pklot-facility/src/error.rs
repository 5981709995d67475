//! # Facility Errors
//!
//! Every failure a registry, allocator, ledger or billing call can produce.
//! All of them are recoverable business outcomes: a full lot or a vehicle
//! that never entered is reported to the gate, not treated as a crash.

use pklot_core::{SpotId, TicketId, ValidationError, VehicleCategory, VehicleId};
use thiserror::Error;

/// Errors raised by the facility components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacilityError {
    /// A spot with this identifier is already registered.
    #[error("spot {0} is already registered")]
    DuplicateId(SpotId),

    /// No spot with this identifier exists.
    #[error("spot {0} not found")]
    NotFound(SpotId),

    /// The requested occupancy change contradicts the spot's current state.
    #[error("spot {spot} cannot {attempted}: {reason}")]
    InvalidState {
        /// The spot involved.
        spot: SpotId,
        /// The attempted operation (e.g. "occupy", "free").
        attempted: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Every spot of the category is taken.
    #[error("no {0} spot available")]
    NoAvailableSpot(VehicleCategory),

    /// The vehicle already holds an open ticket.
    #[error("vehicle {vehicle} is already parked under ticket {ticket}")]
    AlreadyParked {
        /// The vehicle.
        vehicle: VehicleId,
        /// Its open ticket.
        ticket: TicketId,
    },

    /// The vehicle has no open ticket.
    #[error("vehicle {0} is not parked")]
    NotParked(VehicleId),

    /// Billing was asked to price a ticket that is still open.
    #[error("ticket {0} is not closed")]
    InvalidTicket(TicketId),

    /// Fee arithmetic exceeded the representable amount.
    #[error("fee for ticket {0} overflows")]
    FeeOverflow(TicketId),

    /// Malformed primitive (vehicle id, currency, billing unit).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Facility configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type FacilityResult<T> = Result<T, FacilityError>;
