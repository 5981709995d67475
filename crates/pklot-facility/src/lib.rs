//! # pklot-facility — Parking Facility Core
//!
//! Everything a gate needs to admit and release vehicles:
//!
//! - **Spot registry** (`registry.rs`): the authoritative spot inventory,
//!   with guarded `mark_occupied` / `mark_free` transitions.
//!
//! - **Spot allocator** (`allocator.rs`): per-category min-heaps keyed by
//!   `(price, spot id)`, so the cheapest free spot is always one `peek` away.
//!
//! - **Ticket ledger** (`ledger.rs`): open tickets keyed by vehicle plus an
//!   append-only history of closed ones.
//!
//! - **Billing** (`billing.rs`): `price * max(1, ceil(duration / unit))`.
//!
//! - **Facade** (`facility.rs`): [`ParkingFacility`] owns the three
//!   containers behind one mutex and exposes `admit`, `release`, `quote`
//!   and read-only views.
//!
//! - **Configuration** (`config.rs`): YAML facility layout.
//!
//! ## Usage
//!
//! ```
//! use pklot_core::{ManualClock, Timestamp, VehicleCategory, VehicleId};
//! use pklot_facility::{FacilityConfig, ParkingFacility, Vehicle};
//!
//! let clock = ManualClock::new(Timestamp::parse("2026-01-15T08:00:00Z").unwrap());
//! let lot = ParkingFacility::from_config(&FacilityConfig::demo(), clock).unwrap();
//!
//! let car = Vehicle::new(VehicleId::new("KA01AB1234").unwrap(), VehicleCategory::FourWheeler);
//! let ticket = lot.admit(&car).unwrap();
//! assert_eq!(ticket.spot().id.get(), 11);
//!
//! lot.clock().advance(chrono::Duration::minutes(90));
//! let fee = lot.release(car.id()).unwrap();
//! assert_eq!(fee.amount.minor_units(), 40);
//! ```

pub mod allocator;
pub mod billing;
pub mod config;
pub mod error;
pub mod facility;
pub mod ledger;
pub mod registry;
pub mod spot;

pub use allocator::SpotAllocator;
pub use billing::{BillingCalculator, Fee, DEFAULT_UNIT_MINUTES};
pub use config::{BillingConfig, FacilityConfig, SpotBlock, SpotConfig};
pub use error::{FacilityError, FacilityResult};
pub use facility::{CategoryOccupancy, ParkingFacility};
pub use ledger::{ParkingState, Ticket, TicketLedger};
pub use registry::SpotRegistry;
pub use spot::{Spot, SpotSnapshot, Vehicle};
