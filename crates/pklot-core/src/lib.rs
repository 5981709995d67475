//! # pklot-core — Foundational Types for the pklot Stack
//!
//! Leaf crate of the workspace. Every other `pklot-*` crate depends on it;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `SpotId`, `VehicleId` and
//!    `TicketId` are distinct types. A spot number cannot be passed where a
//!    ticket number is expected.
//!
//! 2. **One `VehicleCategory` enum.** Every `match` on it is exhaustive, so
//!    adding a category forces the allocator, config loader and CLI to
//!    handle it.
//!
//! 3. **Integer money.** `Amount` is a count of minor currency units. There
//!    are no floats anywhere on the billing path.
//!
//! 4. **UTC-only timestamps** with seconds precision, and a [`Clock`] trait
//!    so that callers decide where "now" comes from.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pklot-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod category;
pub mod clock;
pub mod error;
pub mod identity;
pub mod money;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use category::VehicleCategory;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ValidationError;
pub use identity::{SpotId, TicketId, VehicleId};
pub use money::{Amount, Currency};
pub use temporal::Timestamp;
