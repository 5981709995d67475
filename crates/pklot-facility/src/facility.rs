//! # Facility Facade
//!
//! [`ParkingFacility`] is the single owner of the spot registry, allocator
//! and ticket ledger, and the only thing a gate talks to.
//!
//! ## Serialization
//!
//! All three containers sit behind one `parking_lot::Mutex`. Every admit
//! and release runs start to finish under that lock, so two gates cannot
//! hand out the same spot or close the same ticket twice. The lock is
//! non-poisoning and no call blocks on I/O, so a caller always gets an
//! answer or a typed error immediately.
//!
//! ## Atomicity
//!
//! - `admit` = check ledger, acquire spot, open ticket. A failure at any step
//!   leaves registry, heaps and ledger exactly as they were (an acquired
//!   spot is released back if the ticket cannot be opened).
//! - `release` = price the open ticket, close it, free the spot. The fee is
//!   computed before anything is mutated, so neither a missing ticket nor
//!   an unpayable fee changes state.

use parking_lot::Mutex;
use pklot_core::{Clock, Currency, SystemClock, VehicleCategory, VehicleId};
use serde::{Deserialize, Serialize};

use crate::allocator::SpotAllocator;
use crate::billing::{BillingCalculator, Fee};
use crate::config::FacilityConfig;
use crate::error::{FacilityError, FacilityResult};
use crate::ledger::{ParkingState, Ticket, TicketLedger};
use crate::registry::SpotRegistry;
use crate::spot::{Spot, Vehicle};

/// Spot counts for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOccupancy {
    pub category: VehicleCategory,
    pub total: usize,
    pub free: usize,
}

impl CategoryOccupancy {
    pub fn occupied(&self) -> usize {
        self.total - self.free
    }
}

#[derive(Debug, Default)]
struct FacilityState {
    registry: SpotRegistry,
    allocator: SpotAllocator,
    ledger: TicketLedger,
}

/// A parking facility: spot inventory, tickets and billing behind one lock.
///
/// `Send + Sync`; share it across gate threads with `Arc`.
#[derive(Debug)]
pub struct ParkingFacility<C: Clock = SystemClock> {
    name: String,
    currency: Currency,
    billing: BillingCalculator,
    clock: C,
    state: Mutex<FacilityState>,
}

impl ParkingFacility<SystemClock> {
    /// Build a facility from configuration using the wall clock.
    pub fn from_config_system(config: &FacilityConfig) -> FacilityResult<Self> {
        Self::from_config(config, SystemClock)
    }
}

impl<C: Clock> ParkingFacility<C> {
    /// An empty facility. Add spots with [`register_spot`](Self::register_spot).
    pub fn new(
        name: impl Into<String>,
        currency: Currency,
        billing: BillingCalculator,
        clock: C,
    ) -> Self {
        Self {
            name: name.into(),
            currency,
            billing,
            clock,
            state: Mutex::new(FacilityState::default()),
        }
    }

    /// Build a facility and register every configured spot.
    ///
    /// # Errors
    ///
    /// - [`FacilityError::DuplicateId`] if two configured spots share an id.
    /// - [`FacilityError::Validation`] / [`FacilityError::Config`] for a bad
    ///   billing unit or spot block.
    pub fn from_config(config: &FacilityConfig, clock: C) -> FacilityResult<Self> {
        let billing = config.billing_calculator()?;
        let facility = Self::new(config.name.clone(), config.currency.clone(), billing, clock);
        for spot in config.expand_spots()? {
            facility.register_spot(spot)?;
        }
        tracing::info!(
            facility = %facility.name,
            spots = facility.state.lock().registry.len(),
            unit_minutes = billing.unit().num_minutes(),
            "facility initialized"
        );
        Ok(facility)
    }

    /// Add a spot to the inventory and offer it for allocation.
    pub fn register_spot(&self, spot: Spot) -> FacilityResult<()> {
        let mut state = self.state.lock();
        let FacilityState {
            registry,
            allocator,
            ..
        } = &mut *state;
        registry.register(spot.clone())?;
        allocator.track(&spot);
        Ok(())
    }

    /// Admit a vehicle: allocate the cheapest free spot of its category and
    /// issue a ticket stamped with the current time.
    ///
    /// # Errors
    ///
    /// - [`FacilityError::AlreadyParked`] if the vehicle holds an open ticket.
    /// - [`FacilityError::NoAvailableSpot`] if its category is full.
    ///
    /// State is unchanged on every error.
    pub fn admit(&self, vehicle: &Vehicle) -> FacilityResult<Ticket> {
        let now = self.clock.now();
        let category = vehicle.category();

        let mut state = self.state.lock();
        let FacilityState {
            registry,
            allocator,
            ledger,
        } = &mut *state;

        if let Some(existing) = ledger.open_ticket(vehicle.id()) {
            let err = FacilityError::AlreadyParked {
                vehicle: vehicle.id().clone(),
                ticket: existing.id(),
            };
            record_rejection(category, &err);
            return Err(err);
        }

        let spot = match allocator.acquire(registry, category, vehicle) {
            Ok(spot) => spot,
            Err(err) => {
                record_rejection(category, &err);
                return Err(err);
            }
        };

        let ticket = match ledger.open(vehicle, spot.snapshot(), now) {
            Ok(ticket) => ticket,
            Err(err) => {
                if let Err(rollback) = allocator.release(registry, spot.id()) {
                    tracing::error!(spot = %spot.id(), error = %rollback, "failed to roll back spot allocation");
                }
                record_rejection(category, &err);
                return Err(err);
            }
        };

        metrics::counter!("pklot_admissions_total", "category" => category.as_str()).increment(1);
        tracing::info!(
            vehicle = %vehicle.id(),
            category = %category,
            spot = %spot.id(),
            ticket = %ticket.id(),
            at = %now,
            "vehicle admitted"
        );
        Ok(ticket)
    }

    /// Release a vehicle: close its ticket at the current time, free the
    /// spot and return the fee.
    ///
    /// # Errors
    ///
    /// - [`FacilityError::NotParked`] if the vehicle holds no open ticket.
    /// - [`FacilityError::FeeOverflow`] if the fee does not fit; the ticket
    ///   stays open and the spot stays occupied.
    ///
    /// State is unchanged on every error.
    pub fn release(&self, vehicle_id: &VehicleId) -> FacilityResult<Fee> {
        let now = self.clock.now();

        let mut state = self.state.lock();
        let FacilityState {
            registry,
            allocator,
            ledger,
        } = &mut *state;

        let open = ledger.open_ticket(vehicle_id).ok_or_else(|| {
            let err = FacilityError::NotParked(vehicle_id.clone());
            tracing::warn!(vehicle = %vehicle_id, error = %err, "release rejected");
            err
        })?;

        // Price before closing: a billing failure must leave the ticket open.
        let mut fee = self.billing.quote(open, now).map_err(|err| {
            tracing::warn!(vehicle = %vehicle_id, ticket = %open.id(), error = %err, "release rejected");
            err
        })?;

        let ticket = ledger.close(vehicle_id, now)?;

        allocator.release(registry, ticket.spot().id).map_err(|err| {
            tracing::error!(spot = %ticket.spot().id, ticket = %ticket.id(), error = %err, "closed ticket referenced a spot that could not be freed");
            err
        })?;

        fee.ticket = ticket;
        let ticket = &fee.ticket;

        metrics::counter!("pklot_releases_total", "category" => ticket.spot().category.as_str())
            .increment(1);
        tracing::info!(
            vehicle = %vehicle_id,
            spot = %ticket.spot().id,
            ticket = %ticket.id(),
            units = fee.billed_units,
            amount = %fee.amount,
            currency = %self.currency,
            "vehicle released"
        );
        Ok(fee)
    }

    /// Running charge for a parked vehicle if it left now.
    ///
    /// # Errors
    ///
    /// [`FacilityError::NotParked`] if the vehicle holds no open ticket.
    pub fn quote(&self, vehicle_id: &VehicleId) -> FacilityResult<Fee> {
        let now = self.clock.now();
        let state = self.state.lock();
        let ticket = state
            .ledger
            .open_ticket(vehicle_id)
            .ok_or_else(|| FacilityError::NotParked(vehicle_id.clone()))?;
        self.billing.quote(ticket, now)
    }

    pub fn state_of(&self, vehicle_id: &VehicleId) -> ParkingState {
        self.state.lock().ledger.state_of(vehicle_id)
    }

    /// Per-category totals and free counts, in category order.
    pub fn occupancy(&self) -> Vec<CategoryOccupancy> {
        let state = self.state.lock();
        VehicleCategory::all()
            .iter()
            .map(|&category| CategoryOccupancy {
                category,
                total: state.registry.spots_in(category).count(),
                free: state.allocator.available(category),
            })
            .collect()
    }

    /// Snapshot of every spot in id order.
    pub fn spots(&self) -> Vec<Spot> {
        self.state.lock().registry.spots().cloned().collect()
    }

    pub fn open_tickets(&self) -> Vec<Ticket> {
        self.state.lock().ledger.open_tickets()
    }

    /// Closed tickets in closing order.
    pub fn history(&self) -> Vec<Ticket> {
        self.state.lock().ledger.history().to_vec()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn billing(&self) -> &BillingCalculator {
        &self.billing
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn record_rejection(category: VehicleCategory, err: &FacilityError) {
    let reason = match err {
        FacilityError::NoAvailableSpot(_) => "full",
        FacilityError::AlreadyParked { .. } => "already_parked",
        _ => "other",
    };
    metrics::counter!(
        "pklot_admission_rejections_total",
        "category" => category.as_str(),
        "reason" => reason
    )
    .increment(1);
    tracing::warn!(category = %category, error = %err, "admission rejected");
}
