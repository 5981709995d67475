//! # Ticket Ledger
//!
//! Issues and closes parking tickets. At most one ticket per vehicle is
//! open at any time; closed tickets move to an append-only history and
//! their ids are never handed out again.
//!
//! ## Vehicle lifecycle
//!
//! ```text
//! Unparked ──open──▶ Parked ──close──▶ Unparked
//! ```

use std::collections::HashMap;

use pklot_core::{SpotId, TicketId, Timestamp, VehicleId};
use serde::{Deserialize, Serialize};

use crate::error::{FacilityError, FacilityResult};
use crate::spot::{SpotSnapshot, Vehicle};

// ─── Ticket ──────────────────────────────────────────────────────────

/// A record binding a vehicle to a spot over a time interval.
///
/// Handed to callers as a read-only snapshot; the ledger keeps its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    vehicle: Vehicle,
    spot: SpotSnapshot,
    entry_time: Timestamp,
    exit_time: Option<Timestamp>,
}

impl Ticket {
    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// The spot, with the price that was in force at admission.
    pub fn spot(&self) -> &SpotSnapshot {
        &self.spot
    }

    pub fn entry_time(&self) -> Timestamp {
        self.entry_time
    }

    pub fn exit_time(&self) -> Option<Timestamp> {
        self.exit_time
    }

    pub fn is_closed(&self) -> bool {
        self.exit_time.is_some()
    }

    /// Whole seconds parked, for closed tickets.
    pub fn duration_secs(&self) -> Option<i64> {
        self.exit_time
            .map(|exit| exit.seconds_since(&self.entry_time))
    }
}

// ─── Parking state ───────────────────────────────────────────────────

/// Where a vehicle stands in the `Unparked → Parked → Unparked` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParkingState {
    /// No open ticket.
    Unparked,
    /// Holding an open ticket for a spot.
    Parked {
        ticket: TicketId,
        spot: SpotId,
    },
}

impl std::fmt::Display for ParkingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unparked => f.write_str("UNPARKED"),
            Self::Parked { ticket, spot } => write!(f, "PARKED({ticket} @ {spot})"),
        }
    }
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// Open tickets keyed by vehicle, plus closed-ticket history.
#[derive(Debug, Clone)]
pub struct TicketLedger {
    open: HashMap<VehicleId, Ticket>,
    history: Vec<Ticket>,
    next_id: TicketId,
}

impl Default for TicketLedger {
    fn default() -> Self {
        Self {
            open: HashMap::new(),
            history: Vec::new(),
            next_id: TicketId(1),
        }
    }
}

impl TicketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for `vehicle` at `spot`.
    ///
    /// # Errors
    ///
    /// [`FacilityError::AlreadyParked`] if the vehicle holds an open ticket.
    pub fn open(
        &mut self,
        vehicle: &Vehicle,
        spot: SpotSnapshot,
        entry_time: Timestamp,
    ) -> FacilityResult<Ticket> {
        if let Some(existing) = self.open.get(vehicle.id()) {
            return Err(FacilityError::AlreadyParked {
                vehicle: vehicle.id().clone(),
                ticket: existing.id,
            });
        }

        let ticket = Ticket {
            id: self.next_id,
            vehicle: vehicle.clone(),
            spot,
            entry_time,
            exit_time: None,
        };
        self.next_id = self.next_id.next();
        self.open.insert(vehicle.id().clone(), ticket.clone());
        tracing::debug!(ticket = %ticket.id, vehicle = %vehicle.id(), spot = %spot.id, "ticket opened");
        Ok(ticket)
    }

    /// Close the vehicle's open ticket at `exit_time` and return it.
    ///
    /// # Errors
    ///
    /// - [`FacilityError::NotParked`] if there is no open ticket.
    /// - [`FacilityError::InvalidState`] if `exit_time` precedes the entry
    ///   time; the ticket stays open.
    pub fn close(&mut self, vehicle_id: &VehicleId, exit_time: Timestamp) -> FacilityResult<Ticket> {
        let (entry_time, spot) = match self.open.get(vehicle_id) {
            Some(ticket) => (ticket.entry_time, ticket.spot.id),
            None => return Err(FacilityError::NotParked(vehicle_id.clone())),
        };
        if exit_time < entry_time {
            return Err(FacilityError::InvalidState {
                spot,
                attempted: "close ticket",
                reason: format!("exit time {exit_time} precedes entry time {entry_time}"),
            });
        }

        let mut ticket = self
            .open
            .remove(vehicle_id)
            .ok_or_else(|| FacilityError::NotParked(vehicle_id.clone()))?;
        ticket.exit_time = Some(exit_time);
        self.history.push(ticket.clone());
        tracing::debug!(ticket = %ticket.id, vehicle = %vehicle_id, "ticket closed");
        Ok(ticket)
    }

    /// The vehicle's open ticket, if any.
    pub fn open_ticket(&self, vehicle_id: &VehicleId) -> Option<&Ticket> {
        self.open.get(vehicle_id)
    }

    pub fn state_of(&self, vehicle_id: &VehicleId) -> ParkingState {
        match self.open.get(vehicle_id) {
            Some(t) => ParkingState::Parked {
                ticket: t.id,
                spot: t.spot.id,
            },
            None => ParkingState::Unparked,
        }
    }

    /// Open tickets ordered by ticket id.
    pub fn open_tickets(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self.open.values().cloned().collect();
        tickets.sort_by_key(Ticket::id);
        tickets
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Closed tickets in closing order.
    pub fn history(&self) -> &[Ticket] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pklot_core::{Amount, VehicleCategory};

    fn t0() -> Timestamp {
        Timestamp::parse("2026-01-15T08:00:00Z").unwrap()
    }

    fn vehicle(plate: &str) -> Vehicle {
        Vehicle::new(VehicleId::new(plate).unwrap(), VehicleCategory::FourWheeler)
    }

    fn spot(id: u32) -> SpotSnapshot {
        SpotSnapshot {
            id: SpotId(id),
            category: VehicleCategory::FourWheeler,
            price: Amount(20),
        }
    }

    #[test]
    fn test_open_then_close() {
        let mut ledger = TicketLedger::new();
        let v = vehicle("CAR1");
        let opened = ledger.open(&v, spot(1), t0()).unwrap();
        assert!(!opened.is_closed());
        assert_eq!(
            ledger.state_of(v.id()),
            ParkingState::Parked {
                ticket: opened.id(),
                spot: SpotId(1)
            }
        );

        let exit = t0().checked_add(Duration::minutes(90)).unwrap();
        let closed = ledger.close(v.id(), exit).unwrap();
        assert_eq!(closed.id(), opened.id());
        assert_eq!(closed.exit_time(), Some(exit));
        assert_eq!(closed.duration_secs(), Some(5400));
        assert_eq!(ledger.state_of(v.id()), ParkingState::Unparked);
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.open_count(), 0);
    }

    #[test]
    fn test_second_open_is_already_parked() {
        let mut ledger = TicketLedger::new();
        let v = vehicle("CAR1");
        let first = ledger.open(&v, spot(1), t0()).unwrap();
        let err = ledger.open(&v, spot(2), t0()).unwrap_err();
        assert_eq!(
            err,
            FacilityError::AlreadyParked {
                vehicle: v.id().clone(),
                ticket: first.id()
            }
        );
        assert_eq!(ledger.open_count(), 1);
    }

    #[test]
    fn test_close_without_ticket_is_not_parked() {
        let mut ledger = TicketLedger::new();
        let v = vehicle("CAR9");
        assert_eq!(
            ledger.close(v.id(), t0()).unwrap_err(),
            FacilityError::NotParked(v.id().clone())
        );
    }

    #[test]
    fn test_close_twice_is_not_parked() {
        let mut ledger = TicketLedger::new();
        let v = vehicle("CAR1");
        ledger.open(&v, spot(1), t0()).unwrap();
        ledger.close(v.id(), t0()).unwrap();
        assert!(matches!(
            ledger.close(v.id(), t0()),
            Err(FacilityError::NotParked(_))
        ));
    }

    #[test]
    fn test_exit_before_entry_keeps_ticket_open() {
        let mut ledger = TicketLedger::new();
        let v = vehicle("CAR1");
        ledger.open(&v, spot(3), t0()).unwrap();
        let before = t0().checked_add(Duration::seconds(-1)).unwrap();
        let err = ledger.close(v.id(), before).unwrap_err();
        assert!(matches!(err, FacilityError::InvalidState { spot: SpotId(3), .. }));
        assert!(ledger.open_ticket(v.id()).is_some());
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_ticket_ids_are_never_reused() {
        let mut ledger = TicketLedger::new();
        let v = vehicle("CAR1");
        let first = ledger.open(&v, spot(1), t0()).unwrap();
        ledger.close(v.id(), t0()).unwrap();
        let second = ledger.open(&v, spot(1), t0()).unwrap();
        assert!(second.id() > first.id());
    }

    #[test]
    fn test_open_tickets_sorted_by_id() {
        let mut ledger = TicketLedger::new();
        for plate in ["Z1", "A1", "M1"] {
            ledger.open(&vehicle(plate), spot(1), t0()).unwrap();
        }
        let ids: Vec<u64> = ledger.open_tickets().iter().map(|t| t.id().0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_parking_state_display() {
        assert_eq!(ParkingState::Unparked.to_string(), "UNPARKED");
        let parked = ParkingState::Parked {
            ticket: TicketId(4),
            spot: SpotId(12),
        };
        assert_eq!(parked.to_string(), "PARKED(T000004 @ S12)");
    }

    #[test]
    fn test_parking_state_serde_tag() {
        let parked = ParkingState::Parked {
            ticket: TicketId(4),
            spot: SpotId(12),
        };
        let json = serde_json::to_value(parked).unwrap();
        assert_eq!(json["state"], "PARKED");
        assert_eq!(json["spot"], 12);
        assert_eq!(
            serde_json::to_value(ParkingState::Unparked).unwrap()["state"],
            "UNPARKED"
        );
    }
}
