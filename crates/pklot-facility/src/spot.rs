//! Spots and vehicles.

use pklot_core::{Amount, SpotId, VehicleCategory, VehicleId};
use serde::{Deserialize, Serialize};

/// A vehicle presented at a gate. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    category: VehicleCategory,
}

impl Vehicle {
    pub fn new(id: VehicleId, category: VehicleCategory) -> Self {
        Self { id, category }
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn category(&self) -> VehicleCategory {
        self.category
    }
}

/// A single allocatable parking space.
///
/// `occupant` is only ever set through the registry, which checks that the
/// occupant's category matches the spot's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spot {
    id: SpotId,
    category: VehicleCategory,
    /// Price per billing unit, in minor currency units.
    price: Amount,
    #[serde(skip_deserializing)]
    occupant: Option<VehicleId>,
}

impl Spot {
    /// A new, empty spot.
    pub fn new(id: SpotId, category: VehicleCategory, price: Amount) -> Self {
        Self {
            id,
            category,
            price,
            occupant: None,
        }
    }

    pub fn id(&self) -> SpotId {
        self.id
    }

    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn occupant(&self) -> Option<&VehicleId> {
        self.occupant.as_ref()
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<VehicleId>) -> Option<VehicleId> {
        std::mem::replace(&mut self.occupant, occupant)
    }

    /// The immutable part of the spot, as recorded on a ticket.
    pub fn snapshot(&self) -> SpotSnapshot {
        SpotSnapshot {
            id: self.id,
            category: self.category,
            price: self.price,
        }
    }
}

/// Spot identity and price at the moment a ticket was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpotSnapshot {
    pub id: SpotId,
    pub category: VehicleCategory,
    pub price: Amount,
}
