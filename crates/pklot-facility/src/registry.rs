//! # Spot Registry
//!
//! The static inventory of spots and their occupancy. The registry knows
//! nothing about prices being cheap or expensive; it only enforces that
//! identifiers are unique and that occupancy changes are legal:
//!
//! ```text
//! free ──mark_occupied(vehicle)──▶ occupied ──mark_free──▶ free
//! ```
//!
//! Occupying an occupied spot, freeing a free spot, or parking a vehicle in
//! a spot of another category is rejected with
//! [`FacilityError::InvalidState`].

use std::collections::BTreeMap;

use pklot_core::{SpotId, VehicleCategory, VehicleId};

use crate::error::{FacilityError, FacilityResult};
use crate::spot::{Spot, Vehicle};

/// All spots of a facility, keyed and iterated by identifier.
#[derive(Debug, Clone, Default)]
pub struct SpotRegistry {
    spots: BTreeMap<SpotId, Spot>,
}

impl SpotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spot to its category pool.
    ///
    /// # Errors
    ///
    /// - [`FacilityError::DuplicateId`] if the identifier is already taken.
    /// - [`FacilityError::InvalidState`] if the spot arrives with an
    ///   occupant; occupancy is only ever set by [`mark_occupied`](Self::mark_occupied).
    pub fn register(&mut self, spot: Spot) -> FacilityResult<()> {
        if self.spots.contains_key(&spot.id()) {
            return Err(FacilityError::DuplicateId(spot.id()));
        }
        if let Some(occupant) = spot.occupant() {
            return Err(FacilityError::InvalidState {
                spot: spot.id(),
                attempted: "register",
                reason: format!("already occupied by {occupant}"),
            });
        }
        tracing::debug!(spot = %spot.id(), category = %spot.category(), price = %spot.price(), "spot registered");
        self.spots.insert(spot.id(), spot);
        Ok(())
    }

    /// Park `vehicle` in the spot.
    ///
    /// # Errors
    ///
    /// - [`FacilityError::NotFound`] for an unknown id.
    /// - [`FacilityError::InvalidState`] if the spot is occupied or serves
    ///   another category.
    pub fn mark_occupied(&mut self, spot_id: SpotId, vehicle: &Vehicle) -> FacilityResult<()> {
        let spot = self.get_mut(spot_id)?;
        if let Some(current) = spot.occupant() {
            return Err(FacilityError::InvalidState {
                spot: spot_id,
                attempted: "occupy",
                reason: format!("already occupied by {current}"),
            });
        }
        if spot.category() != vehicle.category() {
            return Err(FacilityError::InvalidState {
                spot: spot_id,
                attempted: "occupy",
                reason: format!(
                    "spot serves {} but vehicle {} is {}",
                    spot.category(),
                    vehicle.id(),
                    vehicle.category()
                ),
            });
        }
        spot.set_occupant(Some(vehicle.id().clone()));
        Ok(())
    }

    /// Vacate the spot, returning the vehicle that was in it.
    ///
    /// # Errors
    ///
    /// - [`FacilityError::NotFound`] for an unknown id.
    /// - [`FacilityError::InvalidState`] if the spot is already free.
    pub fn mark_free(&mut self, spot_id: SpotId) -> FacilityResult<VehicleId> {
        let spot = self.get_mut(spot_id)?;
        spot.set_occupant(None)
            .ok_or_else(|| FacilityError::InvalidState {
                spot: spot_id,
                attempted: "free",
                reason: "spot is already free".to_string(),
            })
    }

    pub fn get(&self, spot_id: SpotId) -> FacilityResult<&Spot> {
        self.spots
            .get(&spot_id)
            .ok_or(FacilityError::NotFound(spot_id))
    }

    fn get_mut(&mut self, spot_id: SpotId) -> FacilityResult<&mut Spot> {
        self.spots
            .get_mut(&spot_id)
            .ok_or(FacilityError::NotFound(spot_id))
    }

    /// All spots in identifier order.
    pub fn spots(&self) -> impl Iterator<Item = &Spot> {
        self.spots.values()
    }

    /// Spots of one category in identifier order.
    pub fn spots_in(&self, category: VehicleCategory) -> impl Iterator<Item = &Spot> {
        self.spots.values().filter(move |s| s.category() == category)
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pklot_core::Amount;

    fn car(plate: &str) -> Vehicle {
        Vehicle::new(VehicleId::new(plate).unwrap(), VehicleCategory::FourWheeler)
    }

    fn registry_with_two_spots() -> SpotRegistry {
        let mut registry = SpotRegistry::new();
        registry
            .register(Spot::new(SpotId(1), VehicleCategory::FourWheeler, Amount(20)))
            .unwrap();
        registry
            .register(Spot::new(SpotId(2), VehicleCategory::TwoWheeler, Amount(10)))
            .unwrap();
        registry
    }

    #[test]
    fn test_register_rejects_occupied_spot() {
        let mut registry = SpotRegistry::new();
        let mut spot = Spot::new(SpotId(7), VehicleCategory::TwoWheeler, Amount(5));
        spot.set_occupant(Some(VehicleId::new("GHOST").unwrap()));
        let err = registry.register(spot).unwrap_err();
        assert!(matches!(
            err,
            FacilityError::InvalidState {
                spot: SpotId(7),
                attempted: "register",
                ..
            }
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_rejects_duplicate_id() {
        let mut registry = registry_with_two_spots();
        let err = registry
            .register(Spot::new(SpotId(1), VehicleCategory::TwoWheeler, Amount(5)))
            .unwrap_err();
        assert_eq!(err, FacilityError::DuplicateId(SpotId(1)));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(SpotId(1)).unwrap().price(), Amount(20));
    }

    #[test]
    fn test_occupy_then_free() {
        let mut registry = registry_with_two_spots();
        registry.mark_occupied(SpotId(1), &car("CAR1")).unwrap();
        assert_eq!(
            registry.get(SpotId(1)).unwrap().occupant().map(VehicleId::as_str),
            Some("CAR1")
        );
        let vacated = registry.mark_free(SpotId(1)).unwrap();
        assert_eq!(vacated.as_str(), "CAR1");
        assert!(registry.get(SpotId(1)).unwrap().is_free());
    }

    #[test]
    fn test_unknown_spot_is_not_found() {
        let mut registry = registry_with_two_spots();
        assert_eq!(
            registry.mark_occupied(SpotId(99), &car("CAR1")).unwrap_err(),
            FacilityError::NotFound(SpotId(99))
        );
        assert_eq!(
            registry.mark_free(SpotId(99)).unwrap_err(),
            FacilityError::NotFound(SpotId(99))
        );
    }

    #[test]
    fn test_double_occupy_is_invalid_state() {
        let mut registry = registry_with_two_spots();
        registry.mark_occupied(SpotId(1), &car("CAR1")).unwrap();
        let err = registry.mark_occupied(SpotId(1), &car("CAR2")).unwrap_err();
        assert!(matches!(err, FacilityError::InvalidState { attempted: "occupy", .. }));
        // The first occupant is untouched.
        assert_eq!(
            registry.get(SpotId(1)).unwrap().occupant().map(VehicleId::as_str),
            Some("CAR1")
        );
    }

    #[test]
    fn test_free_of_free_spot_is_invalid_state() {
        let mut registry = registry_with_two_spots();
        let err = registry.mark_free(SpotId(2)).unwrap_err();
        assert!(matches!(err, FacilityError::InvalidState { attempted: "free", .. }));
    }

    #[test]
    fn test_category_mismatch_is_invalid_state() {
        let mut registry = registry_with_two_spots();
        let err = registry.mark_occupied(SpotId(2), &car("CAR1")).unwrap_err();
        assert!(matches!(err, FacilityError::InvalidState { spot: SpotId(2), .. }));
        assert!(registry.get(SpotId(2)).unwrap().is_free());
    }

    #[test]
    fn test_spots_in_filters_by_category() {
        let registry = registry_with_two_spots();
        let ids: Vec<SpotId> = registry
            .spots_in(VehicleCategory::TwoWheeler)
            .map(Spot::id)
            .collect();
        assert_eq!(ids, vec![SpotId(2)]);
    }
}
