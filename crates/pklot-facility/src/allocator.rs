//! # Spot Allocator
//!
//! Cheapest-first spot selection. One min-heap per [`VehicleCategory`],
//! keyed by `(price, spot id)`, so equal prices resolve to the lowest spot
//! id and allocation order is reproducible.
//!
//! ## Invariant
//!
//! A heap holds exactly the free spots of its category. A spot is popped
//! before it is marked occupied and pushed only after it has been marked
//! free, so an occupied spot is never in a heap and no spot is in two.
//!
//! The registry is passed into every call rather than owned: the facility
//! owns both and serializes access to them under one lock.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use pklot_core::{Amount, SpotId, VehicleCategory};

use crate::error::{FacilityError, FacilityResult};
use crate::registry::SpotRegistry;
use crate::spot::{Spot, Vehicle};

type FreeHeap = BinaryHeap<Reverse<(Amount, SpotId)>>;

/// Per-category priority queues of free spots.
#[derive(Debug, Clone, Default)]
pub struct SpotAllocator {
    free: HashMap<VehicleCategory, FreeHeap>,
}

impl SpotAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build heaps from every currently-free spot in `registry`.
    pub fn from_registry(registry: &SpotRegistry) -> Self {
        let mut allocator = Self::new();
        for spot in registry.spots().filter(|s| s.is_free()) {
            allocator.track(spot);
        }
        allocator
    }

    /// Start offering a newly registered free spot.
    pub fn track(&mut self, spot: &Spot) {
        if spot.is_free() {
            self.heap_mut(spot.category())
                .push(Reverse((spot.price(), spot.id())));
        }
    }

    /// Reserve the cheapest free spot of `category` for `vehicle`.
    ///
    /// # Errors
    ///
    /// - [`FacilityError::NoAvailableSpot`] if the category pool is empty.
    /// - [`FacilityError::InvalidState`] if `vehicle` is not of `category`.
    pub fn acquire(
        &mut self,
        registry: &mut SpotRegistry,
        category: VehicleCategory,
        vehicle: &Vehicle,
    ) -> FacilityResult<Spot> {
        let Some(Reverse((_, candidate))) = self.heap(category).and_then(|h| h.peek()).copied()
        else {
            return Err(FacilityError::NoAvailableSpot(category));
        };

        // Occupy before popping: a rejected occupancy leaves the heap as it was.
        registry.mark_occupied(candidate, vehicle)?;
        self.heap_mut(category).pop();

        let spot = registry.get(candidate)?.clone();
        tracing::debug!(spot = %spot.id(), price = %spot.price(), vehicle = %vehicle.id(), "spot acquired");
        Ok(spot)
    }

    /// Free `spot_id` and offer it again.
    ///
    /// # Errors
    ///
    /// [`FacilityError::NotFound`] or [`FacilityError::InvalidState`] from
    /// the registry; the heap is untouched in both cases.
    pub fn release(&mut self, registry: &mut SpotRegistry, spot_id: SpotId) -> FacilityResult<Spot> {
        registry.mark_free(spot_id)?;
        let spot = registry.get(spot_id)?.clone();
        self.heap_mut(spot.category())
            .push(Reverse((spot.price(), spot.id())));
        tracing::debug!(spot = %spot.id(), "spot released");
        Ok(spot)
    }

    /// Number of free spots of `category`.
    pub fn available(&self, category: VehicleCategory) -> usize {
        self.heap(category).map_or(0, BinaryHeap::len)
    }

    /// Cheapest free spot of `category` without reserving it.
    pub fn peek(&self, category: VehicleCategory) -> Option<(Amount, SpotId)> {
        self.heap(category)
            .and_then(|h| h.peek())
            .map(|Reverse(entry)| *entry)
    }

    fn heap(&self, category: VehicleCategory) -> Option<&FreeHeap> {
        self.free.get(&category)
    }

    fn heap_mut(&mut self, category: VehicleCategory) -> &mut FreeHeap {
        self.free.entry(category).or_default()
    }
}
