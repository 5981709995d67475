//! # Facility Flows
//!
//! Admit/release scenarios driven through the public facade only, with a
//! manual clock standing in for the gate's wall clock.

use std::sync::Arc;

use chrono::Duration;
use pklot_core::{Amount, Currency, ManualClock, SpotId, Timestamp, VehicleCategory, VehicleId};
use pklot_facility::{
    BillingCalculator, FacilityConfig, FacilityError, ParkingFacility, ParkingState, Spot, Vehicle,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start() -> Timestamp {
    Timestamp::parse("2026-01-15T08:00:00Z").unwrap()
}

fn four_wheeler(plate: &str) -> Vehicle {
    Vehicle::new(VehicleId::new(plate).unwrap(), VehicleCategory::FourWheeler)
}

fn two_wheeler(plate: &str) -> Vehicle {
    Vehicle::new(VehicleId::new(plate).unwrap(), VehicleCategory::TwoWheeler)
}

/// Two four-wheeler spots: S1 at 10, S2 at 5.
fn two_spot_lot() -> ParkingFacility<Arc<ManualClock>> {
    let lot = ParkingFacility::new(
        "two-spot",
        Currency::inr(),
        BillingCalculator::default(),
        Arc::new(ManualClock::new(start())),
    );
    lot.register_spot(Spot::new(SpotId(1), VehicleCategory::FourWheeler, Amount(10)))
        .unwrap();
    lot.register_spot(Spot::new(SpotId(2), VehicleCategory::FourWheeler, Amount(5)))
        .unwrap();
    lot
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn cheapest_spot_first_then_reused_after_release() {
    let lot = two_spot_lot();

    let a = lot.admit(&four_wheeler("A")).unwrap();
    let b = lot.admit(&four_wheeler("B")).unwrap();
    assert_eq!(a.spot().id, SpotId(2));
    assert_eq!(b.spot().id, SpotId(1));

    lot.release(&VehicleId::new("A").unwrap()).unwrap();
    let c = lot.admit(&four_wheeler("C")).unwrap();
    assert_eq!(c.spot().id, SpotId(2));
}

#[test]
fn ninety_minute_stay_costs_two_units() {
    let lot = ParkingFacility::from_config(&FacilityConfig::demo(), ManualClock::new(start()))
        .unwrap();
    let car = four_wheeler("KA01AB1234");

    let ticket = lot.admit(&car).unwrap();
    assert_eq!(ticket.spot().price, Amount(20));

    lot.clock().advance(Duration::minutes(90));
    let fee = lot.release(car.id()).unwrap();
    assert_eq!(fee.billed_units, 2);
    assert_eq!(fee.amount, Amount(40));
    assert_eq!(fee.ticket.exit_time(), start().checked_add(Duration::minutes(90)));
}

#[test]
fn full_category_rejects_and_leaves_state_alone() {
    let lot = two_spot_lot();
    lot.admit(&four_wheeler("A")).unwrap();
    lot.admit(&four_wheeler("B")).unwrap();

    let spots_before = lot.spots();
    let open_before = lot.open_tickets();

    let err = lot.admit(&four_wheeler("C")).unwrap_err();
    assert_eq!(err, FacilityError::NoAvailableSpot(VehicleCategory::FourWheeler));
    assert_eq!(lot.spots(), spots_before);
    assert_eq!(lot.open_tickets(), open_before);
}

#[test]
fn category_without_spots_is_always_full() {
    let lot = two_spot_lot();
    let err = lot.admit(&two_wheeler("BIKE1")).unwrap_err();
    assert_eq!(err, FacilityError::NoAvailableSpot(VehicleCategory::TwoWheeler));
}

#[test]
fn release_of_unknown_vehicle_is_not_parked() {
    let lot = two_spot_lot();
    let ghost = VehicleId::new("GHOST").unwrap();
    assert_eq!(lot.release(&ghost).unwrap_err(), FacilityError::NotParked(ghost));
    assert!(lot.occupancy().iter().all(|o| o.free == o.total));
}

#[test]
fn second_release_is_not_parked() {
    let lot = two_spot_lot();
    let car = four_wheeler("A");
    lot.admit(&car).unwrap();
    lot.release(car.id()).unwrap();
    assert!(matches!(
        lot.release(car.id()),
        Err(FacilityError::NotParked(_))
    ));
    assert_eq!(lot.history().len(), 1);
}

#[test]
fn round_trip_restores_the_spot() {
    let lot = two_spot_lot();
    let before = lot.spots();
    let car = four_wheeler("A");
    let ticket = lot.admit(&car).unwrap();
    lot.release(car.id()).unwrap();
    assert_eq!(lot.spots(), before);

    let again = lot.admit(&four_wheeler("B")).unwrap();
    assert_eq!(again.spot(), ticket.spot());
}

#[test]
fn vehicle_lifecycle_states() {
    let lot = two_spot_lot();
    let car = four_wheeler("A");
    assert_eq!(lot.state_of(car.id()), ParkingState::Unparked);

    let ticket = lot.admit(&car).unwrap();
    assert_eq!(
        lot.state_of(car.id()),
        ParkingState::Parked {
            ticket: ticket.id(),
            spot: ticket.spot().id
        }
    );

    lot.release(car.id()).unwrap();
    assert_eq!(lot.state_of(car.id()), ParkingState::Unparked);

    // Re-entry gets a fresh ticket.
    let second = lot.admit(&car).unwrap();
    assert!(second.id() > ticket.id());
}

#[test]
fn price_is_fixed_at_admission() {
    let lot = two_spot_lot();
    let car = four_wheeler("A");
    lot.admit(&car).unwrap();
    lot.clock().advance(Duration::hours(3));
    let fee = lot.release(car.id()).unwrap();
    assert_eq!(fee.rate, Amount(5));
    assert_eq!(fee.amount, Amount(15));
}

#[test]
fn facility_from_yaml_config() {
    let yaml = r#"
name: "Central Garage"
currency: "INR"
billing:
  unit_minutes: 30
spots:
  - { id: 7, category: two_wheeler, price: 4 }
blocks:
  - { category: four_wheeler, first_id: 100, count: 2, price: 12 }
"#;
    let config = FacilityConfig::from_yaml(yaml).unwrap();
    let lot = ParkingFacility::from_config(&config, ManualClock::new(start())).unwrap();
    assert_eq!(lot.spots().len(), 3);

    let bike = two_wheeler("BIKE1");
    lot.admit(&bike).unwrap();
    lot.clock().advance(Duration::minutes(45));
    let fee = lot.release(bike.id()).unwrap();
    assert_eq!(fee.billed_units, 2);
    assert_eq!(fee.amount, Amount(8));
}
