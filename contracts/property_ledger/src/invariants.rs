#![allow(dead_code)]

extern crate std;

use crate::types::{PropertyStatus, ReservationStatus, TokenSupply};

/// INV-1: Every supply bucket is non-negative.
pub fn assert_buckets_non_negative(supply: &TokenSupply) {
    assert!(
        supply.available_supply >= 0 && supply.reserved_supply >= 0 && supply.sold_supply >= 0,
        "INV-1 violated: property {} has a negative bucket ({} / {} / {})",
        supply.property_id,
        supply.available_supply,
        supply.reserved_supply,
        supply.sold_supply
    );
}

/// INV-2: available + reserved + sold == total.
pub fn assert_supply_conserved(supply: &TokenSupply) {
    assert_eq!(
        supply.available_supply + supply.reserved_supply + supply.sold_supply,
        supply.total_supply,
        "INV-2 violated: property {} buckets do not sum to total",
        supply.property_id
    );
}

/// INV-3: available + reserved never exceeds total.
pub fn assert_unsold_within_total(supply: &TokenSupply) {
    assert!(
        supply.available_supply + supply.reserved_supply <= supply.total_supply,
        "INV-3 violated: property {} has {} unsold tokens out of {}",
        supply.property_id,
        supply.available_supply + supply.reserved_supply,
        supply.total_supply
    );
}

/// INV-4: Pricing stays positive and the minimum is reachable.
pub fn assert_pricing_sane(supply: &TokenSupply) {
    assert!(supply.token_price > 0, "INV-4 violated: non-positive price");
    assert!(
        supply.minimum_investment >= 0
            && supply.minimum_investment <= supply.total_supply * supply.token_price,
        "INV-4 violated: minimum investment {} out of range",
        supply.minimum_investment
    );
}

/// INV-5: Property IDs are sequential starting from 0.
pub fn assert_sequential_ids(supplies: &[TokenSupply]) {
    for (i, supply) in supplies.iter().enumerate() {
        assert_eq!(
            supply.property_id, i as u64,
            "INV-5 violated: expected id {}, got {}",
            i, supply.property_id
        );
    }
}

/// INV-6: Reservations only leave `Pending`, and only once.
pub fn assert_valid_reservation_transition(from: &ReservationStatus, to: &ReservationStatus) {
    let valid = matches!(
        (from, to),
        (ReservationStatus::Pending, ReservationStatus::Pending)
            | (ReservationStatus::Pending, ReservationStatus::Confirmed)
            | (ReservationStatus::Pending, ReservationStatus::Cancelled)
            | (ReservationStatus::Pending, ReservationStatus::Failed)
            | (ReservationStatus::Pending, ReservationStatus::Expired)
    ) || from == to;

    assert!(
        valid,
        "INV-6 violated: invalid reservation transition from {:?} to {:?}",
        from, to
    );
}

/// INV-7: Listing identity never changes after registration.
pub fn assert_listing_immutable(original: &TokenSupply, current: &TokenSupply) {
    assert_eq!(original.property_id, current.property_id, "INV-7 violated: id changed");
    assert_eq!(original.manager, current.manager, "INV-7 violated: manager changed");
    assert_eq!(
        original.total_supply, current.total_supply,
        "INV-7 violated: total supply changed"
    );
}

/// INV-8: A closed property never reopens.
pub fn assert_status_monotonic(from: &PropertyStatus, to: &PropertyStatus) {
    assert!(
        !(from == &PropertyStatus::Closed && to == &PropertyStatus::Open),
        "INV-8 violated: closed property reopened"
    );
}

/// Run all stateless supply invariants.
pub fn assert_all_supply_invariants(supply: &TokenSupply) {
    assert_buckets_non_negative(supply);
    assert_supply_conserved(supply);
    assert_unsold_within_total(supply);
    assert_pricing_sane(supply);
}
