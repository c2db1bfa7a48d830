//! # Settlement
//!
//! The reservation state machine: reserve, confirm, release and sweep.
//!
//! Entry points in `lib.rs` handle authentication and the pause gate, then
//! call into this module. Each function here performs the complete
//! read-modify-write of a property's [`SupplyState`] inside the current
//! invocation. Because the host commits an invocation all-or-nothing and
//! serialises invocations that touch the same entries, a returned `Err`
//! discards every write made so far, and no two callers can observe the same
//! `available_supply` and both spend it.
//!
//! ## Idempotency
//!
//! `confirm` keys investments by payment reference. A replayed webhook for
//! the same reservation returns the stored [`Investment`] unchanged. The same
//! reference arriving for another reservation is rejected. `release` on an
//! already-released reservation returns its terminal status without touching
//! supply.

use soroban_sdk::{log, Address, BytesN, Env, Vec};

use crate::events::{self, ReservationConfirmed};
use crate::rbac::{self, Role};
use crate::storage;
use crate::supply;
use crate::types::{Investment, PropertyStatus, Reservation, ReservationStatus, SupplyState};
use crate::Error;

/// Hold `amount` tokens of `property_id` for `investor`.
pub fn reserve(
    env: &Env,
    investor: &Address,
    property_id: u64,
    amount: i128,
) -> Result<Reservation, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let config = storage::get_config(env)?;
    let (property, mut state) = storage::load_property_pair(env, property_id)?;

    if state.status != PropertyStatus::Open {
        return Err(Error::PropertyNotOpen);
    }

    let total_price = supply::quote(amount, property.token_price).ok_or(Error::Overflow)?;
    if total_price < property.minimum_investment {
        return Err(Error::BelowMinimumInvestment);
    }

    let now = env.ledger().timestamp();
    let mut pending = storage::pending_ids(env, property_id);

    // Stale reservations only matter when they block this request.
    if state.available_supply < amount || pending.len() >= config.max_pending_per_property {
        let (swept, released) = release_expired(env, property_id, state, pending, now, u32::MAX)?;
        log!(env, "lazy sweep before reserve", property_id, released);
        state = swept;
        pending = storage::pending_ids(env, property_id);
    }

    if pending.len() >= config.max_pending_per_property {
        return Err(Error::TooManyPendingReservations);
    }

    let state = supply::reserve(&state, amount)?;
    supply::check(&state, property.total_supply)?;

    let expires_at = now
        .checked_add(config.reservation_ttl)
        .ok_or(Error::Overflow)?;
    let reservation = Reservation {
        id: storage::next_reservation_id(env),
        property_id,
        investor: investor.clone(),
        amount,
        total_price,
        created_at: now,
        expires_at,
        status: ReservationStatus::Pending,
    };

    storage::save_supply_state(env, property_id, &state);
    storage::save_reservation(env, &reservation);
    storage::push_pending(env, property_id, reservation.id);

    events::emit_tokens_reserved(
        env,
        reservation.id,
        property_id,
        investor.clone(),
        amount,
        expires_at,
    );

    Ok(reservation)
}

/// Turn a pending reservation into an investment backed by `payment_ref`.
pub fn confirm(
    env: &Env,
    reservation_id: u64,
    payment_ref: BytesN<32>,
    amount_paid: i128,
) -> Result<Investment, Error> {
    let mut reservation = storage::load_reservation(env, reservation_id)?;

    if let Some(existing) = storage::investment_for_payment(env, &payment_ref)? {
        if existing.reservation_id == reservation_id {
            return Ok(existing);
        }
        return Err(Error::PaymentRefReused);
    }

    if reservation.status != ReservationStatus::Pending {
        return Err(Error::ReservationConflict);
    }

    let now = env.ledger().timestamp();
    if reservation.is_expired(now) {
        return Err(Error::ReservationExpired);
    }
    if amount_paid != reservation.total_price {
        return Err(Error::PaymentMismatch);
    }

    let property_id = reservation.property_id;
    let (property, state) = storage::load_property_pair(env, property_id)?;
    let state = supply::confirm(&state, reservation.amount)?;
    supply::check(&state, property.total_supply)?;

    reservation.status = ReservationStatus::Confirmed;
    storage::save_reservation(env, &reservation);
    storage::remove_pending(env, property_id, reservation_id);
    storage::save_supply_state(env, property_id, &state);
    storage::add_to_holding(env, property_id, &reservation.investor, reservation.amount)?;

    let investment = Investment {
        id: storage::next_investment_id(env),
        property_id,
        investor: reservation.investor.clone(),
        reservation_id,
        tokens: reservation.amount,
        amount_paid,
        payment_ref: payment_ref.clone(),
        confirmed_at: now,
    };
    storage::save_investment(env, &investment);

    events::emit_reservation_confirmed(
        env,
        ReservationConfirmed {
            reservation_id,
            investment_id: investment.id,
            property_id,
            investor: reservation.investor,
            tokens: investment.tokens,
            payment_ref,
        },
    );

    Ok(investment)
}

/// Return a reservation's tokens to the available pool.
///
/// The resulting status depends on who releases and when:
/// anyone at or after expiry → `Expired`; the investor before expiry →
/// `Cancelled`; a settler before expiry → `Failed`.
pub fn release(env: &Env, caller: &Address, reservation_id: u64) -> Result<ReservationStatus, Error> {
    let mut reservation = storage::load_reservation(env, reservation_id)?;

    if reservation.status.is_released() {
        return Ok(reservation.status);
    }
    if reservation.status == ReservationStatus::Confirmed {
        return Err(Error::ReservationConflict);
    }

    let now = env.ledger().timestamp();
    let outcome = if reservation.is_expired(now) {
        ReservationStatus::Expired
    } else if *caller == reservation.investor {
        ReservationStatus::Cancelled
    } else if rbac::has_role(env, caller, &Role::Settler) {
        ReservationStatus::Failed
    } else {
        return Err(Error::NotAuthorized);
    };

    let property_id = reservation.property_id;
    let (property, state) = storage::load_property_pair(env, property_id)?;
    let state = supply::release(&state, reservation.amount)?;
    supply::check(&state, property.total_supply)?;

    reservation.status = outcome.clone();
    storage::save_reservation(env, &reservation);
    storage::remove_pending(env, property_id, reservation_id);
    storage::save_supply_state(env, property_id, &state);

    events::emit_reservation_released(
        env,
        reservation_id,
        property_id,
        reservation.amount,
        outcome.clone(),
    );

    Ok(outcome)
}

/// Expire up to `limit` stale reservations of `property_id`.
/// Returns the number released.
pub fn sweep(env: &Env, property_id: u64, limit: u32) -> Result<u32, Error> {
    let (property, state) = storage::load_property_pair(env, property_id)?;
    if limit == 0 {
        return Ok(0);
    }

    let pending = storage::pending_ids(env, property_id);
    let now = env.ledger().timestamp();
    let (state, released) = release_expired(env, property_id, state, pending, now, limit)?;
    if released > 0 {
        supply::check(&state, property.total_supply)?;
        storage::save_supply_state(env, property_id, &state);
    }
    Ok(released)
}

/// Walk the pending index oldest-first and expire reservations past their
/// window, stopping after `limit` releases. Rewrites the index and the
/// released reservations; the caller persists the returned state.
fn release_expired(
    env: &Env,
    property_id: u64,
    mut state: SupplyState,
    pending: Vec<u64>,
    now: u64,
    limit: u32,
) -> Result<(SupplyState, u32), Error> {
    let mut remaining: Vec<u64> = Vec::new(env);
    let mut released: u32 = 0;

    for id in pending.iter() {
        if released < limit {
            let mut reservation = storage::load_reservation(env, id)?;
            if reservation.status == ReservationStatus::Pending && reservation.is_expired(now) {
                state = supply::release(&state, reservation.amount)?;
                reservation.status = ReservationStatus::Expired;
                storage::save_reservation(env, &reservation);
                events::emit_reservation_released(
                    env,
                    id,
                    property_id,
                    reservation.amount,
                    ReservationStatus::Expired,
                );
                released += 1;
                continue;
            }
        }
        remaining.push_back(id);
    }

    if released > 0 {
        storage::set_pending(env, property_id, &remaining);
    }
    Ok((state, released))
}
