//! # Property Ledger Contract
//!
//! Token-supply ledger for fractional real-estate offerings. Each registered
//! property has a fixed token supply that investors reserve while their
//! off-chain payment is in flight. A settler confirms the reservation once the
//! payment processor reports success, or releases it on failure.
//!
//! | Phase        | Entry Point(s)                                              |
//! |--------------|-------------------------------------------------------------|
//! | Bootstrap    | [`PropertyLedger::init`]                                    |
//! | Role admin   | `grant_role`, `revoke_role`, `transfer_super_admin`         |
//! | Config       | `set_config`, `pause`, `unpause`                            |
//! | Listing      | `register_property`, `update_pricing`, `close_property`     |
//! | Settlement   | `reserve_tokens`, `confirm_reservation`, `release_reservation`, `sweep_expired` |
//! | Queries      | `get_supply`, `get_reservation`, `get_investment`, `investment_by_payment`, `holding_of`, `pending_reservations` |
//!
//! ## Architecture
//!
//! Authorization is delegated to [`rbac`], persistence to `storage`, bucket
//! arithmetic to `supply`, and the reservation state machine to `settlement`.
//! This file holds the entry points, their auth and pause gates, and listing
//! management.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, BytesN, Env, Vec};

mod config;
pub mod events;
pub mod rbac;
mod settlement;
mod storage;
mod supply;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use rbac::Role;
pub use types::{
    Investment, LedgerConfig, PropertyStatus, Reservation, ReservationStatus, TokenSupply,
};
use types::{PropertyConfig, SupplyState};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialisation
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidConfig = 3,

    // Authorisation
    NotAuthorized = 10,

    // Properties
    PropertyNotFound = 20,
    PropertyNotOpen = 21,
    InvalidSupply = 22,
    InvalidPrice = 23,
    InvalidMinimumInvestment = 24,

    // Reservations and settlement
    ReservationNotFound = 30,
    /// Reservation is not in a state that allows the requested transition.
    ReservationConflict = 31,
    ReservationExpired = 32,
    TooManyPendingReservations = 33,
    InsufficientSupply = 34,
    /// Payment reference already settled a different reservation.
    PaymentRefReused = 35,
    PaymentMismatch = 36,
    InvestmentNotFound = 37,

    // Amounts
    InvalidAmount = 40,
    BelowMinimumInvestment = 41,
    Overflow = 42,
    /// Supply buckets no longer sum to the total.
    SupplyInvariant = 43,

    // Operations
    ProtocolPaused = 50,
}

#[contract]
pub struct PropertyLedger;

#[contractimpl]
impl PropertyLedger {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the ledger, set the first SuperAdmin and the runtime config.
    ///
    /// Must be called exactly once immediately after deployment.
    pub fn init(env: Env, super_admin: Address, config: LedgerConfig) -> Result<(), Error> {
        super_admin.require_auth();
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        config::validate(&config)?;
        rbac::init_super_admin(&env, &super_admin)?;
        storage::set_config(&env, &config);
        Ok(())
    }

    /// Replace the runtime config. `caller` must hold `SuperAdmin` or `Admin`.
    ///
    /// Lowering `max_pending_per_property` below a property's current pending
    /// count blocks new reservations there until the backlog drains.
    pub fn set_config(env: Env, caller: Address, config: LedgerConfig) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_admin_or_above(&env, &caller)?;
        config::validate(&config)?;
        storage::set_config(&env, &config);
        events::emit_config_updated(&env, config);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<LedgerConfig, Error> {
        storage::get_config(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Grant `role` to `target`. Only SuperAdmin can grant SuperAdmin.
    pub fn grant_role(env: Env, caller: Address, target: Address, role: Role) -> Result<(), Error> {
        caller.require_auth();
        rbac::grant_role(&env, &caller, &target, role)
    }

    /// Revoke any role from `target`. The SuperAdmin cannot be revoked.
    pub fn revoke_role(env: Env, caller: Address, target: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::revoke_role(&env, &caller, &target)
    }

    pub fn transfer_super_admin(
        env: Env,
        current_super_admin: Address,
        new_super_admin: Address,
    ) -> Result<(), Error> {
        current_super_admin.require_auth();
        rbac::transfer_super_admin(&env, &current_super_admin, &new_super_admin)
    }

    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        rbac::get_role(&env, &address)
    }

    pub fn has_role(env: Env, address: Address, role: Role) -> bool {
        rbac::has_role(&env, &address, &role)
    }

    // ─────────────────────────────────────────────────────────
    // Emergency Control
    // ─────────────────────────────────────────────────────────

    /// Halt registrations, repricing, closing, reservations and confirmations.
    /// Releases and sweeps stay available so held supply can always return.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_admin_or_above(&env, &caller)?;
        storage::set_paused(&env, true);
        events::emit_protocol_paused(&env, caller);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_admin_or_above(&env, &caller)?;
        storage::set_paused(&env, false);
        events::emit_protocol_unpaused(&env, caller);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Property listing
    // ─────────────────────────────────────────────────────────

    /// List a property with `total_supply` tokens at `token_price` each.
    ///
    /// `manager` must hold `PropertyManager`, `Admin` or `SuperAdmin`.
    pub fn register_property(
        env: Env,
        manager: Address,
        total_supply: i128,
        token_price: i128,
        minimum_investment: i128,
    ) -> Result<TokenSupply, Error> {
        Self::require_not_paused(&env)?;
        manager.require_auth();
        rbac::require_can_register(&env, &manager)?;

        if total_supply <= 0 || total_supply > supply::MAX_TOTAL_SUPPLY {
            return Err(Error::InvalidSupply);
        }
        Self::validate_pricing(total_supply, token_price, minimum_investment)?;

        let config = PropertyConfig {
            id: storage::next_property_id(&env),
            manager: manager.clone(),
            total_supply,
            token_price,
            minimum_investment,
        };
        let state = SupplyState::opening(total_supply);

        storage::save_property_config(&env, &config);
        storage::save_supply_state(&env, config.id, &state);

        events::emit_property_registered(&env, config.id, manager, total_supply, token_price);

        Ok(TokenSupply::from_parts(config, state))
    }

    /// Change pricing for future reservations. Pending reservations keep the
    /// price they were quoted.
    pub fn update_pricing(
        env: Env,
        caller: Address,
        property_id: u64,
        token_price: i128,
        minimum_investment: i128,
    ) -> Result<TokenSupply, Error> {
        Self::require_not_paused(&env)?;
        caller.require_auth();

        let (mut config, state) = storage::load_property_pair(&env, property_id)?;
        rbac::require_property_authority(&env, &caller, &config.manager)?;
        Self::validate_pricing(config.total_supply, token_price, minimum_investment)?;

        config.token_price = token_price;
        config.minimum_investment = minimum_investment;
        storage::save_property_config(&env, &config);

        events::emit_pricing_updated(&env, property_id, token_price, minimum_investment);

        Ok(TokenSupply::from_parts(config, state))
    }

    /// Stop accepting reservations for `property_id`.
    pub fn close_property(env: Env, caller: Address, property_id: u64) -> Result<TokenSupply, Error> {
        Self::require_not_paused(&env)?;
        caller.require_auth();

        let (config, mut state) = storage::load_property_pair(&env, property_id)?;
        rbac::require_property_authority(&env, &caller, &config.manager)?;
        if state.status != PropertyStatus::Open {
            return Err(Error::PropertyNotOpen);
        }

        state.status = PropertyStatus::Closed;
        storage::save_supply_state(&env, property_id, &state);

        events::emit_property_closed(&env, property_id, caller);

        Ok(TokenSupply::from_parts(config, state))
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Hold `amount` tokens for `investor` until the reservation expires.
    ///
    /// Fails with `InsufficientSupply` when fewer than `amount` tokens remain
    /// available after expired reservations are reclaimed.
    pub fn reserve_tokens(
        env: Env,
        investor: Address,
        property_id: u64,
        amount: i128,
    ) -> Result<Reservation, Error> {
        Self::require_not_paused(&env)?;
        investor.require_auth();
        settlement::reserve(&env, &investor, property_id, amount)
    }

    /// Settle a reservation against a confirmed payment.
    ///
    /// `payment_ref` is a digest of the processor's payment identifier.
    /// Replaying the same `(reservation_id, payment_ref)` pair returns the
    /// original investment.
    pub fn confirm_reservation(
        env: Env,
        settler: Address,
        reservation_id: u64,
        payment_ref: BytesN<32>,
        amount_paid: i128,
    ) -> Result<Investment, Error> {
        Self::require_not_paused(&env)?;
        settler.require_auth();
        rbac::require_settler(&env, &settler)?;
        settlement::confirm(&env, reservation_id, payment_ref, amount_paid)
    }

    /// Give a pending reservation's tokens back to the available pool.
    ///
    /// Returns the reservation's terminal status. Repeated calls are no-ops.
    pub fn release_reservation(
        env: Env,
        caller: Address,
        reservation_id: u64,
    ) -> Result<ReservationStatus, Error> {
        caller.require_auth();
        settlement::release(&env, &caller, reservation_id)
    }

    /// Expire up to `limit` stale reservations. Callable by anyone, also while
    /// paused.
    pub fn sweep_expired(env: Env, property_id: u64, limit: u32) -> Result<u32, Error> {
        settlement::sweep(&env, property_id, limit)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_supply(env: Env, property_id: u64) -> Result<TokenSupply, Error> {
        storage::load_token_supply(&env, property_id)
    }

    pub fn get_reservation(env: Env, reservation_id: u64) -> Result<Reservation, Error> {
        storage::load_reservation(&env, reservation_id)
    }

    pub fn get_investment(env: Env, investment_id: u64) -> Result<Investment, Error> {
        storage::load_investment(&env, investment_id)
    }

    pub fn investment_by_payment(
        env: Env,
        payment_ref: BytesN<32>,
    ) -> Result<Option<Investment>, Error> {
        storage::investment_for_payment(&env, &payment_ref)
    }

    /// Tokens `investor` owns in `property_id` through confirmed investments.
    pub fn holding_of(env: Env, property_id: u64, investor: Address) -> i128 {
        storage::get_holding(&env, property_id, &investor)
    }

    pub fn pending_reservations(env: Env, property_id: u64) -> Vec<u64> {
        storage::pending_ids(&env, property_id)
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    fn require_not_paused(env: &Env) -> Result<(), Error> {
        if storage::is_paused(env) {
            return Err(Error::ProtocolPaused);
        }
        Ok(())
    }

    fn validate_pricing(
        total_supply: i128,
        token_price: i128,
        minimum_investment: i128,
    ) -> Result<(), Error> {
        if token_price <= 0 {
            return Err(Error::InvalidPrice);
        }
        let full_value = supply::quote(total_supply, token_price).ok_or(Error::Overflow)?;
        if minimum_investment < 0 || minimum_investment > full_value {
            return Err(Error::InvalidMinimumInvestment);
        }
        Ok(())
    }
}
