//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the ledger.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                | Type           | Description                          |
//! |--------------------|----------------|--------------------------------------|
//! | `Config`           | `LedgerConfig` | Reservation TTL and pending limit    |
//! | `Paused`           | `bool`         | Emergency stop flag                  |
//! | `PropertyCount`    | `u64`          | Auto-increment property ID counter   |
//! | `ReservationCount` | `u64`          | Auto-increment reservation counter   |
//! | `InvestmentCount`  | `u64`          | Auto-increment investment counter    |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                    | Type             | Description                           |
//! |------------------------|------------------|---------------------------------------|
//! | `PropConfig(id)`       | `PropertyConfig` | Supply size, manager and pricing      |
//! | `PropState(id)`        | `SupplyState`    | Available / reserved / sold buckets   |
//! | `Reservation(id)`      | `Reservation`    | One payment attempt                   |
//! | `Pending(property)`    | `Vec<u64>`       | IDs of pending reservations           |
//! | `Investment(id)`       | `Investment`     | Settled purchase                      |
//! | `PaymentRef(digest)`   | `u64`            | Investment ID that consumed a payment |
//! | `Holding(property, a)` | `i128`           | Tokens owned by an investor           |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//! Role entries in `rbac` follow the same policy.
//!
//! Supply state is kept apart from the config because it is rewritten on every
//! reservation, confirmation and release, while the config rarely changes.

use soroban_sdk::{contracttype, Address, BytesN, Env, IntoVal, Val, Vec};

use crate::types::{
    Investment, LedgerConfig, PropertyConfig, Reservation, SupplyState, TokenSupply,
};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Paused,
    PropertyCount,
    ReservationCount,
    InvestmentCount,
    PropConfig(u64),
    PropState(u64),
    Reservation(u64),
    Pending(u64),
    Investment(u64),
    PaymentRef(BytesN<32>),
    Holding(u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Read and increment the counter stored under `key`.
/// Returns the ID that should be used for the next record.
fn get_and_increment(env: &Env, key: &DataKey) -> u64 {
    bump_instance(env);
    let current: u64 = env.storage().instance().get(key).unwrap_or(0);
    env.storage().instance().set(key, &(current + 1));
    current
}

pub fn next_property_id(env: &Env) -> u64 {
    get_and_increment(env, &DataKey::PropertyCount)
}

pub fn next_reservation_id(env: &Env) -> u64 {
    get_and_increment(env, &DataKey::ReservationCount)
}

pub fn next_investment_id(env: &Env) -> u64 {
    get_and_increment(env, &DataKey::InvestmentCount)
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<LedgerConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &LedgerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend a persistent entry's TTL. Shared with `rbac`, whose role keys
/// live outside `DataKey`.
pub(crate) fn bump_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn load_persistent<V>(env: &Env, key: &DataKey, missing: Error) -> Result<V, Error>
where
    V: soroban_sdk::TryFromVal<Env, Val>,
{
    let value = env.storage().persistent().get(key).ok_or(missing)?;
    bump_persistent(env, key);
    Ok(value)
}

fn save_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

// ─────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────

pub fn save_property_config(env: &Env, config: &PropertyConfig) {
    save_persistent(env, &DataKey::PropConfig(config.id), config);
}

pub fn load_property_config(env: &Env, id: u64) -> Result<PropertyConfig, Error> {
    load_persistent(env, &DataKey::PropConfig(id), Error::PropertyNotFound)
}

pub fn save_supply_state(env: &Env, id: u64, state: &SupplyState) {
    save_persistent(env, &DataKey::PropState(id), state);
}

pub fn load_supply_state(env: &Env, id: u64) -> Result<SupplyState, Error> {
    load_persistent(env, &DataKey::PropState(id), Error::PropertyNotFound)
}

/// Load config and state together, bumping both TTLs.
pub fn load_property_pair(env: &Env, id: u64) -> Result<(PropertyConfig, SupplyState), Error> {
    let config = load_property_config(env, id)?;
    let state = load_supply_state(env, id)?;
    Ok((config, state))
}

pub fn load_token_supply(env: &Env, id: u64) -> Result<TokenSupply, Error> {
    let (config, state) = load_property_pair(env, id)?;
    Ok(TokenSupply::from_parts(config, state))
}

// ─────────────────────────────────────────────────────────
// Reservations
// ─────────────────────────────────────────────────────────

pub fn save_reservation(env: &Env, reservation: &Reservation) {
    save_persistent(env, &DataKey::Reservation(reservation.id), reservation);
}

pub fn load_reservation(env: &Env, id: u64) -> Result<Reservation, Error> {
    load_persistent(env, &DataKey::Reservation(id), Error::ReservationNotFound)
}

/// IDs of the property's pending reservations, oldest first.
pub fn pending_ids(env: &Env, property_id: u64) -> Vec<u64> {
    let key = DataKey::Pending(property_id);
    match env.storage().persistent().get(&key) {
        Some(ids) => {
            bump_persistent(env, &key);
            ids
        }
        None => Vec::new(env),
    }
}

pub fn set_pending(env: &Env, property_id: u64, ids: &Vec<u64>) {
    save_persistent(env, &DataKey::Pending(property_id), ids);
}

pub fn push_pending(env: &Env, property_id: u64, reservation_id: u64) {
    let mut ids = pending_ids(env, property_id);
    ids.push_back(reservation_id);
    set_pending(env, property_id, &ids);
}

/// Drop `reservation_id` from the pending index. Absent IDs are ignored.
pub fn remove_pending(env: &Env, property_id: u64, reservation_id: u64) {
    let mut ids = pending_ids(env, property_id);
    if let Some(index) = ids.first_index_of(reservation_id) {
        ids.remove(index);
        set_pending(env, property_id, &ids);
    }
}

// ─────────────────────────────────────────────────────────
// Investments and holdings
// ─────────────────────────────────────────────────────────

/// Persist an investment and claim its payment reference.
pub fn save_investment(env: &Env, investment: &Investment) {
    save_persistent(env, &DataKey::Investment(investment.id), investment);
    save_persistent(
        env,
        &DataKey::PaymentRef(investment.payment_ref.clone()),
        &investment.id,
    );
}

pub fn load_investment(env: &Env, id: u64) -> Result<Investment, Error> {
    load_persistent(env, &DataKey::Investment(id), Error::InvestmentNotFound)
}

/// Investment that already consumed `payment_ref`, if any.
pub fn investment_for_payment(env: &Env, payment_ref: &BytesN<32>) -> Result<Option<Investment>, Error> {
    let key = DataKey::PaymentRef(payment_ref.clone());
    let id: Option<u64> = env.storage().persistent().get(&key);
    match id {
        Some(id) => {
            bump_persistent(env, &key);
            load_investment(env, id).map(Some)
        }
        None => Ok(None),
    }
}

pub fn get_holding(env: &Env, property_id: u64, investor: &Address) -> i128 {
    let key = DataKey::Holding(property_id, investor.clone());
    match env.storage().persistent().get(&key) {
        Some(balance) => {
            bump_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

/// Add `amount` to the investor's holding. Returns the new balance.
pub fn add_to_holding(
    env: &Env,
    property_id: u64,
    investor: &Address,
    amount: i128,
) -> Result<i128, Error> {
    let current = get_holding(env, property_id, investor);
    let new_balance = current.checked_add(amount).ok_or(Error::Overflow)?;
    save_persistent(
        env,
        &DataKey::Holding(property_id, investor.clone()),
        &new_balance,
    );
    Ok(new_balance)
}
