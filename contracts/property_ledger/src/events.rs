//! Contract events. Every supply mutation publishes one, so an indexer can
//! rebuild each property's buckets from the event stream alone.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env};

use crate::types::{LedgerConfig, ReservationStatus};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyRegistered {
    pub property_id: u64,
    pub manager: Address,
    pub total_supply: i128,
    pub token_price: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensReserved {
    pub reservation_id: u64,
    pub property_id: u64,
    pub investor: Address,
    pub amount: i128,
    pub expires_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReservationConfirmed {
    pub reservation_id: u64,
    pub investment_id: u64,
    pub property_id: u64,
    pub investor: Address,
    pub tokens: i128,
    pub payment_ref: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReservationReleased {
    pub reservation_id: u64,
    pub property_id: u64,
    pub amount: i128,
    pub status: ReservationStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PricingUpdated {
    pub property_id: u64,
    pub token_price: i128,
    pub minimum_investment: i128,
}

pub fn emit_property_registered(
    env: &Env,
    property_id: u64,
    manager: Address,
    total_supply: i128,
    token_price: i128,
) {
    let topics = (symbol_short!("prop_reg"), property_id);
    let data = PropertyRegistered {
        property_id,
        manager,
        total_supply,
        token_price,
    };
    env.events().publish(topics, data);
}

pub fn emit_tokens_reserved(
    env: &Env,
    reservation_id: u64,
    property_id: u64,
    investor: Address,
    amount: i128,
    expires_at: u64,
) {
    let topics = (symbol_short!("reserved"), property_id);
    let data = TokensReserved {
        reservation_id,
        property_id,
        investor,
        amount,
        expires_at,
    };
    env.events().publish(topics, data);
}

pub fn emit_reservation_confirmed(env: &Env, data: ReservationConfirmed) {
    let topics = (symbol_short!("confirmed"), data.property_id);
    env.events().publish(topics, data);
}

pub fn emit_reservation_released(
    env: &Env,
    reservation_id: u64,
    property_id: u64,
    amount: i128,
    status: ReservationStatus,
) {
    let topics = (symbol_short!("released"), property_id);
    let data = ReservationReleased {
        reservation_id,
        property_id,
        amount,
        status,
    };
    env.events().publish(topics, data);
}

pub fn emit_property_closed(env: &Env, property_id: u64, by: Address) {
    env.events()
        .publish((symbol_short!("closed"), property_id), by);
}

pub fn emit_pricing_updated(
    env: &Env,
    property_id: u64,
    token_price: i128,
    minimum_investment: i128,
) {
    let topics = (symbol_short!("repriced"), property_id);
    let data = PricingUpdated {
        property_id,
        token_price,
        minimum_investment,
    };
    env.events().publish(topics, data);
}

pub fn emit_protocol_paused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("paused"),), by);
}

pub fn emit_protocol_unpaused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("unpaused"),), by);
}

pub fn emit_config_updated(env: &Env, config: LedgerConfig) {
    env.events().publish((symbol_short!("config"),), config);
}
