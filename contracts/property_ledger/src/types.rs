//! # Types
//!
//! Shared data structures used across all modules of the property ledger.
//!
//! ## Config / State split
//!
//! A property is stored as two separate ledger entries:
//!
//! - [`PropertyConfig`]: written at registration; only pricing is ever rewritten.
//! - [`SupplyState`]: written on every reservation, confirmation and release.
//!
//! The public API exposes the reconstructed [`TokenSupply`] view.
//!
//! ## Supply accounting
//!
//! Every token of a property sits in exactly one bucket:
//!
//! ```text
//! available ──reserve──► reserved ──confirm──► sold
//!     ▲                      │
//!     └──────release─────────┘
//! ```
//!
//! so `available + reserved + sold == total` holds after every invocation.
//!
//! ## Reservation lifecycle
//!
//! ```text
//! Pending ──► Confirmed
//!    ├──────► Cancelled   (investor withdrew before expiry)
//!    ├──────► Failed      (settler reported a failed payment)
//!    └──────► Expired     (released at or after `expires_at`)
//! ```
//!
//! All four outcomes are terminal.

use soroban_sdk::{contracttype, Address, BytesN};

/// Whether a property is accepting new reservations.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PropertyStatus {
    /// Offering is live; reservations are accepted.
    Open,
    /// Offering ended. Pending reservations may still settle or be released.
    Closed,
}

/// Property configuration written at registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyConfig {
    pub id: u64,
    pub manager: Address,
    pub total_supply: i128,
    pub token_price: i128,
    pub minimum_investment: i128,
}

/// Mutable supply buckets for a property.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SupplyState {
    pub available_supply: i128,
    pub reserved_supply: i128,
    pub sold_supply: i128,
    pub status: PropertyStatus,
}

impl SupplyState {
    /// Fresh state for a newly registered property: everything is available.
    pub fn opening(total_supply: i128) -> Self {
        SupplyState {
            available_supply: total_supply,
            reserved_supply: 0,
            sold_supply: 0,
            status: PropertyStatus::Open,
        }
    }
}

/// Full token-supply row for a property, as returned by the public API.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenSupply {
    /// Auto-incremented unique ID.
    pub property_id: u64,
    /// Address that registered the property and may close or reprice it.
    pub manager: Address,
    pub total_supply: i128,
    /// Tokens that can still be reserved.
    pub available_supply: i128,
    /// Tokens held against in-flight, unconfirmed payments.
    pub reserved_supply: i128,
    /// Tokens backing confirmed investments.
    pub sold_supply: i128,
    /// Price of a single token, in the settlement currency's minor units.
    pub token_price: i128,
    /// Smallest `amount * token_price` a single reservation may carry.
    pub minimum_investment: i128,
    pub status: PropertyStatus,
}

impl TokenSupply {
    pub fn from_parts(config: PropertyConfig, state: SupplyState) -> Self {
        TokenSupply {
            property_id: config.id,
            manager: config.manager,
            total_supply: config.total_supply,
            available_supply: state.available_supply,
            reserved_supply: state.reserved_supply,
            sold_supply: state.sold_supply,
            token_price: config.token_price,
            minimum_investment: config.minimum_investment,
            status: state.status,
        }
    }
}

/// Lifecycle state of a reservation (one payment attempt).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReservationStatus {
    /// Tokens are held; payment is in flight.
    Pending,
    /// Payment confirmed; an [`Investment`] exists.
    Confirmed,
    /// Withdrawn by the investor before expiry.
    Cancelled,
    /// Payment failure reported by a settler.
    Failed,
    /// Released after the reservation window elapsed.
    Expired,
}

impl ReservationStatus {
    pub fn is_released(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Cancelled | ReservationStatus::Failed | ReservationStatus::Expired
        )
    }
}

/// Tokens provisionally held for an investor.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reservation {
    pub id: u64,
    pub property_id: u64,
    pub investor: Address,
    /// Number of tokens held.
    pub amount: i128,
    /// `amount * token_price` at reservation time. Later repricing does not
    /// affect it.
    pub total_price: i128,
    pub created_at: u64,
    /// Ledger timestamp from which the reservation may be released by anyone
    /// and can no longer be confirmed.
    pub expires_at: u64,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// A settled purchase of property tokens.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Investment {
    pub id: u64,
    pub property_id: u64,
    pub investor: Address,
    pub reservation_id: u64,
    pub tokens: i128,
    pub amount_paid: i128,
    /// Digest of the payment processor's reference; unique across the ledger.
    pub payment_ref: BytesN<32>,
    pub confirmed_at: u64,
}

/// Runtime-tunable ledger parameters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    /// Seconds a reservation holds supply before it can be expired.
    pub reservation_ttl: u64,
    /// Upper bound on simultaneously pending reservations per property.
    pub max_pending_per_property: u32,
}
