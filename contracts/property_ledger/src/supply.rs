//! Pure supply bookkeeping.
//!
//! Each transition takes the current [`SupplyState`] by reference and returns
//! the next one, leaving persistence to the caller. Nothing here touches
//! storage, so a failed transition leaves no trace.

use crate::types::SupplyState;
use crate::Error;

/// Upper bound accepted for `total_supply` (10^30).
pub const MAX_TOTAL_SUPPLY: i128 = 1_000_000_000_000_000_000_000_000_000_000;

/// Move `amount` tokens from available to reserved.
pub fn reserve(state: &SupplyState, amount: i128) -> Result<SupplyState, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    if state.available_supply < amount {
        return Err(Error::InsufficientSupply);
    }
    let mut next = state.clone();
    next.available_supply = state.available_supply - amount;
    next.reserved_supply = state
        .reserved_supply
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    Ok(next)
}

/// Move `amount` tokens from reserved to sold.
pub fn confirm(state: &SupplyState, amount: i128) -> Result<SupplyState, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    if state.reserved_supply < amount {
        return Err(Error::SupplyInvariant);
    }
    let mut next = state.clone();
    next.reserved_supply = state.reserved_supply - amount;
    next.sold_supply = state.sold_supply.checked_add(amount).ok_or(Error::Overflow)?;
    Ok(next)
}

/// Move `amount` tokens from reserved back to available.
pub fn release(state: &SupplyState, amount: i128) -> Result<SupplyState, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    if state.reserved_supply < amount {
        return Err(Error::SupplyInvariant);
    }
    let mut next = state.clone();
    next.reserved_supply = state.reserved_supply - amount;
    next.available_supply = state
        .available_supply
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    Ok(next)
}

/// Verify `available + reserved + sold == total` with every bucket non-negative.
pub fn check(state: &SupplyState, total_supply: i128) -> Result<(), Error> {
    if state.available_supply < 0 || state.reserved_supply < 0 || state.sold_supply < 0 {
        return Err(Error::SupplyInvariant);
    }
    let sum = state
        .available_supply
        .checked_add(state.reserved_supply)
        .and_then(|s| s.checked_add(state.sold_supply))
        .ok_or(Error::Overflow)?;
    if sum != total_supply {
        return Err(Error::SupplyInvariant);
    }
    Ok(())
}

/// Price of `amount` tokens at `token_price`, or `None` on overflow.
pub fn quote(amount: i128, token_price: i128) -> Option<i128> {
    amount.checked_mul(token_price)
}
