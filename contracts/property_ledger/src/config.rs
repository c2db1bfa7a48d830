//! Ledger configuration defaults and bounds.

use crate::types::LedgerConfig;
use crate::Error;

/// Payment window granted to an investor after reserving (15 minutes).
pub const DEFAULT_RESERVATION_TTL: u64 = 15 * 60;
pub const MIN_RESERVATION_TTL: u64 = 60;
pub const MAX_RESERVATION_TTL: u64 = 7 * 24 * 60 * 60;

pub const DEFAULT_MAX_PENDING: u32 = 64;
/// Caps the per-property pending index, which bounds the lazy sweep done
/// inside `reserve_tokens`.
pub const MAX_PENDING_LIMIT: u32 = 256;

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            reservation_ttl: DEFAULT_RESERVATION_TTL,
            max_pending_per_property: DEFAULT_MAX_PENDING,
        }
    }
}

pub fn validate(config: &LedgerConfig) -> Result<(), Error> {
    if config.reservation_ttl < MIN_RESERVATION_TTL || config.reservation_ttl > MAX_RESERVATION_TTL
    {
        return Err(Error::InvalidConfig);
    }
    if config.max_pending_per_property == 0 || config.max_pending_per_property > MAX_PENDING_LIMIT {
        return Err(Error::InvalidConfig);
    }
    Ok(())
}
