//! # RBAC — Role-Based Access Control
//!
//! Manages the five-role hierarchy used by the ledger:
//!
//! ```text
//! SuperAdmin
//!     ├── Admin
//!     ├── Settler
//!     ├── Auditor
//!     └── PropertyManager
//! ```
//!
//! ## Storage layout
//!
//! - `RbacKey::SuperAdmin` → `Address`  — the one and only super-admin.
//! - `RbacKey::Role(addr)` → `Role`     — the role held by `addr`, if any.
//!
//! ## Event emissions
//!
//! | Event topic prefix | Trigger |
//! |--------------------|---------|
//! | `role_set`         | Role granted or replaced |
//! | `role_del`         | Role revoked |
//!
//! ## Threat model notes
//!
//! - `Admin` cannot escalate to `SuperAdmin`; only `SuperAdmin` may grant that role.
//! - `SuperAdmin` cannot be removed via `revoke_role`; use `transfer_super_admin`.
//! - An address holds **at most one role** at a time; granting a new role replaces the old one.
//! - `Settler` is the only role that can turn a reservation into an investment,
//!   so it should be held by the payment webhook's signing key and nothing else.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::storage::bump_persistent;
use crate::Error;

// ─────────────────────────────────────────────────────────
// Role enum — stored per address
// ─────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// Full control: can grant/revoke any role, pause, reconfigure.
    SuperAdmin,
    /// Can grant/revoke non-SuperAdmin roles and manage any property.
    Admin,
    /// Confirms reservations against payments and reports failed payments.
    Settler,
    /// Read-only observer; confirmed by off-chain checks rather than on-chain gates.
    Auditor,
    /// Can register properties and manage the ones it registered.
    PropertyManager,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RbacKey {
    Role(Address),
    SuperAdmin,
}

// ─────────────────────────────────────────────────────────
// Storage helpers (private)
// ─────────────────────────────────────────────────────────

fn store_role(env: &Env, address: &Address, role: &Role) {
    let key = RbacKey::Role(address.clone());
    env.storage().persistent().set(&key, role);
    bump_persistent(env, &key);
}

fn store_super_admin(env: &Env, super_admin: &Address) {
    env.storage()
        .persistent()
        .set(&RbacKey::SuperAdmin, super_admin);
    bump_persistent(env, &RbacKey::SuperAdmin);
}

fn clear_role(env: &Env, address: &Address) {
    env.storage()
        .persistent()
        .remove(&RbacKey::Role(address.clone()));
}

/// Role held by `address`. Every role-gated call reads through here, so a
/// hit also renews the entry's TTL.
pub fn get_role(env: &Env, address: &Address) -> Option<Role> {
    let key = RbacKey::Role(address.clone());
    let role = env.storage().persistent().get(&key);
    if role.is_some() {
        bump_persistent(env, &key);
    }
    role
}

pub fn get_super_admin(env: &Env) -> Option<Address> {
    let super_admin = env.storage().persistent().get(&RbacKey::SuperAdmin);
    if super_admin.is_some() {
        bump_persistent(env, &RbacKey::SuperAdmin);
    }
    super_admin
}

// ─────────────────────────────────────────────────────────
// Initialisation
// ─────────────────────────────────────────────────────────

/// Set the initial SuperAdmin. Fails with `AlreadyInitialized` if one exists.
pub fn init_super_admin(env: &Env, super_admin: &Address) -> Result<(), Error> {
    if env.storage().persistent().has(&RbacKey::SuperAdmin) {
        return Err(Error::AlreadyInitialized);
    }
    store_super_admin(env, super_admin);
    store_role(env, super_admin, &Role::SuperAdmin);

    emit(env, super_admin, &Role::SuperAdmin, None);
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Role assignment
// ─────────────────────────────────────────────────────────

/// Grant `role` to `target`.
///
/// - `caller` must hold `SuperAdmin` or `Admin`.
/// - `Admin` callers cannot grant `SuperAdmin`.
/// - The SuperAdmin cannot be demoted through this path.
pub fn grant_role(env: &Env, caller: &Address, target: &Address, role: Role) -> Result<(), Error> {
    match &role {
        Role::SuperAdmin => require_role(env, caller, &Role::SuperAdmin)?,
        _ => require_admin_or_above(env, caller)?,
    }

    if let Some(Role::SuperAdmin) = get_role(env, target) {
        if role != Role::SuperAdmin {
            return Err(Error::NotAuthorized);
        }
    }

    store_role(env, target, &role);
    emit(env, target, &role, Some(caller.clone()));
    Ok(())
}

/// Revoke any role from `target`. Revoking from an address with no role is a no-op.
pub fn revoke_role(env: &Env, caller: &Address, target: &Address) -> Result<(), Error> {
    require_admin_or_above(env, caller)?;

    if get_super_admin(env).as_ref() == Some(target) {
        return Err(Error::NotAuthorized);
    }

    if get_role(env, target).is_some() {
        clear_role(env, target);
        emit_revoke(env, target, Some(caller.clone()));
    }
    Ok(())
}

/// Hand the SuperAdmin role to `new`. The previous holder loses it immediately.
pub fn transfer_super_admin(env: &Env, current: &Address, new: &Address) -> Result<(), Error> {
    require_role(env, current, &Role::SuperAdmin)?;

    clear_role(env, current);
    emit_revoke(env, current, Some(current.clone()));

    store_super_admin(env, new);
    store_role(env, new, &Role::SuperAdmin);
    emit(env, new, &Role::SuperAdmin, Some(current.clone()));
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Access guards (called from lib.rs handlers)
// ─────────────────────────────────────────────────────────

pub fn require_role(env: &Env, address: &Address, required_role: &Role) -> Result<(), Error> {
    match get_role(env, address) {
        Some(ref r) if r == required_role => Ok(()),
        _ => Err(Error::NotAuthorized),
    }
}

pub fn require_any_of(env: &Env, address: &Address, allowed: &[Role]) -> Result<(), Error> {
    match get_role(env, address) {
        Some(ref r) if allowed.contains(r) => Ok(()),
        _ => Err(Error::NotAuthorized),
    }
}

#[inline]
pub fn require_admin_or_above(env: &Env, address: &Address) -> Result<(), Error> {
    require_any_of(env, address, &[Role::SuperAdmin, Role::Admin])
}

#[inline]
pub fn require_settler(env: &Env, address: &Address) -> Result<(), Error> {
    require_role(env, address, &Role::Settler)
}

#[inline]
pub fn require_can_register(env: &Env, address: &Address) -> Result<(), Error> {
    require_any_of(
        env,
        address,
        &[Role::SuperAdmin, Role::Admin, Role::PropertyManager],
    )
}

/// The property's own manager, or any Admin/SuperAdmin.
pub fn require_property_authority(
    env: &Env,
    address: &Address,
    manager: &Address,
) -> Result<(), Error> {
    if address == manager {
        return require_can_register(env, address);
    }
    require_admin_or_above(env, address)
}

// ─────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────

pub fn has_role(env: &Env, address: &Address, role: &Role) -> bool {
    get_role(env, address).as_ref() == Some(role)
}

// ─────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────

/// Topic: `(role_set, target_address, role_name_symbol)`
/// Data:  `Option<caller_address>`
fn emit(env: &Env, target: &Address, role: &Role, by: Option<Address>) {
    env.events().publish(
        (symbol_short!("role_set"), target.clone(), role_to_symbol(role)),
        by,
    );
}

fn emit_revoke(env: &Env, target: &Address, by: Option<Address>) {
    env.events()
        .publish((symbol_short!("role_del"), target.clone()), by);
}

fn role_to_symbol(role: &Role) -> Symbol {
    match role {
        Role::SuperAdmin => symbol_short!("supadmin"),
        Role::Admin => symbol_short!("admin"),
        Role::Settler => symbol_short!("settler"),
        Role::Auditor => symbol_short!("auditor"),
        Role::PropertyManager => symbol_short!("prop_mgr"),
    }
}
