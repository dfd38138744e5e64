//! Storage keys and typed accessors.
//!
//! Configuration, admin slots and collection metadata live in instance
//! storage. Per-token entries (owner, expiration) and per-account balances
//! are persistent entries, each bumped on write. Entries of a subscribed
//! token are kept live at least until its expiration.

use soroban_sdk::{contracttype, panic_with_error, Address, BytesN, Env, String};

use crate::errors::{NonFungibleTokenError, SubscriptionError};
use crate::policy::Policy;

/// ~30 days at 5 s/ledger.
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;
pub const PERSISTENT_THRESHOLD_LEDGERS: u32 = PERSISTENT_BUMP_LEDGERS - 17_280;

pub const INSTANCE_BUMP_LEDGERS: u32 = 518_400;
pub const INSTANCE_THRESHOLD_LEDGERS: u32 = INSTANCE_BUMP_LEDGERS - 17_280;

/// Average ledger close time, used to convert seconds into ledgers.
pub const LEDGER_SECONDS: u64 = 5;

#[contracttype]
pub enum DataKey {
    Admin,
    PendingAdmin,
    PaymentToken,
    Policy,
    Entered,
}

#[contracttype]
pub enum NFTStorageKey {
    Owner(BytesN<32>),
    Balance(Address),
    Expiration(BytesN<32>),
    Name,
    Symbol,
    URI,
}

pub fn extend_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_THRESHOLD_LEDGERS, INSTANCE_BUMP_LEDGERS);
}

fn extend_persistent(e: &Env, key: &NFTStorageKey) {
    e.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_THRESHOLD_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

/// TTL in ledgers covering the time left until `expiration` plus the regular
/// bump, capped at the network maximum.
fn ttl_until(e: &Env, expiration: u64) -> u32 {
    let remaining = expiration.saturating_sub(e.ledger().timestamp()) / LEDGER_SECONDS;
    let wanted = remaining.saturating_add(u64::from(PERSISTENT_BUMP_LEDGERS));
    let max_ttl = e.storage().max_ttl();
    u32::try_from(wanted).map_or(max_ttl, |ttl| ttl.min(max_ttl))
}

fn extend_persistent_until(e: &Env, key: &NFTStorageKey, expiration: u64) {
    let extend_to = ttl_until(e, expiration);
    let threshold = extend_to.saturating_sub(PERSISTENT_BUMP_LEDGERS - PERSISTENT_THRESHOLD_LEDGERS);
    e.storage().persistent().extend_ttl(key, threshold, extend_to);
}

// Admin

pub fn read_admin(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&DataKey::Admin)
        .unwrap_or_else(|| panic_with_error!(e, SubscriptionError::NotInitialized))
}

pub fn write_admin(e: &Env, admin: &Address) {
    e.storage().instance().set(&DataKey::Admin, admin);
}

pub fn read_pending_admin(e: &Env) -> Option<Address> {
    e.storage().instance().get(&DataKey::PendingAdmin)
}

pub fn write_pending_admin(e: &Env, pending: &Address) {
    e.storage().instance().set(&DataKey::PendingAdmin, pending);
}

pub fn remove_pending_admin(e: &Env) {
    e.storage().instance().remove(&DataKey::PendingAdmin);
}

// Configuration

pub fn read_payment_token(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&DataKey::PaymentToken)
        .unwrap_or_else(|| panic_with_error!(e, SubscriptionError::NotInitialized))
}

pub fn write_payment_token(e: &Env, token: &Address) {
    e.storage().instance().set(&DataKey::PaymentToken, token);
}

pub fn read_policy(e: &Env) -> Policy {
    e.storage()
        .instance()
        .get(&DataKey::Policy)
        .unwrap_or_else(|| panic_with_error!(e, SubscriptionError::NotInitialized))
}

pub fn write_policy(e: &Env, policy: &Policy) {
    e.storage().instance().set(&DataKey::Policy, policy);
}

// Metadata

pub fn write_metadata(e: &Env, name: &String, symbol: &String, uri: &String) {
    e.storage().instance().set(&NFTStorageKey::Name, name);
    e.storage().instance().set(&NFTStorageKey::Symbol, symbol);
    e.storage().instance().set(&NFTStorageKey::URI, uri);
}

pub fn read_metadata(e: &Env, key: &NFTStorageKey) -> String {
    e.storage()
        .instance()
        .get(key)
        .unwrap_or_else(|| panic_with_error!(e, NonFungibleTokenError::UnsetMetadata))
}

// Token ledger

pub fn read_owner(e: &Env, token_id: &BytesN<32>) -> Option<Address> {
    e.storage()
        .persistent()
        .get(&NFTStorageKey::Owner(token_id.clone()))
}

pub fn write_owner(e: &Env, token_id: &BytesN<32>, owner: &Address) {
    let key = NFTStorageKey::Owner(token_id.clone());
    e.storage().persistent().set(&key, owner);
    extend_persistent(e, &key);
}

pub fn read_balance(e: &Env, owner: &Address) -> u32 {
    e.storage()
        .persistent()
        .get(&NFTStorageKey::Balance(owner.clone()))
        .unwrap_or(0)
}

pub fn write_balance(e: &Env, owner: &Address, balance: u32) {
    let key = NFTStorageKey::Balance(owner.clone());
    e.storage().persistent().set(&key, &balance);
    extend_persistent(e, &key);
}

pub fn read_expiration(e: &Env, token_id: &BytesN<32>) -> u64 {
    e.storage()
        .persistent()
        .get(&NFTStorageKey::Expiration(token_id.clone()))
        .unwrap_or(0)
}

pub fn write_expiration(e: &Env, token_id: &BytesN<32>, expiration: u64) {
    let key = NFTStorageKey::Expiration(token_id.clone());
    e.storage().persistent().set(&key, &expiration);
    extend_persistent_until(e, &key, expiration);
}

/// Keeps the owner and balance entries of a minted token live until `expiration`.
pub fn extend_token(e: &Env, owner: &Address, token_id: &BytesN<32>, expiration: u64) {
    extend_persistent_until(e, &NFTStorageKey::Owner(token_id.clone()), expiration);
    extend_persistent_until(e, &NFTStorageKey::Balance(owner.clone()), expiration);
}
