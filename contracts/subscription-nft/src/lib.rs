#![no_std]

use soroban_sdk::{contract, contractmeta, Address, BytesN, Env, String};

contractmeta!(key = "Description", val = "Non-transferable subscription tokens");

mod contract;

mod errors;
mod events;
mod guard;
mod payment;
mod policy;
mod storage;

pub use errors::{NonFungibleTokenError, SubscriptionError};
pub use policy::Policy;

#[contract]
pub struct SubscriptionNft;

pub trait SubscriptionNftContract {

    /// Deploy-time configuration.
    ///
    /// The whole `policy` is validated at once, see [`Policy::validate`].
    /// Panics with the first violated invariant.
    ///
    /// # Arguments
    ///
    /// * `e` - Access to the Soroban environment.
    /// * `admin` - Account allowed to change the policy and withdraw funds.
    /// * `payment_token` - SEP-41 token subscriptions are paid in.
    /// * `name` - Collection name.
    /// * `symbol` - Collection symbol.
    /// * `uri` - Collection metadata URI.
    /// * `policy` - Initial pricing and duration policy.
    fn __constructor(
        e: &Env,
        admin: Address,
        payment_token: Address,
        name: String,
        symbol: String,
        uri: String,
        policy: Policy,
    );

    /// Buy `duration` seconds of subscription for `account`, paid by `payer`.
    ///
    /// If `account` is currently active the time is appended to its existing
    /// expiration, otherwise the subscription starts now. The first
    /// subscription of an account mints its token; later calls never mint
    /// again.
    ///
    /// # Arguments
    ///
    /// * `e` - Access to the Soroban environment.
    /// * `payer` - Account paying for the subscription. Must authorize.
    /// * `account` - Account the subscription is bound to.
    /// * `duration` - Seconds to buy, within the configured bounds.
    /// * `payment` - Amount of payment token offered. Must equal the cost.
    ///
    /// # Returns
    ///
    /// The account's token id and its new expiration timestamp.
    ///
    /// # Errors
    ///
    /// * [`SubscriptionError::InvalidDuration`] - duration out of bounds, or
    ///   the remaining time plus `duration` reaches the accumulation cap.
    /// * [`SubscriptionError::InvalidPayment`] - `payment` differs from the cost.
    /// * [`SubscriptionError::TransferFailed`] - the payment could not be moved.
    /// * [`SubscriptionError::Reentrancy`] - called while a guarded call is in flight.
    ///
    /// # Events
    ///
    /// * `SubscriptionStarted` or `SubscriptionExtended`
    /// * `PaymentReceived`
    /// * `Mint` on first subscription
    fn subscribe(
        e: &Env,
        payer: Address,
        account: Address,
        duration: u64,
        payment: i128,
    ) -> Result<(BytesN<32>, u64), SubscriptionError>;

    /// Replace the per-call duration bounds. Admin only.
    ///
    /// # Errors
    ///
    /// * [`SubscriptionError::InvalidDuration`] - a bound is zero, `min > max`,
    ///   or `max` exceeds the accumulation cap.
    fn set_duration_bounds(e: &Env, min_duration: u64, max_duration: u64) -> Result<(), SubscriptionError>;

    /// Replace the accumulation cap. Admin only.
    ///
    /// # Errors
    ///
    /// * [`SubscriptionError::InvalidDuration`] - the cap is below the current
    ///   maximum duration.
    fn set_max_accumulated_duration(e: &Env, max_accumulated_duration: u64) -> Result<(), SubscriptionError>;

    /// Replace the price per second. Admin only. Zero makes subscriptions free.
    fn set_price(e: &Env, price_per_second: i128) -> Result<(), SubscriptionError>;

    /// Replace the funds recipient. Admin only.
    ///
    /// Passing the contract's own address keeps payments in custody until
    /// [`SubscriptionNftContract::withdraw`].
    fn set_funds_recipient(e: &Env, recipient: Address) -> Result<(), SubscriptionError>;

    /// Sweep the contract's whole payment token balance to the funds
    /// recipient. Admin only.
    ///
    /// # Returns
    ///
    /// The amount swept.
    ///
    /// # Errors
    ///
    /// * [`SubscriptionError::InvalidAddress`] - the funds recipient is the
    ///   contract itself.
    /// * [`SubscriptionError::TransferFailed`] - the transfer did not succeed.
    fn withdraw(e: &Env) -> Result<i128, SubscriptionError>;

    /// Propose `new_admin` as the next admin. Admin only. The proposal takes
    /// effect once `new_admin` calls [`SubscriptionNftContract::accept_admin`].
    fn transfer_admin(e: &Env, new_admin: Address) -> Result<(), SubscriptionError>;

    /// Complete a pending admin handover. Must be authorized by the pending admin.
    fn accept_admin(e: &Env) -> Result<(), SubscriptionError>;

    /// Replace the contract code. Admin only.
    fn upgrade(e: &Env, wasm_hash: BytesN<32>);

    /// Returns the cost of `duration` seconds.
    ///
    /// # Errors
    ///
    /// * [`SubscriptionError::InvalidDuration`] - duration out of bounds.
    fn get_subscription_cost(e: &Env, duration: u64) -> Result<i128, SubscriptionError>;

    /// Returns the token id bound to `account`.
    ///
    /// The id is the SHA-256 digest of the account's XDR encoding. It does not
    /// depend on whether the token was minted.
    fn derive_token_id(e: &Env, account: Address) -> BytesN<32>;

    /// Whether `token_id` has an expiration in the future.
    fn is_subscription_active(e: &Env, token_id: BytesN<32>) -> bool;

    /// Whether `account` holds a token whose subscription has not lapsed.
    fn has_active_subscription(e: &Env, account: Address) -> bool;

    /// Returns the expiration timestamp of `token_id`, or 0 if it never
    /// subscribed.
    fn expiration(e: &Env, token_id: BytesN<32>) -> u64;

    /// Returns the current policy.
    fn policy(e: &Env) -> Policy;

    /// Returns the payment token address.
    fn payment_token(e: &Env) -> Address;

    /// Returns the current admin.
    fn admin(e: &Env) -> Address;

    /// Returns the proposed admin, if a handover is pending.
    fn pending_admin(e: &Env) -> Option<Address>;

    /// Returns the number of tokens in `owner`'s account.
    ///
    /// # Arguments
    ///
    /// * `e` - Access to the Soroban environment.
    /// * `owner` - Account of the token's owner.
    fn balance(e: &Env, owner: Address) -> u32;

    /// Returns the address of the owner of the given `token_id`.
    ///
    /// # Arguments
    ///
    /// * `e` - Access to the Soroban environment.
    /// * `token_id` - Token id.
    ///
    /// # Notes
    ///
    /// If the token does not exist, this function is expected to panic.
    fn owner_of(e: &Env, token_id: BytesN<32>) -> Address;

    /// Subscription tokens are bound to their account. Always panics.
    ///
    /// # Arguments
    ///
    /// * `e` - Access to the Soroban environment.
    /// * `from` - Account of the sender.
    /// * `to` - Account of the recipient.
    /// * `token_id` - Token id.
    ///
    /// # Notes
    ///
    /// Panics with `NonExistentToken` for unminted ids and
    /// `TokenNonTransferable` otherwise.
    fn transfer(e: &Env, from: Address, to: Address, token_id: BytesN<32>);

    /// Subscription tokens are bound to their account. Always panics, same
    /// as [`SubscriptionNftContract::transfer`].
    fn transfer_from(e: &Env, spender: Address, from: Address, to: Address, token_id: BytesN<32>);

    /// Returns the token collection name.
    ///
    /// # Arguments
    ///
    /// * `e` - Access to the Soroban environment.
    fn name(e: &Env) -> String;

    /// Returns the token collection symbol.
    ///
    /// # Arguments
    ///
    /// * `e` - Access to the Soroban environment.
    fn symbol(e: &Env) -> String;

    /// Returns the Uniform Resource Identifier (URI) for `token_id` token.
    ///
    /// All subscription tokens share the collection URI.
    ///
    /// # Notes
    ///
    /// If the token does not exist, this function is expected to panic.
    fn token_uri(e: &Env, token_id: BytesN<32>) -> String;
}
