//! Subscription ledger on top of a non-transferable token ledger.

use soroban_sdk::{contractimpl, log, panic_with_error, Address, BytesN, Env, String};
use soroban_sdk::xdr::ToXdr;
use crate::errors::{NonFungibleTokenError, SubscriptionError};
use crate::storage::NFTStorageKey;
use crate::{events, guard, payment, storage, Policy, SubscriptionNft, SubscriptionNftArgs, SubscriptionNftClient, SubscriptionNftContract};


fn token_id_of(e: &Env, account: &Address) -> BytesN<32> {
    e.crypto().sha256(&account.clone().to_xdr(e)).into()
}

fn require_admin(e: &Env) -> Address {
    let admin = storage::read_admin(e);
    admin.require_auth();
    admin
}

fn update_policy(e: &Env, policy: &Policy) -> Result<(), SubscriptionError> {
    policy.validate(e, &storage::read_payment_token(e))?;
    storage::write_policy(e, policy);
    storage::extend_instance(e);
    Ok(())
}

fn mint(e: &Env, to: &Address, token_id: &BytesN<32>) {
    if storage::read_owner(e, token_id).is_some() {
        panic_with_error!(e, NonFungibleTokenError::TokenAlreadyMinted);
    }
    storage::write_owner(e, token_id, to);
    let balance = storage::read_balance(e, to);
    storage::write_balance(e, to, balance + 1);

    events::Mint { to: to.clone(), token_id: token_id.clone() }.publish(e);
}

fn reject_transfer(e: &Env, from: &Address, to: &Address, token_id: &BytesN<32>) -> ! {
    if storage::read_owner(e, token_id).is_none() {
        panic_with_error!(e, NonFungibleTokenError::NonExistentToken);
    }
    log!(e, "transfer rejected", from.clone(), to.clone());
    panic_with_error!(e, NonFungibleTokenError::TokenNonTransferable)
}


#[contractimpl]
impl SubscriptionNftContract for SubscriptionNft {

    fn __constructor(
        e: &Env,
        admin: Address,
        payment_token: Address,
        name: String,
        symbol: String,
        uri: String,
        policy: Policy,
    ) {
        if admin == e.current_contract_address() {
            log!(e, "contract cannot be its own admin");
            panic_with_error!(e, SubscriptionError::InvalidAddress);
        }
        if let Err(err) = policy.validate(e, &payment_token) {
            panic_with_error!(e, err);
        }

        storage::write_admin(e, &admin);
        storage::write_payment_token(e, &payment_token);
        storage::write_policy(e, &policy);
        storage::write_metadata(e, &name, &symbol, &uri);
        storage::extend_instance(e);
    }

    fn subscribe(
        e: &Env,
        payer: Address,
        account: Address,
        duration: u64,
        payment: i128,
    ) -> Result<(BytesN<32>, u64), SubscriptionError> {
        payer.require_auth();

        guard::non_reentrant(e, || {
            let policy = storage::read_policy(e);
            let cost = policy.cost(e, duration)?;
            if payment != cost {
                log!(e, "payment mismatch", cost, payment);
                return Err(SubscriptionError::InvalidPayment);
            }

            let token_id = token_id_of(e, &account);
            let now = e.ledger().timestamp();
            let existing = storage::read_expiration(e, &token_id);

            let expiration = if existing > now {
                // Reaching the cap exactly is rejected as well.
                let remaining = existing - now;
                let accumulated = remaining
                    .checked_add(duration)
                    .ok_or(SubscriptionError::InvalidDuration)?;
                if accumulated >= policy.max_accumulated_duration {
                    log!(
                        e,
                        "accumulation cap reached",
                        remaining,
                        duration,
                        policy.max_accumulated_duration
                    );
                    return Err(SubscriptionError::InvalidDuration);
                }
                let expiration = existing
                    .checked_add(duration)
                    .ok_or(SubscriptionError::MathOverflow)?;

                events::SubscriptionExtended {
                    account: account.clone(),
                    token_id: token_id.clone(),
                    expiration,
                }
                .publish(e);
                expiration
            } else {
                let expiration = now
                    .checked_add(duration)
                    .ok_or(SubscriptionError::MathOverflow)?;

                events::SubscriptionStarted {
                    account: account.clone(),
                    token_id: token_id.clone(),
                    start: now,
                    expiration,
                }
                .publish(e);
                expiration
            };

            // Written before the payment token is called.
            storage::write_expiration(e, &token_id, expiration);

            if cost > 0 {
                let payment_token = storage::read_payment_token(e);
                payment::send(e, &payment_token, &payer, &policy.funds_recipient, cost)?;
            }
            events::PaymentReceived {
                account: account.clone(),
                payer: payer.clone(),
                amount: cost,
            }
            .publish(e);

            if storage::read_balance(e, &account) == 0 && storage::read_owner(e, &token_id).is_none() {
                mint(e, &account, &token_id);
            }
            storage::extend_token(e, &account, &token_id, expiration);

            storage::extend_instance(e);
            Ok((token_id, expiration))
        })
    }

    fn set_duration_bounds(e: &Env, min_duration: u64, max_duration: u64) -> Result<(), SubscriptionError> {
        require_admin(e);

        let mut policy = storage::read_policy(e);
        policy.min_duration = min_duration;
        policy.max_duration = max_duration;
        update_policy(e, &policy)?;

        events::DurationBoundsUpdated { min_duration, max_duration }.publish(e);
        Ok(())
    }

    fn set_max_accumulated_duration(e: &Env, max_accumulated_duration: u64) -> Result<(), SubscriptionError> {
        require_admin(e);

        let mut policy = storage::read_policy(e);
        policy.max_accumulated_duration = max_accumulated_duration;
        update_policy(e, &policy)?;

        events::MaxAccumulatedDurationUpdated { max_accumulated_duration }.publish(e);
        Ok(())
    }

    fn set_price(e: &Env, price_per_second: i128) -> Result<(), SubscriptionError> {
        require_admin(e);

        let mut policy = storage::read_policy(e);
        policy.price_per_second = price_per_second;
        update_policy(e, &policy)?;

        events::PriceUpdated { price_per_second }.publish(e);
        Ok(())
    }

    fn set_funds_recipient(e: &Env, recipient: Address) -> Result<(), SubscriptionError> {
        require_admin(e);

        let mut policy = storage::read_policy(e);
        policy.funds_recipient = recipient.clone();
        update_policy(e, &policy)?;

        events::FundsRecipientUpdated { recipient }.publish(e);
        Ok(())
    }

    fn withdraw(e: &Env) -> Result<i128, SubscriptionError> {
        require_admin(e);

        guard::non_reentrant(e, || {
            let policy = storage::read_policy(e);
            if policy.retains_funds(e) {
                log!(e, "withdrawal to self rejected");
                return Err(SubscriptionError::InvalidAddress);
            }

            let payment_token = storage::read_payment_token(e);
            let amount = payment::custody_balance(e, &payment_token);
            if amount > 0 {
                payment::send(
                    e,
                    &payment_token,
                    &e.current_contract_address(),
                    &policy.funds_recipient,
                    amount,
                )?;
            }

            storage::extend_instance(e);
            events::Withdrawn { recipient: policy.funds_recipient, amount }.publish(e);
            Ok(amount)
        })
    }

    fn transfer_admin(e: &Env, new_admin: Address) -> Result<(), SubscriptionError> {
        let current_admin = require_admin(e);
        if new_admin == e.current_contract_address() {
            log!(e, "contract cannot be its own admin");
            return Err(SubscriptionError::InvalidAddress);
        }

        storage::write_pending_admin(e, &new_admin);
        storage::extend_instance(e);
        events::AdminTransferStarted { current_admin, pending_admin: new_admin }.publish(e);
        Ok(())
    }

    fn accept_admin(e: &Env) -> Result<(), SubscriptionError> {
        let new_admin = storage::read_pending_admin(e).ok_or(SubscriptionError::NoPendingAdmin)?;
        new_admin.require_auth();

        let previous_admin = storage::read_admin(e);
        storage::write_admin(e, &new_admin);
        storage::remove_pending_admin(e);
        storage::extend_instance(e);

        events::AdminTransferCompleted { previous_admin, new_admin }.publish(e);
        Ok(())
    }

    fn upgrade(e: &Env, wasm_hash: BytesN<32>) {
        require_admin(e);
        storage::extend_instance(e);
        e.deployer().update_current_contract_wasm(wasm_hash);
    }

    fn get_subscription_cost(e: &Env, duration: u64) -> Result<i128, SubscriptionError> {
        storage::read_policy(e).cost(e, duration)
    }

    fn derive_token_id(e: &Env, account: Address) -> BytesN<32> {
        token_id_of(e, &account)
    }

    fn is_subscription_active(e: &Env, token_id: BytesN<32>) -> bool {
        storage::read_expiration(e, &token_id) > e.ledger().timestamp()
    }

    fn has_active_subscription(e: &Env, account: Address) -> bool {
        if storage::read_balance(e, &account) == 0 {
            return false;
        }
        Self::is_subscription_active(e, token_id_of(e, &account))
    }

    fn expiration(e: &Env, token_id: BytesN<32>) -> u64 {
        storage::read_expiration(e, &token_id)
    }

    fn policy(e: &Env) -> Policy {
        storage::read_policy(e)
    }

    fn payment_token(e: &Env) -> Address {
        storage::read_payment_token(e)
    }

    fn admin(e: &Env) -> Address {
        storage::read_admin(e)
    }

    fn pending_admin(e: &Env) -> Option<Address> {
        storage::read_pending_admin(e)
    }

    fn balance(e: &Env, owner: Address) -> u32 {
        storage::read_balance(e, &owner)
    }

    fn owner_of(e: &Env, token_id: BytesN<32>) -> Address {
        storage::read_owner(e, &token_id)
            .unwrap_or_else(|| panic_with_error!(e, NonFungibleTokenError::NonExistentToken))
    }

    fn transfer(e: &Env, from: Address, to: Address, token_id: BytesN<32>) {
        reject_transfer(e, &from, &to, &token_id)
    }

    fn transfer_from(e: &Env, spender: Address, from: Address, to: Address, token_id: BytesN<32>) {
        log!(e, "transfer_from by", spender);
        reject_transfer(e, &from, &to, &token_id)
    }

    fn name(e: &Env) -> String {
        storage::read_metadata(e, &NFTStorageKey::Name)
    }

    fn symbol(e: &Env) -> String {
        storage::read_metadata(e, &NFTStorageKey::Symbol)
    }

    fn token_uri(e: &Env, token_id: BytesN<32>) -> String {
        if storage::read_owner(e, &token_id).is_none() {
            panic_with_error!(e, NonFungibleTokenError::NonExistentToken);
        }
        storage::read_metadata(e, &NFTStorageKey::URI)
    }

}
