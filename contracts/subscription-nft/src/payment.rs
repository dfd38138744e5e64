//! Outbound value transfers through the SEP-41 payment token.

use soroban_sdk::{log, token, Address, Env};

use crate::errors::SubscriptionError;

/// Moves `amount` of the payment token from `from` to `to`.
///
/// The token call is made with `try_` so a failing transfer surfaces as
/// [`SubscriptionError::TransferFailed`] instead of a host trap. Returning the
/// error still rolls back every write of the current invocation.
pub fn send(
    e: &Env,
    payment_token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), SubscriptionError> {
    let client = token::TokenClient::new(e, payment_token);
    match client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(e, "payment transfer failed", to.clone(), amount);
            Err(SubscriptionError::TransferFailed)
        }
    }
}

/// Payment token balance held by this contract.
pub fn custody_balance(e: &Env, payment_token: &Address) -> i128 {
    token::TokenClient::new(e, payment_token).balance(&e.current_contract_address())
}
