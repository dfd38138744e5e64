//! Reentrancy guard for entry points that hand control to the payment token.

use soroban_sdk::{log, Env};

use crate::errors::SubscriptionError;
use crate::storage::DataKey;

pub fn is_entered(e: &Env) -> bool {
    e.storage().instance().has(&DataKey::Entered)
}

/// Runs `f` with the guard flag held. A nested call fails immediately with
/// [`SubscriptionError::Reentrancy`]. The flag is cleared on both the success
/// and the error path; a panic rolls the whole invocation back, flag included.
pub fn non_reentrant<T>(
    e: &Env,
    f: impl FnOnce() -> Result<T, SubscriptionError>,
) -> Result<T, SubscriptionError> {
    if is_entered(e) {
        log!(e, "reentrant call rejected");
        return Err(SubscriptionError::Reentrancy);
    }
    e.storage().instance().set(&DataKey::Entered, &true);
    let result = f();
    e.storage().instance().remove(&DataKey::Entered);
    result
}
