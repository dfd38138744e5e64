//! Pricing and duration policy.

use soroban_sdk::{contracttype, log, Address, Env};

use crate::errors::SubscriptionError;

/// Admin-controlled subscription policy, stored as one instance entry.
///
/// Invariants, checked together by [`Policy::validate`]:
/// * `0 < min_duration <= max_duration <= max_accumulated_duration`
/// * `price_per_second >= 0`
/// * `funds_recipient` is not the payment token contract
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Policy {
    /// Cost of one second of subscription, in payment token base units.
    pub price_per_second: i128,
    /// Shortest duration a single `subscribe` call may buy, in seconds.
    pub min_duration: u64,
    /// Longest duration a single `subscribe` call may buy, in seconds.
    pub max_duration: u64,
    /// Ceiling on the remaining time an account may hold at once, in seconds.
    pub max_accumulated_duration: u64,
    /// Receives payments. The contract's own address means funds are kept
    /// in custody until `withdraw`.
    pub funds_recipient: Address,
}

impl Policy {
    /// Checks every cross-field invariant at once.
    ///
    /// Duration invariants come first, then price, then recipient, so the
    /// reported error is the same regardless of which setter produced the
    /// candidate.
    pub fn validate(&self, e: &Env, payment_token: &Address) -> Result<(), SubscriptionError> {
        if self.min_duration == 0 || self.max_duration == 0 {
            log!(e, "zero duration bound", self.min_duration, self.max_duration);
            return Err(SubscriptionError::InvalidDuration);
        }
        if self.min_duration > self.max_duration {
            log!(e, "min duration above max", self.min_duration, self.max_duration);
            return Err(SubscriptionError::InvalidDuration);
        }
        if self.max_duration > self.max_accumulated_duration {
            log!(
                e,
                "max duration above accumulation cap",
                self.max_duration,
                self.max_accumulated_duration
            );
            return Err(SubscriptionError::InvalidDuration);
        }
        if self.price_per_second < 0 {
            log!(e, "negative price", self.price_per_second);
            return Err(SubscriptionError::InvalidPrice);
        }
        if &self.funds_recipient == payment_token {
            log!(e, "funds recipient is the payment token", self.funds_recipient.clone());
            return Err(SubscriptionError::InvalidAddress);
        }
        Ok(())
    }

    /// Rejects `duration` outside `[min_duration, max_duration]`.
    pub fn check_duration(&self, e: &Env, duration: u64) -> Result<(), SubscriptionError> {
        if duration < self.min_duration || duration > self.max_duration {
            log!(e, "duration out of bounds", duration, self.min_duration, self.max_duration);
            return Err(SubscriptionError::InvalidDuration);
        }
        Ok(())
    }

    /// Price of `duration` seconds, after the bounds check.
    pub fn cost(&self, e: &Env, duration: u64) -> Result<i128, SubscriptionError> {
        self.check_duration(e, duration)?;
        i128::from(duration)
            .checked_mul(self.price_per_second)
            .ok_or(SubscriptionError::MathOverflow)
    }

    /// Whether payments land in the contract's own balance.
    pub fn retains_funds(&self, e: &Env) -> bool {
        self.funds_recipient == e.current_contract_address()
    }
}
