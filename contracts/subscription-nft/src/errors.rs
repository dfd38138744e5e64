use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum NonFungibleTokenError {
    /// Indicates a non-existent `token_id`.
    NonExistentToken = 200,
    /// Indicates the token was already minted.
    TokenAlreadyMinted = 210,
    /// Indicates the collection metadata was never set.
    UnsetMetadata = 213,
    /// Indicates an attempt to move a minted token away from its holder.
    TokenNonTransferable = 215,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SubscriptionError {
    /// A requested or configured duration is zero, outside the configured
    /// bounds, misorders min/max/cap, or would breach the accumulation cap.
    InvalidDuration = 300,
    /// The payment does not exactly match the subscription cost.
    InvalidPayment = 301,
    /// The price per second is negative.
    InvalidPrice = 302,
    /// An address that can never receive funds or act as admin was supplied.
    InvalidAddress = 303,
    /// An outbound token transfer did not succeed.
    TransferFailed = 304,
    /// A guarded entry point was entered while another one is in flight.
    Reentrancy = 305,
    /// Indicates overflow when multiplying or adding two values.
    MathOverflow = 306,
    /// `accept_admin` was called without a pending proposal.
    NoPendingAdmin = 307,
    /// Configuration read before the constructor ran.
    NotInitialized = 308,
}
