//! The unified error type for the MANDATE gateway and its collaborators.
//!
//! All fallible operations return `MandateResult<T>`. Verification failures
//! carry enough context to produce actionable log entries; none of them is
//! ever silently swallowed, and there is no retry inside the core — a
//! relayer that wants to retry submits a fresh operation which re-runs the
//! full verification path.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    ability::Abilities,
    account::{AccountId, AssetId, LedgerId},
};

/// The unified error type.
#[derive(Debug, Error)]
pub enum MandateError {
    /// A signature did not recover to the expected signer.
    #[error("signature did not verify for signer {signer}")]
    InvalidSignature { signer: AccountId },

    /// An unrecognized signature kind tag. Always fatal; there is no
    /// fallback encoding.
    #[error("unrecognized signature kind tag {tag}")]
    InvalidSignatureKind { tag: u8 },

    /// The claim was already redeemed.
    #[error("claim has already been performed")]
    ClaimAlreadyPerformed,

    /// The claim was cancelled by its owner.
    #[error("claim has been cancelled")]
    ClaimCancelled,

    /// The claim's absolute expiration has passed.
    #[error("claim expired at {expired_at}")]
    ClaimExpired { expired_at: DateTime<Utc> },

    /// The account lacks every acceptable ability bit for the operation.
    #[error("account {account} is not authorized on ledger {ledger} (requires {required})")]
    Unauthorized {
        account: AccountId,
        ledger: LedgerId,
        required: Abilities,
    },

    /// The ledger does not support an optional feature.
    #[error("ledger {ledger} does not support {capability}")]
    CapabilityNotSupported { ledger: LedgerId, capability: String },

    /// Transfers on the ledger are paused.
    #[error("transfers are disabled on ledger {ledger}")]
    TransferDisabled { ledger: LedgerId },

    /// The account neither owns the asset nor is an approved operator of
    /// its owner.
    #[error("account {account} is neither owner nor an approved operator of asset {asset}")]
    NotOwnerOrOperator { account: AccountId, asset: AssetId },

    /// A zero account id was supplied where a concrete account is required.
    #[error("a zero account id was supplied where a concrete account is required")]
    InvalidAccount,

    /// Asset creation collided with an existing id.
    #[error("asset {asset} already exists")]
    AssetAlreadyExists { asset: AssetId },

    /// The asset id does not exist on the ledger.
    #[error("asset {asset} does not exist")]
    InvalidAsset { asset: AssetId },

    /// Claim cancellation was attempted by an account that does not own the
    /// claim.
    #[error("account {account} is not the claim owner")]
    NotOwner { account: AccountId },

    /// A value transfer exceeded the sender's balance.
    #[error("account {account} holds {available} but the transfer requires {required}")]
    InsufficientBalance {
        account: AccountId,
        required: u128,
        available: u128,
    },

    /// No ledger adapter is registered under the action's target id.
    #[error("no ledger is registered under id {ledger}")]
    UnknownLedger { ledger: LedgerId },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The effect journal could not persist a record.
    ///
    /// Treated as fatal — an effect that cannot be journaled is rolled back
    /// together with the rest of its order.
    #[error("journal write failed: {reason}")]
    JournalWriteFailed { reason: String },
}

/// Convenience alias used throughout the MANDATE crates.
pub type MandateResult<T> = Result<T, MandateError>;
