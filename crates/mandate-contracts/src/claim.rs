//! Claim lifecycle state and the approval-style authorization request.
//!
//! A claim is the digest of an authorization request, tracked through a
//! one-way lifecycle to prevent replay: `Unclaimed → Performed` or
//! `Unclaimed → Cancelled`, both terminal. Performing a cancelled claim
//! fails, cancelling a performed claim fails, and repeating either
//! transition fails on the second call.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{AccountId, LedgerId};

/// Where a claim digest is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimState {
    /// Never performed, never cancelled. The only state from which either
    /// transition is legal.
    Unclaimed,
    /// Redeemed exactly once. Terminal.
    Performed,
    /// Invalidated by its owner before redemption. Terminal.
    Cancelled,
}

impl ClaimState {
    /// Storage tag. `Unclaimed` is the implicit state of an absent entry and
    /// has no tag of its own.
    pub const fn to_byte(self) -> u8 {
        match self {
            ClaimState::Unclaimed => 0,
            ClaimState::Performed => 1,
            ClaimState::Cancelled => 2,
        }
    }

    /// Decode a storage tag; anything unrecognized reads as `Unclaimed`,
    /// which is the safe direction only because `Unclaimed` entries are
    /// never written in the first place.
    pub const fn from_byte(byte: u8) -> ClaimState {
        match byte {
            1 => ClaimState::Performed,
            2 => ClaimState::Cancelled,
            _ => ClaimState::Unclaimed,
        }
    }
}

impl fmt::Display for ClaimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimState::Unclaimed => "unclaimed",
            ClaimState::Performed => "performed",
            ClaimState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// An approval-style authorization: `owner` grants (or withdraws) operator
/// status to `operator`, optionally paying `fee_value` of `fee_token` to
/// `fee_recipient` when a relayer redeems the claim.
///
/// The owner signs the claim digest off the critical path; any relayer may
/// later submit it to the gateway, which verifies the signature and redeems
/// the claim exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    /// The account granting operator status. Must be the claim's signer.
    pub owner: AccountId,
    /// The account being approved (or unapproved).
    pub operator: AccountId,
    /// True to grant, false to withdraw.
    pub approved: bool,
    /// Value ledger the relayer fee is paid in.
    pub fee_token: LedgerId,
    /// Relayer fee; zero means no fee transfer.
    pub fee_value: u128,
    /// Recipient of the relayer fee.
    pub fee_recipient: AccountId,
    /// Caller-chosen value making the digest unique across otherwise
    /// identical approvals.
    pub seed: u64,
    /// Absolute expiration; the claim is unredeemable afterwards.
    pub expiration: DateTime<Utc>,
}
