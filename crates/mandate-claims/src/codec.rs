//! Claim digest encoding: deterministic byte sequences fed into Keccak-256.
//!
//! Every field that contributes to a digest is listed explicitly so nothing
//! is accidentally omitted, and the gateway identity always comes first —
//! a claim signed for one gateway deployment can never be replayed against
//! another. Changing field order or width changes every digest and
//! invalidates all previously issued signatures; this layout is a wire
//! contract.
//!
//! Approval digest input layout (bytes, in order):
//!   1. gateway as 20 raw bytes
//!   2. owner as 20 raw bytes
//!   3. operator as 20 raw bytes
//!   4. approved as 1 byte (0 or 1)
//!   5. fee_token as 20 raw bytes
//!   6. fee_value as 16-byte big-endian
//!   7. fee_recipient as 20 raw bytes
//!   8. seed as 8-byte big-endian
//!   9. expiration as Unix seconds, 8-byte big-endian (signed)
//!
//! Order digest input layout (bytes, in order):
//!   1. gateway as 20 raw bytes
//!   2. each action, in sequence (see below)
//!   3. each signer as 20 raw bytes, in list order
//!   4. payer as 20 raw bytes
//!   5. seed as 8-byte big-endian
//!   6. expiration as Unix seconds, 8-byte big-endian (signed)
//!
//! Each action starts with its 1-byte kind tag and its 20-byte target
//! ledger, followed by the kind-specific fields:
//!   tag 1 create-asset:   receiver 20B, asset 8B BE, imprint 32B
//!   tag 2 transfer-asset: sender 20B, receiver 20B, asset 8B BE
//!   tag 3 transfer-value: sender 20B, receiver 20B, amount 16B BE
//!   tag 5 set-abilities:  target 20B, abilities 4B BE
//!   tag 6 destroy-asset:  owner 20B, asset 8B BE
//! (Tag 4 is reserved and never encoded.)

use chrono::{DateTime, Utc};
use sha3::{Digest as _, Keccak256};

use mandate_contracts::{
    account::{AccountId, Digest},
    action::{Action, Order},
    claim::Approval,
};
use mandate_core::traits::ClaimEncoder;

/// Keccak-256 of `bytes`.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    Keccak256::digest(bytes).into()
}

/// The production claim codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeccakClaimCodec;

impl KeccakClaimCodec {
    fn encode_action(buf: &mut Vec<u8>, action: &Action) {
        buf.push(action.kind().tag());
        buf.extend_from_slice(action.ledger().0.as_bytes());
        match action {
            Action::CreateAsset {
                receiver,
                asset,
                imprint,
                ..
            } => {
                buf.extend_from_slice(receiver.as_bytes());
                buf.extend_from_slice(&asset.0.to_be_bytes());
                buf.extend_from_slice(imprint.as_bytes());
            }
            Action::TransferAsset {
                sender,
                receiver,
                asset,
                ..
            } => {
                buf.extend_from_slice(sender.as_bytes());
                buf.extend_from_slice(receiver.as_bytes());
                buf.extend_from_slice(&asset.0.to_be_bytes());
            }
            Action::TransferValue {
                sender,
                receiver,
                amount,
                ..
            } => {
                buf.extend_from_slice(sender.as_bytes());
                buf.extend_from_slice(receiver.as_bytes());
                buf.extend_from_slice(&amount.to_be_bytes());
            }
            Action::SetAbilities {
                target, abilities, ..
            } => {
                buf.extend_from_slice(target.as_bytes());
                buf.extend_from_slice(&abilities.bits().to_be_bytes());
            }
            Action::DestroyAsset { owner, asset, .. } => {
                buf.extend_from_slice(owner.as_bytes());
                buf.extend_from_slice(&asset.0.to_be_bytes());
            }
        }
    }
}

impl ClaimEncoder for KeccakClaimCodec {
    fn order_digest(
        &self,
        gateway: AccountId,
        order: &Order,
        expiration: DateTime<Utc>,
        seed: u64,
    ) -> Digest {
        let mut buf = Vec::with_capacity(20 + order.actions.len() * 96 + order.signers.len() * 20);
        buf.extend_from_slice(gateway.as_bytes());
        for action in &order.actions {
            Self::encode_action(&mut buf, action);
        }
        for signer in &order.signers {
            buf.extend_from_slice(signer.as_bytes());
        }
        buf.extend_from_slice(order.payer.as_bytes());
        buf.extend_from_slice(&seed.to_be_bytes());
        buf.extend_from_slice(&expiration.timestamp().to_be_bytes());
        Digest(keccak256(&buf))
    }

    fn approval_digest(&self, gateway: AccountId, approval: &Approval) -> Digest {
        let mut buf = Vec::with_capacity(20 * 4 + 1 + 16 + 8 + 8);
        buf.extend_from_slice(gateway.as_bytes());
        buf.extend_from_slice(approval.owner.as_bytes());
        buf.extend_from_slice(approval.operator.as_bytes());
        buf.push(approval.approved as u8);
        buf.extend_from_slice(approval.fee_token.0.as_bytes());
        buf.extend_from_slice(&approval.fee_value.to_be_bytes());
        buf.extend_from_slice(approval.fee_recipient.as_bytes());
        buf.extend_from_slice(&approval.seed.to_be_bytes());
        buf.extend_from_slice(&approval.expiration.timestamp().to_be_bytes());
        Digest(keccak256(&buf))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
