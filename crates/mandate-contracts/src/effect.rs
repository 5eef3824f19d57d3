//! Effect records: the ordered log of applied state changes.
//!
//! Each successfully applied action produces exactly one `EffectRecord`;
//! approval redemptions and direct operations produce one as well. Records
//! are consumed by observers for indexing and notification, and by the
//! effect journal which chains them into a tamper-evident log.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{AccountId, LedgerId};

/// Identifier correlating every record produced by one gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DispatchId(pub uuid::Uuid);

impl DispatchId {
    /// Create a new, unique dispatch ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for DispatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The category of state change a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    AssetCreated,
    AssetTransferred,
    ValueTransferred,
    AbilitiesSet,
    AssetDestroyed,
    AssetRevoked,
    ApprovalForAll,
    TransfersToggled,
    UriUpdated,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectKind::AssetCreated => "asset-created",
            EffectKind::AssetTransferred => "asset-transferred",
            EffectKind::ValueTransferred => "value-transferred",
            EffectKind::AbilitiesSet => "abilities-set",
            EffectKind::AssetDestroyed => "asset-destroyed",
            EffectKind::AssetRevoked => "asset-revoked",
            EffectKind::ApprovalForAll => "approval-for-all",
            EffectKind::TransfersToggled => "transfers-toggled",
            EffectKind::UriUpdated => "uri-updated",
        };
        f.write_str(name)
    }
}

/// One applied state change.
///
/// `subjects` lists the accounts the change concerns, in a kind-specific
/// order (e.g. `[sender, receiver]` for transfers, `[owner, operator]` for
/// approvals). `payload` carries the kind-specific detail as plain JSON so
/// observers need no knowledge of the full contract type set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectRecord {
    /// The gateway call that produced this record.
    pub dispatch: DispatchId,
    /// What happened.
    pub kind: EffectKind,
    /// The ledger the change applied to (the gateway's own id for
    /// gateway-scoped changes such as operator approvals).
    pub ledger: LedgerId,
    /// The accounts concerned, in kind-specific order.
    pub subjects: Vec<AccountId>,
    /// Kind-specific detail.
    pub payload: serde_json::Value,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}
