//! Core trait definitions for the MANDATE execution pipeline.
//!
//! These traits define the complete trust boundary around the gateway:
//!
//! - `StateStore`         — the single shared, serialized key-value store
//! - `Clock`              — the time source for expiration checks
//! - `LedgerAdapter`      — a concrete ledger's mutation capability surface
//! - `ClaimEncoder`       — deterministic authorization-request digests
//! - `SignatureRecovery`  — signer identity recovery from digest + signature
//! - `ClaimRegistry`      — the one-way claim lifecycle (replay protection)
//! - `EffectWriter`       — the ordered log of applied state changes
//!
//! The gateway wires them together in the correct order. No adapter call is
//! ever made until every verification collaborator has passed.

use chrono::{DateTime, Utc};

use mandate_contracts::{
    ability::Abilities,
    account::{AccountId, AssetId, Digest, LedgerId},
    action::Order,
    capability::LedgerCapabilities,
    claim::{Approval, ClaimState},
    effect::EffectRecord,
    error::MandateResult,
    signature::Signature,
};

/// A key into the shared state store.
///
/// Every piece of global state — ability masks, claim states, operator
/// approvals, ledger bookkeeping — lives under one of these keys, so a
/// single store checkpoint covers the whole system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// An account's ability mask on a ledger.
    AbilityMask { ledger: LedgerId, account: AccountId },
    /// The bootstrap owner of a ledger.
    LedgerOwner { ledger: LedgerId },
    /// Lifecycle state of a claim digest.
    ClaimState { digest: Digest },
    /// Gateway-scoped operator approval flag.
    OperatorApproval { owner: AccountId, operator: AccountId },
    /// Owner of an asset.
    AssetOwner { ledger: LedgerId, asset: AssetId },
    /// Imprint (content commitment) of an asset.
    AssetImprint { ledger: LedgerId, asset: AssetId },
    /// Fungible balance of an account.
    Balance { ledger: LedgerId, account: AccountId },
    /// Whether transfers on a ledger are paused.
    TransfersPaused { ledger: LedgerId },
    /// The ledger's URI template (prefix, postfix).
    UriTemplate { ledger: LedgerId },
}

/// A rollback mark returned by `StateStore::checkpoint`.
///
/// Opaque to callers; only meaningful to the store that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Construct a mark at the given undo-log depth.
    pub const fn at_depth(depth: usize) -> Self {
        Checkpoint(depth)
    }

    /// The undo-log depth this mark refers to.
    pub const fn depth(&self) -> usize {
        self.0
    }
}

/// The single shared, sequentially consistent key-value store.
///
/// Implementations serialize every operation; there is no internal
/// concurrency to reason about. `checkpoint`/`rollback` are the atomicity
/// primitive: the gateway takes a checkpoint before applying an order and
/// rolls back to it if any action fails, discarding every write made in
/// between.
pub trait StateStore: Send + Sync {
    /// Read the value under `key`, if any.
    fn get(&self, key: &StoreKey) -> Option<Vec<u8>>;

    /// Write `value` under `key`, replacing any existing value.
    fn put(&self, key: StoreKey, value: Vec<u8>);

    /// Delete the value under `key`, if any.
    fn remove(&self, key: &StoreKey);

    /// Take a rollback mark covering all writes made after this call.
    fn checkpoint(&self) -> Checkpoint;

    /// Undo every write made since `mark` was taken.
    fn rollback(&self, mark: Checkpoint);
}

/// The time source used for claim expiration checks.
///
/// Injected so expiration behavior is testable; production wiring uses the
/// system clock.
pub trait Clock: Send + Sync {
    /// The current wall-clock time (UTC).
    fn now(&self) -> DateTime<Utc>;
}

/// A concrete ledger's mutation capability surface.
///
/// Invoked by the gateway after all verification has passed, and by nothing
/// else. Each call either applies its effect completely and returns `Ok`,
/// or fails with a ledger error and applies nothing. Implementations do not
/// re-check ability grants — that is the gateway's job — but they do
/// enforce their own structural rules: asset existence, ownership, balance
/// sufficiency, pause state, and declared optional capabilities.
pub trait LedgerAdapter: Send + Sync {
    /// The ledger this adapter mutates.
    fn ledger_id(&self) -> LedgerId;

    /// The optional feature sets this ledger instance supports.
    fn capabilities(&self) -> LedgerCapabilities;

    /// Create a new asset owned by `receiver`, committing to `imprint`.
    fn create(&self, receiver: AccountId, asset: AssetId, imprint: Digest) -> MandateResult<()>;

    /// Destroy an asset. `owner` must own it; requires the burnable
    /// capability.
    fn destroy(&self, owner: AccountId, asset: AssetId) -> MandateResult<()>;

    /// Revoke (reclaim) an asset regardless of owner consent; requires the
    /// revokable capability.
    fn revoke_asset(&self, asset: AssetId) -> MandateResult<()>;

    /// Move an asset from `sender` to `receiver`.
    fn transfer(&self, sender: AccountId, receiver: AccountId, asset: AssetId)
        -> MandateResult<()>;

    /// Move a fungible amount from `sender` to `receiver`.
    fn transfer_value(
        &self,
        sender: AccountId,
        receiver: AccountId,
        amount: u128,
    ) -> MandateResult<()>;

    /// Overwrite `account`'s full ability mask on this ledger.
    fn set_abilities(&self, account: AccountId, abilities: Abilities) -> MandateResult<()>;

    /// Set the ledger's URI template.
    fn set_uri(&self, prefix: String, postfix: String) -> MandateResult<()>;

    /// Pause or resume transfers; requires the pausable capability.
    fn set_pause(&self, paused: bool) -> MandateResult<()>;
}

/// Deterministic encoding of authorization requests into claim digests.
///
/// Encoding is a pure function of the field list in the documented order;
/// the gateway identity is always the first encoded field, binding every
/// claim to one gateway deployment. Any change to field order or type
/// changes the digest and invalidates previously issued signatures — the
/// ordering is a wire contract, not an implementation detail.
pub trait ClaimEncoder: Send + Sync {
    /// Digest of a batched order claim.
    fn order_digest(
        &self,
        gateway: AccountId,
        order: &Order,
        expiration: DateTime<Utc>,
        seed: u64,
    ) -> Digest;

    /// Digest of an approval-style claim.
    fn approval_digest(&self, gateway: AccountId, approval: &Approval) -> Digest;
}

/// Recovery of a signer identity from a digest and a signature.
///
/// `recover` is deterministic: the same (digest, signature) pair always
/// yields the same account. A corrupted signature recovers either no
/// account or the wrong one — callers compare against the expected signer.
pub trait SignatureRecovery: Send + Sync {
    /// Recover the signing account.
    fn recover(&self, digest: &Digest, signature: &Signature) -> MandateResult<AccountId>;

    /// True if `signature` over `digest` recovers exactly `expected`.
    fn verify(&self, expected: AccountId, digest: &Digest, signature: &Signature) -> bool {
        matches!(self.recover(digest, signature), Ok(account) if account == expected)
    }
}

/// The one-way claim lifecycle: replay protection for redeemed and
/// cancelled claims.
///
/// `mark_performed` and `mark_cancelled` are mutually exclusive and fail on
/// the second call after either has succeeded.
pub trait ClaimRegistry: Send + Sync {
    /// Where the digest is in its lifecycle. Absent digests are `Unclaimed`.
    fn state(&self, digest: &Digest) -> ClaimState;

    /// Transition `Unclaimed → Performed`. Fails with
    /// `ClaimAlreadyPerformed` if already performed and `ClaimCancelled` if
    /// cancelled.
    fn mark_performed(&self, digest: &Digest) -> MandateResult<()>;

    /// Transition `Unclaimed → Cancelled`. Fails with `NotOwner` when
    /// `authorized_by` is not `owner`, `ClaimAlreadyPerformed` if the claim
    /// was redeemed, and `ClaimCancelled` if already cancelled.
    fn mark_cancelled(
        &self,
        digest: &Digest,
        authorized_by: AccountId,
        owner: AccountId,
    ) -> MandateResult<()>;
}

/// The ordered log of applied state changes.
///
/// A failed append is fatal for the operation that produced the record: the
/// gateway rolls the whole order back rather than commit unobservable
/// effects.
pub trait EffectWriter: Send + Sync {
    /// Append one effect record.
    fn append(&self, record: &EffectRecord) -> MandateResult<()>;
}
