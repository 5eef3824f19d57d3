//! The MANDATE gateway: the claim-verified, proxy-gated, atomic order
//! dispatcher.
//!
//! The gateway enforces the execution model:
//!
//!   Digest → Expiration → Claim state → Signatures → Wildcards →
//!   Submission right → Sender consent → Proxy abilities → [apply] → Journal
//!
//! The verification invariant is absolute: no `LedgerAdapter` call is made
//! until every verification step has passed for *every* action in the
//! order. The apply phase runs inside a store checkpoint; if any action
//! fails, every effect of the order — including those of already-applied
//! preceding actions — is rolled back, nothing is marked performed, and the
//! store is left exactly as it was. Partial application of an order is
//! never observable.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use mandate_contracts::{
    account::{AccountId, Digest, LedgerId},
    action::{Action, Order},
    claim::{Approval, ClaimState},
    effect::{DispatchId, EffectKind, EffectRecord},
    error::{MandateError, MandateResult},
    signature::Signature,
};

use crate::{
    proxy::ProxyTable,
    registry::AbilityRegistry,
    traits::{
        ClaimEncoder, ClaimRegistry, Clock, EffectWriter, LedgerAdapter, SignatureRecovery,
        StateStore, StoreKey,
    },
};

/// The order dispatcher.
///
/// Construct one gateway per deployment identity. The identity is the first
/// field of every claim digest, so a claim signed for one gateway can never
/// be replayed against another.
pub struct Gateway {
    id: AccountId,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    encoder: Arc<dyn ClaimEncoder>,
    recovery: Arc<dyn SignatureRecovery>,
    claims: Arc<dyn ClaimRegistry>,
    effects: Arc<dyn EffectWriter>,
    proxies: ProxyTable,
    registry: AbilityRegistry,
    ledgers: HashMap<LedgerId, Arc<dyn LedgerAdapter>>,
}

impl Gateway {
    /// Create a gateway with the given identity and trusted collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: AccountId,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        encoder: Arc<dyn ClaimEncoder>,
        recovery: Arc<dyn SignatureRecovery>,
        claims: Arc<dyn ClaimRegistry>,
        effects: Arc<dyn EffectWriter>,
        proxies: ProxyTable,
    ) -> Self {
        let registry = AbilityRegistry::new(store.clone());
        Self {
            id,
            store,
            clock,
            encoder,
            recovery,
            claims,
            effects,
            proxies,
            registry,
            ledgers: HashMap::new(),
        }
    }

    /// The gateway's deployment identity.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// The ability registry backed by this gateway's store.
    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    /// Register the adapter for one target ledger. Orders naming an
    /// unregistered ledger fail verification with `UnknownLedger`.
    pub fn register_ledger(&mut self, adapter: Arc<dyn LedgerAdapter>) {
        self.ledgers.insert(adapter.ledger_id(), adapter);
    }

    /// Where `digest` is in its claim lifecycle.
    pub fn performedness(&self, digest: &Digest) -> ClaimState {
        self.claims.state(digest)
    }

    /// True if `owner` has approved `operator` to relay its orders.
    pub fn is_approved(&self, owner: AccountId, operator: AccountId) -> bool {
        self.store
            .get(&StoreKey::OperatorApproval { owner, operator })
            .map(|bytes| bytes == [1])
            .unwrap_or(false)
    }

    // ── Order execution ───────────────────────────────────────────────────────

    /// Execute an order atomically.
    ///
    /// `caller` is the submitting account (a relayer, the payer, or one of
    /// the signers). On success, returns one effect record per applied
    /// action, in order, and the order's claim is marked performed. On any
    /// failure — verification or apply — no state changes and the claim
    /// stays unclaimed.
    pub fn execute(
        &self,
        caller: AccountId,
        order: &Order,
        signatures: &[Signature],
        expiration: DateTime<Utc>,
        seed: u64,
    ) -> MandateResult<Vec<EffectRecord>> {
        // ── Step 1: Claim digest ──────────────────────────────────────────────
        let digest = self.encoder.order_digest(self.id, order, expiration, seed);

        debug!(
            gateway = %self.id,
            caller = %caller,
            digest = %digest,
            actions = order.actions.len(),
            "order execution starting"
        );

        // ── Step 2: Expiration — before any state read or write ───────────────
        self.check_expiration(expiration)?;

        // ── Step 3: Claim freshness ───────────────────────────────────────────
        self.check_unclaimed(&digest)?;

        // ── Step 4: Structure and signatures ──────────────────────────────────
        if order.payer.is_zero() || order.signers.iter().any(AccountId::is_zero) {
            return Err(MandateError::InvalidAccount);
        }
        if signatures.len() != order.signers.len() {
            warn!(
                digest = %digest,
                signers = order.signers.len(),
                signatures = signatures.len(),
                "signature count does not match signer count"
            );
            return Err(MandateError::InvalidSignature {
                signer: AccountId::ZERO,
            });
        }
        for (signer, signature) in order.signers.iter().zip(signatures) {
            if !self.recovery.verify(*signer, &digest, signature) {
                warn!(digest = %digest, signer = %signer, "signature verification failed");
                return Err(MandateError::InvalidSignature { signer: *signer });
            }
        }

        // Wildcard resolution: zero slots are filled with the caller, who
        // must be one of the order's signers.
        let resolved = self.resolve_wildcards(caller, order)?;

        // Submission right: without automated_perform only the payer may
        // submit the order.
        if !order.automated_perform && caller != order.payer {
            warn!(digest = %digest, caller = %caller, payer = %order.payer, "submission denied");
            return Err(MandateError::NotOwner { account: caller });
        }

        // ── Step 5: Sender consent and proxy abilities, for every action ──────
        //
        // All verification completes before the first adapter call.
        let mut adapters: Vec<Arc<dyn LedgerAdapter>> = Vec::with_capacity(resolved.len());
        for action in &resolved {
            self.check_sender_consent(caller, order, action)?;
            adapters.push(self.check_proxy_grant(action)?);
        }

        // ── Step 6: Apply, all-or-nothing ─────────────────────────────────────
        let dispatch = DispatchId::new();
        let mark = self.store.checkpoint();

        let mut records = Vec::with_capacity(resolved.len());
        for (action, adapter) in resolved.iter().zip(&adapters) {
            if let Err(e) = self.apply_action(adapter.as_ref(), action) {
                warn!(
                    digest = %digest,
                    kind = %action.kind(),
                    ledger = %action.ledger(),
                    error = %e,
                    "action failed, rolling back order"
                );
                self.store.rollback(mark);
                return Err(e);
            }
            records.push(self.effect_for(dispatch, action));
        }

        if let Err(e) = self.claims.mark_performed(&digest) {
            self.store.rollback(mark);
            return Err(e);
        }

        for record in &records {
            if let Err(e) = self.effects.append(record) {
                self.store.rollback(mark);
                return Err(e);
            }
        }

        info!(
            gateway = %self.id,
            digest = %digest,
            dispatch = %dispatch,
            actions = records.len(),
            "order performed"
        );
        Ok(records)
    }

    /// Cancel an order claim before it is performed.
    ///
    /// Any listed signer may cancel; everyone else gets `NotOwner`.
    pub fn cancel_order(
        &self,
        caller: AccountId,
        order: &Order,
        expiration: DateTime<Utc>,
        seed: u64,
    ) -> MandateResult<()> {
        let digest = self.encoder.order_digest(self.id, order, expiration, seed);
        if !order.signers.contains(&caller) {
            warn!(digest = %digest, caller = %caller, "cancellation denied: not a signer");
            return Err(MandateError::NotOwner { account: caller });
        }
        self.claims.mark_cancelled(&digest, caller, caller)?;
        info!(gateway = %self.id, digest = %digest, "order claim cancelled");
        Ok(())
    }

    // ── Approval claims ───────────────────────────────────────────────────────

    /// Redeem an approval-style claim: set or clear an operator approval on
    /// behalf of its signer, paying the relayer fee if one is specified.
    ///
    /// Any caller may submit — that is the point of the meta-transaction —
    /// but the signature must recover to `approval.owner`.
    pub fn perform_approval(
        &self,
        caller: AccountId,
        approval: &Approval,
        signature: &Signature,
    ) -> MandateResult<EffectRecord> {
        if approval.owner.is_zero() || approval.operator.is_zero() {
            return Err(MandateError::InvalidAccount);
        }
        if approval.fee_value > 0 && approval.fee_recipient.is_zero() {
            return Err(MandateError::InvalidAccount);
        }

        let digest = self.encoder.approval_digest(self.id, approval);

        debug!(
            gateway = %self.id,
            caller = %caller,
            digest = %digest,
            owner = %approval.owner,
            operator = %approval.operator,
            "approval redemption starting"
        );

        self.check_expiration(approval.expiration)?;
        self.check_unclaimed(&digest)?;

        if !self.recovery.verify(approval.owner, &digest, signature) {
            warn!(digest = %digest, owner = %approval.owner, "approval signature verification failed");
            return Err(MandateError::InvalidSignature {
                signer: approval.owner,
            });
        }

        let dispatch = DispatchId::new();
        let mark = self.store.checkpoint();

        if approval.fee_value > 0 {
            let adapter = self.adapter_for(approval.fee_token)?;
            if let Err(e) =
                adapter.transfer_value(approval.owner, approval.fee_recipient, approval.fee_value)
            {
                warn!(digest = %digest, error = %e, "fee transfer failed, rolling back approval");
                self.store.rollback(mark);
                return Err(e);
            }
        }

        self.store.put(
            StoreKey::OperatorApproval {
                owner: approval.owner,
                operator: approval.operator,
            },
            vec![approval.approved as u8],
        );

        if let Err(e) = self.claims.mark_performed(&digest) {
            self.store.rollback(mark);
            return Err(e);
        }

        let record = EffectRecord {
            dispatch,
            kind: EffectKind::ApprovalForAll,
            ledger: LedgerId(self.id),
            subjects: vec![approval.owner, approval.operator],
            payload: json!({
                "approved": approval.approved,
                "fee_value": approval.fee_value.to_string(),
            }),
            timestamp: self.clock.now(),
        };
        if let Err(e) = self.effects.append(&record) {
            self.store.rollback(mark);
            return Err(e);
        }

        info!(
            gateway = %self.id,
            digest = %digest,
            owner = %approval.owner,
            operator = %approval.operator,
            approved = approval.approved,
            "approval performed"
        );
        Ok(record)
    }

    /// Cancel an approval claim before it is redeemed. Only the approval's
    /// owner may cancel.
    pub fn cancel_approval(&self, caller: AccountId, approval: &Approval) -> MandateResult<()> {
        let digest = self.encoder.approval_digest(self.id, approval);
        self.claims.mark_cancelled(&digest, caller, approval.owner)?;
        info!(gateway = %self.id, digest = %digest, "approval claim cancelled");
        Ok(())
    }

    /// Set or clear an operator approval directly, without a claim. The
    /// caller approves on its own behalf only.
    pub fn set_approval_direct(
        &self,
        caller: AccountId,
        operator: AccountId,
        approved: bool,
    ) -> MandateResult<EffectRecord> {
        if caller.is_zero() || operator.is_zero() {
            return Err(MandateError::InvalidAccount);
        }

        self.store.put(
            StoreKey::OperatorApproval {
                owner: caller,
                operator,
            },
            vec![approved as u8],
        );

        let record = EffectRecord {
            dispatch: DispatchId::new(),
            kind: EffectKind::ApprovalForAll,
            ledger: LedgerId(self.id),
            subjects: vec![caller, operator],
            payload: json!({ "approved": approved, "fee_value": "0" }),
            timestamp: self.clock.now(),
        };
        self.effects.append(&record)?;
        Ok(record)
    }

    // ── Verification helpers ──────────────────────────────────────────────────

    fn check_expiration(&self, expiration: DateTime<Utc>) -> MandateResult<()> {
        let now = self.clock.now();
        if expiration < now {
            warn!(expired_at = %expiration, now = %now, "claim expired");
            return Err(MandateError::ClaimExpired {
                expired_at: expiration,
            });
        }
        Ok(())
    }

    fn check_unclaimed(&self, digest: &Digest) -> MandateResult<()> {
        match self.claims.state(digest) {
            ClaimState::Unclaimed => Ok(()),
            ClaimState::Performed => Err(MandateError::ClaimAlreadyPerformed),
            ClaimState::Cancelled => Err(MandateError::ClaimCancelled),
        }
    }

    /// Fill unspecified sender/receiver slots with the caller.
    ///
    /// Requires `wildcard_signer` and the caller to be a listed signer;
    /// without the flag any zero slot is `InvalidAccount`.
    fn resolve_wildcards(&self, caller: AccountId, order: &Order) -> MandateResult<Vec<Action>> {
        let needs_fill = order.actions.iter().any(Action::has_unspecified_party);
        if !needs_fill {
            return Ok(order.actions.clone());
        }
        if !order.wildcard_signer {
            return Err(MandateError::InvalidAccount);
        }
        if !order.signers.contains(&caller) {
            warn!(caller = %caller, "wildcard fill denied: caller is not a signer");
            return Err(MandateError::NotOwner { account: caller });
        }

        let resolved: Vec<Action> = order
            .actions
            .iter()
            .map(|a| a.fill_unspecified(caller))
            .collect();
        // The caller is never zero here, so nothing can remain unspecified.
        debug_assert!(!resolved.iter().any(Action::has_unspecified_party));
        Ok(resolved)
    }

    /// An action moving an account's holdings needs that account's consent:
    /// it must be a listed signer, the caller itself, or an owner who has
    /// approved the caller as operator. A sender without consent is an
    /// authorization gap, reported as its missing signature.
    fn check_sender_consent(
        &self,
        caller: AccountId,
        order: &Order,
        action: &Action,
    ) -> MandateResult<()> {
        let Some(sender) = action.sender() else {
            return Ok(());
        };
        if order.signers.contains(&sender) || sender == caller || self.is_approved(sender, caller)
        {
            return Ok(());
        }
        warn!(
            sender = %sender,
            caller = %caller,
            kind = %action.kind(),
            "sender consent missing"
        );
        Err(MandateError::InvalidSignature { signer: sender })
    }

    /// Resolve the adapter and proxy entry for an action and confirm the
    /// proxy's ability grant on the target ledger.
    fn check_proxy_grant(&self, action: &Action) -> MandateResult<Arc<dyn LedgerAdapter>> {
        let ledger = action.ledger();
        let adapter = self.adapter_for(ledger)?;

        let entry = self.proxies.entry(action.kind()).ok_or_else(|| {
            MandateError::CapabilityNotSupported {
                ledger,
                capability: format!("{} orders", action.kind()),
            }
        })?;

        if let Some(required) = entry.required {
            if !self.registry.mask_of(ledger, entry.proxy).intersects(required) {
                warn!(
                    ledger = %ledger,
                    proxy = %entry.proxy,
                    required = %required,
                    kind = %action.kind(),
                    "proxy lacks the required ability grant"
                );
                return Err(MandateError::Unauthorized {
                    account: entry.proxy,
                    ledger,
                    required,
                });
            }
        }
        Ok(adapter)
    }

    fn adapter_for(&self, ledger: LedgerId) -> MandateResult<Arc<dyn LedgerAdapter>> {
        self.ledgers
            .get(&ledger)
            .cloned()
            .ok_or(MandateError::UnknownLedger { ledger })
    }

    // ── Apply helpers ─────────────────────────────────────────────────────────

    fn apply_action(&self, adapter: &dyn LedgerAdapter, action: &Action) -> MandateResult<()> {
        match action {
            Action::CreateAsset {
                receiver,
                asset,
                imprint,
                ..
            } => adapter.create(*receiver, *asset, *imprint),
            Action::TransferAsset {
                sender,
                receiver,
                asset,
                ..
            } => adapter.transfer(*sender, *receiver, *asset),
            Action::TransferValue {
                sender,
                receiver,
                amount,
                ..
            } => adapter.transfer_value(*sender, *receiver, *amount),
            Action::SetAbilities {
                target, abilities, ..
            } => adapter.set_abilities(*target, *abilities),
            Action::DestroyAsset { owner, asset, .. } => adapter.destroy(*owner, *asset),
        }
    }

    fn effect_for(&self, dispatch: DispatchId, action: &Action) -> EffectRecord {
        let timestamp = self.clock.now();
        match action {
            Action::CreateAsset {
                ledger,
                receiver,
                asset,
                imprint,
            } => EffectRecord {
                dispatch,
                kind: EffectKind::AssetCreated,
                ledger: *ledger,
                subjects: vec![*receiver],
                payload: json!({ "asset": asset, "imprint": imprint.to_string() }),
                timestamp,
            },
            Action::TransferAsset {
                ledger,
                sender,
                receiver,
                asset,
            } => EffectRecord {
                dispatch,
                kind: EffectKind::AssetTransferred,
                ledger: *ledger,
                subjects: vec![*sender, *receiver],
                payload: json!({ "asset": asset }),
                timestamp,
            },
            Action::TransferValue {
                ledger,
                sender,
                receiver,
                amount,
            } => EffectRecord {
                dispatch,
                kind: EffectKind::ValueTransferred,
                ledger: *ledger,
                subjects: vec![*sender, *receiver],
                payload: json!({ "amount": amount.to_string() }),
                timestamp,
            },
            Action::SetAbilities {
                ledger,
                target,
                abilities,
            } => EffectRecord {
                dispatch,
                kind: EffectKind::AbilitiesSet,
                ledger: *ledger,
                subjects: vec![*target],
                payload: json!({ "abilities": abilities.bits() }),
                timestamp,
            },
            Action::DestroyAsset {
                ledger,
                owner,
                asset,
            } => EffectRecord {
                dispatch,
                kind: EffectKind::AssetDestroyed,
                ledger: *ledger,
                subjects: vec![*owner],
                payload: json!({ "asset": asset }),
                timestamp,
            },
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
