//! Demo scenarios for the MANDATE gateway.
//!
//! Every scenario wires real components — in-memory store, Keccak claim
//! codec, secp256k1 signatures, stored claim registry, hash-chained effect
//! journal — around a fresh gateway, then narrates one protocol behavior:
//!
//! 1. **Approval flow** — a signed approval claim redeemed by a relayer
//!    exactly once.
//! 2. **Atomic order** — a two-ledger batch whose failing second action
//!    rolls back the first.
//! 3. **Self-revoke guard** — the extra confirmation required to revoke
//!    manage-abilities from yourself.

use std::sync::Arc;

use mandate_claims::{KeccakClaimCodec, Secp256k1Recovery, StoredClaimRegistry};
use mandate_contracts::{
    ability::Ability,
    account::{AccountId, LedgerId},
    capability::LedgerCapabilities,
    error::{MandateError, MandateResult},
};
use mandate_core::{Gateway, ProxyTable};
use mandate_ledger::{AssetLedger, MemoryStore, SystemClock, ValueLedger};
use mandate_audit::InMemoryEffectJournal;

pub mod approval_flow;
pub mod atomic_order;
pub mod self_revoke;

// ── Shared fixture ────────────────────────────────────────────────────────────

pub const GATEWAY_ID: AccountId = AccountId([0xEE; 20]);
pub const ADMIN: AccountId = AccountId([0x0D; 20]);

pub const CREATE_PROXY: AccountId = AccountId([0xC1; 20]);
pub const MANAGE_PROXY: AccountId = AccountId([0xC2; 20]);
pub const TRANSFER_PROXY: AccountId = AccountId([0xC3; 20]);

pub const ASSET_LEDGER: LedgerId = LedgerId(AccountId([0xA1; 20]));
pub const VALUE_LEDGER: LedgerId = LedgerId(AccountId([0xB1; 20]));

/// A gateway plus the shared infrastructure behind it.
pub struct DemoWorld {
    pub gateway: Gateway,
    pub journal: Arc<InMemoryEffectJournal>,
    pub asset: Arc<AssetLedger>,
    pub value: Arc<ValueLedger>,
}

/// Wire a fresh gateway over real components: one asset ledger (all
/// optional capabilities), one value ledger, the standard proxy table, and
/// the create proxy's order-scoped opt-in grant.
pub fn build_world() -> MandateResult<DemoWorld> {
    let store = Arc::new(MemoryStore::new());
    let journal = Arc::new(InMemoryEffectJournal::new(GATEWAY_ID));

    let asset = Arc::new(AssetLedger::new(
        ASSET_LEDGER,
        store.clone(),
        LedgerCapabilities::full(),
        ADMIN,
    )?);
    let value = Arc::new(ValueLedger::new(VALUE_LEDGER, store.clone(), ADMIN)?);

    let proxies = ProxyTable::standard(
        CREATE_PROXY,
        TRANSFER_PROXY,
        TRANSFER_PROXY,
        MANAGE_PROXY,
        TRANSFER_PROXY,
    );

    let mut gateway = Gateway::new(
        GATEWAY_ID,
        store.clone(),
        Arc::new(SystemClock),
        Arc::new(KeccakClaimCodec),
        Arc::new(Secp256k1Recovery),
        Arc::new(StoredClaimRegistry::new(store.clone())),
        journal.clone(),
        proxies,
    );
    gateway.register_ledger(asset.clone());
    gateway.register_ledger(value.clone());

    // The asset ledger opts into order-based creation by granting the
    // create proxy the order-scoped ability.
    asset.registry().grant(
        ASSET_LEDGER,
        ADMIN,
        CREATE_PROXY,
        Ability::AllowCreateAsset.into(),
    )?;

    Ok(DemoWorld {
        gateway,
        journal,
        asset,
        value,
    })
}

/// Fail the scenario with a description when an expected condition does
/// not hold.
pub fn expect(condition: bool, what: &str) -> MandateResult<()> {
    if condition {
        Ok(())
    } else {
        Err(MandateError::ConfigError {
            reason: format!("scenario expectation failed: {}", what),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    /// Each scenario must run clean end to end against real components.
    #[test]
    fn test_approval_flow_scenario() {
        super::approval_flow::run_scenario().unwrap();
    }

    #[test]
    fn test_atomic_order_scenario() {
        super::atomic_order::run_scenario().unwrap();
    }

    #[test]
    fn test_self_revoke_scenario() {
        super::self_revoke::run_scenario().unwrap();
    }
}
