//! The reference asset ledger.
//!
//! An in-memory registry of owned assets over the shared store. Each asset
//! has an owner and an imprint (a 32-byte content commitment). The ledger
//! declares its optional capabilities at construction; operations belonging
//! to an undeclared capability fail with `CapabilityNotSupported`.
//!
//! Two call paths exist side by side:
//!
//! - The `direct_*` inherent methods take the calling account and gate it
//!   with the matching general ability from the registry — this is the
//!   direct, non-order API.
//! - The `LedgerAdapter` impl is the gateway's proxy path. The gateway has
//!   already verified the proxy grant and the sender's consent, so the
//!   adapter enforces only structural rules: existence, ownership, pause
//!   state, and declared capabilities.

use std::sync::Arc;

use tracing::debug;

use mandate_contracts::{
    ability::{Abilities, Ability},
    account::{AccountId, AssetId, Digest, LedgerId},
    capability::LedgerCapabilities,
    error::{MandateError, MandateResult},
};
use mandate_core::{
    registry::AbilityRegistry,
    traits::{LedgerAdapter, StateStore, StoreKey},
};

/// An in-memory asset ledger.
pub struct AssetLedger {
    id: LedgerId,
    store: Arc<dyn StateStore>,
    registry: AbilityRegistry,
    capabilities: LedgerCapabilities,
}

impl AssetLedger {
    /// Create a ledger and bootstrap its ability registry with `creator`
    /// as owner, holding every ability.
    pub fn new(
        id: LedgerId,
        store: Arc<dyn StateStore>,
        capabilities: LedgerCapabilities,
        creator: AccountId,
    ) -> MandateResult<Self> {
        let registry = AbilityRegistry::new(store.clone());
        registry.bootstrap(id, creator)?;
        Ok(Self {
            id,
            store,
            registry,
            capabilities,
        })
    }

    /// The ability registry backing this ledger.
    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    /// The current owner of `asset`.
    pub fn owner_of(&self, asset: AssetId) -> MandateResult<AccountId> {
        let bytes = self
            .store
            .get(&StoreKey::AssetOwner {
                ledger: self.id,
                asset,
            })
            .ok_or(MandateError::InvalidAsset { asset })?;
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| MandateError::InvalidAsset { asset })?;
        Ok(AccountId(arr))
    }

    /// The imprint of `asset`.
    pub fn imprint_of(&self, asset: AssetId) -> MandateResult<Digest> {
        let bytes = self
            .store
            .get(&StoreKey::AssetImprint {
                ledger: self.id,
                asset,
            })
            .ok_or(MandateError::InvalidAsset { asset })?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| MandateError::InvalidAsset { asset })?;
        Ok(Digest(arr))
    }

    /// True when transfers are currently paused.
    pub fn is_paused(&self) -> bool {
        self.store
            .get(&StoreKey::TransfersPaused { ledger: self.id })
            .map(|bytes| bytes == [1])
            .unwrap_or(false)
    }

    /// The ledger's URI template, if one has been set.
    pub fn uri_template(&self) -> Option<(String, String)> {
        let bytes = self.store.get(&StoreKey::UriTemplate { ledger: self.id })?;
        serde_json::from_slice(&bytes).ok()
    }

    // ── Direct (non-order) API ────────────────────────────────────────────────

    /// Create an asset. Requires the caller to hold create-asset.
    pub fn direct_create(
        &self,
        caller: AccountId,
        receiver: AccountId,
        asset: AssetId,
        imprint: Digest,
    ) -> MandateResult<()> {
        self.require_ability(caller, Ability::CreateAsset)?;
        self.create(receiver, asset, imprint)
    }

    /// Transfer an asset the caller owns (or operates for its owner).
    pub fn direct_transfer(
        &self,
        caller: AccountId,
        receiver: AccountId,
        asset: AssetId,
    ) -> MandateResult<()> {
        self.check_not_paused()?;
        if receiver.is_zero() {
            return Err(MandateError::InvalidAccount);
        }
        let owner = self.owner_of(asset)?;
        if caller != owner && !self.is_operator_for(owner, caller) {
            return Err(MandateError::NotOwnerOrOperator {
                account: caller,
                asset,
            });
        }
        self.write_owner(asset, receiver);
        debug!(ledger = %self.id, asset = %asset, from = %owner, to = %receiver, "asset transferred");
        Ok(())
    }

    /// Rewrite an asset's imprint. Requires the mutable-imprints capability
    /// and the update-asset ability.
    pub fn direct_update_imprint(
        &self,
        caller: AccountId,
        asset: AssetId,
        imprint: Digest,
    ) -> MandateResult<()> {
        self.require_capability(self.capabilities.mutable_imprints, "mutable imprints")?;
        self.require_ability(caller, Ability::UpdateAsset)?;
        // Existence check before the write.
        self.owner_of(asset)?;
        self.store.put(
            StoreKey::AssetImprint {
                ledger: self.id,
                asset,
            },
            imprint.as_bytes().to_vec(),
        );
        debug!(ledger = %self.id, asset = %asset, imprint = %imprint, "imprint updated");
        Ok(())
    }

    /// Revoke (reclaim) an asset without owner consent. Requires the
    /// revokable capability and the revoke-asset ability.
    pub fn direct_revoke(&self, caller: AccountId, asset: AssetId) -> MandateResult<()> {
        self.require_capability(self.capabilities.revokable, "revocation")?;
        self.require_ability(caller, Ability::RevokeAsset)?;
        self.owner_of(asset)?;
        self.erase_asset(asset);
        debug!(ledger = %self.id, asset = %asset, "asset revoked");
        Ok(())
    }

    /// Destroy (burn) an asset the caller owns. Requires the burnable
    /// capability.
    pub fn direct_destroy(&self, caller: AccountId, asset: AssetId) -> MandateResult<()> {
        self.destroy(caller, asset)
    }

    /// Set the URI template. Requires the update-uri-base ability.
    pub fn direct_set_uri(
        &self,
        caller: AccountId,
        prefix: String,
        postfix: String,
    ) -> MandateResult<()> {
        self.require_ability(caller, Ability::UpdateUriBase)?;
        self.set_uri(prefix, postfix)
    }

    /// Pause or resume transfers. Requires the pausable capability and the
    /// toggle-transfers ability.
    pub fn direct_set_pause(&self, caller: AccountId, paused: bool) -> MandateResult<()> {
        self.require_ability(caller, Ability::ToggleTransfers)?;
        self.set_pause(paused)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_ability(&self, caller: AccountId, ability: Ability) -> MandateResult<()> {
        if self.registry.has(self.id, caller, ability) {
            return Ok(());
        }
        Err(MandateError::Unauthorized {
            account: caller,
            ledger: self.id,
            required: Abilities::from(ability),
        })
    }

    fn require_capability(&self, supported: bool, name: &str) -> MandateResult<()> {
        if supported {
            return Ok(());
        }
        Err(MandateError::CapabilityNotSupported {
            ledger: self.id,
            capability: name.to_string(),
        })
    }

    fn check_not_paused(&self) -> MandateResult<()> {
        if self.is_paused() {
            return Err(MandateError::TransferDisabled { ledger: self.id });
        }
        Ok(())
    }

    /// Gateway-scoped operator approvals live in the same store, so the
    /// direct API honors them too.
    fn is_operator_for(&self, owner: AccountId, operator: AccountId) -> bool {
        self.store
            .get(&StoreKey::OperatorApproval { owner, operator })
            .map(|bytes| bytes == [1])
            .unwrap_or(false)
    }

    fn write_owner(&self, asset: AssetId, owner: AccountId) {
        self.store.put(
            StoreKey::AssetOwner {
                ledger: self.id,
                asset,
            },
            owner.as_bytes().to_vec(),
        );
    }

    fn erase_asset(&self, asset: AssetId) {
        self.store.remove(&StoreKey::AssetOwner {
            ledger: self.id,
            asset,
        });
        self.store.remove(&StoreKey::AssetImprint {
            ledger: self.id,
            asset,
        });
    }
}

impl LedgerAdapter for AssetLedger {
    fn ledger_id(&self) -> LedgerId {
        self.id
    }

    fn capabilities(&self) -> LedgerCapabilities {
        self.capabilities
    }

    fn create(&self, receiver: AccountId, asset: AssetId, imprint: Digest) -> MandateResult<()> {
        if receiver.is_zero() {
            return Err(MandateError::InvalidAccount);
        }
        if self.owner_of(asset).is_ok() {
            return Err(MandateError::AssetAlreadyExists { asset });
        }
        self.write_owner(asset, receiver);
        self.store.put(
            StoreKey::AssetImprint {
                ledger: self.id,
                asset,
            },
            imprint.as_bytes().to_vec(),
        );
        debug!(ledger = %self.id, asset = %asset, owner = %receiver, "asset created");
        Ok(())
    }

    fn destroy(&self, owner: AccountId, asset: AssetId) -> MandateResult<()> {
        self.require_capability(self.capabilities.burnable, "burning")?;
        let actual = self.owner_of(asset)?;
        if actual != owner {
            return Err(MandateError::NotOwnerOrOperator {
                account: owner,
                asset,
            });
        }
        self.erase_asset(asset);
        debug!(ledger = %self.id, asset = %asset, "asset destroyed");
        Ok(())
    }

    fn revoke_asset(&self, asset: AssetId) -> MandateResult<()> {
        self.require_capability(self.capabilities.revokable, "revocation")?;
        self.owner_of(asset)?;
        self.erase_asset(asset);
        debug!(ledger = %self.id, asset = %asset, "asset revoked");
        Ok(())
    }

    fn transfer(&self, sender: AccountId, receiver: AccountId, asset: AssetId) -> MandateResult<()> {
        self.check_not_paused()?;
        if receiver.is_zero() {
            return Err(MandateError::InvalidAccount);
        }
        let owner = self.owner_of(asset)?;
        if owner != sender {
            return Err(MandateError::NotOwnerOrOperator {
                account: sender,
                asset,
            });
        }
        self.write_owner(asset, receiver);
        debug!(ledger = %self.id, asset = %asset, from = %sender, to = %receiver, "asset transferred");
        Ok(())
    }

    fn transfer_value(
        &self,
        _sender: AccountId,
        _receiver: AccountId,
        _amount: u128,
    ) -> MandateResult<()> {
        Err(MandateError::CapabilityNotSupported {
            ledger: self.id,
            capability: "value transfers".to_string(),
        })
    }

    fn set_abilities(&self, account: AccountId, abilities: Abilities) -> MandateResult<()> {
        if account.is_zero() {
            return Err(MandateError::InvalidAccount);
        }
        self.registry.overwrite_mask(self.id, account, abilities);
        debug!(ledger = %self.id, account = %account, mask = %abilities, "abilities set");
        Ok(())
    }

    fn set_uri(&self, prefix: String, postfix: String) -> MandateResult<()> {
        let encoded = serde_json::to_vec(&(prefix, postfix)).map_err(|e| {
            MandateError::ConfigError {
                reason: format!("failed to encode uri template: {}", e),
            }
        })?;
        self.store
            .put(StoreKey::UriTemplate { ledger: self.id }, encoded);
        Ok(())
    }

    fn set_pause(&self, paused: bool) -> MandateResult<()> {
        self.require_capability(self.capabilities.pausable, "pausing")?;
        self.store.put(
            StoreKey::TransfersPaused { ledger: self.id },
            vec![paused as u8],
        );
        debug!(ledger = %self.id, paused, "transfer pause toggled");
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mandate_contracts::{
        ability::Ability,
        account::{AccountId, AssetId, Digest, LedgerId},
        capability::LedgerCapabilities,
        error::MandateError,
    };
    use mandate_core::traits::{LedgerAdapter, StateStore, StoreKey};

    use crate::store::MemoryStore;

    use super::AssetLedger;

    const LEDGER: LedgerId = LedgerId(AccountId([0xA1; 20]));

    fn account(byte: u8) -> AccountId {
        AccountId([byte; 20])
    }

    fn ledger_with(capabilities: LedgerCapabilities) -> (AssetLedger, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let ledger = AssetLedger::new(LEDGER, store.clone(), capabilities, account(1)).unwrap();
        (ledger, store)
    }

    /// The creator can create directly; an account without create-asset
    /// cannot.
    #[test]
    fn test_direct_create_requires_ability() {
        let (ledger, _) = ledger_with(LedgerCapabilities::full());
        let outsider = account(2);

        let denied = ledger.direct_create(outsider, outsider, AssetId(1), Digest::ZERO);
        assert!(matches!(denied, Err(MandateError::Unauthorized { .. })));

        ledger
            .direct_create(account(1), outsider, AssetId(1), Digest([0x11; 32]))
            .unwrap();
        assert_eq!(ledger.owner_of(AssetId(1)).unwrap(), outsider);
        assert_eq!(ledger.imprint_of(AssetId(1)).unwrap(), Digest([0x11; 32]));
    }

    /// Creating an existing id fails; the original owner is untouched.
    #[test]
    fn test_create_duplicate_rejected() {
        let (ledger, _) = ledger_with(LedgerCapabilities::full());
        ledger
            .direct_create(account(1), account(2), AssetId(1), Digest::ZERO)
            .unwrap();

        let result = ledger.direct_create(account(1), account(3), AssetId(1), Digest::ZERO);
        assert!(matches!(
            result,
            Err(MandateError::AssetAlreadyExists { asset }) if asset == AssetId(1)
        ));
        assert_eq!(ledger.owner_of(AssetId(1)).unwrap(), account(2));
    }

    /// Only the owner (or an approved operator) can transfer directly.
    #[test]
    fn test_direct_transfer_ownership_rules() {
        let (ledger, store) = ledger_with(LedgerCapabilities::full());
        let owner = account(2);
        let operator = account(3);
        ledger
            .direct_create(account(1), owner, AssetId(1), Digest::ZERO)
            .unwrap();

        let denied = ledger.direct_transfer(operator, account(4), AssetId(1));
        assert!(matches!(denied, Err(MandateError::NotOwnerOrOperator { .. })));

        // With a stored operator approval the transfer goes through.
        store.put(StoreKey::OperatorApproval { owner, operator }, vec![1]);
        ledger
            .direct_transfer(operator, account(4), AssetId(1))
            .unwrap();
        assert_eq!(ledger.owner_of(AssetId(1)).unwrap(), account(4));
    }

    /// Pausing blocks transfers on both paths until resumed.
    #[test]
    fn test_pause_blocks_transfers() {
        let (ledger, _) = ledger_with(LedgerCapabilities::full());
        let owner = account(2);
        ledger
            .direct_create(account(1), owner, AssetId(1), Digest::ZERO)
            .unwrap();

        ledger.direct_set_pause(account(1), true).unwrap();
        assert!(ledger.is_paused());

        let direct = ledger.direct_transfer(owner, account(3), AssetId(1));
        assert!(matches!(direct, Err(MandateError::TransferDisabled { .. })));
        let adapter = ledger.transfer(owner, account(3), AssetId(1));
        assert!(matches!(adapter, Err(MandateError::TransferDisabled { .. })));

        ledger.direct_set_pause(account(1), false).unwrap();
        ledger.transfer(owner, account(3), AssetId(1)).unwrap();
    }

    /// Pausing needs the pausable capability.
    #[test]
    fn test_pause_requires_capability() {
        let (ledger, _) = ledger_with(LedgerCapabilities::none());
        let result = ledger.direct_set_pause(account(1), true);
        assert!(matches!(
            result,
            Err(MandateError::CapabilityNotSupported { capability, .. }) if capability == "pausing"
        ));
    }

    /// Destroying needs the burnable capability and asset ownership.
    #[test]
    fn test_destroy_rules() {
        let (ledger, _) = ledger_with(LedgerCapabilities::none());
        let unsupported = ledger.destroy(account(2), AssetId(1));
        assert!(matches!(
            unsupported,
            Err(MandateError::CapabilityNotSupported { .. })
        ));

        let (ledger, _) = ledger_with(LedgerCapabilities::full());
        let owner = account(2);
        ledger
            .direct_create(account(1), owner, AssetId(1), Digest::ZERO)
            .unwrap();

        let not_owner = ledger.destroy(account(3), AssetId(1));
        assert!(matches!(not_owner, Err(MandateError::NotOwnerOrOperator { .. })));

        ledger.destroy(owner, AssetId(1)).unwrap();
        assert!(matches!(
            ledger.owner_of(AssetId(1)),
            Err(MandateError::InvalidAsset { .. })
        ));
    }

    /// Revocation needs the revokable capability and the revoke-asset
    /// ability, and works without owner consent.
    #[test]
    fn test_revoke_rules() {
        let (ledger, _) = ledger_with(LedgerCapabilities::full());
        ledger
            .direct_create(account(1), account(2), AssetId(1), Digest::ZERO)
            .unwrap();

        let denied = ledger.direct_revoke(account(2), AssetId(1));
        assert!(matches!(denied, Err(MandateError::Unauthorized { .. })));

        ledger.direct_revoke(account(1), AssetId(1)).unwrap();
        assert!(ledger.owner_of(AssetId(1)).is_err());
    }

    /// Imprint updates need the mutable-imprints capability and the
    /// update-asset ability.
    #[test]
    fn test_update_imprint_rules() {
        let (ledger, _) = ledger_with(LedgerCapabilities {
            mutable_imprints: false,
            ..LedgerCapabilities::full()
        });
        ledger
            .direct_create(account(1), account(2), AssetId(1), Digest::ZERO)
            .unwrap();

        let unsupported = ledger.direct_update_imprint(account(1), AssetId(1), Digest([9; 32]));
        assert!(matches!(
            unsupported,
            Err(MandateError::CapabilityNotSupported { .. })
        ));

        let (ledger, _) = ledger_with(LedgerCapabilities::full());
        ledger
            .direct_create(account(1), account(2), AssetId(1), Digest::ZERO)
            .unwrap();
        ledger
            .direct_update_imprint(account(1), AssetId(1), Digest([9; 32]))
            .unwrap();
        assert_eq!(ledger.imprint_of(AssetId(1)).unwrap(), Digest([9; 32]));
    }

    /// URI templates round-trip and are ability-gated.
    #[test]
    fn test_uri_template() {
        let (ledger, _) = ledger_with(LedgerCapabilities::full());
        assert_eq!(ledger.uri_template(), None);

        let denied = ledger.direct_set_uri(account(2), "https://x/".into(), ".json".into());
        assert!(matches!(denied, Err(MandateError::Unauthorized { .. })));

        ledger
            .direct_set_uri(account(1), "https://x/".into(), ".json".into())
            .unwrap();
        assert_eq!(
            ledger.uri_template(),
            Some(("https://x/".to_string(), ".json".to_string()))
        );
    }

    /// The adapter's transfer enforces sender ownership even though consent
    /// was checked upstream.
    #[test]
    fn test_adapter_transfer_requires_ownership() {
        let (ledger, _) = ledger_with(LedgerCapabilities::full());
        ledger
            .direct_create(account(1), account(2), AssetId(1), Digest::ZERO)
            .unwrap();

        let result = ledger.transfer(account(3), account(4), AssetId(1));
        assert!(matches!(result, Err(MandateError::NotOwnerOrOperator { .. })));
    }

    /// Value transfers are not an asset-ledger feature.
    #[test]
    fn test_value_transfer_unsupported() {
        let (ledger, _) = ledger_with(LedgerCapabilities::full());
        let result = ledger.transfer_value(account(1), account(2), 5);
        assert!(matches!(
            result,
            Err(MandateError::CapabilityNotSupported { .. })
        ));
    }
}
