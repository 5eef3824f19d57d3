//! The reference value ledger.
//!
//! An in-memory registry of fungible balances over the shared store. The
//! value ledger declares no optional asset capabilities; every asset-shaped
//! adapter operation fails with `CapabilityNotSupported`, and value
//! transfers enforce balance sufficiency.

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

/// An in-memory fungible-value ledger.
pub struct ValueLedger {
    id: LedgerId,
    store: Arc<dyn StateStore>,
    registry: AbilityRegistry,
}

impl ValueLedger {
    /// Create a ledger and bootstrap its ability registry with `creator`
    /// as owner.
    pub fn new(
        id: LedgerId,
        store: Arc<dyn StateStore>,
        creator: AccountId,
    ) -> MandateResult<Self> {
        let registry = AbilityRegistry::new(store.clone());
        registry.bootstrap(id, creator)?;
        Ok(Self {
            id,
            store,
            registry,
        })
    }

    /// The ability registry backing this ledger.
    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    /// The balance of `account`.
    pub fn balance_of(&self, account: AccountId) -> u128 {
        match self.store.get(&StoreKey::Balance {
            ledger: self.id,
            account,
        }) {
            Some(bytes) => {
                let arr: [u8; 16] = match bytes.try_into() {
                    Ok(arr) => arr,
                    Err(_) => return 0,
                };
                u128::from_be_bytes(arr)
            }
            None => 0,
        }
    }

    /// Mint `amount` into `receiver`'s balance. Requires the caller to
    /// hold create-asset.
    pub fn direct_mint(
        &self,
        caller: AccountId,
        receiver: AccountId,
        amount: u128,
    ) -> MandateResult<()> {
        if !self.registry.has(self.id, caller, Ability::CreateAsset) {
            return Err(MandateError::Unauthorized {
                account: caller,
                ledger: self.id,
                required: Abilities::from(Ability::CreateAsset),
            });
        }
        if receiver.is_zero() {
            return Err(MandateError::InvalidAccount);
        }
        let next = self
            .balance_of(receiver)
            .checked_add(amount)
            .ok_or_else(|| MandateError::ConfigError {
                reason: format!("balance overflow for {}", receiver),
            })?;
        self.write_balance(receiver, next);
        debug!(ledger = %self.id, receiver = %receiver, amount, "value minted");
        Ok(())
    }

    /// Transfer from the caller's own balance.
    pub fn direct_transfer(
        &self,
        caller: AccountId,
        receiver: AccountId,
        amount: u128,
    ) -> MandateResult<()> {
        self.transfer_value(caller, receiver, amount)
    }

    fn write_balance(&self, account: AccountId, amount: u128) {
        self.store.put(
            StoreKey::Balance {
                ledger: self.id,
                account,
            },
            amount.to_be_bytes().to_vec(),
        );
    }

    fn unsupported(&self, capability: &str) -> MandateError {
        MandateError::CapabilityNotSupported {
            ledger: self.id,
            capability: capability.to_string(),
        }
    }
}

impl LedgerAdapter for ValueLedger {
    fn ledger_id(&self) -> LedgerId {
        self.id
    }

    fn capabilities(&self) -> LedgerCapabilities {
        LedgerCapabilities::none()
    }

    fn create(&self, _receiver: AccountId, _asset: AssetId, _imprint: Digest) -> MandateResult<()> {
        Err(self.unsupported("asset creation"))
    }

    fn destroy(&self, _owner: AccountId, _asset: AssetId) -> MandateResult<()> {
        Err(self.unsupported("burning"))
    }

    fn revoke_asset(&self, _asset: AssetId) -> MandateResult<()> {
        Err(self.unsupported("revocation"))
    }

    fn transfer(
        &self,
        _sender: AccountId,
        _receiver: AccountId,
        _asset: AssetId,
    ) -> MandateResult<()> {
        Err(self.unsupported("asset transfers"))
    }

    fn transfer_value(
        &self,
        sender: AccountId,
        receiver: AccountId,
        amount: u128,
    ) -> MandateResult<()> {
        if sender.is_zero() || receiver.is_zero() {
            return Err(MandateError::InvalidAccount);
        }

        let available = self.balance_of(sender);
        if available < amount {
            return Err(MandateError::InsufficientBalance {
                account: sender,
                required: amount,
                available,
            });
        }

        self.write_balance(sender, available - amount);
        let receiver_next = self
            .balance_of(receiver)
            .checked_add(amount)
            .ok_or_else(|| MandateError::ConfigError {
                reason: format!("balance overflow for {}", receiver),
            })?;
        self.write_balance(receiver, receiver_next);

        debug!(
            ledger = %self.id,
            from = %sender,
            to = %receiver,
            amount,
            "value transferred"
        );
        Ok(())
    }

    fn set_abilities(&self, account: AccountId, abilities: Abilities) -> MandateResult<()> {
        if account.is_zero() {
            return Err(MandateError::InvalidAccount);
        }
        self.registry.overwrite_mask(self.id, account, abilities);
        Ok(())
    }

    fn set_uri(&self, _prefix: String, _postfix: String) -> MandateResult<()> {
        Err(self.unsupported("uri templates"))
    }

    fn set_pause(&self, _paused: bool) -> MandateResult<()> {
        Err(self.unsupported("pausing"))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mandate_contracts::{
        account::{AccountId, LedgerId},
        error::MandateError,
    };
    use mandate_core::traits::LedgerAdapter;

    use crate::store::MemoryStore;

    use super::ValueLedger;

    const LEDGER: LedgerId = LedgerId(AccountId([0xB1; 20]));

    fn account(byte: u8) -> AccountId {
        AccountId([byte; 20])
    }

    fn ledger() -> ValueLedger {
        ValueLedger::new(LEDGER, Arc::new(MemoryStore::new()), account(1)).unwrap()
    }

    /// Minting is gated on create-asset and credits the receiver.
    #[test]
    fn test_mint_rules() {
        let ledger = ledger();
        let denied = ledger.direct_mint(account(2), account(2), 100);
        assert!(matches!(denied, Err(MandateError::Unauthorized { .. })));

        ledger.direct_mint(account(1), account(2), 100).unwrap();
        assert_eq!(ledger.balance_of(account(2)), 100);
    }

    /// Transfers move exactly the requested amount.
    #[test]
    fn test_transfer_moves_balance() {
        let ledger = ledger();
        ledger.direct_mint(account(1), account(2), 100).unwrap();

        ledger.direct_transfer(account(2), account(3), 40).unwrap();
        assert_eq!(ledger.balance_of(account(2)), 60);
        assert_eq!(ledger.balance_of(account(3)), 40);
    }

    /// A transfer past the sender's balance fails with the exact amounts
    /// and moves nothing.
    #[test]
    fn test_insufficient_balance() {
        let ledger = ledger();
        ledger.direct_mint(account(1), account(2), 100).unwrap();

        let result = ledger.transfer_value(account(2), account(3), 500);
        match result {
            Err(MandateError::InsufficientBalance {
                account: a,
                required,
                available,
            }) => {
                assert_eq!(a, account(2));
                assert_eq!(required, 500);
                assert_eq!(available, 100);
            }
            other => panic!("expected InsufficientBalance, got {:?}", other),
        }
        assert_eq!(ledger.balance_of(account(2)), 100);
        assert_eq!(ledger.balance_of(account(3)), 0);
    }

    /// A zero-amount transfer between funded accounts is a no-op that
    /// succeeds.
    #[test]
    fn test_zero_amount_transfer() {
        let ledger = ledger();
        ledger.direct_mint(account(1), account(2), 10).unwrap();
        ledger.transfer_value(account(2), account(3), 0).unwrap();
        assert_eq!(ledger.balance_of(account(2)), 10);
        assert_eq!(ledger.balance_of(account(3)), 0);
    }

    /// Asset-shaped operations are unsupported on a value ledger.
    #[test]
    fn test_asset_operations_unsupported() {
        let ledger = ledger();
        use mandate_contracts::account::{AssetId, Digest};

        assert!(matches!(
            ledger.create(account(2), AssetId(1), Digest::ZERO),
            Err(MandateError::CapabilityNotSupported { .. })
        ));
        assert!(matches!(
            ledger.transfer(account(2), account(3), AssetId(1)),
            Err(MandateError::CapabilityNotSupported { .. })
        ));
        assert!(matches!(
            ledger.set_pause(true),
            Err(MandateError::CapabilityNotSupported { .. })
        ));
    }
}
