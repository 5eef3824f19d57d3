//! The ability registry: per-ledger, per-account permission masks.
//!
//! Pure data plus grant/revoke/check operations over the injected store.
//! Mutating another account's mask requires the caller to hold
//! ManageAbilities on that ledger (or to be the ledger's bootstrap owner).
//! Revoking a mask that includes ManageAbilities from the caller itself
//! additionally requires `allow_super_revoke` — a deliberate extra
//! confirmation so a caller cannot accidentally lock itself out. The guard
//! fires on exactly that condition and nothing else.

use std::sync::Arc;

use tracing::{debug, warn};

use mandate_contracts::{
    ability::{Abilities, Ability},
    account::{AccountId, LedgerId},
    error::{MandateError, MandateResult},
};

use crate::traits::{StateStore, StoreKey};

/// Per-ledger, per-account ability masks over the shared store.
///
/// Cheap to construct; every instance backed by the same store observes the
/// same masks.
#[derive(Clone)]
pub struct AbilityRegistry {
    store: Arc<dyn StateStore>,
}

impl AbilityRegistry {
    /// Create a registry over the given store.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Record `owner` as the ledger's bootstrap owner and grant it every
    /// ability, making a fresh ledger administrable.
    ///
    /// Refuses to run twice for the same ledger.
    pub fn bootstrap(&self, ledger: LedgerId, owner: AccountId) -> MandateResult<()> {
        if owner.is_zero() {
            return Err(MandateError::InvalidAccount);
        }
        if self.ledger_owner(ledger).is_some() {
            return Err(MandateError::ConfigError {
                reason: format!("ledger {} is already bootstrapped", ledger),
            });
        }

        self.store.put(
            StoreKey::LedgerOwner { ledger },
            owner.as_bytes().to_vec(),
        );
        self.write_mask(ledger, owner, Abilities::all());

        debug!(ledger = %ledger, owner = %owner, "ledger bootstrapped");
        Ok(())
    }

    /// The ledger's bootstrap owner, if it has been bootstrapped.
    pub fn ledger_owner(&self, ledger: LedgerId) -> Option<AccountId> {
        let bytes = self.store.get(&StoreKey::LedgerOwner { ledger })?;
        let arr: [u8; 20] = bytes.try_into().ok()?;
        Some(AccountId(arr))
    }

    /// The full ability mask `account` holds on `ledger`.
    pub fn mask_of(&self, ledger: LedgerId, account: AccountId) -> Abilities {
        match self.store.get(&StoreKey::AbilityMask { ledger, account }) {
            Some(bytes) => {
                let arr: [u8; 4] = match bytes.try_into() {
                    Ok(arr) => arr,
                    Err(_) => return Abilities::EMPTY,
                };
                Abilities::from_bits(u32::from_be_bytes(arr))
            }
            None => Abilities::EMPTY,
        }
    }

    /// True if `account` holds the single `ability` bit on `ledger`.
    pub fn has(&self, ledger: LedgerId, account: AccountId, ability: Ability) -> bool {
        self.mask_of(ledger, account).has(ability)
    }

    /// OR `abilities` into `account`'s mask. Unaffected bits are untouched.
    ///
    /// `caller` must hold ManageAbilities on the ledger or be its bootstrap
    /// owner.
    pub fn grant(
        &self,
        ledger: LedgerId,
        caller: AccountId,
        account: AccountId,
        abilities: Abilities,
    ) -> MandateResult<()> {
        self.require_manager(ledger, caller)?;
        if account.is_zero() {
            return Err(MandateError::InvalidAccount);
        }

        let next = self.mask_of(ledger, account).union(abilities);
        self.write_mask(ledger, account, next);

        debug!(
            ledger = %ledger,
            account = %account,
            granted = %abilities,
            mask = %next,
            "abilities granted"
        );
        Ok(())
    }

    /// AND-NOT `abilities` out of `account`'s mask. Unaffected bits are
    /// untouched.
    ///
    /// `caller` must hold ManageAbilities on the ledger or be its bootstrap
    /// owner. When the revoked mask includes ManageAbilities and the target
    /// is the caller itself, `allow_super_revoke` must be set — this is the
    /// only condition under which the flag is consulted.
    pub fn revoke(
        &self,
        ledger: LedgerId,
        caller: AccountId,
        account: AccountId,
        abilities: Abilities,
        allow_super_revoke: bool,
    ) -> MandateResult<()> {
        self.require_manager(ledger, caller)?;

        if abilities.has(Ability::ManageAbilities) && account == caller && !allow_super_revoke {
            warn!(
                ledger = %ledger,
                caller = %caller,
                "refusing to revoke manage-abilities from the caller without allow_super_revoke"
            );
            return Err(MandateError::Unauthorized {
                account: caller,
                ledger,
                required: Abilities::from(Ability::ManageAbilities),
            });
        }

        let next = self.mask_of(ledger, account).without(abilities);
        self.write_mask(ledger, account, next);

        debug!(
            ledger = %ledger,
            account = %account,
            revoked = %abilities,
            mask = %next,
            "abilities revoked"
        );
        Ok(())
    }

    /// Overwrite `account`'s full mask without an authority check.
    ///
    /// Used by the gateway's SetAbilities path (the proxy grant was already
    /// verified) and by configuration bootstrap. Not part of the public
    /// direct API.
    pub fn overwrite_mask(&self, ledger: LedgerId, account: AccountId, abilities: Abilities) {
        self.write_mask(ledger, account, abilities);
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// Fail with `Unauthorized` unless `caller` may administer abilities on
    /// the ledger.
    fn require_manager(&self, ledger: LedgerId, caller: AccountId) -> MandateResult<()> {
        if self.ledger_owner(ledger) == Some(caller) {
            return Ok(());
        }
        if self.has(ledger, caller, Ability::ManageAbilities) {
            return Ok(());
        }
        warn!(ledger = %ledger, caller = %caller, "ability administration denied");
        Err(MandateError::Unauthorized {
            account: caller,
            ledger,
            required: Abilities::from(Ability::ManageAbilities),
        })
    }

    fn write_mask(&self, ledger: LedgerId, account: AccountId, abilities: Abilities) {
        self.store.put(
            StoreKey::AbilityMask { ledger, account },
            abilities.bits().to_be_bytes().to_vec(),
        );
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use mandate_contracts::{
        ability::{Abilities, Ability},
        account::{AccountId, LedgerId},
        error::MandateError,
    };

    use crate::traits::{Checkpoint, StateStore, StoreKey};

    use super::AbilityRegistry;

    /// A plain map store; registry tests never roll back.
    struct MapStore(Mutex<HashMap<StoreKey, Vec<u8>>>);

    impl StateStore for MapStore {
        fn get(&self, key: &StoreKey) -> Option<Vec<u8>> {
            self.0.lock().unwrap().get(key).cloned()
        }
        fn put(&self, key: StoreKey, value: Vec<u8>) {
            self.0.lock().unwrap().insert(key, value);
        }
        fn remove(&self, key: &StoreKey) {
            self.0.lock().unwrap().remove(key);
        }
        fn checkpoint(&self) -> Checkpoint {
            Checkpoint::at_depth(0)
        }
        fn rollback(&self, _mark: Checkpoint) {}
    }

    fn registry() -> AbilityRegistry {
        AbilityRegistry::new(Arc::new(MapStore(Mutex::new(HashMap::new()))))
    }

    fn account(byte: u8) -> AccountId {
        AccountId([byte; 20])
    }

    const LEDGER: LedgerId = LedgerId(AccountId([0xA1; 20]));

    /// Bootstrap grants the owner every ability and records ownership.
    #[test]
    fn test_bootstrap_grants_everything() {
        let reg = registry();
        let owner = account(1);
        reg.bootstrap(LEDGER, owner).unwrap();

        assert_eq!(reg.ledger_owner(LEDGER), Some(owner));
        assert_eq!(reg.mask_of(LEDGER, owner), Abilities::all());

        // A second bootstrap is refused.
        assert!(matches!(
            reg.bootstrap(LEDGER, account(2)),
            Err(MandateError::ConfigError { .. })
        ));
    }

    /// Grant requires manage-abilities (or ownership); an unprivileged
    /// caller is denied.
    #[test]
    fn test_grant_requires_manager() {
        let reg = registry();
        let owner = account(1);
        let outsider = account(2);
        let target = account(3);
        reg.bootstrap(LEDGER, owner).unwrap();

        let denied = reg.grant(LEDGER, outsider, target, Ability::CreateAsset.into());
        assert!(matches!(denied, Err(MandateError::Unauthorized { .. })));

        reg.grant(LEDGER, owner, target, Ability::CreateAsset.into())
            .unwrap();
        assert!(reg.has(LEDGER, target, Ability::CreateAsset));
    }

    /// A delegate holding manage-abilities can administer without being the
    /// bootstrap owner.
    #[test]
    fn test_delegated_manager_can_grant() {
        let reg = registry();
        let owner = account(1);
        let admin = account(2);
        let target = account(3);
        reg.bootstrap(LEDGER, owner).unwrap();
        reg.grant(LEDGER, owner, admin, Ability::ManageAbilities.into())
            .unwrap();

        reg.grant(LEDGER, admin, target, Ability::RevokeAsset.into())
            .unwrap();
        assert!(reg.has(LEDGER, target, Ability::RevokeAsset));
    }

    /// Granting then revoking the same mask restores the prior value and
    /// leaves unrelated bits untouched.
    #[test]
    fn test_grant_revoke_round_trip() {
        let reg = registry();
        let owner = account(1);
        let target = account(3);
        reg.bootstrap(LEDGER, owner).unwrap();
        reg.grant(LEDGER, owner, target, Ability::UpdateUriBase.into())
            .unwrap();

        let before = reg.mask_of(LEDGER, target);
        let batch = Ability::CreateAsset | Ability::RevokeAsset;

        reg.grant(LEDGER, owner, target, batch).unwrap();
        reg.revoke(LEDGER, owner, target, batch, false).unwrap();

        assert_eq!(reg.mask_of(LEDGER, target), before);
        assert!(reg.has(LEDGER, target, Ability::UpdateUriBase));
    }

    /// Scenario: a manager revoking manage-abilities from itself must pass
    /// allow_super_revoke; afterwards it can no longer administer.
    #[test]
    fn test_self_revoke_guard() {
        let reg = registry();
        let owner = account(1);
        let admin = account(2);
        reg.bootstrap(LEDGER, owner).unwrap();
        reg.grant(LEDGER, owner, admin, Ability::ManageAbilities.into())
            .unwrap();

        // Without the confirmation flag the self-revocation is refused.
        let refused = reg.revoke(
            LEDGER,
            admin,
            admin,
            Ability::ManageAbilities.into(),
            false,
        );
        assert!(matches!(refused, Err(MandateError::Unauthorized { .. })));
        assert!(reg.has(LEDGER, admin, Ability::ManageAbilities));

        // With it, the revocation goes through…
        reg.revoke(LEDGER, admin, admin, Ability::ManageAbilities.into(), true)
            .unwrap();
        assert!(!reg.has(LEDGER, admin, Ability::ManageAbilities));

        // …and the admin has locked itself out.
        let after = reg.grant(LEDGER, admin, account(3), Ability::CreateAsset.into());
        assert!(matches!(after, Err(MandateError::Unauthorized { .. })));
    }

    /// The guard fires only on self-revocation of manage-abilities: other
    /// abilities, and other targets, revoke without the flag.
    #[test]
    fn test_guard_trigger_condition_is_exact() {
        let reg = registry();
        let owner = account(1);
        let admin = account(2);
        reg.bootstrap(LEDGER, owner).unwrap();
        reg.grant(
            LEDGER,
            owner,
            admin,
            Ability::ManageAbilities | Ability::CreateAsset,
        )
        .unwrap();

        // Self-revoking a non-super ability needs no flag.
        reg.revoke(LEDGER, admin, admin, Ability::CreateAsset.into(), false)
            .unwrap();
        assert!(!reg.has(LEDGER, admin, Ability::CreateAsset));

        // Revoking manage-abilities from someone else needs no flag either.
        reg.revoke(LEDGER, owner, admin, Ability::ManageAbilities.into(), false)
            .unwrap();
        assert!(!reg.has(LEDGER, admin, Ability::ManageAbilities));
    }

    /// Masks are per-ledger: a grant on one ledger does not leak to another.
    #[test]
    fn test_masks_are_per_ledger() {
        let reg = registry();
        let owner = account(1);
        let other = LedgerId(AccountId([0xB2; 20]));
        reg.bootstrap(LEDGER, owner).unwrap();

        assert_eq!(reg.mask_of(other, owner), Abilities::EMPTY);
        assert!(!reg.has(other, owner, Ability::ManageAbilities));
    }
}
