//! Store-backed claim lifecycle tracking.
//!
//! `StoredClaimRegistry` implements the `ClaimRegistry` trait over the
//! shared state store: each claim digest maps to a one-byte lifecycle tag,
//! and an absent entry reads as `Unclaimed`. The two state-changing
//! operations are mutually exclusive — whichever is applied first in the
//! store's total order wins, and the loser observes the terminal state and
//! fails accordingly. Because claim state lives in the same store as ledger
//! bookkeeping, a gateway rollback also rolls back an in-flight
//! `mark_performed`.

use std::sync::Arc;

use tracing::{debug, warn};

use mandate_contracts::{
    account::{AccountId, Digest},
    claim::ClaimState,
    error::{MandateError, MandateResult},
};
use mandate_core::traits::{ClaimRegistry, StateStore, StoreKey};

/// The production claim registry.
#[derive(Clone)]
pub struct StoredClaimRegistry {
    store: Arc<dyn StateStore>,
}

impl StoredClaimRegistry {
    /// Create a registry over the given store.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }
}

impl ClaimRegistry for StoredClaimRegistry {
    fn state(&self, digest: &Digest) -> ClaimState {
        match self.store.get(&StoreKey::ClaimState { digest: *digest }) {
            Some(bytes) => ClaimState::from_byte(bytes.first().copied().unwrap_or(0)),
            None => ClaimState::Unclaimed,
        }
    }

    fn mark_performed(&self, digest: &Digest) -> MandateResult<()> {
        match self.state(digest) {
            ClaimState::Performed => {
                warn!(digest = %digest, "refusing to perform an already performed claim");
                Err(MandateError::ClaimAlreadyPerformed)
            }
            ClaimState::Cancelled => {
                warn!(digest = %digest, "refusing to perform a cancelled claim");
                Err(MandateError::ClaimCancelled)
            }
            ClaimState::Unclaimed => {
                self.store.put(
                    StoreKey::ClaimState { digest: *digest },
                    vec![ClaimState::Performed.to_byte()],
                );
                debug!(digest = %digest, "claim marked performed");
                Ok(())
            }
        }
    }

    fn mark_cancelled(
        &self,
        digest: &Digest,
        authorized_by: AccountId,
        owner: AccountId,
    ) -> MandateResult<()> {
        if authorized_by != owner {
            warn!(
                digest = %digest,
                authorized_by = %authorized_by,
                owner = %owner,
                "cancellation denied: caller does not own the claim"
            );
            return Err(MandateError::NotOwner {
                account: authorized_by,
            });
        }

        match self.state(digest) {
            // No retroactive invalidation of a completed effect.
            ClaimState::Performed => Err(MandateError::ClaimAlreadyPerformed),
            ClaimState::Cancelled => Err(MandateError::ClaimCancelled),
            ClaimState::Unclaimed => {
                self.store.put(
                    StoreKey::ClaimState { digest: *digest },
                    vec![ClaimState::Cancelled.to_byte()],
                );
                debug!(digest = %digest, "claim marked cancelled");
                Ok(())
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use mandate_contracts::{
        account::{AccountId, Digest},
        claim::ClaimState,
        error::MandateError,
    };
    use mandate_core::traits::{Checkpoint, ClaimRegistry, StateStore, StoreKey};

    use super::StoredClaimRegistry;

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

    fn registry() -> StoredClaimRegistry {
        StoredClaimRegistry::new(Arc::new(MapStore(Mutex::new(HashMap::new()))))
    }

    fn owner() -> AccountId {
        AccountId([7; 20])
    }

    /// An unseen digest is unclaimed; performing it transitions to
    /// Performed; repeating fails.
    #[test]
    fn test_perform_lifecycle() {
        let reg = registry();
        let digest = Digest([1; 32]);

        assert_eq!(reg.state(&digest), ClaimState::Unclaimed);
        reg.mark_performed(&digest).unwrap();
        assert_eq!(reg.state(&digest), ClaimState::Performed);

        assert!(matches!(
            reg.mark_performed(&digest),
            Err(MandateError::ClaimAlreadyPerformed)
        ));
    }

    /// Cancelling then performing fails with ClaimCancelled; cancelling
    /// twice fails on the second call.
    #[test]
    fn test_cancel_excludes_perform() {
        let reg = registry();
        let digest = Digest([2; 32]);

        reg.mark_cancelled(&digest, owner(), owner()).unwrap();
        assert_eq!(reg.state(&digest), ClaimState::Cancelled);

        assert!(matches!(
            reg.mark_performed(&digest),
            Err(MandateError::ClaimCancelled)
        ));
        assert!(matches!(
            reg.mark_cancelled(&digest, owner(), owner()),
            Err(MandateError::ClaimCancelled)
        ));
    }

    /// A performed claim cannot be cancelled afterwards.
    #[test]
    fn test_perform_excludes_cancel() {
        let reg = registry();
        let digest = Digest([3; 32]);

        reg.mark_performed(&digest).unwrap();
        assert!(matches!(
            reg.mark_cancelled(&digest, owner(), owner()),
            Err(MandateError::ClaimAlreadyPerformed)
        ));
        assert_eq!(reg.state(&digest), ClaimState::Performed);
    }

    /// Cancellation requires the caller to be the claim's owner.
    #[test]
    fn test_cancel_requires_owner() {
        let reg = registry();
        let digest = Digest([4; 32]);
        let stranger = AccountId([8; 20]);

        let denied = reg.mark_cancelled(&digest, stranger, owner());
        assert!(matches!(denied, Err(MandateError::NotOwner { account }) if account == stranger));
        assert_eq!(reg.state(&digest), ClaimState::Unclaimed);
    }

    /// Claims are tracked per digest; one digest's lifecycle does not
    /// affect another's.
    #[test]
    fn test_digests_are_independent() {
        let reg = registry();
        reg.mark_performed(&Digest([5; 32])).unwrap();
        assert_eq!(reg.state(&Digest([6; 32])), ClaimState::Unclaimed);
    }
}
