//! Scenario 3: Self-revocation guard.
//!
//! An admin holding manage-abilities tries to revoke that ability from
//! itself. Without `allow_super_revoke` the registry refuses; with the
//! flag the revocation goes through, and the admin finds itself locked out
//! of further administration — exactly the footgun the guard makes
//! deliberate.

use std::sync::Arc;

use mandate_contracts::{
    ability::Ability,
    account::{AccountId, LedgerId},
    error::{MandateError, MandateResult},
};
use mandate_core::AbilityRegistry;
use mandate_ledger::MemoryStore;

use super::expect;

pub fn run_scenario() -> MandateResult<()> {
    println!("── Scenario 3: Self-revocation guard ───────────────────────");

    let store = Arc::new(MemoryStore::new());
    let registry = AbilityRegistry::new(store);

    let ledger = LedgerId(AccountId([0xA7; 20]));
    let owner = AccountId([0x01; 20]);
    let admin = AccountId([0x02; 20]);

    registry.bootstrap(ledger, owner)?;
    registry.grant(ledger, owner, admin, Ability::ManageAbilities.into())?;
    println!("  admin {} granted manage-abilities", admin);

    // Without the confirmation flag the self-revocation is refused.
    match registry.revoke(ledger, admin, admin, Ability::ManageAbilities.into(), false) {
        Err(MandateError::Unauthorized { .. }) => {
            println!("  revoke without allow_super_revoke: refused");
        }
        Ok(()) => {
            return Err(MandateError::ConfigError {
                reason: "self-revocation without the flag must be refused".to_string(),
            })
        }
        Err(other) => return Err(other),
    }
    expect(
        registry.has(ledger, admin, Ability::ManageAbilities),
        "the ability must survive the refused revocation",
    )?;

    // With the flag, the admin may lock itself out.
    registry.revoke(ledger, admin, admin, Ability::ManageAbilities.into(), true)?;
    println!("  revoke with allow_super_revoke: done");

    match registry.grant(ledger, admin, AccountId([0x03; 20]), Ability::CreateAsset.into()) {
        Err(MandateError::Unauthorized { .. }) => {
            println!("  follow-up grant by the former admin: refused, as expected");
        }
        Ok(()) => {
            return Err(MandateError::ConfigError {
                reason: "a locked-out admin must not be able to grant".to_string(),
            })
        }
        Err(other) => return Err(other),
    }

    println!();
    Ok(())
}
