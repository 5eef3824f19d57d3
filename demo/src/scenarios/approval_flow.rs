//! Scenario 1: Approval flow.
//!
//! An owner signs an approval-for-all claim for an operator off the
//! critical path. A relayer redeems it through the gateway: the signature
//! is recovered, the claim is marked performed, and one ApprovalForAll
//! effect lands in the journal. Redeeming the identical claim a second
//! time fails with ClaimAlreadyPerformed.

use chrono::{Duration, Utc};

use mandate_claims::{KeccakClaimCodec, Signer};
use mandate_contracts::{
    account::AccountId,
    claim::{Approval, ClaimState},
    error::{MandateError, MandateResult},
    signature::SignatureKind,
};
use mandate_core::traits::ClaimEncoder;

use super::{build_world, expect, GATEWAY_ID, VALUE_LEDGER};

pub fn run_scenario() -> MandateResult<()> {
    println!("── Scenario 1: Approval flow ───────────────────────────────");

    let world = build_world()?;

    let signer = Signer::from_secret_bytes(&[0x42; 32])?;
    let owner = signer.address();
    let operator = AccountId([0x0B; 20]);
    let relayer = AccountId([0x0C; 20]);

    let claim = Approval {
        owner,
        operator,
        approved: true,
        fee_token: VALUE_LEDGER,
        fee_value: 0,
        fee_recipient: relayer,
        seed: 1,
        expiration: Utc::now() + Duration::hours(1),
    };

    // The owner signs off the critical path; the relayer submits later.
    let digest = KeccakClaimCodec.approval_digest(GATEWAY_ID, &claim);
    let signature = signer.sign(&digest, SignatureKind::StandardPrefixed);

    println!("  owner    {}", owner);
    println!("  operator {}", operator);
    println!("  digest   {}", digest);

    let record = world.gateway.perform_approval(relayer, &claim, &signature)?;
    println!("  redeemed: {} for {:?}", record.kind, record.subjects);

    expect(
        world.gateway.is_approved(owner, operator),
        "operator approval must be recorded",
    )?;
    expect(
        world.gateway.performedness(&digest) == ClaimState::Performed,
        "claim must be performed",
    )?;

    // The identical (claim, signature) pair is now replay-protected.
    match world.gateway.perform_approval(relayer, &claim, &signature) {
        Err(MandateError::ClaimAlreadyPerformed) => {
            println!("  replay rejected: claim has already been performed");
        }
        Ok(_) => {
            return Err(MandateError::ConfigError {
                reason: "replayed approval must not succeed".to_string(),
            })
        }
        Err(other) => return Err(other),
    }

    expect(world.journal.verify_integrity(), "journal chain must verify")?;
    println!("  journal: {} entry, chain verified", world.journal.len());
    println!();
    Ok(())
}
