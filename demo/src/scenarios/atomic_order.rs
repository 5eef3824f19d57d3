//! Scenario 2: Atomic order.
//!
//! A signer authorizes a two-ledger batch: create asset 7 on the asset
//! ledger, then pay 500 from a balance of 100 on the value ledger. The
//! value transfer fails, so the already-applied creation is rolled back —
//! asset 7 does not exist afterwards and the claim stays unclaimed. A
//! corrected order under a fresh seed then commits both actions.

use chrono::{Duration, Utc};

use mandate_claims::{KeccakClaimCodec, Signer};
use mandate_contracts::{
    account::{AccountId, AssetId, Digest},
    action::{Action, Order},
    claim::ClaimState,
    error::{MandateError, MandateResult},
    signature::SignatureKind,
};
use mandate_core::traits::ClaimEncoder;

use super::{build_world, expect, ADMIN, ASSET_LEDGER, GATEWAY_ID, VALUE_LEDGER};

pub fn run_scenario() -> MandateResult<()> {
    println!("── Scenario 2: Atomic order ────────────────────────────────");

    let world = build_world()?;

    let signer = Signer::from_secret_bytes(&[0x51; 32])?;
    let sender = signer.address();
    let merchant = AccountId([0x0A; 20]);

    // Fund the sender with less than the order will try to move.
    world.value.direct_mint(ADMIN, sender, 100)?;
    println!("  sender {} funded with 100", sender);

    let order = |amount: u128| Order {
        actions: vec![
            Action::CreateAsset {
                ledger: ASSET_LEDGER,
                receiver: sender,
                asset: AssetId(7),
                imprint: Digest([0x11; 32]),
            },
            Action::TransferValue {
                ledger: VALUE_LEDGER,
                sender,
                receiver: merchant,
                amount,
            },
        ],
        signers: vec![sender],
        payer: sender,
        wildcard_signer: false,
        automated_perform: true,
    };

    let expiration = Utc::now() + Duration::hours(1);

    // First attempt: the value transfer exceeds the balance.
    let overdrawn = order(500);
    let digest = KeccakClaimCodec.order_digest(GATEWAY_ID, &overdrawn, expiration, 1);
    let signature = signer.sign(&digest, SignatureKind::StandardPrefixed);

    match world
        .gateway
        .execute(sender, &overdrawn, &[signature], expiration, 1)
    {
        Err(MandateError::InsufficientBalance {
            required,
            available,
            ..
        }) => {
            println!(
                "  order failed as intended: required {} but only {} available",
                required, available
            );
        }
        Ok(_) => {
            return Err(MandateError::ConfigError {
                reason: "overdrawn order must not succeed".to_string(),
            })
        }
        Err(other) => return Err(other),
    }

    // Atomicity: the asset created before the failure is gone again.
    expect(
        world.asset.owner_of(AssetId(7)).is_err(),
        "asset 7 must not exist after the rollback",
    )?;
    expect(
        world.gateway.performedness(&digest) == ClaimState::Unclaimed,
        "failed order's claim must stay unclaimed",
    )?;
    expect(
        world.value.balance_of(sender) == 100,
        "sender balance must be untouched",
    )?;
    println!("  rollback confirmed: no asset, no balance change, claim unclaimed");

    // Second attempt under a fresh seed, within the balance.
    let affordable = order(50);
    let digest = KeccakClaimCodec.order_digest(GATEWAY_ID, &affordable, expiration, 2);
    let signature = signer.sign(&digest, SignatureKind::StandardPrefixed);

    let records = world
        .gateway
        .execute(sender, &affordable, &[signature], expiration, 2)?;
    println!("  corrected order applied {} actions:", records.len());
    for record in &records {
        println!("    {} on {}", record.kind, record.ledger);
    }

    expect(
        world.asset.owner_of(AssetId(7))? == sender,
        "asset 7 must now belong to the sender",
    )?;
    expect(
        world.value.balance_of(merchant) == 50,
        "merchant must have received 50",
    )?;
    expect(world.journal.verify_integrity(), "journal chain must verify")?;
    println!(
        "  journal: {} entries, chain verified",
        world.journal.len()
    );
    println!();
    Ok(())
}
