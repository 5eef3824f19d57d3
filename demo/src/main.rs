//! MANDATE Gateway — Demo CLI
//!
//! Runs one or all of the three gateway demo scenarios. Each scenario uses
//! real MANDATE components (claim codec, secp256k1 signatures, claim
//! registry, effect journal, gateway, in-memory ledgers) wired together
//! with throwaway keys.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- approval-flow
//!   cargo run -p demo -- atomic-order
//!   cargo run -p demo -- self-revoke-guard

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod scenarios;

use scenarios::{approval_flow, atomic_order, self_revoke};

// ── CLI definition ────────────────────────────────────────────────────────────

/// MANDATE — claim-authorized atomic order gateway demo.
///
/// Each subcommand runs one or all of the three scenarios, demonstrating
/// claim redemption, order atomicity, and the ability self-revocation
/// guard.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "MANDATE gateway demo",
    long_about = "Runs MANDATE demo scenarios showing claim-based authorization,\n\
                  atomic multi-action execution, and ability administration."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: a signed approval claim redeemed exactly once.
    ApprovalFlow,
    /// Scenario 2: a two-ledger order that fails and rolls back atomically.
    AtomicOrder,
    /// Scenario 3: the manage-abilities self-revocation guard.
    SelfRevokeGuard,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::ApprovalFlow => approval_flow::run_scenario(),
        Command::AtomicOrder => atomic_order::run_scenario(),
        Command::SelfRevokeGuard => self_revoke::run_scenario(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> mandate_contracts::error::MandateResult<()> {
    approval_flow::run_scenario()?;
    atomic_order::run_scenario()?;
    self_revoke::run_scenario()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("MANDATE — Claim-Authorized Order Gateway");
    println!("Demo scenarios");
    println!("========================================");
    println!();
    println!("Gateway verification pipeline per submission:");
    println!("  [1] Claim digest computed (gateway identity first, Keccak-256)");
    println!("  [2] Expiration and claim freshness checked before any state change");
    println!("  [3] Every signer's secp256k1 signature recovered and compared");
    println!("  [4] Proxy ability grants confirmed per action on each target ledger");
    println!("  [5] Actions applied all-or-nothing inside a store checkpoint");
    println!("  [6] Claim marked performed; effects chained into the SHA-256 journal");
    println!();
}
