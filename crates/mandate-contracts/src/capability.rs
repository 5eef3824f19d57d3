//! Declared optional-capability flags for a ledger instance.
//!
//! A ledger advertises which optional feature sets it supports as a set of
//! orthogonal flags rather than by inheriting feature mixins. Every optional
//! operation checks the corresponding flag first and fails with
//! `CapabilityNotSupported` when it is absent — support is a property of the
//! ledger instance, declared at construction and never elevated afterwards.

use serde::{Deserialize, Serialize};

/// The optional feature sets a ledger instance may support.
///
/// A plain value ledger supports none of these; a fully featured asset
/// ledger may support all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerCapabilities {
    /// Owners may destroy (burn) their own assets.
    pub burnable: bool,
    /// The issuer may revoke (reclaim) any asset.
    pub revokable: bool,
    /// Asset imprints may be rewritten after creation.
    pub mutable_imprints: bool,
    /// Transfers may be paused and resumed.
    pub pausable: bool,
}

impl LedgerCapabilities {
    /// No optional features.
    pub const fn none() -> Self {
        LedgerCapabilities {
            burnable: false,
            revokable: false,
            mutable_imprints: false,
            pausable: false,
        }
    }

    /// Every optional feature.
    pub const fn full() -> Self {
        LedgerCapabilities {
            burnable: true,
            revokable: true,
            mutable_imprints: true,
            pausable: true,
        }
    }
}
