//! The proxy table: per action kind, the narrow executor the gateway acts
//! through.
//!
//! Each entry names the proxy account for one action kind and, for
//! ability-granted kinds, the mask of ability bits (any one suffices) that
//! proxy must hold on an action's target ledger. A ledger opts into
//! order-based execution of a kind by granting its proxy the order-scoped
//! ability or the matching general ability; the gateway never bypasses the
//! ability registry.
//!
//! Consent-authorized kinds — asset transfer, value transfer, owner burn —
//! carry no required mask: their authorization is the signed consent of the
//! sender plus the adapter's own ownership and balance rules. The table
//! entry itself is still mandatory; a kind with no entry cannot be executed
//! through the gateway at all.

use std::collections::HashMap;

use mandate_contracts::{
    ability::{Abilities, Ability},
    account::AccountId,
    action::ActionKind,
};

/// One proxy table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEntry {
    /// The narrowly scoped executor account for this action kind.
    pub proxy: AccountId,
    /// Ability bits of which the proxy must hold at least one on the target
    /// ledger; `None` for consent-authorized kinds.
    pub required: Option<Abilities>,
}

/// The static mapping from action kind to execution proxy.
#[derive(Debug, Clone, Default)]
pub struct ProxyTable {
    entries: HashMap<ActionKind, ProxyEntry>,
}

impl ProxyTable {
    /// An empty table. No kind is executable until an entry is inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard table: one proxy per kind with the protocol's
    /// ability requirements.
    ///
    /// - CreateAsset: allow-create-asset or create-asset
    /// - TransferAsset: consent-authorized
    /// - TransferValue: consent-authorized
    /// - SetAbilities: allow-manage-abilities or manage-abilities
    /// - DestroyAsset: consent-authorized (owner burn)
    pub fn standard(
        create_proxy: AccountId,
        transfer_proxy: AccountId,
        value_proxy: AccountId,
        manage_proxy: AccountId,
        burn_proxy: AccountId,
    ) -> Self {
        let mut table = Self::new();
        table.insert(
            ActionKind::CreateAsset,
            ProxyEntry {
                proxy: create_proxy,
                required: Some(Ability::AllowCreateAsset | Ability::CreateAsset),
            },
        );
        table.insert(
            ActionKind::TransferAsset,
            ProxyEntry {
                proxy: transfer_proxy,
                required: None,
            },
        );
        table.insert(
            ActionKind::TransferValue,
            ProxyEntry {
                proxy: value_proxy,
                required: None,
            },
        );
        table.insert(
            ActionKind::SetAbilities,
            ProxyEntry {
                proxy: manage_proxy,
                required: Some(Ability::AllowManageAbilities | Ability::ManageAbilities),
            },
        );
        table.insert(
            ActionKind::DestroyAsset,
            ProxyEntry {
                proxy: burn_proxy,
                required: None,
            },
        );
        table
    }

    /// Insert or replace the entry for `kind`.
    pub fn insert(&mut self, kind: ActionKind, entry: ProxyEntry) {
        self.entries.insert(kind, entry);
    }

    /// The entry for `kind`, if the kind is executable through the gateway.
    pub fn entry(&self, kind: ActionKind) -> Option<&ProxyEntry> {
        self.entries.get(&kind)
    }
}
