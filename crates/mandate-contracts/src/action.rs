//! Actions and orders.
//!
//! An `Action` is one requested state change against one ledger. An `Order`
//! is an ordered batch of actions plus the signer/payer metadata that
//! authorizes them; the gateway executes an order atomically — all actions
//! apply, or none do.
//!
//! Both unions are closed tagged variants. Adding a kind is an explicit enum
//! extension that every match site must handle; an unknown tag on the wire
//! is a hard error, never a silent fallthrough.

use serde::{Deserialize, Serialize};

use crate::{
    ability::Abilities,
    account::{AccountId, AssetId, Digest, LedgerId},
    error::{MandateError, MandateResult},
};

/// The discriminant of an action variant.
///
/// Tag values are part of the claim-digest wire contract. Tag 4 is reserved
/// (it is not assigned to any kind) and must stay unassigned; do not
/// renumber or assume contiguity when extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    CreateAsset,
    TransferAsset,
    TransferValue,
    SetAbilities,
    DestroyAsset,
}

impl ActionKind {
    /// Every action kind, in tag order.
    pub const ALL: [ActionKind; 5] = [
        ActionKind::CreateAsset,
        ActionKind::TransferAsset,
        ActionKind::TransferValue,
        ActionKind::SetAbilities,
        ActionKind::DestroyAsset,
    ];

    /// The wire tag of this kind.
    pub const fn tag(self) -> u8 {
        match self {
            ActionKind::CreateAsset => 1,
            ActionKind::TransferAsset => 2,
            ActionKind::TransferValue => 3,
            // 4 is reserved.
            ActionKind::SetAbilities => 5,
            ActionKind::DestroyAsset => 6,
        }
    }

    /// Decode a wire tag. The reserved tag 4 fails exactly like any other
    /// unassigned tag.
    pub fn from_tag(tag: u8) -> MandateResult<ActionKind> {
        match tag {
            1 => Ok(ActionKind::CreateAsset),
            2 => Ok(ActionKind::TransferAsset),
            3 => Ok(ActionKind::TransferValue),
            5 => Ok(ActionKind::SetAbilities),
            6 => Ok(ActionKind::DestroyAsset),
            other => Err(MandateError::ConfigError {
                reason: format!("unrecognized action kind tag {}", other),
            }),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::CreateAsset => "create-asset",
            ActionKind::TransferAsset => "transfer-asset",
            ActionKind::TransferValue => "transfer-value",
            ActionKind::SetAbilities => "set-abilities",
            ActionKind::DestroyAsset => "destroy-asset",
        };
        f.write_str(name)
    }
}

/// One requested state change against one target ledger.
///
/// Sender/receiver slots set to `AccountId::ZERO` are "unspecified" and are
/// only legal in orders with `wildcard_signer` set, where the gateway fills
/// them with the executing caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
    /// Create a new asset owned by `receiver`, committing to `imprint`.
    CreateAsset {
        ledger: LedgerId,
        receiver: AccountId,
        asset: AssetId,
        imprint: Digest,
    },
    /// Move an existing asset from `sender` to `receiver`.
    TransferAsset {
        ledger: LedgerId,
        sender: AccountId,
        receiver: AccountId,
        asset: AssetId,
    },
    /// Move a fungible amount from `sender` to `receiver`.
    TransferValue {
        ledger: LedgerId,
        sender: AccountId,
        receiver: AccountId,
        amount: u128,
    },
    /// Overwrite `target`'s full ability mask on the ledger.
    SetAbilities {
        ledger: LedgerId,
        target: AccountId,
        abilities: Abilities,
    },
    /// Destroy (burn) an asset owned by `owner`.
    DestroyAsset {
        ledger: LedgerId,
        owner: AccountId,
        asset: AssetId,
    },
}

impl Action {
    /// The discriminant of this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::CreateAsset { .. } => ActionKind::CreateAsset,
            Action::TransferAsset { .. } => ActionKind::TransferAsset,
            Action::TransferValue { .. } => ActionKind::TransferValue,
            Action::SetAbilities { .. } => ActionKind::SetAbilities,
            Action::DestroyAsset { .. } => ActionKind::DestroyAsset,
        }
    }

    /// The ledger this action mutates.
    pub fn ledger(&self) -> LedgerId {
        match self {
            Action::CreateAsset { ledger, .. }
            | Action::TransferAsset { ledger, .. }
            | Action::TransferValue { ledger, .. }
            | Action::SetAbilities { ledger, .. }
            | Action::DestroyAsset { ledger, .. } => *ledger,
        }
    }

    /// The account whose holdings this action moves, when there is one.
    ///
    /// Creation and ability assignment have no consenting sender; their
    /// authority comes from the proxy's ability grant instead.
    pub fn sender(&self) -> Option<AccountId> {
        match self {
            Action::TransferAsset { sender, .. } | Action::TransferValue { sender, .. } => {
                Some(*sender)
            }
            Action::DestroyAsset { owner, .. } => Some(*owner),
            Action::CreateAsset { .. } | Action::SetAbilities { .. } => None,
        }
    }

    /// Return a copy with every zero sender/receiver slot replaced by
    /// `filler`. Non-zero slots are left untouched.
    pub fn fill_unspecified(&self, filler: AccountId) -> Action {
        let fill = |slot: &AccountId| if slot.is_zero() { filler } else { *slot };
        match self {
            Action::CreateAsset {
                ledger,
                receiver,
                asset,
                imprint,
            } => Action::CreateAsset {
                ledger: *ledger,
                receiver: fill(receiver),
                asset: *asset,
                imprint: *imprint,
            },
            Action::TransferAsset {
                ledger,
                sender,
                receiver,
                asset,
            } => Action::TransferAsset {
                ledger: *ledger,
                sender: fill(sender),
                receiver: fill(receiver),
                asset: *asset,
            },
            Action::TransferValue {
                ledger,
                sender,
                receiver,
                amount,
            } => Action::TransferValue {
                ledger: *ledger,
                sender: fill(sender),
                receiver: fill(receiver),
                amount: *amount,
            },
            Action::SetAbilities {
                ledger,
                target,
                abilities,
            } => Action::SetAbilities {
                ledger: *ledger,
                target: fill(target),
                abilities: *abilities,
            },
            Action::DestroyAsset {
                ledger,
                owner,
                asset,
            } => Action::DestroyAsset {
                ledger: *ledger,
                owner: fill(owner),
                asset: *asset,
            },
        }
    }

    /// True if any party slot is still the zero sentinel.
    pub fn has_unspecified_party(&self) -> bool {
        match self {
            Action::CreateAsset { receiver, .. } => receiver.is_zero(),
            Action::TransferAsset { sender, receiver, .. }
            | Action::TransferValue { sender, receiver, .. } => {
                sender.is_zero() || receiver.is_zero()
            }
            Action::SetAbilities { target, .. } => target.is_zero(),
            Action::DestroyAsset { owner, .. } => owner.is_zero(),
        }
    }
}

/// A batch of actions plus the metadata that authorizes it.
///
/// Orders are executed atomically by the gateway: the claim digest over the
/// order binds the action sequence, the signer list, the payer, the seed,
/// and the expiration — in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// The actions to apply, in order.
    pub actions: Vec<Action>,
    /// Accounts whose signatures authorize the order.
    pub signers: Vec<AccountId>,
    /// The account responsible for the order (and, when `automated_perform`
    /// is unset, the only account allowed to submit it).
    pub payer: AccountId,
    /// When set, zero sender/receiver slots are filled with the executing
    /// caller, who must be one of `signers`.
    pub wildcard_signer: bool,
    /// When set, any relayer may submit the order; otherwise only `payer`.
    pub automated_perform: bool,
}
