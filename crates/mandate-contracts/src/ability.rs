//! The ability bitmask model.
//!
//! An ability is a single permission bit governing one category of mutation
//! on a ledger; an account's abilities on a ledger are the OR-combination of
//! its granted bits. The bit values are a wire contract shared with every
//! other implementation of the protocol and must never be renumbered.
//!
//! Super abilities (ManageAbilities, AllowManageAbilities) govern mutation of
//! *other* accounts' masks. General abilities gate direct single-ledger
//! operations. The two `Allow*` general abilities are order-scoped: they
//! authorize an operation only when it arrives through the gateway, never
//! through the direct API.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// One permission bit.
///
/// The discriminant-to-bit mapping is fixed by the protocol:
///
/// | Ability                 | Bit  | Class                  |
/// |-------------------------|------|------------------------|
/// | ManageAbilities         | 1    | super                  |
/// | AllowManageAbilities    | 2    | super                  |
/// | CreateAsset             | 16   | general                |
/// | RevokeAsset             | 32   | general                |
/// | ToggleTransfers         | 64   | general                |
/// | UpdateAsset             | 128  | general                |
/// | UpdateUriBase           | 256  | general                |
/// | AllowCreateAsset        | 512  | general (order-scoped) |
/// | AllowUpdateAssetImprint | 1024 | general (order-scoped) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ability {
    ManageAbilities,
    AllowManageAbilities,
    CreateAsset,
    RevokeAsset,
    ToggleTransfers,
    UpdateAsset,
    UpdateUriBase,
    AllowCreateAsset,
    AllowUpdateAssetImprint,
}

impl Ability {
    /// Every defined ability, in ascending bit order.
    pub const ALL: [Ability; 9] = [
        Ability::ManageAbilities,
        Ability::AllowManageAbilities,
        Ability::CreateAsset,
        Ability::RevokeAsset,
        Ability::ToggleTransfers,
        Ability::UpdateAsset,
        Ability::UpdateUriBase,
        Ability::AllowCreateAsset,
        Ability::AllowUpdateAssetImprint,
    ];

    /// The reserved bit value of this ability.
    pub const fn bit(self) -> u32 {
        match self {
            Ability::ManageAbilities => 1,
            Ability::AllowManageAbilities => 2,
            Ability::CreateAsset => 16,
            Ability::RevokeAsset => 32,
            Ability::ToggleTransfers => 64,
            Ability::UpdateAsset => 128,
            Ability::UpdateUriBase => 256,
            Ability::AllowCreateAsset => 512,
            Ability::AllowUpdateAssetImprint => 1024,
        }
    }

    /// True for the two super abilities that mutate other accounts' masks.
    pub const fn is_super(self) -> bool {
        matches!(self, Ability::ManageAbilities | Ability::AllowManageAbilities)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ability::ManageAbilities => "manage-abilities",
            Ability::AllowManageAbilities => "allow-manage-abilities",
            Ability::CreateAsset => "create-asset",
            Ability::RevokeAsset => "revoke-asset",
            Ability::ToggleTransfers => "toggle-transfers",
            Ability::UpdateAsset => "update-asset",
            Ability::UpdateUriBase => "update-uri-base",
            Ability::AllowCreateAsset => "allow-create-asset",
            Ability::AllowUpdateAssetImprint => "allow-update-asset-imprint",
        };
        f.write_str(name)
    }
}

/// An OR-combined set of ability bits.
///
/// The invariant is plain bitmask algebra: `mask.has(a)` is exactly
/// `(mask.bits() & a.bit()) != 0`. Granting ORs bits in, revoking AND-NOTs
/// bits out, and neither touches unrelated bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Abilities(u32);

impl Abilities {
    /// The empty mask.
    pub const EMPTY: Abilities = Abilities(0);

    /// A mask holding every defined ability.
    pub fn all() -> Abilities {
        Ability::ALL
            .iter()
            .fold(Abilities::EMPTY, |mask, a| mask | *a)
    }

    /// Construct from raw bits. Undefined bits are preserved verbatim so a
    /// mask survives a round trip through storage unchanged.
    pub const fn from_bits(bits: u32) -> Abilities {
        Abilities(bits)
    }

    /// The raw bit value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if the mask contains the given ability bit.
    pub const fn has(self, ability: Ability) -> bool {
        self.0 & ability.bit() != 0
    }

    /// True if any bit is shared with `other`.
    pub const fn intersects(self, other: Abilities) -> bool {
        self.0 & other.0 != 0
    }

    /// The mask with every bit of `other` cleared (bitwise AND-NOT).
    pub const fn without(self, other: Abilities) -> Abilities {
        Abilities(self.0 & !other.0)
    }

    /// The mask with every bit of `other` set (bitwise OR).
    pub const fn union(self, other: Abilities) -> Abilities {
        Abilities(self.0 | other.0)
    }

    /// True if no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the defined abilities present in the mask.
    pub fn iter(self) -> impl Iterator<Item = Ability> {
        Ability::ALL.into_iter().filter(move |a| self.has(*a))
    }
}

impl From<Ability> for Abilities {
    fn from(ability: Ability) -> Self {
        Abilities(ability.bit())
    }
}

impl BitOr for Abilities {
    type Output = Abilities;

    fn bitor(self, rhs: Abilities) -> Abilities {
        self.union(rhs)
    }
}

impl BitOr<Ability> for Abilities {
    type Output = Abilities;

    fn bitor(self, rhs: Ability) -> Abilities {
        Abilities(self.0 | rhs.bit())
    }
}

impl BitOr for Ability {
    type Output = Abilities;

    fn bitor(self, rhs: Ability) -> Abilities {
        Abilities(self.bit() | rhs.bit())
    }
}

impl FromIterator<Ability> for Abilities {
    fn from_iter<I: IntoIterator<Item = Ability>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Abilities::EMPTY, |mask, a| mask | a)
    }
}

impl fmt::Display for Abilities {
    /// Render as the defined ability names joined by `|`, or `none`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<String> = self.iter().map(|a| a.to_string()).collect();
        if names.is_empty() {
            // Only undefined bits are set; show the raw value.
            return write!(f, "{:#x}", self.0);
        }
        f.write_str(&names.join("|"))
    }
}
