//! # mandate-contracts
//!
//! Shared types, identifiers, and error contracts for the MANDATE gateway.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, the ability bitmask model, and error
//! types.

pub mod ability;
pub mod account;
pub mod action;
pub mod capability;
pub mod claim;
pub mod effect;
pub mod error;
pub mod signature;

#[cfg(test)]
mod tests {
    use super::*;
    use ability::{Abilities, Ability};
    use account::{AccountId, AssetId, Digest, LedgerId};
    use action::{Action, ActionKind};
    use claim::ClaimState;
    use error::MandateError;
    use signature::SignatureKind;

    // ── Ability bitmask algebra ──────────────────────────────────────────────

    #[test]
    fn ability_bits_match_reserved_values() {
        assert_eq!(Ability::ManageAbilities.bit(), 1);
        assert_eq!(Ability::AllowManageAbilities.bit(), 2);
        assert_eq!(Ability::CreateAsset.bit(), 16);
        assert_eq!(Ability::RevokeAsset.bit(), 32);
        assert_eq!(Ability::ToggleTransfers.bit(), 64);
        assert_eq!(Ability::UpdateAsset.bit(), 128);
        assert_eq!(Ability::UpdateUriBase.bit(), 256);
        assert_eq!(Ability::AllowCreateAsset.bit(), 512);
        assert_eq!(Ability::AllowUpdateAssetImprint.bit(), 1024);
    }

    /// CREATE_ASSET | UPDATE_ASSET must equal 144, contain UPDATE_ASSET,
    /// and not contain REVOKE_ASSET.
    #[test]
    fn ability_mask_combination() {
        let mask = Ability::CreateAsset | Ability::UpdateAsset;
        assert_eq!(mask.bits(), 144);
        assert!(mask.has(Ability::UpdateAsset));
        assert!(!mask.has(Ability::RevokeAsset));
    }

    /// Granting a mask and then revoking the same mask returns the value to
    /// its prior state and leaves unrelated bits untouched.
    #[test]
    fn ability_mask_grant_then_revoke_round_trips() {
        let before = Abilities::from(Ability::ManageAbilities) | Ability::UpdateUriBase;
        let grant = Ability::CreateAsset | Ability::RevokeAsset;

        let granted = before.union(grant);
        assert!(granted.has(Ability::CreateAsset));
        assert!(granted.has(Ability::ManageAbilities));

        let revoked = granted.without(grant);
        assert_eq!(revoked, before);
        assert!(revoked.has(Ability::UpdateUriBase));
    }

    #[test]
    fn ability_mask_preserves_undefined_bits() {
        // Bit 4 and 8 are unassigned; a stored mask containing them must
        // survive a round trip unchanged.
        let mask = Abilities::from_bits(4 | 8 | 16);
        assert_eq!(mask.bits(), 28);
        assert!(mask.has(Ability::CreateAsset));
        assert_eq!(mask.without(Abilities::from(Ability::CreateAsset)).bits(), 12);
    }

    #[test]
    fn ability_all_holds_every_bit() {
        let all = Abilities::all();
        for ability in Ability::ALL {
            assert!(all.has(ability), "all() must contain {}", ability);
        }
        assert_eq!(all.bits(), 1 + 2 + 16 + 32 + 64 + 128 + 256 + 512 + 1024);
    }

    #[test]
    fn super_abilities_are_exactly_the_two_manage_bits() {
        for ability in Ability::ALL {
            let expected = matches!(
                ability,
                Ability::ManageAbilities | Ability::AllowManageAbilities
            );
            assert_eq!(ability.is_super(), expected);
        }
    }

    // ── Action kind tags ─────────────────────────────────────────────────────

    #[test]
    fn action_kind_tags_skip_four() {
        assert_eq!(ActionKind::CreateAsset.tag(), 1);
        assert_eq!(ActionKind::TransferAsset.tag(), 2);
        assert_eq!(ActionKind::TransferValue.tag(), 3);
        assert_eq!(ActionKind::SetAbilities.tag(), 5);
        assert_eq!(ActionKind::DestroyAsset.tag(), 6);
    }

    #[test]
    fn action_kind_reserved_tag_rejected() {
        assert!(ActionKind::from_tag(4).is_err(), "reserved tag 4 must not decode");
        assert!(ActionKind::from_tag(0).is_err());
        assert!(ActionKind::from_tag(7).is_err());
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_tag(kind.tag()).unwrap(), kind);
        }
    }

    // ── Wildcard slot handling ───────────────────────────────────────────────

    #[test]
    fn action_fill_unspecified_replaces_only_zero_slots() {
        let ledger = LedgerId(AccountId([0xAA; 20]));
        let sender = AccountId([1; 20]);
        let filler = AccountId([9; 20]);

        let action = Action::TransferAsset {
            ledger,
            sender,
            receiver: AccountId::ZERO,
            asset: AssetId(7),
        };
        assert!(action.has_unspecified_party());

        let filled = action.fill_unspecified(filler);
        assert!(!filled.has_unspecified_party());
        match filled {
            Action::TransferAsset { sender: s, receiver: r, .. } => {
                assert_eq!(s, sender, "non-zero slot must not be touched");
                assert_eq!(r, filler);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    // ── Identifier serde ─────────────────────────────────────────────────────

    #[test]
    fn account_id_hex_round_trips() {
        let id = AccountId([0xAB; 20]);
        let text = id.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 42);

        let parsed: AccountId = text.parse().unwrap();
        assert_eq!(parsed, id);

        let json = serde_json::to_string(&id).unwrap();
        let decoded: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn account_id_rejects_wrong_length() {
        assert!("0xABCD".parse::<AccountId>().is_err());
        assert!("not-hex".parse::<AccountId>().is_err());
    }

    #[test]
    fn digest_hex_round_trips() {
        let digest = Digest([0x5E; 32]);
        let parsed: Digest = digest.to_string().parse().unwrap();
        assert_eq!(parsed, digest);
    }

    // ── Claim state and signature kinds ──────────────────────────────────────

    #[test]
    fn claim_state_storage_tags_round_trip() {
        for state in [ClaimState::Unclaimed, ClaimState::Performed, ClaimState::Cancelled] {
            assert_eq!(ClaimState::from_byte(state.to_byte()), state);
        }
    }

    #[test]
    fn signature_kind_unknown_tag_is_fatal() {
        for kind in [
            SignatureKind::StandardPrefixed,
            SignatureKind::HardwarePrefixed,
            SignatureKind::Raw,
        ] {
            assert_eq!(SignatureKind::from_tag(kind.tag()).unwrap(), kind);
        }

        match SignatureKind::from_tag(3) {
            Err(MandateError::InvalidSignatureKind { tag }) => assert_eq!(tag, 3),
            other => panic!("expected InvalidSignatureKind, got {:?}", other),
        }
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_unauthorized_display() {
        let err = MandateError::Unauthorized {
            account: AccountId([2; 20]),
            ledger: LedgerId(AccountId([3; 20])),
            required: Abilities::from(Ability::CreateAsset),
        };
        let msg = err.to_string();
        assert!(msg.contains("not authorized"));
        assert!(msg.contains("create-asset"));
    }

    #[test]
    fn error_insufficient_balance_display() {
        let err = MandateError::InsufficientBalance {
            account: AccountId([2; 20]),
            required: 500,
            available: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn error_capability_not_supported_display() {
        let err = MandateError::CapabilityNotSupported {
            ledger: LedgerId(AccountId([3; 20])),
            capability: "burning".to_string(),
        };
        assert!(err.to_string().contains("does not support burning"));
    }

    #[test]
    fn error_claim_lifecycle_displays() {
        assert!(MandateError::ClaimAlreadyPerformed
            .to_string()
            .contains("already been performed"));
        assert!(MandateError::ClaimCancelled.to_string().contains("cancelled"));
    }
}
