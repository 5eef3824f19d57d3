//! Signature recovery and client-side signing.
//!
//! `Secp256k1Recovery` implements the `SignatureRecovery` trait: it recovers
//! the signing account from a claim digest and an (r, s, v) signature under
//! one of three message encodings. `Raw` recovers over the digest itself;
//! the two prefixed kinds re-hash a fixed textual prefix concatenated with
//! the digest before recovery — one spelling the digest length in ASCII
//! digits, one (the hardware-wallet convention) as a single raw length
//! byte.
//!
//! The recovered identity is the low 20 bytes of the Keccak-256 of the
//! uncompressed public key — the standard address derivation.
//!
//! `Signer` is the client-side counterpart used by relayer tooling, the
//! demo, and tests: it signs digests off the critical path, producing
//! signatures the gateway later consumes exactly once.

use libsecp256k1::{Message, PublicKey, RecoveryId, SecretKey};
use tracing::debug;

use mandate_contracts::{
    account::{AccountId, Digest},
    error::{MandateError, MandateResult},
    signature::{Signature, SignatureKind},
};
use mandate_core::traits::SignatureRecovery;

use crate::codec::keccak256;

/// Prefix for `StandardPrefixed` signatures: the digest length spelled as
/// the ASCII digits "32".
pub const STANDARD_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Prefix for `HardwarePrefixed` signatures: the digest length as the
/// single raw byte 0x20.
pub const HARDWARE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n\x20";

/// The message actually signed for a claim digest under `kind`.
fn signing_message(digest: &Digest, kind: SignatureKind) -> [u8; 32] {
    match kind {
        SignatureKind::Raw => digest.0,
        SignatureKind::StandardPrefixed => {
            let mut buf = Vec::with_capacity(STANDARD_PREFIX.len() + 32);
            buf.extend_from_slice(STANDARD_PREFIX);
            buf.extend_from_slice(digest.as_bytes());
            keccak256(&buf)
        }
        SignatureKind::HardwarePrefixed => {
            let mut buf = Vec::with_capacity(HARDWARE_PREFIX.len() + 32);
            buf.extend_from_slice(HARDWARE_PREFIX);
            buf.extend_from_slice(digest.as_bytes());
            keccak256(&buf)
        }
    }
}

/// The account an uncompressed public key resolves to: the low 20 bytes of
/// Keccak-256 over the 64 coordinate bytes.
fn address_of(public: &PublicKey) -> AccountId {
    // serialize() yields 65 bytes: the 0x04 marker followed by X and Y.
    let serialized = public.serialize();
    let hash = keccak256(&serialized[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    AccountId(bytes)
}

/// The production signature verifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1Recovery;

impl SignatureRecovery for Secp256k1Recovery {
    /// Recover the signing account.
    ///
    /// Deterministic: the same (digest, signature) pair always recovers the
    /// same account. Malformed scalars and recovery bytes fail with
    /// `InvalidSignature`; an intact but wrong signature recovers a
    /// different account, which the caller's comparison catches.
    fn recover(&self, digest: &Digest, signature: &Signature) -> MandateResult<AccountId> {
        let message = Message::parse(&signing_message(digest, signature.kind));

        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&signature.r);
        sig_bytes[32..].copy_from_slice(&signature.s);
        let parsed =
            libsecp256k1::Signature::parse_standard(&sig_bytes).map_err(|_| {
                MandateError::InvalidSignature {
                    signer: AccountId::ZERO,
                }
            })?;

        // 27/28 is the classic recovery encoding; 0/1 is accepted bare.
        let recovery_byte = match signature.v {
            27 | 28 => signature.v - 27,
            0 | 1 => signature.v,
            _ => {
                return Err(MandateError::InvalidSignature {
                    signer: AccountId::ZERO,
                })
            }
        };
        let recovery_id = RecoveryId::parse(recovery_byte).map_err(|_| {
            MandateError::InvalidSignature {
                signer: AccountId::ZERO,
            }
        })?;

        let public = libsecp256k1::recover(&message, &parsed, &recovery_id).map_err(|_| {
            MandateError::InvalidSignature {
                signer: AccountId::ZERO,
            }
        })?;

        let account = address_of(&public);
        debug!(digest = %digest, kind = ?signature.kind, recovered = %account, "signature recovered");
        Ok(account)
    }
}

/// A client-side signing key.
///
/// Holds a secp256k1 secret key and produces signatures in any of the three
/// kinds. Signing happens off the gateway's critical path; the resulting
/// signature is consumed exactly once by verification and never stored.
pub struct Signer {
    secret: SecretKey,
}

impl Signer {
    /// Build a signer from 32 raw secret-key bytes.
    ///
    /// Fails with `InvalidSignature` when the bytes are not a valid curve
    /// scalar.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> MandateResult<Self> {
        let secret = SecretKey::parse(bytes).map_err(|_| MandateError::InvalidSignature {
            signer: AccountId::ZERO,
        })?;
        Ok(Self { secret })
    }

    /// The account this signer's signatures recover to.
    pub fn address(&self) -> AccountId {
        address_of(&PublicKey::from_secret_key(&self.secret))
    }

    /// Sign `digest` under the given encoding kind.
    pub fn sign(&self, digest: &Digest, kind: SignatureKind) -> Signature {
        let message = Message::parse(&signing_message(digest, kind));
        let (sig, recovery_id) = libsecp256k1::sign(&message, &self.secret);
        let serialized = sig.serialize();

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&serialized[..32]);
        s.copy_from_slice(&serialized[32..]);

        Signature {
            r,
            s,
            v: recovery_id.serialize() + 27,
            kind,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
