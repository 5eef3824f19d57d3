//! Signature encoding types.
//!
//! A signature is the (r, s, v) triple of a recoverable secp256k1 ECDSA
//! signature plus a kind tag naming the message encoding the signer used.
//! Signatures are produced off the critical path by the authorizing account
//! and consumed exactly once by the verifier; they are never stored beyond
//! the verification call.

use serde::{Deserialize, Serialize};

use crate::error::{MandateError, MandateResult};

/// How the digest was wrapped before signing.
///
/// This is a closed union: an unrecognized tag is a fatal
/// `InvalidSignatureKind` — there is no default or fallback encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureKind {
    /// The common prefixed convention: the signer hashed
    /// `"\x19Ethereum Signed Message:\n32"` followed by the 32-byte digest.
    StandardPrefixed,
    /// The hardware-wallet convention: the length is a single raw byte
    /// (`"\x19Ethereum Signed Message:\n\x20"`) rather than ASCII digits.
    HardwarePrefixed,
    /// No prefix; the signature is over the digest itself.
    Raw,
}

impl SignatureKind {
    /// The wire tag of this kind.
    pub const fn tag(self) -> u8 {
        match self {
            SignatureKind::StandardPrefixed => 0,
            SignatureKind::HardwarePrefixed => 1,
            SignatureKind::Raw => 2,
        }
    }

    /// Decode a wire tag. Unknown tags are fatal.
    pub fn from_tag(tag: u8) -> MandateResult<SignatureKind> {
        match tag {
            0 => Ok(SignatureKind::StandardPrefixed),
            1 => Ok(SignatureKind::HardwarePrefixed),
            2 => Ok(SignatureKind::Raw),
            other => Err(MandateError::InvalidSignatureKind { tag: other }),
        }
    }
}

/// A recoverable ECDSA signature over a claim digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// The r scalar.
    pub r: [u8; 32],
    /// The s scalar.
    pub s: [u8; 32],
    /// The recovery byte; 27/28 in the classic encoding, 0/1 accepted too.
    pub v: u8,
    /// The message encoding the signer used.
    pub kind: SignatureKind,
}
