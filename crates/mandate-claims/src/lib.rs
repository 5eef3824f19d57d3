//! # mandate-claims
//!
//! Concrete claim machinery for the MANDATE gateway:
//!
//! - `KeccakClaimCodec` — deterministic, order-sensitive claim digests
//! - `Secp256k1Recovery` — v/r/s signature recovery under three message
//!   encodings, plus the client-side `Signer`
//! - `StoredClaimRegistry` — one-way claim lifecycle over the shared store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mandate_claims::{KeccakClaimCodec, Secp256k1Recovery, Signer, StoredClaimRegistry};
//! use mandate_core::traits::{ClaimEncoder, SignatureRecovery};
//!
//! let digest = KeccakClaimCodec.approval_digest(gateway_id, &approval);
//! let signature = signer.sign(&digest, SignatureKind::StandardPrefixed);
//! assert!(Secp256k1Recovery.verify(signer.address(), &digest, &signature));
//! ```

pub mod codec;
pub mod registry;
pub mod signature;

pub use codec::{keccak256, KeccakClaimCodec};
pub use registry::StoredClaimRegistry;
pub use signature::{Secp256k1Recovery, Signer, HARDWARE_PREFIX, STANDARD_PREFIX};
