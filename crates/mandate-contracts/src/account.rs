//! Account, ledger, and asset identifier types.
//!
//! All identifiers are fixed-width and opaque. `AccountId` is the 20-byte
//! address-equivalent used for accounts, proxies, and the gateway itself;
//! `LedgerId` wraps the same shape because a ledger is addressed like an
//! account. The all-zero account is a sentinel meaning "unspecified" and is
//! never a valid party to an operation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MandateError;

/// A 20-byte account identifier.
///
/// Serialized as a `0x`-prefixed lowercase hex string in JSON and TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    /// The all-zero sentinel. Used for unspecified sender/receiver slots in
    /// wildcard orders; rejected everywhere a concrete account is required.
    pub const ZERO: AccountId = AccountId([0u8; 20]);

    /// Return true if this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = MandateError;

    /// Parse a `0x`-prefixed (or bare) 40-character hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| MandateError::ConfigError {
            reason: format!("invalid account id '{}': {}", s, e),
        })?;
        let arr: [u8; 20] = bytes.try_into().map_err(|_| MandateError::ConfigError {
            reason: format!("invalid account id '{}': expected 20 bytes", s),
        })?;
        Ok(AccountId(arr))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifier of a ledger (an asset or value registry).
///
/// Ledgers are addressed exactly like accounts, so this is a transparent
/// wrapper that exists only to keep the two spaces from being mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerId(pub AccountId);

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LedgerId {
    type Err = MandateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LedgerId(s.parse()?))
    }
}

/// Identifier of a single asset within one asset ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AssetId(pub u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A 32-byte digest.
///
/// Used both for claim digests (Keccak-256 of the encoded authorization) and
/// for asset imprints (the content commitment an asset carries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// The all-zero digest, used as the "no imprint" placeholder.
    pub const ZERO: Digest = Digest([0u8; 32]);

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Digest {
    type Err = MandateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| MandateError::ConfigError {
            reason: format!("invalid digest '{}': {}", s, e),
        })?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| MandateError::ConfigError {
            reason: format!("invalid digest '{}': expected 32 bytes", s),
        })?;
        Ok(Digest(arr))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
