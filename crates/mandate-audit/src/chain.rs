//! Hash-chain primitives: entry hashing and chain integrity verification.
//!
//! The chain is built by concatenating deterministic byte sequences fed
//! into SHA-256. Every field that contributes to an entry's hash is listed
//! explicitly so nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. gateway as 20 raw bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. canonical JSON of record (serde_json with no pretty-printing)

use sha2::{Digest, Sha256};

use mandate_contracts::{account::AccountId, effect::EffectRecord};

use crate::record::JournalEntry;

/// Compute the SHA-256 hash for a single journal entry.
///
/// The hash commits to every field that uniquely identifies an entry: its
/// position in the chain (`sequence`), the gateway it belongs to, its link
/// to the previous entry (`prev_hash`), and the full effect record.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `record` cannot be serialized to JSON — which cannot happen
/// for the well-formed `EffectRecord` type.
pub fn hash_entry(
    gateway: AccountId,
    sequence: u64,
    record: &EffectRecord,
    prev_hash: &str,
) -> String {
    // serde_json::to_vec produces canonical, deterministic JSON without
    // trailing whitespace or key reordering across calls on the same value.
    let record_json =
        serde_json::to_vec(record).expect("EffectRecord must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(gateway.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    hex::encode(hasher.finalize())
}

/// Verify the integrity of a hash chain.
///
/// Returns `true` when the chain is valid according to both rules:
///
/// 1. **Prev-hash linkage** — each entry's `prev_hash` equals the
///    `this_hash` of the preceding entry (or `GENESIS_HASH` for entry 0).
/// 2. **Hash correctness** — each entry's `this_hash` matches the value
///    recomputed from its own fields.
///
/// Returns `false` the moment any mismatch is detected. An empty chain is
/// defined as valid.
pub fn verify_chain(entries: &[JournalEntry]) -> bool {
    let mut expected_prev = JournalEntry::GENESIS_HASH.to_string();

    for entry in entries {
        // Rule 1: the stored prev_hash must match what we expect.
        if entry.prev_hash != expected_prev {
            return false;
        }

        // Rule 2: recompute this_hash and compare to the stored value.
        let recomputed = hash_entry(
            entry.gateway,
            entry.sequence,
            &entry.record,
            &entry.prev_hash,
        );
        if entry.this_hash != recomputed {
            return false;
        }

        // Advance the expected prev_hash to this entry's hash.
        expected_prev = entry.this_hash.clone();
    }

    true
}
