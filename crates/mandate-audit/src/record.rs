//! Journal entry and export types.
//!
//! `JournalEntry` is a single entry in the hash chain — it wraps an
//! `EffectRecord` with sequence numbering and the SHA-256 hashes that make
//! tampering detectable. `JournalExport` is the sealed snapshot produced on
//! demand for indexers and observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mandate_contracts::{account::AccountId, effect::EffectRecord};

/// A single entry in the SHA-256 hash chain of one gateway's effects.
///
/// Each entry commits to the previous entry via `prev_hash`, forming an
/// append-only chain. Modifying any field — including those of the embedded
/// `record` — invalidates `this_hash` and every subsequent `prev_hash`,
/// which `verify_chain` detects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Monotonically increasing position in the chain, starting at 0.
    pub sequence: u64,

    /// The gateway whose effects are chained here.
    pub gateway: AccountId,

    /// The applied state change.
    pub record: EffectRecord,

    /// SHA-256 hash (hex) of the previous entry, or `GENESIS_HASH` for the
    /// first entry.
    pub prev_hash: String,

    /// SHA-256 hash (hex) of this entry's canonical content.
    ///
    /// Computed by `hash_entry()` over (gateway, sequence, prev_hash,
    /// canonical JSON of record).
    pub this_hash: String,
}

impl JournalEntry {
    /// The sentinel `prev_hash` used for the first entry in every chain.
    ///
    /// 64 hex zeros — a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A sealed snapshot of one gateway's effect journal.
///
/// Produced by `InMemoryEffectJournal::export()`. The `terminal_hash` is
/// the `this_hash` of the last entry and serves as a compact commitment to
/// the entire journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalExport {
    /// The gateway whose effects are recorded here.
    pub gateway: AccountId,

    /// All entries in chain order (sequence 0 first).
    pub entries: Vec<JournalEntry>,

    /// Wall-clock time (UTC) the snapshot was exported.
    pub exported_at: DateTime<Utc>,

    /// The `this_hash` of the last entry. Empty string if the journal is
    /// empty.
    pub terminal_hash: String,
}
