//! In-memory implementation of `EffectWriter`.
//!
//! `InMemoryEffectJournal` is the reference implementation of the effect
//! journal. It keeps all entries in a `Vec` protected by a `Mutex`, making
//! it safe to share between the gateway and any observers.
//!
//! Use `export()` at any point to obtain a sealed `JournalExport`, and
//! `verify_integrity()` to confirm the chain has not been tampered with in
//! memory.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::info;

use mandate_contracts::{
    account::AccountId,
    effect::EffectRecord,
    error::{MandateError, MandateResult},
};
use mandate_core::traits::EffectWriter;

use crate::{
    chain::{hash_entry, verify_chain},
    record::{JournalEntry, JournalExport},
};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemoryEffectJournal`.
pub(crate) struct JournalState {
    /// All entries appended so far, in chain order.
    pub(crate) entries: Vec<JournalEntry>,

    /// The next sequence number to assign (starts at 0).
    pub(crate) sequence: u64,

    /// The `this_hash` of the last appended entry, or `GENESIS_HASH` before
    /// any entry has been written.
    pub(crate) last_hash: String,
}

// ── Public journal ────────────────────────────────────────────────────────────

/// An in-memory, append-only effect journal backed by a SHA-256 hash chain.
///
/// # Thread safety
///
/// `append()` acquires a `Mutex` internally. Multiple threads may hold
/// clones of the `Arc<Mutex<JournalState>>` without additional
/// synchronization.
pub struct InMemoryEffectJournal {
    gateway: AccountId,
    pub(crate) state: Arc<Mutex<JournalState>>,
}

impl InMemoryEffectJournal {
    /// Create a new journal for the given gateway.
    ///
    /// The internal `last_hash` is initialized to
    /// `JournalEntry::GENESIS_HASH` so the first entry's `prev_hash` is
    /// automatically correct.
    pub fn new(gateway: AccountId) -> Self {
        let state = JournalState {
            entries: Vec::new(),
            sequence: 0,
            last_hash: JournalEntry::GENESIS_HASH.to_string(),
        };
        Self {
            gateway,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Export a sealed `JournalExport` containing all entries appended so
    /// far.
    ///
    /// The `terminal_hash` is the `this_hash` of the last entry, or an
    /// empty string when no entries have been appended.
    pub fn export(&self) -> JournalExport {
        let state = self.state.lock().expect("journal state lock poisoned");
        let terminal_hash = state
            .entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        info!(
            gateway = %self.gateway,
            entry_count = state.entries.len(),
            terminal_hash = %terminal_hash,
            "effect journal exported"
        );

        JournalExport {
            gateway: self.gateway,
            entries: state.entries.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        }
    }

    /// Verify that the in-memory chain has not been tampered with.
    ///
    /// Delegates to `verify_chain`, which checks both prev-hash linkage and
    /// hash correctness for every entry.
    pub fn verify_integrity(&self) -> bool {
        let state = self.state.lock().expect("journal state lock poisoned");
        verify_chain(&state.entries)
    }

    /// The number of entries appended so far.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .expect("journal state lock poisoned")
            .entries
            .len()
    }

    /// True when no entry has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── EffectWriter impl ─────────────────────────────────────────────────────────

impl EffectWriter for InMemoryEffectJournal {
    /// Append one effect record to the hash chain.
    ///
    /// Computes `this_hash` from (gateway, sequence, prev_hash, record),
    /// wraps the record in a `JournalEntry`, appends it, then advances the
    /// sequence counter and `last_hash`.
    ///
    /// Returns `Err(JournalWriteFailed)` only if the internal mutex is
    /// poisoned, which cannot happen under normal operation.
    fn append(&self, record: &EffectRecord) -> MandateResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| MandateError::JournalWriteFailed {
                reason: format!("journal state lock poisoned: {}", e),
            })?;

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;

        let this_hash = hash_entry(self.gateway, sequence, record, &prev_hash);

        let entry = JournalEntry {
            sequence,
            gateway: self.gateway,
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        };

        state.entries.push(entry);
        state.sequence += 1;
        state.last_hash = this_hash;

        Ok(())
    }
}
