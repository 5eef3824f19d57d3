//! In-memory implementation of `StateStore`.
//!
//! `MemoryStore` is the reference implementation of the shared state store:
//! a `HashMap` protected by a `Mutex`, plus an undo log that makes
//! checkpoint/rollback cheap. Every write pushes the key's previous value
//! onto the log; rolling back replays the log down to the mark, restoring
//! the exact prior state.
//!
//! All operations serialize behind the one mutex, which is the whole
//! concurrency model: a strict total order of operations with no observable
//! interleaving.

use std::collections::HashMap;
use std::sync::Mutex;

use mandate_core::traits::{Checkpoint, StateStore, StoreKey};

// ── Internal mutable state ────────────────────────────────────────────────────

struct MemoryStoreInner {
    /// Current key-value contents.
    map: HashMap<StoreKey, Vec<u8>>,
    /// Previous value per write, in write order. `None` means the key was
    /// absent before the write.
    undo: Vec<(StoreKey, Option<Vec<u8>>)>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory store with undo-log rollback.
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryStoreInner {
                map: HashMap::new(),
                undo: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &StoreKey) -> Option<Vec<u8>> {
        let inner = self.inner.lock().expect("state store lock poisoned");
        inner.map.get(key).cloned()
    }

    fn put(&self, key: StoreKey, value: Vec<u8>) {
        let mut inner = self.inner.lock().expect("state store lock poisoned");
        let previous = inner.map.insert(key.clone(), value);
        inner.undo.push((key, previous));
    }

    fn remove(&self, key: &StoreKey) {
        let mut inner = self.inner.lock().expect("state store lock poisoned");
        let previous = inner.map.remove(key);
        inner.undo.push((key.clone(), previous));
    }

    fn checkpoint(&self) -> Checkpoint {
        let inner = self.inner.lock().expect("state store lock poisoned");
        Checkpoint::at_depth(inner.undo.len())
    }

    fn rollback(&self, mark: Checkpoint) {
        let mut inner = self.inner.lock().expect("state store lock poisoned");
        while inner.undo.len() > mark.depth() {
            // Replay newest-first so every key ends at its pre-mark value.
            let (key, previous) = inner.undo.pop().expect("undo log underflow");
            match previous {
                Some(value) => inner.map.insert(key, value),
                None => inner.map.remove(&key),
            };
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
