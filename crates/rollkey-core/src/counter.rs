//! Persisted monotonic sequence counter.
//!
//! Replay resistance rests entirely on the invariant that no two messages
//! sent under the same identity ever carry the same counter value. The
//! counter therefore persists `value + 1` durably *before* handing out
//! `value`: a crash between persist and transmit costs one counter value,
//! never reuses one.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::store::{KEY_SEQUENCE, SettingsStore, StoreError};

/// Errors that can occur while drawing a counter value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CounterError {
    /// The 32-bit counter space is used up.
    ///
    /// The counter refuses to wrap: a wrapped counter would reuse values
    /// the receiver has already accepted, silently breaking replay
    /// resistance. Re-enrolling establishes a fresh identity with a fresh
    /// counter.
    #[error("sequence counter exhausted; re-enroll to establish a fresh identity")]
    Exhausted,

    /// Reading or persisting the counter failed.
    ///
    /// Must be surfaced to the caller: proceeding without a durable
    /// increment risks counter reuse on the next activation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Hands out each 32-bit counter value exactly once per identity.
///
/// Clones share one serialization guard, so concurrent `next()` calls
/// through clones of the same counter never observe the same persisted
/// value. Distinct `SequenceCounter` instances over the same underlying
/// store are *not* serialized against each other; the persisted counter is
/// exclusively owned by one activation path (one identity, one process).
#[derive(Debug, Clone)]
pub struct SequenceCounter<S: SettingsStore> {
    store: S,
    guard: Arc<Mutex<()>>,
}

impl<S: SettingsStore> SequenceCounter<S> {
    /// Create a counter over the given settings store.
    pub fn new(store: S) -> Self {
        Self { store, guard: Arc::new(Mutex::new(())) }
    }

    /// Draw the next counter value.
    ///
    /// Reads the persisted value (absent means 0), durably persists
    /// `value + 1`, then returns `value`. The read-increment-persist
    /// sequence is atomic with respect to other callers holding a clone of
    /// this counter.
    ///
    /// # Errors
    ///
    /// - [`CounterError::Exhausted`] once the persisted value reaches
    ///   `u32::MAX`; no value is handed out.
    /// - [`CounterError::Store`] if the read fails, the persisted value is
    ///   corrupt, or the increment cannot be durably written. No value is
    ///   considered issued in that case.
    ///
    /// # Panics
    ///
    /// Panics if the serialization mutex is poisoned (a thread panicked
    /// mid-`next()`); continuing could hand out a duplicate value.
    #[allow(clippy::expect_used)]
    pub fn next(&self) -> Result<u32, CounterError> {
        let _serialized = self.guard.lock().expect("counter mutex poisoned");

        let value = self.read_persisted()?;
        if value == u32::MAX {
            return Err(CounterError::Exhausted);
        }

        // Persist before use: only after the increment is durable is the
        // value safe to put on the air.
        self.store.put(KEY_SEQUENCE, &(value + 1).to_string())?;

        tracing::debug!(counter = value, "issued sequence counter value");
        Ok(value)
    }

    /// Reset the counter for a freshly enrolled identity.
    ///
    /// Only valid as part of enrollment: the new identity has its own key,
    /// so its counter space starts over at 0.
    pub fn reset(&self) -> Result<(), CounterError> {
        #[allow(clippy::expect_used)]
        let _serialized = self.guard.lock().expect("counter mutex poisoned");
        self.store.put(KEY_SEQUENCE, "0")?;
        Ok(())
    }

    /// The value the next `next()` call would return, without issuing it.
    pub fn peek(&self) -> Result<u32, CounterError> {
        self.read_persisted()
    }

    fn read_persisted(&self) -> Result<u32, CounterError> {
        match self.store.get(KEY_SEQUENCE)? {
            None => Ok(0),
            Some(text) => text.parse::<u32>().map_err(|e| {
                // A corrupt counter is never silently reset to 0: that
                // would reissue values the receiver has already seen.
                CounterError::Store(StoreError::Corrupt {
                    key: KEY_SEQUENCE.to_string(),
                    reason: e.to_string(),
                })
            }),
        }
    }
}
