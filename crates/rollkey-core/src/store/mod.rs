//! Settings store abstraction.
//!
//! Trait-based abstraction over the platform's persisted key-value store
//! (shared preferences, a settings database, a file). The trait is
//! synchronous and string-typed; the protocol core owns the encoding of
//! each value.
//!
//! # Persisted keys
//!
//! | Key           | Value                                             |
//! |---------------|---------------------------------------------------|
//! | `identifier`  | canonical identifier text (see                    |
//! |               | [`format_identifier`](crate::format_identifier))  |
//! | `transmitKey` | base64 of the 32 raw key bytes                    |
//! | `sequence`    | decimal next counter value                        |

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

/// Persisted key for the identity's identifier text.
pub const KEY_IDENTIFIER: &str = "identifier";

/// Persisted key for the base64-encoded transmit key.
pub const KEY_TRANSMIT_KEY: &str = "transmitKey";

/// Persisted key for the next sequence counter value.
pub const KEY_SEQUENCE: &str = "sequence";

/// Persisted key-value store abstraction.
///
/// Must be Clone (shared by the identity store and the counter), Send +
/// Sync, and synchronous. Implementations typically share internal state
/// via Arc, so clones access the same underlying storage.
///
/// `put` must be durable when it returns `Ok`: the sequence counter relies
/// on the incremented value being persisted before the corresponding
/// message is considered sent. A store that buffers writes reopens the
/// replay window the counter exists to close.
pub trait SettingsStore: Clone + Send + Sync + 'static {
    /// Read a value. `None` if the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Durably write a value, replacing any previous one.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
