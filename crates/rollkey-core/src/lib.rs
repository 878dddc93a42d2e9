//! Rollkey protocol core
//!
//! Connectionless rolling-code authentication for broadcast-only radio
//! messages. A transmitter is bound to a receiver module once, through an
//! out-of-band enrollment secret, and every activation afterwards emits a
//! short self-authenticating payload the receiver can verify with a single
//! keyed-hash computation.
//!
//! # Components
//!
//! - [`DecodedSecret`]: tolerant Base32 decoding of the installer-typed
//!   enrollment secret, with a CRC-32 checksum for visual cross-checking.
//! - [`Identity`]: the enrolled (identifier, transmit key) pair; the
//!   explicit commit step from decoded secret to identity.
//! - [`SettingsStore`]: abstraction over the platform key-value store, with
//!   an in-memory backend for tests and simulation.
//! - [`IdentityStore`]: identity persistence; missing or corrupt state maps
//!   to an explicit not-provisioned outcome that triggers re-enrollment.
//! - [`SequenceCounter`]: persisted monotonic counter; each value is handed
//!   out exactly once per identity.
//! - [`Remote`]: activation orchestration tying the above to a
//!   [`Broadcaster`] adapter.
//!
//! No component holds ambient global state: the protocol core is explicit
//! state in, explicit state out, fully testable without a radio stack.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod counter;
mod enrollment;
mod identity;
mod identity_store;
mod remote;
pub mod store;

pub use counter::{CounterError, SequenceCounter};
pub use enrollment::{DecodedSecret, EnrollmentError};
pub use identity::{Identity, format_identifier, parse_identifier};
pub use identity_store::{IdentityError, IdentityStore};
pub use remote::{Activation, BroadcastError, Broadcaster, Remote, RemoteError};
pub use store::{MemoryStore, SettingsStore, StoreError};
