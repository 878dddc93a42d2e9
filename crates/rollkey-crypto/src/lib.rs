//! Rollkey Cryptographic Primitives
//!
//! Cryptographic building blocks for the Rollkey rolling-code broadcast
//! protocol. Pure functions with deterministic outputs and no I/O.
//!
//! # Key Lifecycle
//!
//! A transmitter is enrolled once against a receiver module by deriving a
//! per-transmitter key from the receiver's master secret. Every activation
//! afterwards authenticates a fresh counter value under that key.
//!
//! ```text
//! Enrollment Secret (receiver master key, out-of-band)
//!        │
//!        ▼
//! HMAC-SHA-256 → Transmit Key (per transmitter identifier)
//!        │
//!        ▼
//! Rolling Code → 8-byte payload: BE32(counter) || tag
//! ```
//!
//! The counter travels in the clear so the receiver can reconstruct the
//! exact HMAC input; the 4-byte truncated tag proves key possession for
//! that specific counter value. Replay resistance comes from the receiver
//! only accepting counters strictly greater than the last accepted one.
//!
//! # Security
//!
//! Identifier binding:
//! - The transmit key is derived over the transmitter identifier, so a key
//!   derived for identifier A cannot forge messages under identifier B even
//!   when both installs share the same enrollment secret.
//!
//! Replay resistance:
//! - The truncated tag alone does not prevent replay; the receiver's
//!   strictly-increasing counter check does. [`Verifier`] enforces both.
//!
//! Tag truncation:
//! - The 4-byte tag is a deliberate size/security tradeoff for short
//!   broadcast payloads. It is a fixed protocol constant shared by sender
//!   and receiver, not a tunable.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod key;
mod payload;

pub use key::{TRANSMIT_KEY_SIZE, TransmitKey, derive_transmit_key};
pub use payload::{
    PAYLOAD_SIZE, Payload, PayloadError, TAG_SIZE, Verifier, encode_payload,
};
