//! Rolling-code payload encoding and receiver-side verification.
//!
//! Wire layout (8 bytes, fixed):
//!
//! ```text
//! [counter: 4 bytes BE] [tag: first 4 bytes of HMAC-SHA-256(key, counter BE)]
//! ```
//!
//! The counter is sent in the clear so the receiver can reconstruct the
//! exact HMAC input without out-of-band sequence state. The truncated tag
//! gives a resource-constrained receiver a single-keyed-hash verification
//! step.

use hmac::Mac;
use thiserror::Error;

use crate::key::{TransmitKey, hmac_sha256};

/// Size of the complete broadcast payload in bytes.
pub const PAYLOAD_SIZE: usize = 8;

/// Size of the truncated authentication tag in bytes.
///
/// Fixed protocol constant: sender and receiver must agree on it.
pub const TAG_SIZE: usize = 4;

/// Errors from parsing received payload bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Payload is not exactly [`PAYLOAD_SIZE`] bytes.
    #[error("invalid payload length: got {got}, expected {PAYLOAD_SIZE}")]
    InvalidLength {
        /// Length of the rejected input.
        got: usize,
    },
}

/// A parsed rolling-code payload.
///
/// Pure data view over the 8 wire bytes. Parsing performs no
/// authentication; use [`Verifier`] to check the tag and counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload {
    bytes: [u8; PAYLOAD_SIZE],
}

impl Payload {
    /// Parse received bytes. Length must be exactly [`PAYLOAD_SIZE`].
    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        let bytes: [u8; PAYLOAD_SIZE] =
            bytes.try_into().map_err(|_| PayloadError::InvalidLength { got: bytes.len() })?;
        Ok(Self { bytes })
    }

    /// Counter value carried in the clear.
    pub fn counter(&self) -> u32 {
        u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// Truncated authentication tag.
    pub fn tag(&self) -> &[u8] {
        &self.bytes[4..]
    }

    /// Complete wire bytes.
    pub fn as_bytes(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.bytes
    }
}

impl From<[u8; PAYLOAD_SIZE]> for Payload {
    fn from(bytes: [u8; PAYLOAD_SIZE]) -> Self {
        Self { bytes }
    }
}

/// Encode the authenticated payload for one activation.
///
/// `BE32(counter) || truncate4(HMAC-SHA-256(key, BE32(counter)))`.
/// Always exactly [`PAYLOAD_SIZE`] bytes.
#[must_use]
pub fn encode_payload(counter: u32, key: &TransmitKey) -> [u8; PAYLOAD_SIZE] {
    let counter_be = counter.to_be_bytes();

    let mut mac = hmac_sha256(key.as_bytes());
    mac.update(&counter_be);
    let digest = mac.finalize().into_bytes();

    let mut payload = [0u8; PAYLOAD_SIZE];
    payload[..4].copy_from_slice(&counter_be);
    payload[4..].copy_from_slice(&digest[..TAG_SIZE]);
    payload
}

/// Receiver-side payload verifier.
///
/// Holds the transmit key and the last accepted counter for one
/// transmitter identity. Accepts a payload iff the counter is strictly
/// greater than the last accepted value AND the truncated tag verifies.
/// The counter check is the actual replay defense; the tag only proves key
/// possession for that specific counter value.
///
/// Tag comparison is constant time.
#[derive(Debug, Clone)]
pub struct Verifier {
    key: TransmitKey,
    last_accepted: Option<u32>,
}

impl Verifier {
    /// Create a verifier that has not yet accepted any message.
    #[must_use]
    pub fn new(key: TransmitKey) -> Self {
        Self { key, last_accepted: None }
    }

    /// Last accepted counter value, if any message has been accepted.
    pub fn last_accepted(&self) -> Option<u32> {
        self.last_accepted
    }

    /// Verify a received payload and advance the replay window on success.
    ///
    /// Returns `true` and records the counter when the payload is accepted.
    /// A replayed payload (counter not strictly greater than the last
    /// accepted one) or a forged tag returns `false` and leaves the state
    /// unchanged.
    pub fn accept(&mut self, payload: &Payload) -> bool {
        let counter = payload.counter();

        if let Some(last) = self.last_accepted
            && counter <= last
        {
            return false;
        }

        let mut mac = hmac_sha256(self.key.as_bytes());
        mac.update(&counter.to_be_bytes());
        if mac.verify_truncated_left(payload.tag()).is_err() {
            return false;
        }

        self.last_accepted = Some(counter);
        true
    }
}
