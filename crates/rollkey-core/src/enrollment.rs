//! Enrollment secret decoding.
//!
//! The receiver module ships with a Base32-encoded master secret printed on
//! it, together with its byte length and a CRC-32 checksum. The installer
//! types (or pastes) the secret into the transmitter; decoding tolerates
//! whatever grouping, whitespace, and case the printed form or the installer
//! introduced.
//!
//! Decoding deliberately fails safe to the empty byte sequence instead of
//! returning an error, so a UI can show live length/checksum feedback on
//! every keystroke. That degrade-to-empty policy is local to this module:
//! the commit step ([`crate::Identity::enroll`]) refuses an empty secret
//! outright.

use data_encoding::BASE32_NOPAD;
use thiserror::Error;
use zeroize::Zeroize;

/// Errors from committing an enrollment secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    /// The decoded secret is empty; nothing to derive a key from.
    ///
    /// Recovered by prompting the installer for corrected input. Key
    /// derivation never runs on an empty secret.
    #[error("decoded enrollment secret is empty")]
    EmptySecret,

    /// The system random source failed while generating an identifier.
    #[error("random identifier generation failed: {0}")]
    Random(String),
}

/// An enrollment secret decoded from installer input.
///
/// Transient key material: held only for the duration of setup, never
/// persisted, zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedSecret {
    bytes: Vec<u8>,
}

impl DecodedSecret {
    /// Decode installer-typed Base32 text.
    ///
    /// Characters outside the RFC 4648 Base32 alphabet (including padding
    /// and separators) are stripped before decoding; case is folded. A
    /// residual that is not valid Base32 decodes to the empty secret rather
    /// than an error.
    #[must_use]
    pub fn decode(raw: &str) -> Self {
        let filtered: String = raw
            .chars()
            .filter_map(|c| {
                let c = c.to_ascii_uppercase();
                matches!(c, 'A'..='Z' | '2'..='7').then_some(c)
            })
            .collect();

        let bytes = BASE32_NOPAD.decode(filtered.as_bytes()).unwrap_or_default();
        Self { bytes }
    }

    /// Decoded key material.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of decoded bytes, for live feedback against the printed
    /// length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether decoding produced no bytes. Committing an empty secret is
    /// refused.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// CRC-32 of the decoded bytes, for visual comparison against the
    /// checksum printed on the receiver module.
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(&self.bytes)
    }
}

impl Drop for DecodedSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DecodedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DecodedSecret({} bytes)", self.bytes.len())
    }
}
