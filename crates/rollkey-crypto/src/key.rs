//! Transmit key derivation
//!
//! # Security Properties
//!
//! - Determinism: Same (identifier, secret) pair always yields the same key
//! - Identifier binding: Different identifiers yield unrelated keys
//! - Key material is zeroized on drop and redacted from `Debug` output

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Size of a transmit key in bytes (SHA-256 digest size).
pub const TRANSMIT_KEY_SIZE: usize = 32;

/// A 256-bit per-transmitter secret derived once at enrollment.
///
/// Used as the HMAC key for every rolling-code payload sent under the
/// owning identifier.
#[derive(Clone, PartialEq, Eq)]
pub struct TransmitKey {
    key: [u8; TRANSMIT_KEY_SIZE],
}

impl TransmitKey {
    /// Wrap raw key bytes.
    ///
    /// Intended for restoring a previously derived key from persistent
    /// storage. Fresh keys come from [`derive_transmit_key`].
    #[must_use]
    pub fn from_bytes(key: [u8; TRANSMIT_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; TRANSMIT_KEY_SIZE] {
        &self.key
    }
}

impl Drop for TransmitKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for TransmitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TransmitKey(..)")
    }
}

/// Derive the transmit key for a transmitter identifier.
///
/// Computes HMAC-SHA-256 keyed by the enrollment secret over the 16-byte
/// big-endian encoding of `identifier` (high 64 bits first). The 32-byte
/// digest is the transmit key verbatim.
///
/// Accepts any secret length; HMAC handles short and long keys. Length
/// validation (in particular rejecting the empty secret) happens at the
/// enrollment commit step, not here.
#[must_use]
pub fn derive_transmit_key(identifier: u128, enrollment_secret: &[u8]) -> TransmitKey {
    let mut mac = hmac_sha256(enrollment_secret);
    mac.update(&identifier.to_be_bytes());

    let digest = mac.finalize().into_bytes();
    TransmitKey { key: digest.into() }
}

/// Construct an HMAC-SHA-256 instance for a key of any length.
pub(crate) fn hmac_sha256(key: &[u8]) -> HmacSha256 {
    let Ok(mac) = HmacSha256::new_from_slice(key) else {
        // `InvalidLength` is unreachable: HMAC accepts any key length.
        unreachable!("HMAC-SHA-256 accepts keys of any length");
    };
    mac
}
