//! Transmitter identity: the enrolled (identifier, transmit key) pair.
//!
//! The 128-bit identifier doubles as the broadcast channel/service
//! identifier and is generated fresh from the system random source at every
//! enrollment; it is never reused across enrollments. The transmit key is
//! derived from the identifier and the receiver's enrollment secret, so it
//! is only valid for this one identifier.

use rollkey_crypto::{TransmitKey, derive_transmit_key};

use crate::enrollment::{DecodedSecret, EnrollmentError};

/// An enrolled transmitter identity.
///
/// Created once during setup, persisted by
/// [`IdentityStore`](crate::IdentityStore), read on every activation, and
/// replaced only by re-running enrollment (the old identity is discarded,
/// not migrated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Globally unique 128-bit identifier; also the broadcast channel.
    pub identifier: u128,
    /// 256-bit per-transmitter secret derived at enrollment.
    pub transmit_key: TransmitKey,
}

impl Identity {
    /// Commit a decoded enrollment secret: the explicit second step after
    /// [`DecodedSecret::decode`].
    ///
    /// Generates a fresh random identifier and derives the transmit key
    /// bound to it. Refused when the decoded secret is empty: live-input
    /// decoding degrades to empty, committing never does.
    ///
    /// # Errors
    ///
    /// - [`EnrollmentError::EmptySecret`] when the secret decoded to no
    ///   bytes.
    /// - [`EnrollmentError::Random`] when the system random source fails.
    pub fn enroll(secret: &DecodedSecret) -> Result<Self, EnrollmentError> {
        if secret.is_empty() {
            return Err(EnrollmentError::EmptySecret);
        }

        let mut raw = [0u8; 16];
        getrandom::fill(&mut raw).map_err(|e| EnrollmentError::Random(e.to_string()))?;
        let identifier = u128::from_be_bytes(raw);

        let transmit_key = derive_transmit_key(identifier, secret.as_bytes());

        tracing::info!(identifier = %format_identifier(identifier), "enrolled new identity");

        Ok(Self { identifier, transmit_key })
    }
}

/// Canonical text form of an identifier: lowercase hyphenated hex,
/// 8-4-4-4-12 groups. This is the form persisted in the settings store and
/// shown to the user.
#[must_use]
pub fn format_identifier(identifier: u128) -> String {
    let b = identifier.to_be_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13],
        b[14], b[15]
    )
}

/// Parse the canonical identifier text form.
///
/// Returns `None` for anything that is not exactly five hyphen-separated
/// hex groups of 8-4-4-4-12 digits. Case-insensitive.
#[must_use]
pub fn parse_identifier(text: &str) -> Option<u128> {
    let mut groups = text.split('-');
    let mut hex = String::with_capacity(32);

    for expected_len in [8usize, 4, 4, 4, 12] {
        let group = groups.next()?;
        if group.len() != expected_len || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        hex.push_str(group);
    }
    if groups.next().is_some() {
        return None;
    }

    u128::from_str_radix(&hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enroll_refuses_empty_secret() {
        let secret = DecodedSecret::decode("!!!");
        assert_eq!(Identity::enroll(&secret), Err(EnrollmentError::EmptySecret));
    }

    #[test]
    fn enroll_derives_key_bound_to_identifier() {
        let secret = DecodedSecret::decode("MZXW6");
        let identity = Identity::enroll(&secret).unwrap();

        let expected = derive_transmit_key(identity.identifier, secret.as_bytes());
        assert_eq!(identity.transmit_key, expected);
    }

    #[test]
    fn enroll_never_reuses_identifiers() {
        let secret = DecodedSecret::decode("MZXW6");

        let a = Identity::enroll(&secret).unwrap();
        let b = Identity::enroll(&secret).unwrap();

        // 128 random bits; a collision here means the random source is
        // broken.
        assert_ne!(a.identifier, b.identifier);
        assert_ne!(a.transmit_key, b.transmit_key);
    }

    #[test]
    fn identifier_text_form_roundtrips() {
        let identifier = 0x0123_4567_89ab_cdef_fedc_ba98_7654_3210u128;
        let text = format_identifier(identifier);

        assert_eq!(text, "01234567-89ab-cdef-fedc-ba9876543210");
        assert_eq!(parse_identifier(&text), Some(identifier));
    }

    #[test]
    fn parse_accepts_uppercase() {
        assert_eq!(
            parse_identifier("01234567-89AB-CDEF-FEDC-BA9876543210"),
            Some(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210u128)
        );
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert_eq!(parse_identifier(""), None);
        assert_eq!(parse_identifier("not-an-identifier"), None);
        assert_eq!(parse_identifier("01234567-89ab-cdef-fedc"), None);
        assert_eq!(parse_identifier("01234567-89ab-cdef-fedc-ba9876543210-ff"), None);
        assert_eq!(parse_identifier("0123456789ab-cdef-fedc-ba98-76543210"), None);
        assert_eq!(parse_identifier("01234567-89ab-cdef-fedc-ba98765432zz"), None);
    }

    #[test]
    fn format_pads_leading_zeros() {
        assert_eq!(format_identifier(1), "00000000-0000-0000-0000-000000000001");
    }
}
