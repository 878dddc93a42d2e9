//! End-to-end protocol test: enrollment through transmission to
//! receiver-side verification.
//!
//! Uses the in-memory store and a capturing broadcaster to play both ends
//! of the air gap: everything the remote broadcasts is fed to a
//! [`Verifier`] holding the key the receiver would derive for this
//! transmitter.

use std::sync::{Arc, Mutex};

use rollkey_core::{BroadcastError, Broadcaster, DecodedSecret, MemoryStore, Remote};
use rollkey_crypto::{PAYLOAD_SIZE, Payload, Verifier, derive_transmit_key};

/// Captures broadcast payloads like an eavesdropping (or legitimate)
/// receiver would.
#[derive(Clone, Default)]
struct AirCapture {
    frames: Arc<Mutex<Vec<(u128, [u8; PAYLOAD_SIZE])>>>,
}

impl AirCapture {
    #[allow(clippy::expect_used)]
    fn frames(&self) -> Vec<(u128, [u8; PAYLOAD_SIZE])> {
        self.frames.lock().expect("Mutex poisoned").clone()
    }
}

impl Broadcaster for AirCapture {
    #[allow(clippy::expect_used)]
    fn broadcast(
        &self,
        identifier: u128,
        payload: &[u8; PAYLOAD_SIZE],
    ) -> Result<(), BroadcastError> {
        self.frames.lock().expect("Mutex poisoned").push((identifier, *payload));
        Ok(())
    }
}

/// The 20-byte receiver master key used throughout these tests.
fn master_key() -> Vec<u8> {
    (0u8..20).collect()
}

/// The secret as printed on the receiver module: lowercase Base32 in
/// groups of five, with length and CRC-32 checksum alongside.
#[allow(clippy::unwrap_used)]
fn printed_secret() -> String {
    let encoded = data_encoding::BASE32_NOPAD.encode(&master_key()).to_ascii_lowercase();
    encoded
        .as_bytes()
        .chunks(5)
        .map(|group| std::str::from_utf8(group).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn printed_checksum_matches_before_commit() {
    let secret = DecodedSecret::decode(&printed_secret());

    // The installer compares these against the printed values before
    // committing.
    assert_eq!(secret.as_bytes(), master_key().as_slice());
    assert_eq!(secret.len(), 20);

    let expected = crc32fast::hash(&master_key());
    assert_eq!(secret.checksum(), expected);
}

#[test]
fn receiver_accepts_every_activation_once() {
    let capture = AirCapture::default();
    let remote = Remote::new(MemoryStore::new(), capture.clone());

    let secret = DecodedSecret::decode(&printed_secret());
    let identity = remote.enroll(&secret).unwrap();

    for _ in 0..10 {
        remote.activate().unwrap();
    }

    // The receiver derives the same transmit key from its master secret
    // and the identifier it learned during enrollment.
    let receiver_key = derive_transmit_key(identity.identifier, secret.as_bytes());
    let mut verifier = Verifier::new(receiver_key);

    for (identifier, bytes) in capture.frames() {
        assert_eq!(identifier, identity.identifier);

        let payload = Payload::decode(&bytes).unwrap();
        assert!(verifier.accept(&payload), "genuine payload rejected");

        // Replaying the captured frame must fail.
        assert!(!verifier.accept(&payload), "replayed payload accepted");
    }

    assert_eq!(verifier.last_accepted(), Some(9));
}

#[test]
fn receiver_for_other_identifier_rejects_everything() {
    let capture = AirCapture::default();
    let remote = Remote::new(MemoryStore::new(), capture.clone());

    let secret = DecodedSecret::decode(&printed_secret());
    let identity = remote.enroll(&secret).unwrap();
    remote.activate().unwrap();

    // Same master secret, different identifier: the derived key differs,
    // so a transmitter cannot impersonate another install.
    let other_key = derive_transmit_key(identity.identifier.wrapping_add(1), secret.as_bytes());
    let mut verifier = Verifier::new(other_key);

    for (_, bytes) in capture.frames() {
        let payload = Payload::decode(&bytes).unwrap();
        assert!(!verifier.accept(&payload));
    }
}

#[test]
fn restart_resumes_counter_without_reuse() {
    let store = MemoryStore::new();
    let capture = AirCapture::default();
    let secret = DecodedSecret::decode(&printed_secret());

    let identity = {
        let remote = Remote::new(store.clone(), capture.clone());
        let identity = remote.enroll(&secret).unwrap();
        remote.activate().unwrap();
        remote.activate().unwrap();
        identity
    };

    // "Restart": a new Remote over the same persisted state.
    let remote = Remote::new(store, capture.clone());
    assert_eq!(remote.identity().unwrap(), identity);
    let activation = remote.activate().unwrap();
    assert_eq!(activation.counter, 2);

    // All frames verify in order against one receiver.
    let receiver_key = derive_transmit_key(identity.identifier, secret.as_bytes());
    let mut verifier = Verifier::new(receiver_key);
    for (_, bytes) in capture.frames() {
        assert!(verifier.accept(&Payload::decode(&bytes).unwrap()));
    }
}
