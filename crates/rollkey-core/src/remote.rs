//! Activation orchestration: enrollment commit and message transmission.
//!
//! [`Remote`] ties the protocol pieces together with explicit state: a
//! settings store and a broadcaster adapter passed in at construction, no
//! ambient globals. Every activation runs the same sequence: load identity,
//! draw a counter value (durably advanced first), encode the payload, hand
//! it to the broadcaster.

use rollkey_crypto::{PAYLOAD_SIZE, encode_payload};
use thiserror::Error;

use crate::{
    counter::{CounterError, SequenceCounter},
    enrollment::{DecodedSecret, EnrollmentError},
    identity::{Identity, format_identifier},
    identity_store::{IdentityError, IdentityStore},
    store::{SettingsStore, StoreError},
};

/// Errors from the broadcaster adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// The platform broadcast stack reported a failure.
    #[error("broadcast adapter error: {0}")]
    Adapter(String),
}

/// Connectionless broadcast adapter contract.
///
/// Accepts (identifier, payload) and emits it on the channel named by the
/// identifier. Delivery is one-shot and best-effort; there is no
/// acknowledgment path. The platform radio stack behind this trait is out
/// of scope for the protocol core.
pub trait Broadcaster {
    /// Emit one payload under the given channel/service identifier.
    fn broadcast(
        &self,
        identifier: u128,
        payload: &[u8; PAYLOAD_SIZE],
    ) -> Result<(), BroadcastError>;
}

/// Errors from enrollment or activation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// No usable identity persisted; run enrollment.
    #[error("not provisioned; run enrollment")]
    NotProvisioned,

    /// The enrollment input could not be committed.
    #[error("invalid enrollment input: {0}")]
    Enrollment(#[from] EnrollmentError),

    /// The 32-bit counter space for this identity is used up.
    #[error("counter exhausted; re-enroll to continue")]
    CounterExhausted,

    /// A counter or identity write did not durably complete.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// The broadcaster reported a failure.
    ///
    /// May be retried at the caller's discretion. A retry must go through
    /// [`Remote::activate`] again: the counter was already advanced, so
    /// resending the stale payload would transmit a counter value that is
    /// no longer the freshest one issued.
    #[error("transmission failure: {0}")]
    Transmission(#[from] BroadcastError),
}

impl From<IdentityError> for RemoteError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotProvisioned => RemoteError::NotProvisioned,
            IdentityError::Store(e) => RemoteError::Persistence(e),
        }
    }
}

impl From<CounterError> for RemoteError {
    fn from(err: CounterError) -> Self {
        match err {
            CounterError::Exhausted => RemoteError::CounterExhausted,
            CounterError::Store(e) => RemoteError::Persistence(e),
        }
    }
}

/// One completed activation, for logging and UI feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Channel/service identifier the payload was emitted under.
    pub identifier: u128,
    /// Counter value carried by the payload.
    pub counter: u32,
    /// The 8 bytes handed to the broadcaster.
    pub payload: [u8; PAYLOAD_SIZE],
}

/// The transmitter: enrollment commit plus per-activation transmission.
#[derive(Debug)]
pub struct Remote<S: SettingsStore, B: Broadcaster> {
    identity_store: IdentityStore<S>,
    counter: SequenceCounter<S>,
    broadcaster: B,
}

impl<S: SettingsStore, B: Broadcaster> Remote<S, B> {
    /// Create a remote over a settings store and a broadcaster adapter.
    pub fn new(store: S, broadcaster: B) -> Self {
        Self {
            identity_store: IdentityStore::new(store.clone()),
            counter: SequenceCounter::new(store),
            broadcaster,
        }
    }

    /// Commit a decoded enrollment secret: derive and persist a fresh
    /// identity, discarding any previous one.
    ///
    /// The counter restarts at 0: the new identity has its own key, so
    /// its counter space is independent of the old one.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::Enrollment`] when the secret is empty (live-input
    ///   decoding degrades to empty; committing never silently proceeds).
    /// - [`RemoteError::Persistence`] when the identity or counter write
    ///   fails.
    pub fn enroll(&self, secret: &DecodedSecret) -> Result<Identity, RemoteError> {
        let identity = Identity::enroll(secret)?;
        self.identity_store.save(&identity)?;
        self.counter.reset()?;
        Ok(identity)
    }

    /// Load the persisted identity, if any.
    pub fn identity(&self) -> Result<Identity, RemoteError> {
        Ok(self.identity_store.load()?)
    }

    /// The counter value the next activation would transmit.
    pub fn next_counter(&self) -> Result<u32, RemoteError> {
        Ok(self.counter.peek()?)
    }

    /// Run one activation: load identity, draw a counter value, encode the
    /// payload, broadcast it.
    ///
    /// The counter increment is durably persisted before the broadcaster
    /// is invoked, so a crash or transmission failure can never lead to a
    /// counter value being reused.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::NotProvisioned`] when no usable identity is saved.
    /// - [`RemoteError::CounterExhausted`] when the counter space is used
    ///   up.
    /// - [`RemoteError::Persistence`] when the counter cannot be advanced.
    /// - [`RemoteError::Transmission`] when the broadcaster fails; retry by
    ///   calling `activate` again.
    pub fn activate(&self) -> Result<Activation, RemoteError> {
        let identity = self.identity_store.load()?;
        let counter = self.counter.next()?;

        let payload = encode_payload(counter, &identity.transmit_key);

        tracing::info!(
            identifier = %format_identifier(identity.identifier),
            counter,
            "broadcasting activation"
        );
        self.broadcaster.broadcast(identity.identifier, &payload)?;

        Ok(Activation { identifier: identity.identifier, counter, payload })
    }
}
