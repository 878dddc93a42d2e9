//! Identity persistence over a [`SettingsStore`].
//!
//! Missing state is an explicit outcome, not an exception: `load` returns
//! [`IdentityError::NotProvisioned`] both when no identity was ever saved
//! and when the saved fields are corrupt (undecodable key material,
//! malformed identifier). Callers branch on it and invoke enrollment
//! instead of crashing.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rollkey_crypto::{TRANSMIT_KEY_SIZE, TransmitKey};
use thiserror::Error;

use crate::{
    identity::{Identity, format_identifier, parse_identifier},
    store::{KEY_IDENTIFIER, KEY_TRANSMIT_KEY, SettingsStore, StoreError},
};

/// Errors that can occur while loading or saving an identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No usable identity is persisted.
    ///
    /// Covers both the never-enrolled case and corruption of the saved
    /// fields. Recovered by running enrollment.
    #[error("no identity provisioned; run enrollment")]
    NotProvisioned,

    /// The underlying store failed.
    ///
    /// Unlike [`IdentityError::NotProvisioned`] this is a persistence
    /// failure and must be surfaced, not treated as a fresh install.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Loads and saves the [`Identity`] across restarts.
#[derive(Debug, Clone)]
pub struct IdentityStore<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> IdentityStore<S> {
    /// Create an identity store over the given settings store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the persisted identity.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::NotProvisioned`] when either field is absent or
    ///   cannot be decoded.
    /// - [`IdentityError::Store`] when the store itself fails.
    pub fn load(&self) -> Result<Identity, IdentityError> {
        let Some(id_text) = self.store.get(KEY_IDENTIFIER)? else {
            return Err(IdentityError::NotProvisioned);
        };
        let Some(key_text) = self.store.get(KEY_TRANSMIT_KEY)? else {
            return Err(IdentityError::NotProvisioned);
        };

        let Some(identifier) = parse_identifier(&id_text) else {
            tracing::warn!("persisted identifier is malformed; treating as not provisioned");
            return Err(IdentityError::NotProvisioned);
        };

        let Ok(key_bytes) = BASE64.decode(&key_text) else {
            tracing::warn!("persisted transmit key is undecodable; treating as not provisioned");
            return Err(IdentityError::NotProvisioned);
        };
        let Ok(key) = <[u8; TRANSMIT_KEY_SIZE]>::try_from(key_bytes) else {
            tracing::warn!("persisted transmit key has wrong length; treating as not provisioned");
            return Err(IdentityError::NotProvisioned);
        };

        Ok(Identity { identifier, transmit_key: TransmitKey::from_bytes(key) })
    }

    /// Persist an identity, replacing any previous one.
    ///
    /// The old key material is removed before the new fields are written.
    /// The identifier and key are two separate store entries, so a write
    /// that fails partway through must land in a state `load` reports as
    /// [`IdentityError::NotProvisioned`], never in a new identifier paired
    /// with the old key: that mix would load as a valid identity whose
    /// payloads no receiver accepts.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Store`] when any of the writes fails; the store is
    /// then either untouched or unprovisioned.
    pub fn save(&self, identity: &Identity) -> Result<(), IdentityError> {
        self.store.remove(KEY_TRANSMIT_KEY)?;
        self.store.put(KEY_IDENTIFIER, &format_identifier(identity.identifier))?;
        self.store.put(KEY_TRANSMIT_KEY, &BASE64.encode(identity.transmit_key.as_bytes()))?;
        Ok(())
    }
}
