//! Crash-recovery tests: protocol state over the durable store.
//!
//! Simulates process restarts by dropping and reopening the redb database
//! between operations, verifying the identity survives and counter values
//! are never reissued.

use rollkey_cli::{ConsoleBroadcaster, RedbStore};
use rollkey_core::{DecodedSecret, Remote, RemoteError};
use tempfile::tempdir;

#[test]
fn identity_and_counter_survive_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rollkey.redb");
    let secret = DecodedSecret::decode("MZXW6");

    let identifier = {
        let store = RedbStore::open(&path).unwrap();
        let remote = Remote::new(store, ConsoleBroadcaster);
        let identity = remote.enroll(&secret).unwrap();

        assert_eq!(remote.activate().unwrap().counter, 0);
        assert_eq!(remote.activate().unwrap().counter, 1);
        identity.identifier
    };

    // "Restart"
    let store = RedbStore::open(&path).unwrap();
    let remote = Remote::new(store, ConsoleBroadcaster);

    let identity = remote.identity().unwrap();
    assert_eq!(identity.identifier, identifier);

    // Counter resumes past the values issued before the restart.
    assert_eq!(remote.activate().unwrap().counter, 2);
}

#[test]
fn fresh_database_is_not_provisioned() {
    let dir = tempdir().unwrap();
    let store = RedbStore::open(dir.path().join("rollkey.redb")).unwrap();
    let remote = Remote::new(store, ConsoleBroadcaster);

    assert_eq!(remote.activate(), Err(RemoteError::NotProvisioned));
    assert_eq!(remote.identity(), Err(RemoteError::NotProvisioned));
}

#[test]
fn re_enrollment_over_durable_store_restarts_counter() {
    let dir = tempdir().unwrap();
    let store = RedbStore::open(dir.path().join("rollkey.redb")).unwrap();
    let remote = Remote::new(store, ConsoleBroadcaster);

    let secret = DecodedSecret::decode("MZXW6");
    let first = remote.enroll(&secret).unwrap();
    remote.activate().unwrap();
    remote.activate().unwrap();

    let second = remote.enroll(&secret).unwrap();
    assert_ne!(first.identifier, second.identifier);
    assert_eq!(remote.activate().unwrap().counter, 0);
}
