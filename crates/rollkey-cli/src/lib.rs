//! Rollkey transmitter CLI support library.
//!
//! Provides the durable settings store and the console broadcaster used by
//! the `rollkey` binary. The platform radio stack is out of scope; the
//! [`ConsoleBroadcaster`] stands in for it by printing what a BLE
//! advertiser would put on the air.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod broadcaster;
mod redb_store;

pub use broadcaster::ConsoleBroadcaster;
pub use redb_store::RedbStore;
