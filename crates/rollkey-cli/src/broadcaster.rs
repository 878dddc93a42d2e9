//! Console stand-in for the platform broadcast adapter.

use rollkey_core::{BroadcastError, Broadcaster, format_identifier};
use rollkey_crypto::PAYLOAD_SIZE;

/// Broadcaster that prints what a BLE advertiser would put on the air:
/// the service identifier and the 8 payload bytes in hex.
///
/// Delivery through a real radio stack is out of scope for this tool; the
/// printed line is enough to drive a receiver by hand or from a script.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleBroadcaster;

impl Broadcaster for ConsoleBroadcaster {
    fn broadcast(
        &self,
        identifier: u128,
        payload: &[u8; PAYLOAD_SIZE],
    ) -> Result<(), BroadcastError> {
        println!("service {}  payload {}", format_identifier(identifier), hex(payload));
        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        use std::fmt::Write as _;
        // Writing to a String cannot fail.
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formats_payload_bytes() {
        assert_eq!(hex(&[0x00, 0x01, 0xab, 0xff]), "0001abff");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn broadcast_never_fails() {
        let broadcaster = ConsoleBroadcaster;
        assert!(broadcaster.broadcast(42, &[0u8; PAYLOAD_SIZE]).is_ok());
    }
}
