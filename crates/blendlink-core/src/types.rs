//! Shared types for BlendLink diagnostics.

use std::net::SocketAddr;

use chrono::{DateTime, Local};

/// One inbound UDP packet as captured by the listener.
///
/// The payload holds at most the configured receive-buffer size; anything
/// larger was truncated by the transport.
#[derive(Debug, Clone)]
pub struct ReceivedDatagram {
    /// Receive counter value at the time of receipt (1-based, gapless).
    pub seq: u64,
    /// Wall-clock time of receipt.
    pub received_at: DateTime<Local>,
    /// Sender address.
    pub source: SocketAddr,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}
