//! Captured packet representation.

/// One packet as recorded in the capture file, before decoding.
#[derive(Debug, Clone)]
pub struct CapturedPacket {
    /// Frame number (1-indexed, capture order).
    pub frame: u64,

    /// Timestamp in microseconds since epoch. Zero when the capture
    /// format carries no timestamp for this packet.
    pub timestamp_us: i64,

    /// Link layer type (e.g., 1 = Ethernet, 101 = raw IP).
    pub link_type: u16,

    /// Raw packet bytes as captured.
    pub data: Vec<u8>,
}

impl CapturedPacket {
    pub fn new(frame: u64, timestamp_us: i64, link_type: u16, data: Vec<u8>) -> Self {
        Self {
            frame,
            timestamp_us,
            link_type,
            data,
        }
    }
}
