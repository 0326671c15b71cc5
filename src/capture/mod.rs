//! Capture file access.
//!
//! Provides lazy, ordered iteration over the packets of a PCAP or PCAPNG
//! file, with transparent gzip decompression.

mod packet;
mod reader;

pub use packet::CapturedPacket;
pub use reader::CaptureReader;
