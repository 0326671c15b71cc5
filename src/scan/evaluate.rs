//! Per-packet evaluation.

use serde::Serialize;
use tracing::warn;

use super::{PayloadMatcher, ProtocolFilter};
use crate::capture::CapturedPacket;
use crate::decode::DecodedPacket;

/// Fill value for addresses when a packet has no network layer.
pub const ADDR_NOT_APPLICABLE: &str = "N/A";

/// Maximum length of the payload excerpt, in characters of the decoded
/// payload.
pub const SNIPPET_MAX_CHARS: usize = 100;

/// One packet that satisfied the filters.
///
/// Field names are fixed; they are the output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub source_ip: String,
    pub source_port: u16,
    pub destination_ip: String,
    pub destination_port: u16,
    pub matched_pattern: String,
    pub payload_snippet: String,
}

/// Decide whether one captured packet produces a match record.
///
/// Returns `None` when the packet fails the protocol filter, carries no
/// payload, or does not match the pattern. Any decode failure is absorbed
/// here: the packet is logged as skipped and contributes no match. This is
/// the fault boundary that keeps a single bad packet from aborting a scan.
pub fn evaluate(
    packet: &CapturedPacket,
    matcher: &PayloadMatcher,
    filter: &ProtocolFilter,
) -> Option<MatchRecord> {
    let decoded = match DecodedPacket::decode(packet) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(frame = packet.frame, "skipping packet: {e}");
            return None;
        }
    };

    if !filter.applies(&decoded) {
        return None;
    }
    if !decoded.has_payload() {
        return None;
    }
    if !matcher.matches(&decoded.payload) {
        return None;
    }

    Some(MatchRecord {
        source_ip: decoded
            .src_ip
            .map_or_else(|| ADDR_NOT_APPLICABLE.to_string(), |ip| ip.to_string()),
        source_port: decoded.src_port.unwrap_or(0),
        destination_ip: decoded
            .dst_ip
            .map_or_else(|| ADDR_NOT_APPLICABLE.to_string(), |ip| ip.to_string()),
        destination_port: decoded.dst_port.unwrap_or(0),
        matched_pattern: matcher.pattern().to_string(),
        payload_snippet: snippet(&decoded.payload),
    })
}

/// First [`SNIPPET_MAX_CHARS`] characters of the permissively decoded
/// payload. Truncation happens after decoding, so it never splits a
/// replacement character.
fn snippet(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload)
        .chars()
        .take(SNIPPET_MAX_CHARS)
        .collect()
}
