//! Scan driver: iterates the capture source and collects match records.

use rayon::prelude::*;
use tracing::debug;

use super::{evaluate, MatchRecord, PayloadMatcher, ProtocolFilter};
use crate::capture::CapturedPacket;
use crate::error::{Error, Result};

/// Packets drained from the source per parallel dispatch.
///
/// Bounds the memory held in flight on large captures while keeping the
/// workers saturated.
pub const DISPATCH_BATCH: usize = 1024;

/// Scan a capture source and return all match records in capture order.
///
/// `packets` is consumed lazily; a source error (`Err` item) is fatal and
/// aborts the scan. Per-packet decode failures are absorbed inside
/// [`evaluate`] and never surface here.
///
/// With `jobs <= 1` evaluation is strictly sequential. Otherwise packets
/// are evaluated across a bounded pool of `jobs` workers; results are
/// reassembled in submission order, so the output is identical to a
/// sequential scan regardless of worker completion order.
pub fn scan<I>(
    packets: I,
    matcher: &PayloadMatcher,
    filter: &ProtocolFilter,
    jobs: usize,
) -> Result<Vec<MatchRecord>>
where
    I: IntoIterator<Item = Result<CapturedPacket>> + Send,
{
    if jobs <= 1 {
        return scan_sequential(packets, matcher, filter);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| Error::WorkerPool(e.to_string()))?;

    pool.install(|| scan_parallel(packets, matcher, filter))
}

fn scan_sequential<I>(
    packets: I,
    matcher: &PayloadMatcher,
    filter: &ProtocolFilter,
) -> Result<Vec<MatchRecord>>
where
    I: IntoIterator<Item = Result<CapturedPacket>>,
{
    let mut matches = Vec::new();
    let mut scanned = 0u64;

    for packet in packets {
        let packet = packet?;
        scanned += 1;
        if let Some(record) = evaluate(&packet, matcher, filter) {
            matches.push(record);
        }
    }

    debug!(scanned, matched = matches.len(), "sequential scan complete");
    Ok(matches)
}

fn scan_parallel<I>(
    packets: I,
    matcher: &PayloadMatcher,
    filter: &ProtocolFilter,
) -> Result<Vec<MatchRecord>>
where
    I: IntoIterator<Item = Result<CapturedPacket>>,
{
    let mut iter = packets.into_iter();
    let mut matches = Vec::new();
    let mut scanned = 0u64;

    loop {
        // Drain one batch from the source; the driver thread owns the
        // iterator, workers only see immutable packets.
        let batch: Vec<CapturedPacket> = iter
            .by_ref()
            .take(DISPATCH_BATCH)
            .collect::<Result<_>>()?;
        if batch.is_empty() {
            break;
        }
        scanned += batch.len() as u64;

        // Indexed parallel map: collect() preserves the batch order, so
        // completion order never leaks into the output.
        let evaluated: Vec<Option<MatchRecord>> = batch
            .par_iter()
            .map(|packet| evaluate(packet, matcher, filter))
            .collect();

        matches.extend(evaluated.into_iter().flatten());
    }

    debug!(scanned, matched = matches.len(), "parallel scan complete");
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptureError;

    /// Ethernet/IPv4/TCP packet carrying `payload`, from `src` port.
    fn tcp_packet(frame: u64, src_port: u16, payload: &[u8]) -> CapturedPacket {
        let mut data = Vec::new();

        data.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        data.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        data.extend_from_slice(&[0x08, 0x00]);

        let total_len = (20 + 20 + payload.len()) as u16;
        data.push(0x45);
        data.push(0x00);
        data.extend_from_slice(&total_len.to_be_bytes());
        data.extend_from_slice(&[0x00, 0x01]);
        data.extend_from_slice(&[0x40, 0x00]);
        data.push(0x40);
        data.push(0x06);
        data.extend_from_slice(&[0x00, 0x00]);
        data.extend_from_slice(&[10, 0, 0, 1]);
        data.extend_from_slice(&[10, 0, 0, 2]);

        data.extend_from_slice(&src_port.to_be_bytes());
        data.extend_from_slice(&80u16.to_be_bytes());
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        data.push(0x50);
        data.push(0x18);
        data.extend_from_slice(&[0xff, 0xff]);
        data.extend_from_slice(&[0x00, 0x00]);
        data.extend_from_slice(&[0x00, 0x00]);

        data.extend_from_slice(payload);
        CapturedPacket::new(frame, 0, 1, data)
    }

    /// Packet that fails decoding (truncated IPv4 header).
    fn malformed_packet(frame: u64) -> CapturedPacket {
        let mut data = Vec::new();
        data.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        data.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        data.extend_from_slice(&[0x08, 0x00]);
        data.extend_from_slice(&[0x45]);
        CapturedPacket::new(frame, 0, 1, data)
    }

    fn source(packets: Vec<CapturedPacket>) -> Vec<Result<CapturedPacket>> {
        packets.into_iter().map(Ok).collect()
    }

    fn sample_capture() -> Vec<CapturedPacket> {
        (0..50)
            .map(|i| {
                let payload = if i % 3 == 0 {
                    format!("packet {i} holds the secret token")
                } else {
                    format!("packet {i} is uninteresting")
                };
                tcp_packet(i as u64 + 1, 40000 + i as u16, payload.as_bytes())
            })
            .collect()
    }

    #[test]
    fn sequential_finds_expected_matches() {
        let matcher = PayloadMatcher::compile("secret", false).unwrap();
        let matches = scan(source(sample_capture()), &matcher, &ProtocolFilter::none(), 1).unwrap();

        assert_eq!(matches.len(), 17); // i = 0, 3, ..., 48
        assert!(matches
            .iter()
            .all(|m| m.payload_snippet.contains("secret token")));
    }

    #[test]
    fn parallel_matches_sequential_output() {
        let matcher = PayloadMatcher::compile("secret", false).unwrap();
        let filter = ProtocolFilter::none();

        let sequential = scan(source(sample_capture()), &matcher, &filter, 1).unwrap();
        let parallel = scan(source(sample_capture()), &matcher, &filter, 4).unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn output_preserves_capture_order() {
        let matcher = PayloadMatcher::compile("secret", false).unwrap();
        let matches = scan(source(sample_capture()), &matcher, &ProtocolFilter::none(), 8).unwrap();

        let ports: Vec<u16> = matches.iter().map(|m| m.source_port).collect();
        let mut sorted = ports.clone();
        sorted.sort_unstable();
        assert_eq!(ports, sorted);
    }

    #[test]
    fn malformed_packet_does_not_abort_scan() {
        let mut packets = sample_capture();
        packets.insert(10, malformed_packet(1000));

        let matcher = PayloadMatcher::compile("secret", false).unwrap();
        let filter = ProtocolFilter::none();

        let with_bad = scan(source(packets), &matcher, &filter, 4).unwrap();
        let without_bad = scan(source(sample_capture()), &matcher, &filter, 4).unwrap();
        assert_eq!(with_bad, without_bad);
    }

    #[test]
    fn source_error_is_fatal() {
        let packets: Vec<Result<CapturedPacket>> = vec![
            Ok(tcp_packet(1, 40000, b"secret")),
            Err(Error::Capture(CaptureError::InvalidFormat {
                reason: "corrupt record".into(),
            })),
            Ok(tcp_packet(2, 40001, b"secret")),
        ];

        let matcher = PayloadMatcher::compile("secret", false).unwrap();
        let result = scan(packets, &matcher, &ProtocolFilter::none(), 1);
        assert!(result.is_err());
    }

    #[test]
    fn empty_source_yields_empty_result() {
        let matcher = PayloadMatcher::compile("anything", false).unwrap();
        let matches = scan(source(Vec::new()), &matcher, &ProtocolFilter::none(), 4).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn scanning_twice_is_idempotent() {
        let matcher = PayloadMatcher::compile("secret", true).unwrap();
        let filter = ProtocolFilter::none();

        let first = scan(source(sample_capture()), &matcher, &filter, 2).unwrap();
        let second = scan(source(sample_capture()), &matcher, &filter, 2).unwrap();
        assert_eq!(first, second);
    }
}
