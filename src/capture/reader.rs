//! Capture file reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapError, PcapNGReader};

use super::CapturedPacket;
use crate::error::{CaptureError, Error};

/// Buffer size for reading capture files (64KB).
const BUFFER_SIZE: usize = 65536;

/// Gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reader over a PCAP or PCAPNG file, with optional gzip decompression.
///
/// Packets are yielded lazily in capture order via the `Iterator` impl.
pub struct CaptureReader {
    inner: ReaderInner,
    frame: u64,
    link_type: u16,
}

enum ReaderInner {
    Legacy(LegacyPcapReader<BufReader<Box<dyn Read + Send>>>),
    Ng(PcapNGReader<BufReader<Box<dyn Read + Send>>>),
}

impl CaptureReader {
    /// Open a capture file for reading.
    ///
    /// Detects legacy PCAP and PCAPNG by magic number, and gunzips
    /// compressed files on the fly.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let gzipped = is_gzipped(path)?;

        let magic = sniff_magic(path, gzipped)?;
        let stream = open_stream(path, gzipped)?;

        match &magic {
            // Legacy PCAP, microsecond or nanosecond, either byte order
            [0xd4, 0xc3, 0xb2, 0xa1]
            | [0xa1, 0xb2, 0xc3, 0xd4]
            | [0x4d, 0x3c, 0xb2, 0xa1]
            | [0xa1, 0xb2, 0x3c, 0x4d] => {
                let reader = LegacyPcapReader::new(BUFFER_SIZE, stream).map_err(|e| {
                    Error::Capture(CaptureError::InvalidFormat {
                        reason: format!("failed to parse PCAP header: {e}"),
                    })
                })?;
                Ok(Self {
                    inner: ReaderInner::Legacy(reader),
                    frame: 0,
                    link_type: 1, // updated from the file header
                })
            }
            // PCAPNG section header block
            [0x0a, 0x0d, 0x0d, 0x0a] => {
                let reader = PcapNGReader::new(BUFFER_SIZE, stream).map_err(|e| {
                    Error::Capture(CaptureError::InvalidFormat {
                        reason: format!("failed to parse PCAPNG header: {e}"),
                    })
                })?;
                Ok(Self {
                    inner: ReaderInner::Ng(reader),
                    frame: 0,
                    link_type: 1, // updated from the interface description block
                })
            }
            _ => Err(Error::Capture(CaptureError::InvalidFormat {
                reason: format!("unknown magic number: {magic:02x?}"),
            })),
        }
    }

    /// Link layer type of the capture.
    pub fn link_type(&self) -> u16 {
        self.link_type
    }

    /// Read the next packet, or `None` at end of capture.
    pub fn next_packet(&mut self) -> Result<Option<CapturedPacket>, Error> {
        match self.inner {
            ReaderInner::Legacy(_) => self.next_legacy(),
            ReaderInner::Ng(_) => self.next_ng(),
        }
    }

    fn next_legacy(&mut self) -> Result<Option<CapturedPacket>, Error> {
        let reader = match &mut self.inner {
            ReaderInner::Legacy(r) => r,
            _ => unreachable!(),
        };
        loop {
            match reader.next() {
                Ok((offset, block)) => {
                    match block {
                        PcapBlockOwned::LegacyHeader(header) => {
                            self.link_type = header.network.0 as u16;
                            reader.consume(offset);
                        }
                        PcapBlockOwned::Legacy(packet) => {
                            self.frame += 1;
                            let timestamp_us =
                                (packet.ts_sec as i64) * 1_000_000 + packet.ts_usec as i64;
                            let captured = CapturedPacket::new(
                                self.frame,
                                timestamp_us,
                                self.link_type,
                                packet.data.to_vec(),
                            );
                            reader.consume(offset);
                            return Ok(Some(captured));
                        }
                        _ => reader.consume(offset),
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    reader.refill().map_err(|e| {
                        Error::Capture(CaptureError::InvalidFormat {
                            reason: format!("refill error: {e}"),
                        })
                    })?;
                }
                Err(e) => {
                    return Err(Error::Capture(CaptureError::InvalidFormat {
                        reason: format!("parse error at frame {}: {e}", self.frame),
                    }))
                }
            }
        }
    }

    fn next_ng(&mut self) -> Result<Option<CapturedPacket>, Error> {
        use pcap_parser::pcapng::Block;

        let reader = match &mut self.inner {
            ReaderInner::Ng(r) => r,
            _ => unreachable!(),
        };
        loop {
            match reader.next() {
                Ok((offset, block)) => {
                    match block {
                        PcapBlockOwned::NG(Block::InterfaceDescription(idb)) => {
                            self.link_type = idb.linktype.0 as u16;
                            reader.consume(offset);
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(epb)) => {
                            self.frame += 1;
                            // Interface time units, usually microseconds
                            let timestamp_us = ((epb.ts_high as i64) << 32) | epb.ts_low as i64;
                            let captured = CapturedPacket::new(
                                self.frame,
                                timestamp_us,
                                self.link_type,
                                epb.data.to_vec(),
                            );
                            reader.consume(offset);
                            return Ok(Some(captured));
                        }
                        PcapBlockOwned::NG(Block::SimplePacket(spb)) => {
                            self.frame += 1;
                            let captured = CapturedPacket::new(
                                self.frame,
                                0, // simple packet blocks carry no timestamp
                                self.link_type,
                                spb.data.to_vec(),
                            );
                            reader.consume(offset);
                            return Ok(Some(captured));
                        }
                        _ => reader.consume(offset),
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    reader.refill().map_err(|e| {
                        Error::Capture(CaptureError::InvalidFormat {
                            reason: format!("refill error: {e}"),
                        })
                    })?;
                }
                Err(e) => {
                    return Err(Error::Capture(CaptureError::InvalidFormat {
                        reason: format!("parse error at frame {}: {e}", self.frame),
                    }))
                }
            }
        }
    }
}

impl Iterator for CaptureReader {
    type Item = Result<CapturedPacket, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}

/// Open the (possibly gzipped) file as a buffered byte stream.
fn open_stream(path: &Path, gzipped: bool) -> Result<BufReader<Box<dyn Read + Send>>, Error> {
    let file = File::open(path).map_err(|_| {
        Error::Capture(CaptureError::FileNotFound {
            path: path.display().to_string(),
        })
    })?;
    let stream: Box<dyn Read + Send> = if gzipped {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(BufReader::with_capacity(BUFFER_SIZE, stream))
}

/// Read the first four decompressed bytes to identify the capture format.
fn sniff_magic(path: &Path, gzipped: bool) -> Result<[u8; 4], Error> {
    let mut stream = open_stream(path, gzipped)?;
    let mut magic = [0u8; 4];
    stream.read_exact(&mut magic).map_err(|_| {
        Error::Capture(CaptureError::InvalidFormat {
            reason: "file too short to read magic number".to_string(),
        })
    })?;
    Ok(magic)
}

/// Check whether a file is gzipped, by extension or magic bytes.
fn is_gzipped(path: &Path) -> Result<bool, Error> {
    if let Some(name) = path.file_name().and_then(|f| f.to_str()) {
        if name.to_lowercase().ends_with(".gz") {
            return Ok(true);
        }
    }

    let mut file = File::open(path).map_err(|_| {
        Error::Capture(CaptureError::FileNotFound {
            path: path.display().to_string(),
        })
    })?;
    let mut magic = [0u8; 2];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == GZIP_MAGIC),
        Err(_) => Ok(false), // too short to be gzipped
    }
}
