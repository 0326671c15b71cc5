//! Error types for pcapneedle.

use thiserror::Error;

/// Main error type for pcapneedle operations.
///
/// Every variant here is fatal to the run. Per-packet decode failures use
/// [`DecodeError`] instead, which is absorbed at the evaluator boundary and
/// never reaches this type.
#[derive(Error, Debug)]
pub enum Error {
    /// Search pattern failed to compile
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Protocol filter names an unknown layer
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Capture file missing or not decodable as a capture
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Worker pool could not be started
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the search pattern.
#[derive(Error, Debug)]
pub enum PatternError {
    /// Pattern is not a valid regular expression
    #[error("invalid pattern {pattern:?}: {reason}")]
    Invalid { pattern: String, reason: String },
}

/// Errors related to the protocol filter.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Layer name not in the decoder's known set
    #[error("unknown protocol layer {name:?}. Valid layers: {known}")]
    UnknownLayer { name: String, known: String },
}

/// Errors related to reading the capture file.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// File not found
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Invalid PCAP/PCAPNG format
    #[error("invalid capture format: {reason}")]
    InvalidFormat { reason: String },
}

/// Per-packet decode failure.
///
/// Recovered locally by the packet evaluator: the packet contributes no
/// match and a skipped-packet diagnostic is emitted. Never aborts a scan.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Link layer type the decoder does not understand
    #[error("unsupported link type: {link_type}")]
    UnsupportedLinkType { link_type: u16 },

    /// Packet bytes do not parse as the expected protocol stack
    #[error("malformed packet: {reason}")]
    Malformed { reason: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;
