//! pcapneedle - Search PCAP payloads for regex patterns.
//!
//! This library scans packet capture files for application payloads matching
//! a regular expression, optionally restricted to packets that expose a named
//! protocol layer, and produces structured match records.
//!
//! # Example
//!
//! ```no_run
//! use pcapneedle::capture::CaptureReader;
//! use pcapneedle::decode::known_layers;
//! use pcapneedle::scan::{scan, PayloadMatcher, ProtocolFilter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let matcher = PayloadMatcher::compile("secret", false)?;
//!     let filter = ProtocolFilter::new(Some("tcp".into()), known_layers())?;
//!     let reader = CaptureReader::open("capture.pcap")?;
//!     let matches = scan(reader, &matcher, &filter, 4)?;
//!     println!("{} matching packets", matches.len());
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod cli;
pub mod decode;
pub mod error;
pub mod scan;

pub use error::{Error, Result};
