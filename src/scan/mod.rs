//! The capture-scanning pipeline.
//!
//! This module holds the core of the tool:
//! - `matcher` — compiled payload pattern with configurable case sensitivity
//! - `filter` — validated protocol layer filter
//! - `evaluate` — the per-packet decision function and its fault boundary
//! - `driver` — iteration over the capture source, sequential or across a
//!   bounded worker pool, with capture-order output

mod driver;
mod evaluate;
mod filter;
mod matcher;

pub use driver::{scan, DISPATCH_BATCH};
pub use evaluate::{evaluate, MatchRecord, ADDR_NOT_APPLICABLE, SNIPPET_MAX_CHARS};
pub use filter::ProtocolFilter;
pub use matcher::PayloadMatcher;
