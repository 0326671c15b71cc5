//! Command-line interface module.
//!
//! This module handles:
//! - Argument parsing via clap
//! - Persisting scan results as JSON

mod args;
mod output;

pub use args::Args;
pub use output::write_matches;
