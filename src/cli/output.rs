//! Scan result persistence.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::error::Result;
use crate::scan::MatchRecord;

/// Write match records to `path` as a pretty-printed JSON array.
///
/// The parent directory is created if absent. A completed scan always
/// produces the output file, even with zero matches.
pub fn write_matches(path: &Path, matches: &[MatchRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), matches)?;
    Ok(())
}
