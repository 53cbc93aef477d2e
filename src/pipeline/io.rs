//! File collaborators at the edges of a run.

use std::fs;
use std::path::Path;

use crate::error::AnalysisResult;

/// Read the whole file at `path` into memory.
pub fn load_bytes(path: impl AsRef<Path>) -> AnalysisResult<Vec<u8>> {
    Ok(fs::read(path)?)
}

/// Write `bytes` to `path`, replacing any existing file.
pub fn store_bytes(path: impl AsRef<Path>, bytes: &[u8]) -> AnalysisResult<()> {
    fs::write(path, bytes)?;
    Ok(())
}
