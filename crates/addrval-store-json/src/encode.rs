//! Conversion between the in-memory log and the on-disk JSON text.
//!
//! The file holds a JSON array of [`HistoryRecord`]s, newest first. An empty
//! log is written as `[]`; a file holding only whitespace reads as empty.

use std::path::Path;

use addrval_core::history::HistoryRecord;

use crate::{Error, Result};

pub fn encode_log(records: &[HistoryRecord]) -> Result<String> {
  Ok(serde_json::to_string_pretty(records)?)
}

pub fn decode_log(path: &Path, raw: &str) -> Result<Vec<HistoryRecord>> {
  if raw.trim().is_empty() {
    return Ok(Vec::new());
  }
  serde_json::from_str(raw).map_err(|source| Error::CorruptState {
    path: path.to_path_buf(),
    source,
  })
}
