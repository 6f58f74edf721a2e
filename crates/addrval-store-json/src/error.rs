//! Error type for `addrval-store-json`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The history file exists but does not hold a readable record list.
  #[error("history file {path} is corrupt: {source}")]
  CorruptState {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("max history size must be at least 1")]
  ZeroCapacity,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
