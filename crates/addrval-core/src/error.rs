//! Error types for `addrval-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The caller broke a precondition, e.g. passed a blank query string.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A required [`AddressInput`](crate::address::AddressInput) field was
  /// empty or whitespace-only.
  #[error("missing required address field: {0}")]
  MissingField(&'static str),

  #[error("confidence threshold must be a fraction between 0 and 1, got {0}")]
  InvalidThreshold(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
