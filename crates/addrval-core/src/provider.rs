//! The `GeocodingProvider` trait and its error type.
//!
//! Implemented by HTTP clients (e.g. the Azure Maps client in `addrval-cli`).
//! The [`Validator`](crate::engine::Validator) depends on this abstraction,
//! never on a concrete client.

use std::future::Future;

use thiserror::Error;

use crate::geocode::SearchResponse;

/// Why an address search failed.
///
/// The first three variants are provider-specific failures the engine folds
/// into an "Error validating address" result. [`GeocodeError::Other`] covers
/// anything else and is reported as an unexpected error.
#[derive(Debug, Error)]
pub enum GeocodeError {
  #[error("error connecting to geocoding provider: {0}")]
  Connection(String),

  #[error("geocoding provider returned status {status}: {message}")]
  Status { status: u16, message: String },

  #[error("error parsing geocoding response: {0}")]
  Decode(String),

  #[error("{0}")]
  Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GeocodeError {
  /// Whether this is one of the provider's own failure modes rather than an
  /// unexpected error.
  pub fn is_provider_failure(&self) -> bool {
    !matches!(self, Self::Other(_))
  }
}

/// Anything that can turn a free-form address into scored candidates.
///
/// One call per search; implementations do not retry.
pub trait GeocodingProvider: Send + Sync {
  /// Search for `query` and return candidates in the provider's own order.
  fn search_address<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<SearchResponse, GeocodeError>> + Send + 'a;
}
