//! History records and the `HistoryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `addrval-store-json`).
//! A backend keeps one ordered log, newest record first, capped at a
//! configured size.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{address::AddressInput, validation::ValidationResult};

/// Records returned by a history listing when the caller does not say.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Log capacity used when none is configured.
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 20;

// ─── Record ──────────────────────────────────────────────────────────────────

/// One persisted validation event. Once written, no field is ever updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
  pub id:                     Uuid,
  /// Store-assigned creation time.
  pub timestamp:              DateTime<Utc>,
  /// The single-line string actually sent to the provider.
  pub original_query:         String,
  /// Present only when validation started from structured input.
  #[serde(default)]
  pub original_address_input: Option<AddressInput>,
  pub validation_result:      ValidationResult,
}

impl HistoryRecord {
  /// Stamp a new record with a fresh id and the current time.
  ///
  /// Only stores should call this; everyone else receives records from
  /// [`HistoryStore::save`].
  pub fn new(
    original_query: String,
    original_address_input: Option<AddressInput>,
    validation_result: ValidationResult,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      timestamp: Utc::now(),
      original_query,
      original_address_input,
      validation_result,
    }
  }

  /// One-line description for list views, e.g.
  /// `[VALID] 1 Microsoft Way, Redmond, WA 98052 (99.67%)`.
  pub fn summary(&self) -> String {
    let result = &self.validation_result;
    let status = if result.is_valid { "VALID" } else { "INVALID" };
    let shown = result
      .formatted_address
      .as_deref()
      .unwrap_or(&self.original_query);
    format!("[{status}] {shown} ({}%)", result.confidence_percentage)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a bounded validation-history backend.
///
/// Invariants every backend upholds:
/// - the most recently saved record is at index 0;
/// - after `save`, the log never holds more than its configured maximum;
/// - a backend that was never written reads as an empty log.
pub trait HistoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Record a validation and return the persisted [`HistoryRecord`].
  /// The id and timestamp are set by the store.
  fn save(
    &self,
    original_query: String,
    address_input: Option<AddressInput>,
    result: ValidationResult,
  ) -> impl Future<Output = Result<HistoryRecord, Self::Error>> + Send + '_;

  /// Up to `max_results` records, newest first.
  fn get_history(
    &self,
    max_results: usize,
  ) -> impl Future<Output = Result<Vec<HistoryRecord>, Self::Error>> + Send + '_;

  /// The record with `id`, or `None` if no such record is held.
  fn get_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<HistoryRecord>, Self::Error>>
  + Send
  + '_;

  /// Empty the log. Returns `false` when there was never anything to clear.
  fn clear(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
