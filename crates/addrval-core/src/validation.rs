//! The outcome of one validation.

use serde::{Deserialize, Serialize};

use crate::{
  address::AddressInput,
  geocode::{MatchedAddress, Position},
};

pub const MSG_VALID: &str = "Address is valid";
pub const MSG_NO_MATCH: &str = "No matching address found";

/// What the engine concluded about an address.
///
/// Soft failures (no match, low confidence, provider trouble) are expressed
/// here as `is_valid == false` with an explanatory message, never as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
  pub is_valid:              bool,
  /// Winning candidate's score as a percentage, rounded to two decimals.
  pub confidence_percentage: f64,
  pub formatted_address:     Option<String>,
  pub validation_message:    String,
  /// Present when validation started from structured input.
  #[serde(default)]
  pub original_input:        Option<AddressInput>,
  #[serde(default)]
  pub matched_address:       Option<MatchedAddress>,
  #[serde(default)]
  pub position:              Option<Position>,
}

impl ValidationResult {
  /// An invalid result with zero confidence and nothing matched.
  pub fn rejected(message: impl Into<String>) -> Self {
    Self {
      is_valid:              false,
      confidence_percentage: 0.0,
      formatted_address:     None,
      validation_message:    message.into(),
      original_input:        None,
      matched_address:       None,
      position:              None,
    }
  }

  pub fn no_match() -> Self { Self::rejected(MSG_NO_MATCH) }
}

/// `value` rounded to two decimal places, ties to even.
pub fn round_percentage(value: f64) -> f64 {
  (value * 100.0).round_ties_even() / 100.0
}
