//! The validation engine: provider candidates in, [`ValidationResult`] out.

use tracing::{debug, warn};

use crate::{
  Error, Result,
  address::AddressInput,
  geocode::SearchResponse,
  provider::{GeocodeError, GeocodingProvider},
  validation::{MSG_VALID, ValidationResult, round_percentage},
};

/// Confidence threshold used when none is configured (80 %).
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Validates addresses against a [`GeocodingProvider`].
///
/// Holds no state between calls apart from its threshold, which is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct Validator<P> {
  provider:  P,
  /// Minimum accepted score as a fraction (0.8 means 80 %).
  threshold: f64,
}

impl<P: GeocodingProvider> Validator<P> {
  /// Create a validator accepting candidates whose score reaches
  /// `threshold` (a fraction in `0.0..=1.0`).
  ///
  /// The threshold is compared as a percentage rounded to two decimals,
  /// the same precision as the reported confidence. It is therefore
  /// quantised to hundredths of a percent: `0.80004` behaves as `0.8`.
  pub fn new(provider: P, threshold: f64) -> Result<Self> {
    if !(0.0..=1.0).contains(&threshold) {
      return Err(Error::InvalidThreshold(threshold));
    }
    Ok(Self { provider, threshold })
  }

  pub fn provider(&self) -> &P { &self.provider }

  /// The threshold expressed as a percentage.
  pub fn threshold_percentage(&self) -> f64 {
    round_percentage(self.threshold * 100.0)
  }

  /// Validate structured input. The provider sees the canonical single-line
  /// form; the input is attached to the returned result.
  pub async fn validate_address(
    &self,
    input: &AddressInput,
  ) -> Result<ValidationResult> {
    let query = input.to_single_line_string();
    let mut result = self.validate_query(&query).await?;
    result.original_input = Some(input.clone());
    Ok(result)
  }

  /// Validate a free-form address string.
  ///
  /// Only a blank `query` produces an `Err`. Every provider outcome,
  /// including failures, comes back as a [`ValidationResult`].
  pub async fn validate_query(&self, query: &str) -> Result<ValidationResult> {
    if query.trim().is_empty() {
      return Err(Error::InvalidArgument(
        "address cannot be empty".to_string(),
      ));
    }

    debug!(query, "searching address");
    match self.provider.search_address(query).await {
      Ok(response) => Ok(self.evaluate(&response)),
      Err(e) => {
        warn!(query, error = %e, "address search failed");
        Ok(failure_result(&e))
      }
    }
  }

  fn evaluate(&self, response: &SearchResponse) -> ValidationResult {
    let Some(best) = response.best_match() else {
      debug!("no candidates returned");
      return ValidationResult::no_match();
    };

    let confidence = round_percentage(best.score * 100.0);
    let threshold = self.threshold_percentage();
    let is_valid = confidence >= threshold;
    debug!(
      candidates = response.results.len(),
      confidence, threshold, is_valid, "selected best candidate"
    );

    let validation_message = if is_valid {
      MSG_VALID.to_string()
    } else {
      format!(
        "Address found but confidence score of {confidence}% is below \
         threshold ({threshold}%)."
      )
    };

    ValidationResult {
      is_valid,
      confidence_percentage: confidence,
      formatted_address: best
        .address
        .as_ref()
        .and_then(|a| a.freeform_address.clone()),
      validation_message,
      original_input: None,
      matched_address: best.address.clone(),
      position: Some(best.position),
    }
  }
}

fn failure_result(e: &GeocodeError) -> ValidationResult {
  if e.is_provider_failure() {
    ValidationResult::rejected(format!("Error validating address: {e}"))
  } else {
    ValidationResult::rejected(format!("Unexpected error: {e}"))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::geocode::{CandidateMatch, MatchedAddress, Position};

  /// Replays a canned outcome and records every query it was given.
  #[derive(Debug)]
  struct StubProvider {
    outcome: fn() -> Result<SearchResponse, GeocodeError>,
    queries: Mutex<Vec<String>>,
  }

  impl StubProvider {
    fn new(outcome: fn() -> Result<SearchResponse, GeocodeError>) -> Self {
      Self { outcome, queries: Mutex::new(Vec::new()) }
    }

    fn queries(&self) -> Vec<String> { self.queries.lock().unwrap().clone() }
  }

  impl GeocodingProvider for StubProvider {
    async fn search_address(
      &self,
      query: &str,
    ) -> Result<SearchResponse, GeocodeError> {
      self.queries.lock().unwrap().push(query.to_string());
      (self.outcome)()
    }
  }

  fn candidate(score: f64, freeform: &str) -> CandidateMatch {
    CandidateMatch {
      kind: "Point Address".into(),
      id: freeform.into(),
      score,
      position: Position { lat: 47.6062, lon: -122.3321 },
      address: Some(MatchedAddress {
        freeform_address: Some(freeform.into()),
        country_code: Some("US".into()),
        ..Default::default()
      }),
      viewport: None,
      entry_points: None,
    }
  }

  fn respond(results: Vec<CandidateMatch>) -> SearchResponse {
    SearchResponse { results, ..Default::default() }
  }

  fn validator(
    outcome: fn() -> Result<SearchResponse, GeocodeError>,
  ) -> Validator<StubProvider> {
    Validator::new(StubProvider::new(outcome), DEFAULT_CONFIDENCE_THRESHOLD)
      .unwrap()
  }

  // ── Preconditions ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn blank_query_is_invalid_argument() {
    let v = validator(|| Ok(respond(vec![])));
    for query in ["", "   ", "\t\n"] {
      let err = v.validate_query(query).await.unwrap_err();
      assert!(matches!(err, Error::InvalidArgument(_)));
    }
    assert!(v.provider().queries().is_empty());
  }

  #[test]
  fn threshold_outside_unit_range_is_rejected() {
    for t in [-0.1, 1.5, f64::NAN] {
      let provider = StubProvider::new(|| Ok(respond(vec![])));
      let err = Validator::new(provider, t).unwrap_err();
      assert!(matches!(err, Error::InvalidThreshold(_)));
    }
  }

  // ── Candidate selection ─────────────────────────────────────────────────

  #[tokio::test]
  async fn no_candidates_gives_invalid_zero_result() {
    let v = validator(|| Ok(respond(vec![])));
    let r = v.validate_query("nowhere").await.unwrap();
    assert!(!r.is_valid);
    assert_eq!(r.confidence_percentage, 0.0);
    assert!(r.validation_message.contains("No matching address found"));
    assert!(r.position.is_none());
    assert!(r.matched_address.is_none());
    assert!(r.formatted_address.is_none());
  }

  #[tokio::test]
  async fn picks_highest_score_even_when_not_first() {
    let v = validator(|| {
      Ok(respond(vec![
        candidate(0.82, "first"),
        candidate(0.91, "second"),
        candidate(0.75, "third"),
      ]))
    });
    let r = v.validate_query("somewhere").await.unwrap();
    assert!(r.is_valid);
    assert_eq!(r.confidence_percentage, 91.0);
    assert_eq!(r.formatted_address.as_deref(), Some("second"));
  }

  #[tokio::test]
  async fn equal_top_scores_keep_provider_order() {
    let v = validator(|| {
      Ok(respond(vec![
        candidate(0.70, "low"),
        candidate(0.88, "early"),
        candidate(0.88, "late"),
      ]))
    });
    let r = v.validate_query("somewhere").await.unwrap();
    assert_eq!(r.formatted_address.as_deref(), Some("early"));
  }

  // ── Threshold ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn score_equal_to_threshold_is_valid() {
    let v = validator(|| Ok(respond(vec![candidate(0.8, "edge")])));
    let r = v.validate_query("edge").await.unwrap();
    assert_eq!(r.confidence_percentage, 80.0);
    assert!(r.is_valid);
    assert_eq!(r.validation_message, "Address is valid");
  }

  #[tokio::test]
  async fn threshold_is_quantised_to_hundredths_of_a_percent() {
    let provider = StubProvider::new(|| Ok(respond(vec![candidate(0.8, "q")])));
    let v = Validator::new(provider, 0.800_04).unwrap();
    assert_eq!(v.threshold_percentage(), 80.0);
    assert!(v.validate_query("q").await.unwrap().is_valid);

    // 0.7 * 100 is 70.00000000000001 before rounding.
    let provider = StubProvider::new(|| Ok(respond(vec![candidate(0.7, "q")])));
    let v = Validator::new(provider, 0.7).unwrap();
    assert!(v.validate_query("q").await.unwrap().is_valid);
  }

  #[tokio::test]
  async fn below_threshold_reports_both_percentages() {
    let v = validator(|| Ok(respond(vec![candidate(0.755, "fuzzy")])));
    let r = v.validate_query("fuzzy").await.unwrap();
    assert!(!r.is_valid);
    assert_eq!(r.confidence_percentage, 75.5);
    assert_eq!(
      r.validation_message,
      "Address found but confidence score of 75.5% is below threshold (80%)."
    );
    // A low-confidence match still carries its location.
    assert!(r.position.is_some());
    assert_eq!(r.formatted_address.as_deref(), Some("fuzzy"));
  }

  #[tokio::test]
  async fn confidence_is_rounded_to_two_decimals() {
    let v = validator(|| Ok(respond(vec![candidate(0.856_78, "x")])));
    let r = v.validate_query("x").await.unwrap();
    assert_eq!(r.confidence_percentage, 85.68);
  }

  #[tokio::test]
  async fn candidate_without_address_has_no_formatted_address() {
    let v = validator(|| {
      let mut c = candidate(0.95, "bare");
      c.address = None;
      Ok(respond(vec![c]))
    });
    let r = v.validate_query("bare").await.unwrap();
    assert!(r.is_valid);
    assert!(r.formatted_address.is_none());
    assert!(r.matched_address.is_none());
    assert_eq!(r.position, Some(Position { lat: 47.6062, lon: -122.3321 }));
  }

  // ── Failures ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn provider_failure_becomes_invalid_result() {
    let v = validator(|| {
      Err(GeocodeError::Connection("connection refused".into()))
    });
    let r = v.validate_query("1 Main St").await.unwrap();
    assert!(!r.is_valid);
    assert_eq!(r.confidence_percentage, 0.0);
    assert_eq!(
      r.validation_message,
      "Error validating address: error connecting to geocoding provider: \
       connection refused"
    );
  }

  #[tokio::test]
  async fn unexpected_failure_is_labelled_as_such() {
    let v = validator(|| Err(GeocodeError::Other("boom".into())));
    let r = v.validate_query("1 Main St").await.unwrap();
    assert!(!r.is_valid);
    assert_eq!(r.validation_message, "Unexpected error: boom");
  }

  // ── Structured input ────────────────────────────────────────────────────

  #[tokio::test]
  async fn structured_input_is_sent_as_single_line_and_attached() {
    let v = validator(|| Ok(respond(vec![candidate(0.97, "Main")])));
    let input =
      AddressInput::new("123 Main St", None, None, "12345", "Seattle", "USA")
        .unwrap();

    let r = v.validate_address(&input).await.unwrap();
    assert!(r.is_valid);
    assert_eq!(r.original_input.as_ref(), Some(&input));
    assert_eq!(
      v.provider().queries(),
      vec!["123 Main St, 12345, Seattle, USA".to_string()]
    );
  }

  #[tokio::test]
  async fn structured_input_is_attached_on_soft_failure_too() {
    let v = validator(|| Ok(respond(vec![])));
    let input =
      AddressInput::new("9 Nowhere Rd", None, None, "00000", "Atlantis", "Sea")
        .unwrap();
    let r = v.validate_address(&input).await.unwrap();
    assert!(!r.is_valid);
    assert_eq!(r.original_input, Some(input));
  }
}
