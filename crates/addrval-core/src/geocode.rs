//! Geocoding search payloads.
//!
//! These mirror the provider's JSON search response (camelCase on the wire).
//! The engine only looks at `score`, `address` and `position`; everything else
//! is carried through untouched.

use serde::{Deserialize, Serialize};

// ─── Response ────────────────────────────────────────────────────────────────

/// The full answer to one address search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
  #[serde(default)]
  pub summary: SearchSummary,
  /// Candidates in provider order. Order matters: it breaks score ties.
  #[serde(default)]
  pub results: Vec<CandidateMatch>,
}

impl SearchResponse {
  /// Candidate with the strictly greatest score. Among equal scores the one
  /// the provider listed first wins.
  pub fn best_match(&self) -> Option<&CandidateMatch> {
    self.results.iter().fold(None, |best, candidate| match best {
      Some(current) if candidate.score <= current.score => Some(current),
      Some(current) if candidate.score.is_nan() => Some(current),
      _ => Some(candidate),
    })
  }
}

/// Query metadata echoed back by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSummary {
  pub query:         String,
  pub query_type:    String,
  pub query_time:    u32,
  pub num_results:   u32,
  pub offset:        u32,
  pub total_results: u32,
  pub fuzzy_level:   u32,
}

// ─── Candidates ──────────────────────────────────────────────────────────────

/// One scored geocoding hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatch {
  #[serde(rename = "type", default)]
  pub kind:         String,
  #[serde(default)]
  pub id:           String,
  /// Provider-defined relevance, observed in the 0.0–1.0 range.
  pub score:        f64,
  pub position:     Position,
  #[serde(default)]
  pub address:      Option<MatchedAddress>,
  #[serde(default)]
  pub viewport:     Option<Viewport>,
  #[serde(default)]
  pub entry_points: Option<Vec<EntryPoint>>,
}

/// Structured address components. Completeness varies by region, so every
/// field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchedAddress {
  pub street_number:                 Option<String>,
  pub street_name:                   Option<String>,
  pub municipality_subdivision:      Option<String>,
  pub municipality:                  Option<String>,
  pub country_secondary_subdivision: Option<String>,
  pub country_tertiary_subdivision:  Option<String>,
  pub country_subdivision:           Option<String>,
  pub country_subdivision_code:      Option<String>,
  pub country_subdivision_name:      Option<String>,
  pub postal_code:                   Option<String>,
  pub extended_postal_code:          Option<String>,
  pub country_code:                  Option<String>,
  pub country:                       Option<String>,
  #[serde(rename = "countryCodeISO3")]
  pub country_code_iso3:             Option<String>,
  pub freeform_address:              Option<String>,
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub lat: f64,
  pub lon: f64,
}

/// Bounding box suggested for displaying the match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
  pub top_left_point:  Position,
  pub btm_right_point: Position,
}

/// An access point for the matched location (e.g. a main entrance).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
  #[serde(rename = "type", default)]
  pub kind:     String,
  pub position: Position,
}
