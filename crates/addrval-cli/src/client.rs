//! Async HTTP client for the Azure Maps address search API.

use std::time::Duration;

use addrval_core::{
  geocode::SearchResponse,
  provider::{GeocodeError, GeocodingProvider},
};
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use tracing::debug;

const API_VERSION: &str = "1.0";

/// How requests prove they may use the Maps account.
#[derive(Clone)]
pub enum Credentials {
  /// Shared key passed as the `subscription-key` query parameter.
  SubscriptionKey(String),
  /// Microsoft Entra ID token, sent with the account's Maps client id.
  Bearer {
    token:     String,
    client_id: Option<String>,
  },
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::SubscriptionKey(_) => f.write_str("SubscriptionKey(<redacted>)"),
      Self::Bearer { client_id, .. } => f
        .debug_struct("Bearer")
        .field("token", &"<redacted>")
        .field("client_id", client_id)
        .finish(),
    }
  }
}

/// Connection settings for Azure Maps.
#[derive(Debug, Clone)]
pub struct AzureMapsConfig {
  pub endpoint:     String,
  pub credentials:  Credentials,
  /// Maximum number of candidates per search.
  pub result_limit: u32,
  pub timeout:      Duration,
}

/// Azure Maps search client.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct AzureMapsClient {
  client: Client,
  config: AzureMapsConfig,
}

impl AzureMapsClient {
  pub fn new(config: AzureMapsConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/search/address/json",
      self.config.endpoint.trim_end_matches('/')
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.config.credentials {
      Credentials::SubscriptionKey(key) => {
        req.query(&[("subscription-key", key.as_str())])
      }
      Credentials::Bearer { token, client_id } => {
        let req = req.bearer_auth(token);
        match client_id {
          Some(id) => req.header("x-ms-client-id", id),
          None => req,
        }
      }
    }
  }

  /// `GET /search/address/json?api-version=1.0&query=<q>&typeahead=false&limit=<n>`
  fn search_request(&self, query: &str) -> RequestBuilder {
    let req = self.client.get(self.url()).query(&[
      ("api-version", API_VERSION),
      ("query", query),
      ("typeahead", "false"),
    ]);
    self.auth(req.query(&[("limit", self.config.result_limit)]))
  }
}

impl GeocodingProvider for AzureMapsClient {
  async fn search_address(
    &self,
    query: &str,
  ) -> Result<SearchResponse, GeocodeError> {
    let resp = self
      .search_request(query)
      .send()
      .await
      .map_err(|e| GeocodeError::Connection(e.to_string()))?;

    let status = resp.status();
    let body = resp
      .text()
      .await
      .map_err(|e| GeocodeError::Connection(e.to_string()))?;

    if !status.is_success() {
      return Err(GeocodeError::Status {
        status:  status.as_u16(),
        message: error_message(&body),
      });
    }

    let response = decode_response(&body)?;
    debug!(
      query,
      candidates = response.results.len(),
      total = response.summary.total_results,
      "address search succeeded"
    );
    Ok(response)
  }
}

/// Parse a successful search body.
pub fn decode_response(body: &str) -> Result<SearchResponse, GeocodeError> {
  serde_json::from_str(body).map_err(|e| GeocodeError::Decode(e.to_string()))
}

/// Pull the human-readable message out of an Azure error body
/// (`{"error": {"code": ..., "message": ...}}`), falling back to the raw text.
fn error_message(body: &str) -> String {
  serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
    .unwrap_or_else(|| {
      let trimmed = body.trim();
      if trimmed.is_empty() {
        "no response body".to_string()
      } else {
        trimmed.chars().take(200).collect()
      }
    })
}
