//! Runtime settings: TOML file, then `ADDRVAL_*` environment variables.
//!
//! Command-line flags are applied on top by `main`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use addrval_core::{
  engine::DEFAULT_CONFIDENCE_THRESHOLD, history::DEFAULT_MAX_HISTORY_SIZE,
};
use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::client::{AzureMapsConfig, Credentials};

pub const DEFAULT_ENDPOINT: &str = "https://atlas.microsoft.com/";

/// Everything the binary needs to wire up a validator and a history store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Base URL of the Azure Maps account.
  pub endpoint:             String,
  /// Shared-key authentication.
  pub subscription_key:     Option<String>,
  /// Microsoft Entra ID authentication: bearer token plus Maps client id.
  pub access_token:         Option<String>,
  pub client_id:            Option<String>,
  /// Fraction (0–1) a top candidate must reach to count as valid.
  pub confidence_threshold: f64,
  /// How many candidates to ask the provider for.
  pub result_limit:         u32,
  pub request_timeout_secs: u64,
  pub history_path:         PathBuf,
  pub max_history_size:     usize,
  /// Sample log copied into `history_path` when that file does not exist.
  pub seed_history_path:    Option<PathBuf>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      endpoint:             DEFAULT_ENDPOINT.to_string(),
      subscription_key:     None,
      access_token:         None,
      client_id:            None,
      confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
      result_limit:         5,
      request_timeout_secs: 30,
      history_path:         PathBuf::from("data/validation-history.json"),
      max_history_size:     DEFAULT_MAX_HISTORY_SIZE,
      seed_history_path:    None,
    }
  }
}

impl Settings {
  /// Layer the optional TOML file at `path` under `ADDRVAL_*` variables.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("ADDRVAL").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// Reject values the engine or store would refuse anyway, with a message
  /// that names the setting.
  pub fn validate(&self) -> Result<()> {
    if !(0.0..=1.0).contains(&self.confidence_threshold) {
      bail!(
        "confidence_threshold must be between 0 and 1, got {}",
        self.confidence_threshold
      );
    }
    if self.max_history_size == 0 {
      bail!("max_history_size must be at least 1");
    }
    if !(1..=100).contains(&self.result_limit) {
      bail!("result_limit must be between 1 and 100, got {}", self.result_limit);
    }
    Ok(())
  }

  /// Credentials for the provider. Shared key wins when both are set.
  pub fn credentials(&self) -> Result<Credentials> {
    let present = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

    if let Some(key) = present(&self.subscription_key) {
      return Ok(Credentials::SubscriptionKey(key));
    }
    if let Some(token) = present(&self.access_token) {
      return Ok(Credentials::Bearer {
        token,
        client_id: present(&self.client_id),
      });
    }
    bail!(
      "no Azure Maps credentials configured; set subscription_key \
       (ADDRVAL_SUBSCRIPTION_KEY) or access_token (ADDRVAL_ACCESS_TOKEN)"
    )
  }

  pub fn maps_config(&self) -> Result<AzureMapsConfig> {
    Ok(AzureMapsConfig {
      endpoint:     self.endpoint.clone(),
      credentials:  self.credentials()?,
      result_limit: self.result_limit,
      timeout:      Duration::from_secs(self.request_timeout_secs),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    let s = Settings::default();
    s.validate().unwrap();
    assert_eq!(s.confidence_threshold, 0.8);
    assert_eq!(s.max_history_size, 20);
  }

  #[test]
  fn loads_values_from_toml_file() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("addrval.toml");
    std::fs::write(
      &path,
      "subscription_key = \"abc\"\nconfidence_threshold = 0.9\n\
       max_history_size = 7\nhistory_path = \"/tmp/h.json\"\n\
       seed_history_path = \"data/sample-history.json\"\n",
    )
    .unwrap();

    let s = Settings::load(&path).unwrap();
    assert_eq!(s.subscription_key.as_deref(), Some("abc"));
    assert_eq!(s.confidence_threshold, 0.9);
    assert_eq!(s.max_history_size, 7);
    assert_eq!(s.history_path, PathBuf::from("/tmp/h.json"));
    assert_eq!(
      s.seed_history_path,
      Some(PathBuf::from("data/sample-history.json"))
    );
    // Unset keys keep their defaults.
    assert_eq!(s.endpoint, DEFAULT_ENDPOINT);
  }

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let s = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(s.result_limit, 5);
    assert!(s.seed_history_path.is_none());
  }

  #[test]
  fn validate_rejects_out_of_range_values() {
    let mut s = Settings { confidence_threshold: 1.2, ..Default::default() };
    assert!(s.validate().is_err());

    s.confidence_threshold = 0.5;
    s.max_history_size = 0;
    assert!(s.validate().is_err());

    s.max_history_size = 3;
    s.result_limit = 0;
    assert!(s.validate().is_err());
  }

  #[test]
  fn subscription_key_takes_precedence() {
    let s = Settings {
      subscription_key: Some("key".into()),
      access_token: Some("token".into()),
      ..Default::default()
    };
    assert!(matches!(
      s.credentials().unwrap(),
      Credentials::SubscriptionKey(k) if k == "key"
    ));
  }

  #[test]
  fn bearer_credentials_carry_client_id() {
    let s = Settings {
      subscription_key: Some("  ".into()),
      access_token: Some("token".into()),
      client_id: Some("maps-client".into()),
      ..Default::default()
    };
    match s.credentials().unwrap() {
      Credentials::Bearer { token, client_id } => {
        assert_eq!(token, "token");
        assert_eq!(client_id.as_deref(), Some("maps-client"));
      }
      other => panic!("unexpected credentials: {other:?}"),
    }
  }

  #[test]
  fn missing_credentials_is_an_error() {
    assert!(Settings::default().credentials().is_err());
  }
}
