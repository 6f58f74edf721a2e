//! Validation flows: run the engine, then record the outcome.

use addrval_core::{
  address::AddressInput,
  engine::Validator,
  history::{HistoryRecord, HistoryStore},
  provider::GeocodingProvider,
  validation::ValidationResult,
};
use anyhow::{Context, Result};
use tracing::info;
use uuid::Uuid;

/// A validator paired with the history it writes to.
pub struct Session<P, S> {
  validator: Validator<P>,
  store:     S,
}

impl<P, S> Session<P, S>
where
  P: GeocodingProvider,
  S: HistoryStore,
{
  pub fn new(validator: Validator<P>, store: S) -> Self {
    Self { validator, store }
  }

  #[cfg(test)]
  pub fn store(&self) -> &S { &self.store }

  /// Validate structured input and record it.
  pub async fn validate_new(
    &self,
    input: AddressInput,
  ) -> Result<ValidationResult> {
    input.validate()?;
    let query = input.to_single_line_string();
    let result = self.validator.validate_address(&input).await?;
    self.record(query, Some(input), &result).await?;
    Ok(result)
  }

  /// Validate a free-form address and record it without structured input.
  pub async fn validate_text(&self, query: &str) -> Result<ValidationResult> {
    let result = self.validator.validate_query(query).await?;
    self.record(query.to_string(), None, &result).await?;
    Ok(result)
  }

  /// Re-run a stored validation and record the fresh outcome.
  ///
  /// Structured input, when the record has it, is validated again as
  /// structured input; otherwise the stored query string is reused.
  pub async fn revalidate(
    &self,
    record: &HistoryRecord,
  ) -> Result<ValidationResult> {
    info!(source = %record.id, "re-validating history record");
    match &record.original_address_input {
      Some(input) => self.validate_new(input.clone()).await,
      None => self.validate_text(&record.original_query).await,
    }
  }

  /// Look up a record and re-validate it. `None` when the id is unknown.
  pub async fn revalidate_by_id(
    &self,
    id: Uuid,
  ) -> Result<Option<(HistoryRecord, ValidationResult)>> {
    let Some(record) = self
      .store
      .get_by_id(id)
      .await
      .context("failed to read validation history")?
    else {
      return Ok(None);
    };
    let result = self.revalidate(&record).await?;
    Ok(Some((record, result)))
  }

  async fn record(
    &self,
    query: String,
    input: Option<AddressInput>,
    result: &ValidationResult,
  ) -> Result<()> {
    self
      .store
      .save(query, input, result.clone())
      .await
      .context("failed to save validation result")?;
    Ok(())
  }
}
