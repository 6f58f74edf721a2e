//! Structured postal address input.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Separator placed between address components in the single-line form.
pub const COMPONENT_SEPARATOR: &str = ", ";

/// A structured address as entered by a user.
///
/// `address_line1`, `postal_code`, `city` and `country` are required and
/// must be non-blank; the two extra lines are optional. Build one through
/// [`AddressInput::new`] to have the required fields checked up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
  pub address_line1: String,
  #[serde(default)]
  pub address_line2: Option<String>,
  #[serde(default)]
  pub address_line3: Option<String>,
  pub postal_code:   String,
  pub city:          String,
  pub country:       String,
}

impl AddressInput {
  /// Build an address, rejecting blank required fields.
  pub fn new(
    address_line1: impl Into<String>,
    address_line2: Option<String>,
    address_line3: Option<String>,
    postal_code: impl Into<String>,
    city: impl Into<String>,
    country: impl Into<String>,
  ) -> Result<Self> {
    let input = Self {
      address_line1: address_line1.into(),
      address_line2,
      address_line3,
      postal_code: postal_code.into(),
      city: city.into(),
      country: country.into(),
    };
    input.validate()?;
    Ok(input)
  }

  /// Check that every required field holds something other than whitespace.
  /// Reports the first offending field in form order.
  pub fn validate(&self) -> Result<()> {
    let required = [
      ("address_line1", &self.address_line1),
      ("postal_code", &self.postal_code),
      ("city", &self.city),
      ("country", &self.country),
    ];
    match required.iter().find(|(_, value)| value.trim().is_empty()) {
      Some((field, _)) => Err(Error::MissingField(field)),
      None => Ok(()),
    }
  }

  /// The canonical query string sent to the geocoding provider.
  ///
  /// Components are joined in the order line 1, line 2, line 3, postal code,
  /// city, country. Blank components are skipped entirely, so the result
  /// never starts or ends with a separator and never contains two in a row.
  pub fn to_single_line_string(&self) -> String {
    let parts = [
      Some(self.address_line1.as_str()),
      self.address_line2.as_deref(),
      self.address_line3.as_deref(),
      Some(self.postal_code.as_str()),
      Some(self.city.as_str()),
      Some(self.country.as_str()),
    ];

    parts
      .into_iter()
      .flatten()
      .filter(|part| !part.trim().is_empty())
      .collect::<Vec<_>>()
      .join(COMPONENT_SEPARATOR)
  }
}
