//! Plain-text rendering of validation results and history.

use std::fmt::Write as _;

use addrval_core::{
  address::AddressInput, history::HistoryRecord, validation::ValidationResult,
};

/// Detailed view of one validation outcome.
pub fn render_result(result: &ValidationResult) -> String {
  let mut out = String::new();
  let status = if result.is_valid { "VALID" } else { "INVALID" };

  let _ = writeln!(out, "Status:     {status}");
  let _ = writeln!(out, "Confidence: {}%", result.confidence_percentage);
  let _ = writeln!(out, "Message:    {}", result.validation_message);

  if let Some(input) = &result.original_input {
    let _ = writeln!(out, "Entered:    {}", input.to_single_line_string());
  }
  if let Some(formatted) = &result.formatted_address {
    let _ = writeln!(out, "Matched:    {formatted}");
  }
  if let Some(position) = &result.position {
    let _ = writeln!(
      out,
      "Position:   {:.6}, {:.6}",
      position.lat, position.lon
    );
  }
  if let Some(address) = &result.matched_address {
    let street = match (&address.street_number, &address.street_name) {
      (Some(number), Some(name)) => Some(format!("{number} {name}")),
      (None, Some(name)) => Some(name.clone()),
      _ => None,
    };
    let components = [
      ("Street", street),
      ("City", address.municipality.clone()),
      ("Region", address.country_subdivision.clone()),
      ("Postcode", address.postal_code.clone()),
      ("Country", address.country.clone()),
    ];
    for (label, value) in components {
      if let Some(value) = value {
        let _ = writeln!(out, "  {label:<9} {value}");
      }
    }
  }
  out
}

/// One line per record, newest first, with the id needed for `show` and
/// `revalidate`.
pub fn render_history(records: &[HistoryRecord]) -> String {
  if records.is_empty() {
    return "No validation history found.\n".to_string();
  }

  let mut out = format!("{} validation record(s)\n", records.len());
  for record in records {
    let _ = writeln!(
      out,
      "{}  {}  {}",
      record.id,
      record.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
      record.summary()
    );
  }
  out
}

/// Full view of a stored record.
pub fn render_record(record: &HistoryRecord) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "Id:         {}", record.id);
  let _ = writeln!(out, "Recorded:   {}", record.timestamp.to_rfc3339());
  let _ = writeln!(out, "Query:      {}", record.original_query);
  if let Some(input) = &record.original_address_input {
    out.push_str(&render_input(input));
  }
  out.push_str(&render_result(&record.validation_result));
  out
}

fn render_input(input: &AddressInput) -> String {
  let mut out = String::from("Input:\n");
  let lines = [
    ("Line 1", Some(&input.address_line1)),
    ("Line 2", input.address_line2.as_ref()),
    ("Line 3", input.address_line3.as_ref()),
    ("Postcode", Some(&input.postal_code)),
    ("City", Some(&input.city)),
    ("Country", Some(&input.country)),
  ];
  for (label, value) in lines {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
      let _ = writeln!(out, "  {label:<9} {value}");
    }
  }
  out
}
