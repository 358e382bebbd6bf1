//! CSV rendering of person listings and parsing of country uploads.

use census_core::person::PersonResponse;
use chrono::NaiveDate;

use crate::error::ApiError;

pub const PERSONS_CSV_HEADER: [&str; 7] = [
  "PersonName",
  "Email",
  "DateOfBirth",
  "Age",
  "Country",
  "Address",
  "ReceiveNewsLetters",
];

/// `MM-d-yyyy`, e.g. `01-5-2000`.
fn export_date(date: NaiveDate) -> String { date.format("%m-%-d-%Y").to_string() }

fn export_bool(b: bool) -> &'static str {
  if b { "True" } else { "False" }
}

/// Render `persons` as CSV with a header row. Absent values become empty
/// fields.
pub fn persons_csv(persons: &[PersonResponse]) -> Result<Vec<u8>, ApiError> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  writer.write_record(PERSONS_CSV_HEADER)?;

  for p in persons {
    writer.write_record([
      p.person_name.clone().unwrap_or_default(),
      p.email.clone().unwrap_or_default(),
      p.date_of_birth.map(export_date).unwrap_or_default(),
      p.age.map(|a| a.to_string()).unwrap_or_default(),
      p.country.clone().unwrap_or_default(),
      p.address.clone().unwrap_or_default(),
      export_bool(p.receive_news_letters).to_owned(),
    ])?;
  }

  writer
    .into_inner()
    .map_err(|e| ApiError::Csv(e.into_error().into()))
}

/// Country names from the first column of an uploaded CSV. The first row is
/// a header and is skipped; names are trimmed and blanks dropped.
pub fn country_names(body: &str) -> Result<Vec<String>, ApiError> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .from_reader(body.as_bytes());

  let mut names = Vec::new();
  for record in reader.records() {
    let record = record.map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if let Some(value) = record.get(0) {
      let trimmed = value.trim();
      if !trimmed.is_empty() {
        names.push(trimmed.to_owned());
      }
    }
  }
  Ok(names)
}
