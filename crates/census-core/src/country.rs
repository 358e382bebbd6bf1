//! Country records and their request/response shapes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored country. Names are unique across the store (exact match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub country_id:   Uuid,
  pub country_name: String,
}

/// Input to [`crate::service::CountriesService::add_country`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryAddRequest {
  pub country_name: Option<String>,
}

impl CountryAddRequest {
  pub fn new(name: impl Into<String>) -> Self {
    Self { country_name: Some(name.into()) }
  }
}

/// Read-side projection of a [`Country`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryResponse {
  pub country_id:   Uuid,
  pub country_name: String,
}

impl From<Country> for CountryResponse {
  fn from(c: Country) -> Self {
    Self { country_id: c.country_id, country_name: c.country_name }
  }
}
