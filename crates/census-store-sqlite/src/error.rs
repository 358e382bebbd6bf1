//! Error type for `census-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] census_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// The `countries.country_name` UNIQUE constraint rejected an insert.
  #[error("country name already exists: {0:?}")]
  DuplicateCountry(String),

  #[error("person not found: {0}")]
  PersonNotFound(uuid::Uuid),

  /// The `persons.country_id` foreign key rejected a write.
  #[error("country doesn't exist: {0}")]
  UnknownCountry(uuid::Uuid),
}

impl From<Error> for census_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(e) => e,
      Error::DuplicateCountry(name) => Self::DuplicateCountry(name),
      Error::PersonNotFound(id) => Self::PersonNotFound(id),
      Error::UnknownCountry(id) => {
        Self::InvalidArgument(format!("country {id} doesn't exist"))
      }
      other => Self::store(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
