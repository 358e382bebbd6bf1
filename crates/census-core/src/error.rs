//! Error types for `census-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The request object (or id) itself was absent.
  #[error("argument must not be null: {0}")]
  NullArgument(&'static str),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A declarative field constraint failed; carries the constraint's message.
  #[error("{0}")]
  Validation(String),

  #[error("country name already exists: {0:?}")]
  DuplicateCountry(String),

  /// Raised by updates only. Lookups and deletes report a missing person as
  /// `None` / `false` instead.
  #[error("given person id doesn't exist: {0}")]
  PersonNotFound(Uuid),

  #[error("unknown gender: {0:?}")]
  UnknownGender(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Convert a store's error, keeping any domain variant it maps to.
  pub fn from_store<E: Into<Error>>(e: E) -> Self { e.into() }

  /// Wrap a backend error that has no domain meaning.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
