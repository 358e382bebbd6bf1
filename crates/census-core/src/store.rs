//! The `CountryStore` and `PersonStore` traits.
//!
//! Implemented by storage backends ([`crate::memory::MemoryStore`],
//! `census-store-sqlite`). The services in [`crate::service`] depend on these
//! abstractions, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{country::Country, person::Person, query::PersonFilter};

// ─── Countries ───────────────────────────────────────────────────────────────

/// All methods return `Send` futures so stores can be shared across a
/// multi-threaded runtime (e.g. tokio with `axum`).
pub trait CountryStore: Send + Sync {
  /// Converts into [`crate::Error`] so domain failures such as a duplicate
  /// name keep their meaning above the store.
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Persist a country. Fails if another country already has the exact same
  /// name.
  fn add_country(
    &self,
    country: Country,
  ) -> impl Future<Output = Result<Country, Self::Error>> + Send + '_;

  /// All countries in insertion order.
  fn list_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_country(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + '_;

  /// Exact, case-sensitive name lookup.
  fn get_country_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + 'a;
}

// ─── Persons ─────────────────────────────────────────────────────────────────

pub trait PersonStore: Send + Sync {
  /// Converts into [`crate::Error`] so domain failures such as a duplicate
  /// name keep their meaning above the store.
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Persist an already validated, id-assigned person.
  fn add_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All persons in insertion order.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Persons matching `filter`, in insertion order. Backends evaluate the
  /// predicate themselves (e.g. as SQL) instead of handing back every row.
  fn filter_persons<'a>(
    &'a self,
    filter: &'a PersonFilter,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Overwrite every mutable column of the person with `person.person_id`.
  /// Fails if no such person exists.
  fn update_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Returns whether a row was actually removed.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
