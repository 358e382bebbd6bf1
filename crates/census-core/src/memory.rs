//! In-process store for tests and throwaway instances.
//!
//! References from persons to countries are not enforced here; a dangling
//! country id simply resolves to no country name.

use std::{
  collections::HashMap,
  sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use uuid::Uuid;

use crate::{
  Error, Result,
  country::Country,
  person::Person,
  query::PersonFilter,
  store::{CountryStore, PersonStore},
};

#[derive(Default)]
struct Tables {
  countries:     Vec<Country>,
  /// Exact name → id; backs the uniqueness check.
  country_names: HashMap<String, Uuid>,
  persons:       Vec<Person>,
}

impl Tables {
  fn country_name(&self, id: Option<Uuid>) -> Option<&str> {
    let id = id?;
    self
      .countries
      .iter()
      .find(|c| c.country_id == id)
      .map(|c| c.country_name.as_str())
  }
}

/// A store backed by in-memory vectors.
///
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn read(&self) -> RwLockReadGuard<'_, Tables> {
    self.tables.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, Tables> {
    self.tables.write().unwrap_or_else(PoisonError::into_inner)
  }
}

// ─── CountryStore impl ───────────────────────────────────────────────────────

impl CountryStore for MemoryStore {
  type Error = Error;

  async fn add_country(&self, country: Country) -> Result<Country> {
    let mut tables = self.write();
    if tables.country_names.contains_key(&country.country_name) {
      return Err(Error::DuplicateCountry(country.country_name));
    }
    tables
      .country_names
      .insert(country.country_name.clone(), country.country_id);
    tables.countries.push(country.clone());
    Ok(country)
  }

  async fn list_countries(&self) -> Result<Vec<Country>> {
    Ok(self.read().countries.clone())
  }

  async fn get_country(&self, id: Uuid) -> Result<Option<Country>> {
    Ok(self.read().countries.iter().find(|c| c.country_id == id).cloned())
  }

  async fn get_country_by_name(&self, name: &str) -> Result<Option<Country>> {
    let tables = self.read();
    Ok(
      tables
        .country_names
        .get(name)
        .and_then(|id| tables.countries.iter().find(|c| c.country_id == *id))
        .cloned(),
    )
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for MemoryStore {
  type Error = Error;

  async fn add_person(&self, person: Person) -> Result<Person> {
    self.write().persons.push(person.clone());
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    Ok(self.read().persons.iter().find(|p| p.person_id == id).cloned())
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    Ok(self.read().persons.clone())
  }

  async fn filter_persons(&self, filter: &PersonFilter) -> Result<Vec<Person>> {
    let tables = self.read();
    Ok(
      tables
        .persons
        .iter()
        .filter(|p| filter.matches(p, tables.country_name(p.country_id)))
        .cloned()
        .collect(),
    )
  }

  async fn update_person(&self, person: Person) -> Result<Person> {
    let mut tables = self.write();
    let slot = tables
      .persons
      .iter_mut()
      .find(|p| p.person_id == person.person_id)
      .ok_or(Error::PersonNotFound(person.person_id))?;
    *slot = person.clone();
    Ok(person)
  }

  async fn delete_person(&self, id: Uuid) -> Result<bool> {
    let mut tables = self.write();
    let before = tables.persons.len();
    tables.persons.retain(|p| p.person_id != id);
    Ok(tables.persons.len() != before)
  }
}
