//! Application services: validation, store orchestration, and response
//! shaping for countries and persons.
//!
//! Both services are stateless façades over a shared store handle, so they are
//! cheap to clone and safe to build once per request.

use std::{collections::HashMap, sync::Arc, time::Instant};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  country::{Country, CountryAddRequest, CountryResponse},
  person::{Person, PersonAddRequest, PersonResponse, PersonUpdateRequest},
  query::{PersonFilter, SearchField, SortField, SortOrder, sort_persons},
  store::{CountryStore, PersonStore},
  validation::validate_model,
};

fn today() -> NaiveDate { Utc::now().date_naive() }

// ─── Countries ───────────────────────────────────────────────────────────────

pub struct CountriesService<S> {
  store: Arc<S>,
}

impl<S> Clone for CountriesService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: CountryStore> CountriesService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Add a country under a new id. The name must be present and not already
  /// taken (exact match).
  #[instrument(skip(self))]
  pub async fn add_country(
    &self,
    request: Option<CountryAddRequest>,
  ) -> Result<CountryResponse> {
    let request = request.ok_or(Error::NullArgument("country add request"))?;
    let name = request
      .country_name
      .ok_or_else(|| Error::InvalidArgument("country name is required".into()))?;

    if self
      .store
      .get_country_by_name(&name)
      .await
      .map_err(Error::from_store)?
      .is_some()
    {
      warn!(country_name = %name, "rejected duplicate country");
      return Err(Error::DuplicateCountry(name));
    }

    let country = Country { country_id: Uuid::new_v4(), country_name: name };
    let stored = self.store.add_country(country).await.map_err(Error::from_store)?;
    info!(country_id = %stored.country_id, "country added");
    Ok(stored.into())
  }

  pub async fn all_countries(&self) -> Result<Vec<CountryResponse>> {
    let countries = self.store.list_countries().await.map_err(Error::from_store)?;
    Ok(countries.into_iter().map(CountryResponse::from).collect())
  }

  /// `None` when `id` is absent or unmatched.
  pub async fn country_by_id(&self, id: Option<Uuid>) -> Result<Option<CountryResponse>> {
    let Some(id) = id else { return Ok(None) };
    let country = self.store.get_country(id).await.map_err(Error::from_store)?;
    Ok(country.map(CountryResponse::from))
  }

  /// Bulk-add country names, skipping blanks and names that already exist.
  /// Returns the number of countries inserted.
  #[instrument(skip_all)]
  pub async fn import_countries<I>(&self, names: I) -> Result<usize>
  where
    I: IntoIterator<Item = String>,
  {
    let mut inserted = 0;
    for name in names {
      let name = name.trim();
      if name.is_empty() {
        continue;
      }
      if self
        .store
        .get_country_by_name(name)
        .await
        .map_err(Error::from_store)?
        .is_some()
      {
        debug!(country_name = %name, "skipping existing country");
        continue;
      }
      let country = Country { country_id: Uuid::new_v4(), country_name: name.to_owned() };
      self.store.add_country(country).await.map_err(Error::from_store)?;
      inserted += 1;
    }
    info!(inserted, "countries imported");
    Ok(inserted)
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

pub struct PersonsService<S> {
  store: Arc<S>,
}

impl<S> Clone for PersonsService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S> PersonsService<S>
where
  S: PersonStore + CountryStore,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Validate, assign a new id, persist, and return the shaped record.
  #[instrument(skip_all)]
  pub async fn add_person(&self, request: Option<PersonAddRequest>) -> Result<PersonResponse> {
    let request = request.ok_or(Error::NullArgument("person add request"))?;
    validate_model(&request)?;

    let person = request.into_person(Uuid::new_v4());
    let stored = self.store.add_person(person).await.map_err(Error::from_store)?;
    info!(person_id = %stored.person_id, "person added");
    self.shape_one(stored).await
  }

  /// `None` when `id` is absent or unmatched.
  pub async fn person_by_id(&self, id: Option<Uuid>) -> Result<Option<PersonResponse>> {
    let Some(id) = id else { return Ok(None) };
    match self.store.get_person(id).await.map_err(Error::from_store)? {
      Some(person) => Ok(Some(self.shape_one(person).await?)),
      None => Ok(None),
    }
  }

  /// Every person, shaped. This is the enumeration export collaborators use.
  pub async fn all_persons(&self) -> Result<Vec<PersonResponse>> {
    info!("listing all persons");
    let persons = self.store.list_persons().await.map_err(Error::from_store)?;
    self.shape_all(persons).await
  }

  /// Filter by the field named `search_by`. An unrecognised field name or an
  /// empty search string returns every person.
  #[instrument(skip(self))]
  pub async fn filtered_persons(
    &self,
    search_by: &str,
    search_string: Option<&str>,
  ) -> Result<Vec<PersonResponse>> {
    let needle = search_string.unwrap_or_default();
    match search_by.parse::<SearchField>() {
      Ok(field) if !needle.is_empty() => self.filter(field, needle).await,
      _ => self.all_persons().await,
    }
  }

  /// Typed form of [`Self::filtered_persons`]. Persons whose `field` is
  /// absent are included.
  pub async fn filter(&self, field: SearchField, needle: &str) -> Result<Vec<PersonResponse>> {
    let filter = PersonFilter::new(field, needle);
    let started = Instant::now();
    let persons = self
      .store
      .filter_persons(&filter)
      .await
      .map_err(Error::from_store)?;
    info!(
      field = %field,
      matched = persons.len(),
      elapsed_ms = started.elapsed().as_millis() as u64,
      "filtered persons"
    );
    self.shape_all(persons).await
  }

  /// Order `persons` by the field named `sort_by`. An empty or unrecognised
  /// field name returns the input unchanged.
  pub fn sorted_persons(
    &self,
    persons: Vec<PersonResponse>,
    sort_by: &str,
    order: SortOrder,
  ) -> Vec<PersonResponse> {
    match sort_by.parse::<SortField>() {
      Ok(field) => Self::sort(persons, field, order),
      Err(_) => {
        if !sort_by.is_empty() {
          debug!(sort_by, "unrecognised sort field; leaving order unchanged");
        }
        persons
      }
    }
  }

  /// Typed form of [`Self::sorted_persons`]; stable for equal keys.
  pub fn sort(
    mut persons: Vec<PersonResponse>,
    field: SortField,
    order: SortOrder,
  ) -> Vec<PersonResponse> {
    sort_persons(&mut persons, field, order);
    persons
  }

  /// Overwrite every mutable field of an existing person. Unlike lookups, a
  /// missing id is an error here.
  #[instrument(skip_all)]
  pub async fn update_person(
    &self,
    request: Option<PersonUpdateRequest>,
  ) -> Result<PersonResponse> {
    let request = request.ok_or(Error::NullArgument("person update request"))?;
    validate_model(&request)?;

    let id = request.person_id;
    let mut person = self
      .store
      .get_person(id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| {
        warn!(person_id = %id, "update of unknown person");
        Error::PersonNotFound(id)
      })?;

    request.apply_to(&mut person);
    let stored = self.store.update_person(person).await.map_err(Error::from_store)?;
    info!(person_id = %id, "person updated");
    self.shape_one(stored).await
  }

  /// `false` when no person has `id`.
  #[instrument(skip(self))]
  pub async fn delete_person(&self, id: Option<Uuid>) -> Result<bool> {
    let id = id.ok_or(Error::NullArgument("person id"))?;
    let removed = self.store.delete_person(id).await.map_err(Error::from_store)?;
    if removed {
      info!(person_id = %id, "person deleted");
    }
    Ok(removed)
  }

  // ── Shaping ───────────────────────────────────────────────────────────────

  async fn shape_one(&self, person: Person) -> Result<PersonResponse> {
    let country = match person.country_id {
      Some(id) => self
        .store
        .get_country(id)
        .await
        .map_err(Error::from_store)?
        .map(|c| c.country_name),
      None => None,
    };
    Ok(PersonResponse::shape(person, country, today()))
  }

  /// Join country names onto a batch with a single country read.
  async fn shape_all(&self, persons: Vec<Person>) -> Result<Vec<PersonResponse>> {
    let names: HashMap<Uuid, String> = self
      .store
      .list_countries()
      .await
      .map_err(Error::from_store)?
      .into_iter()
      .map(|c| (c.country_id, c.country_name))
      .collect();

    let today = today();
    Ok(
      persons
        .into_iter()
        .map(|p| {
          let country = p.country_id.and_then(|id| names.get(&id).cloned());
          PersonResponse::shape(p, country, today)
        })
        .collect(),
    )
  }
}
