//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use census_core::{
  country::{Country, CountryAddRequest},
  person::{Gender, Person, PersonAddRequest},
  query::{PersonFilter, SearchField},
  service::{CountriesService, PersonsService},
  store::{CountryStore, PersonStore},
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn country(name: &str) -> Country {
  Country { country_id: Uuid::new_v4(), country_name: name.into() }
}

fn person(name: Option<&str>) -> Person {
  Person {
    person_id:            Uuid::new_v4(),
    person_name:          name.map(str::to_owned),
    email:                Some("someone@example.com".into()),
    date_of_birth:        None,
    gender:               None,
    country_id:           None,
    address:              None,
    receive_news_letters: false,
  }
}

fn names(persons: &[Person]) -> Vec<Option<&str>> {
  persons.iter().map(|p| p.person_name.as_deref()).collect()
}

// ─── Countries ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_country() {
  let s = store().await;
  let added = s.add_country(country("Japan")).await.unwrap();

  let fetched = s.get_country(added.country_id).await.unwrap();
  assert_eq!(fetched, Some(added.clone()));

  let by_name = s.get_country_by_name("Japan").await.unwrap();
  assert_eq!(by_name, Some(added));
}

#[tokio::test]
async fn get_country_missing_returns_none() {
  let s = store().await;
  assert!(s.get_country(Uuid::new_v4()).await.unwrap().is_none());
  assert!(s.get_country_by_name("Atlantis").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_country_name_is_rejected() {
  let s = store().await;
  s.add_country(country("USA")).await.unwrap();

  let err = s.add_country(country("USA")).await.unwrap_err();
  assert!(matches!(err, crate::Error::DuplicateCountry(ref n) if n == "USA"));

  // Case differs, so this is a distinct name.
  s.add_country(country("Usa")).await.unwrap();
  assert_eq!(s.list_countries().await.unwrap().len(), 2);
}

#[tokio::test]
async fn list_countries_in_insertion_order() {
  let s = store().await;
  for name in ["Peru", "Chile", "Argentina"] {
    s.add_country(country(name)).await.unwrap();
  }
  let listed: Vec<_> = s
    .list_countries()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.country_name)
    .collect();
  assert_eq!(listed, ["Peru", "Chile", "Argentina"]);
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn person_fields_roundtrip() {
  let s = store().await;
  let india = s.add_country(country("India")).await.unwrap();

  let input = Person {
    person_id:            Uuid::new_v4(),
    person_name:          Some("Ravi".into()),
    email:                Some("ravi@example.com".into()),
    date_of_birth:        NaiveDate::from_ymd_opt(1985, 3, 7),
    gender:               Some(Gender::Male),
    country_id:           Some(india.country_id),
    address:              Some("12 MG Road".into()),
    receive_news_letters: true,
  };
  s.add_person(input.clone()).await.unwrap();

  let fetched = s.get_person(input.person_id).await.unwrap();
  assert_eq!(fetched, Some(input));
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_country_reference_is_rejected() {
  let s = store().await;
  let missing = Uuid::new_v4();
  let mut p = person(Some("Orphan"));
  p.country_id = Some(missing);
  let err = s.add_person(p).await.unwrap_err();
  assert!(matches!(err, crate::Error::UnknownCountry(id) if id == missing));
  assert!(s.list_persons().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_to_unknown_country_is_rejected() {
  let s = store().await;
  let mut p = person(Some("Mover"));
  s.add_person(p.clone()).await.unwrap();

  let missing = Uuid::new_v4();
  p.country_id = Some(missing);
  let err = s.update_person(p.clone()).await.unwrap_err();
  assert!(matches!(err, crate::Error::UnknownCountry(id) if id == missing));

  let stored = s.get_person(p.person_id).await.unwrap().unwrap();
  assert_eq!(stored.country_id, None);
}

#[tokio::test]
async fn update_overwrites_all_columns() {
  let s = store().await;
  let uk = s.add_country(country("UK")).await.unwrap();
  let mut p = person(Some("Jane"));
  p.address = Some("Old street".into());
  s.add_person(p.clone()).await.unwrap();

  p.person_name = Some("Janet".into());
  p.address = None;
  p.country_id = Some(uk.country_id);
  p.gender = Some(Gender::Female);
  p.receive_news_letters = true;
  s.update_person(p.clone()).await.unwrap();

  assert_eq!(s.get_person(p.person_id).await.unwrap(), Some(p));
}

#[tokio::test]
async fn update_missing_person_errors() {
  let s = store().await;
  let err = s.update_person(person(Some("Ghost"))).await.unwrap_err();
  assert!(matches!(err, crate::Error::PersonNotFound(_)));
}

#[tokio::test]
async fn delete_reports_whether_removed() {
  let s = store().await;
  let p = person(Some("Temp"));
  s.add_person(p.clone()).await.unwrap();

  assert!(s.delete_person(p.person_id).await.unwrap());
  assert!(!s.delete_person(p.person_id).await.unwrap());
  assert!(s.list_persons().await.unwrap().is_empty());
}

// ─── Filtering ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn filter_by_name_is_case_insensitive_and_keeps_nulls() {
  let s = store().await;
  for name in [Some("Mary"), Some("EMMA"), Some("John"), None] {
    s.add_person(person(name)).await.unwrap();
  }

  let filter = PersonFilter::new(SearchField::PersonName, "Ma");
  let found = s.filter_persons(&filter).await.unwrap();
  assert_eq!(names(&found), [Some("Mary"), Some("EMMA"), None]);
}

#[tokio::test]
async fn filter_folds_non_ascii_case() {
  let s = store().await;
  for name in ["ÉMILE", "Émilie", "Emil"] {
    s.add_person(person(Some(name))).await.unwrap();
  }

  let filter = PersonFilter::new(SearchField::PersonName, "émil");
  let found = s.filter_persons(&filter).await.unwrap();
  assert_eq!(names(&found), [Some("ÉMILE"), Some("Émilie")]);
}

#[tokio::test]
async fn filter_by_country_name_joins() {
  let s = store().await;
  let india = s.add_country(country("India")).await.unwrap();
  let japan = s.add_country(country("Japan")).await.unwrap();

  let mut a = person(Some("A"));
  a.country_id = Some(india.country_id);
  let mut b = person(Some("B"));
  b.country_id = Some(japan.country_id);
  let c = person(Some("C"));
  for p in [a, b, c] {
    s.add_person(p).await.unwrap();
  }

  let filter = PersonFilter::new(SearchField::Country, "JAP");
  let found = s.filter_persons(&filter).await.unwrap();
  assert_eq!(names(&found), [Some("B"), Some("C")]);
}

#[tokio::test]
async fn filter_by_date_matches_rendered_form() {
  let s = store().await;
  let mut jan = person(Some("Jan"));
  jan.date_of_birth = NaiveDate::from_ymd_opt(2000, 1, 5);
  let mut dec = person(Some("Dec"));
  dec.date_of_birth = NaiveDate::from_ymd_opt(1999, 12, 25);
  for p in [jan, dec] {
    s.add_person(p).await.unwrap();
  }

  let found = s
    .filter_persons(&PersonFilter::new(SearchField::DateOfBirth, "jan 5 2000"))
    .await
    .unwrap();
  assert_eq!(names(&found), [Some("Jan")]);

  let found = s
    .filter_persons(&PersonFilter::new(SearchField::DateOfBirth, "dec 25"))
    .await
    .unwrap();
  assert_eq!(names(&found), [Some("Dec")]);
}

#[tokio::test]
async fn sql_filter_agrees_with_in_process_predicate() {
  let s = store().await;
  let mut a = person(Some("Ann"));
  a.gender = Some(Gender::Female);
  a.address = Some("5 Main St".into());
  let mut b = person(Some("Bob"));
  b.gender = Some(Gender::Male);
  let c = person(Some("Cy"));
  let mut d = person(Some("ÉMILE"));
  d.address = Some("Straße 9".into());
  for p in [a, b, c, d] {
    s.add_person(p).await.unwrap();
  }

  let everyone = s.list_persons().await.unwrap();
  for (field, needle) in [
    (SearchField::PersonName, "émile"),
    (SearchField::Address, "STRASSE"),
    (SearchField::Address, "STRAßE"),
    (SearchField::Gender, "male"),
    (SearchField::Gender, "fe"),
    (SearchField::Address, "main"),
    (SearchField::Email, "nobody"),
  ] {
    let filter = PersonFilter::new(field, needle);
    let expected: Vec<_> = everyone
      .iter()
      .filter(|p| filter.matches(p, None))
      .cloned()
      .collect();
    assert_eq!(s.filter_persons(&filter).await.unwrap(), expected, "{field} ~ {needle}");
  }
}

// ─── Errors seen by the services ─────────────────────────────────────────────

#[test]
fn store_errors_keep_their_domain_meaning() {
  let id = Uuid::new_v4();
  let dup: census_core::Error = crate::Error::DuplicateCountry("Peru".into()).into();
  assert!(matches!(dup, census_core::Error::DuplicateCountry(ref n) if n == "Peru"));

  let missing: census_core::Error = crate::Error::PersonNotFound(id).into();
  assert!(matches!(missing, census_core::Error::PersonNotFound(got) if got == id));

  let fk: census_core::Error = crate::Error::UnknownCountry(id).into();
  assert!(matches!(fk, census_core::Error::InvalidArgument(_)));

  let other: census_core::Error = crate::Error::DateParse("bad".into()).into();
  assert!(matches!(other, census_core::Error::Store(_)));
}

#[tokio::test]
async fn concurrent_duplicate_country_adds_report_duplicate() {
  let countries = CountriesService::new(Arc::new(store().await));

  let (first, second) = tokio::join!(
    countries.add_country(Some(CountryAddRequest::new("Peru"))),
    countries.add_country(Some(CountryAddRequest::new("Peru"))),
  );

  let results = [first, second];
  assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
  assert!(results.iter().any(|r| matches!(
    r,
    Err(census_core::Error::DuplicateCountry(n)) if n == "Peru"
  )));
  assert_eq!(countries.all_countries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn service_add_with_unknown_country_is_invalid_argument() {
  let persons = PersonsService::new(Arc::new(store().await));
  let request = PersonAddRequest {
    person_name: Some("Orphan".into()),
    email: Some("orphan@example.com".into()),
    country_id: Some(Uuid::new_v4()),
    ..Default::default()
  };
  let err = persons.add_person(Some(request)).await.unwrap_err();
  assert!(matches!(err, census_core::Error::InvalidArgument(_)));
  assert!(persons.all_persons().await.unwrap().is_empty());
}
