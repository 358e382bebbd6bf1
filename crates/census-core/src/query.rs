//! Typed search and sort fields for person listings.
//!
//! Presentation layers address fields by their request keys (`"PersonName"`,
//! `"CountryID"`, ...). Those keys parse into the enums below; a key that does
//! not parse leaves the listing untouched rather than failing.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::person::{Person, PersonResponse};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// A person field that can be searched by substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum SearchField {
  PersonName,
  Email,
  /// Matched against the `MMM d yyyy` rendering, e.g. `Jan 1 2000`.
  DateOfBirth,
  Gender,
  /// Matched against the referenced country's display name.
  #[strum(to_string = "CountryID", serialize = "Country")]
  Country,
  Address,
}

/// A person response field that listings can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum SortField {
  PersonName,
  Email,
  DateOfBirth,
  Age,
  Gender,
  Country,
  Address,
  ReceiveNewsLetters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display)]
pub enum SortOrder {
  #[default]
  Ascending,
  Descending,
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// Case-insensitive substring predicate over one [`SearchField`].
///
/// A person whose targeted field is absent *matches*. Backends that push the
/// predicate down must reproduce that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFilter {
  pub field:  SearchField,
  /// Already lower-cased.
  pub needle: String,
}

impl PersonFilter {
  pub fn new(field: SearchField, needle: &str) -> Self {
    Self { field, needle: needle.to_lowercase() }
  }

  /// Evaluate against a stored person. `country_name` is the resolved name of
  /// the person's country, if any.
  pub fn matches(&self, person: &Person, country_name: Option<&str>) -> bool {
    let value = match self.field {
      SearchField::PersonName => person.person_name.clone(),
      SearchField::Email => person.email.clone(),
      SearchField::DateOfBirth => person.date_of_birth.map(format_search_date),
      SearchField::Gender => person.gender.map(|g| g.as_str().to_owned()),
      SearchField::Country => country_name.map(str::to_owned),
      SearchField::Address => person.address.clone(),
    };

    match value {
      None => true,
      Some(v) => v.to_lowercase().contains(&self.needle),
    }
  }
}

/// The date rendering searched by [`SearchField::DateOfBirth`].
pub fn format_search_date(date: NaiveDate) -> String {
  date.format("%b %-d %Y").to_string()
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Stable in-place sort. Equal keys keep their input order in both directions.
pub fn sort_persons(persons: &mut [PersonResponse], field: SortField, order: SortOrder) {
  let cmp: fn(&PersonResponse, &PersonResponse) -> Ordering = match field {
    SortField::PersonName => {
      |a, b| cmp_ignore_case(a.person_name.as_deref(), b.person_name.as_deref())
    }
    SortField::Email => |a, b| cmp_ignore_case(a.email.as_deref(), b.email.as_deref()),
    SortField::DateOfBirth => |a, b| a.date_of_birth.cmp(&b.date_of_birth),
    SortField::Age => |a, b| a.age.cmp(&b.age),
    SortField::Gender => {
      |a, b| cmp_ignore_case(a.gender.map(|g| g.as_str()), b.gender.map(|g| g.as_str()))
    }
    SortField::Country => |a, b| cmp_ignore_case(a.country.as_deref(), b.country.as_deref()),
    SortField::Address => |a, b| cmp_ignore_case(a.address.as_deref(), b.address.as_deref()),
    SortField::ReceiveNewsLetters => {
      |a, b| a.receive_news_letters.cmp(&b.receive_news_letters)
    }
  };

  match order {
    SortOrder::Ascending => persons.sort_by(cmp),
    SortOrder::Descending => persons.sort_by(|a, b| cmp(b, a)),
  }
}

/// Ordinal comparison after upper-casing each char. Absent sorts first.
pub fn cmp_ignore_case(a: Option<&str>, b: Option<&str>) -> Ordering {
  match (a, b) {
    (None, None) => Ordering::Equal,
    (None, Some(_)) => Ordering::Less,
    (Some(_), None) => Ordering::Greater,
    (Some(a), Some(b)) => a
      .chars()
      .flat_map(char::to_uppercase)
      .cmp(b.chars().flat_map(char::to_uppercase)),
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;
  use crate::person::Gender;

  fn person(name: Option<&str>) -> Person {
    Person {
      person_id:            Uuid::new_v4(),
      person_name:          name.map(str::to_owned),
      email:                None,
      date_of_birth:        None,
      gender:               None,
      country_id:           None,
      address:              None,
      receive_news_letters: false,
    }
  }

  fn response(name: &str) -> PersonResponse {
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    PersonResponse::shape(person(Some(name)), None, today)
  }

  fn names(persons: &[PersonResponse]) -> Vec<&str> {
    persons.iter().map(|p| p.person_name.as_deref().unwrap()).collect()
  }

  #[test]
  fn search_keys_parse() {
    assert_eq!("PersonName".parse::<SearchField>().unwrap(), SearchField::PersonName);
    assert_eq!("CountryID".parse::<SearchField>().unwrap(), SearchField::Country);
    assert_eq!("Country".parse::<SearchField>().unwrap(), SearchField::Country);
    assert!("personname".parse::<SearchField>().is_err());
    assert!("Age".parse::<SearchField>().is_err());
    assert_eq!("ReceiveNewsLetters".parse::<SortField>().unwrap(), SortField::ReceiveNewsLetters);
  }

  #[test]
  fn filter_is_case_insensitive_substring() {
    let f = PersonFilter::new(SearchField::PersonName, "MA");
    assert!(f.matches(&person(Some("Emma")), None));
    assert!(f.matches(&person(Some("Mary")), None));
    assert!(!f.matches(&person(Some("John")), None));
  }

  #[test]
  fn filter_matches_absent_values() {
    let f = PersonFilter::new(SearchField::PersonName, "ma");
    assert!(f.matches(&person(None), None));

    let f = PersonFilter::new(SearchField::Country, "india");
    assert!(f.matches(&person(Some("x")), None));
    assert!(f.matches(&person(Some("x")), Some("India")));
    assert!(!f.matches(&person(Some("x")), Some("Japan")));
  }

  #[test]
  fn filter_by_date_uses_short_month_rendering() {
    let mut p = person(Some("x"));
    p.date_of_birth = NaiveDate::from_ymd_opt(2000, 1, 5);
    assert_eq!(format_search_date(p.date_of_birth.unwrap()), "Jan 5 2000");
    assert!(PersonFilter::new(SearchField::DateOfBirth, "jan 5").matches(&p, None));
    assert!(!PersonFilter::new(SearchField::DateOfBirth, "feb").matches(&p, None));
  }

  #[test]
  fn filter_by_gender_matches_text() {
    let mut p = person(Some("x"));
    p.gender = Some(Gender::Female);
    assert!(PersonFilter::new(SearchField::Gender, "male").matches(&p, None));
    assert!(!PersonFilter::new(SearchField::Gender, "other").matches(&p, None));
  }

  #[test]
  fn sort_by_name_ignores_case() {
    let mut list = vec![response("bob"), response("Alice"), response("carol")];
    sort_persons(&mut list, SortField::PersonName, SortOrder::Ascending);
    assert_eq!(names(&list), ["Alice", "bob", "carol"]);
  }

  #[test]
  fn descending_sort_is_stable() {
    let mut list = vec![response("ann"), response("Zed"), response("ANN"), response("zed")];
    sort_persons(&mut list, SortField::PersonName, SortOrder::Descending);
    assert_eq!(names(&list), ["Zed", "zed", "ann", "ANN"]);
  }

  #[test]
  fn absent_values_sort_first() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut list = vec![
      response("b"),
      PersonResponse::shape(person(None), None, today),
      response("a"),
    ];
    sort_persons(&mut list, SortField::PersonName, SortOrder::Ascending);
    assert_eq!(list[0].person_name, None);
    assert_eq!(list[1].person_name.as_deref(), Some("a"));
  }

  #[test]
  fn sort_by_typed_fields() {
    let mut young = response("young");
    young.age = Some(20);
    young.receive_news_letters = true;
    let mut old = response("old");
    old.age = Some(60);

    let mut list = vec![old.clone(), young.clone()];
    sort_persons(&mut list, SortField::Age, SortOrder::Ascending);
    assert_eq!(names(&list), ["young", "old"]);

    sort_persons(&mut list, SortField::ReceiveNewsLetters, SortOrder::Descending);
    assert_eq!(names(&list), ["young", "old"]);
  }
  #[test]
  fn sort_by_country_ignores_case_and_puts_absent_first() {
    let mut peru = response("peru");
    peru.country = Some("peru".into());
    let mut chile = response("chile");
    chile.country = Some("Chile".into());
    let nowhere = response("nowhere");

    let mut list = vec![peru, nowhere, chile];
    sort_persons(&mut list, SortField::Country, SortOrder::Ascending);
    assert_eq!(names(&list), ["nowhere", "chile", "peru"]);

    sort_persons(&mut list, SortField::Country, SortOrder::Descending);
    assert_eq!(names(&list), ["peru", "chile", "nowhere"]);
  }

  #[test]
  fn sort_by_gender_uses_text() {
    let mut m = response("m");
    m.gender = Some(Gender::Male);
    let mut f = response("f");
    f.gender = Some(Gender::Female);
    let mut o = response("o");
    o.gender = Some(Gender::Other);

    let mut list = vec![o, m, f];
    sort_persons(&mut list, SortField::Gender, SortOrder::Ascending);
    assert_eq!(names(&list), ["f", "m", "o"]);
  }

  #[test]
  fn sort_by_date_of_birth_is_chronological() {
    let mut a = response("a");
    a.date_of_birth = NaiveDate::from_ymd_opt(1999, 12, 31);
    let mut b = response("b");
    b.date_of_birth = NaiveDate::from_ymd_opt(2000, 1, 1);
    let mut c = response("c");
    c.date_of_birth = NaiveDate::from_ymd_opt(1985, 6, 15);
    let undated = response("undated");

    let mut list = vec![b, undated, a, c];
    sort_persons(&mut list, SortField::DateOfBirth, SortOrder::Ascending);
    assert_eq!(names(&list), ["undated", "c", "a", "b"]);

    sort_persons(&mut list, SortField::DateOfBirth, SortOrder::Descending);
    assert_eq!(names(&list), ["b", "a", "c", "undated"]);
  }
}
