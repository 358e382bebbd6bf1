//! Person records, the requests that create and overwrite them, and the shaped
//! response handed to presentation layers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Closed set of gender options. Persisted as its display text.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
  Male,
  Female,
  Other,
}

impl Gender {
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A stored person. The country is held by reference only; its display name
/// is joined in when shaping a [`PersonResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:            Uuid,
  pub person_name:          Option<String>,
  pub email:                Option<String>,
  pub date_of_birth:        Option<NaiveDate>,
  pub gender:               Option<Gender>,
  pub country_id:           Option<Uuid>,
  pub address:              Option<String>,
  pub receive_news_letters: bool,
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Input to [`crate::service::PersonsService::add_person`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAddRequest {
  pub person_name:          Option<String>,
  pub email:                Option<String>,
  pub date_of_birth:        Option<NaiveDate>,
  pub gender:               Option<Gender>,
  pub country_id:           Option<Uuid>,
  pub address:              Option<String>,
  #[serde(default)]
  pub receive_news_letters: bool,
}

impl PersonAddRequest {
  /// Build the domain record under a freshly assigned id.
  pub fn into_person(self, person_id: Uuid) -> Person {
    Person {
      person_id,
      person_name: self.person_name,
      email: self.email,
      date_of_birth: self.date_of_birth,
      gender: self.gender,
      country_id: self.country_id,
      address: self.address,
      receive_news_letters: self.receive_news_letters,
    }
  }

  /// Reuse the same field set as an overwrite of the person `person_id`.
  pub fn into_update_request(self, person_id: Uuid) -> PersonUpdateRequest {
    PersonUpdateRequest {
      person_id,
      person_name: self.person_name,
      email: self.email,
      date_of_birth: self.date_of_birth,
      gender: self.gender,
      country_id: self.country_id,
      address: self.address,
      receive_news_letters: self.receive_news_letters,
    }
  }
}

/// Input to [`crate::service::PersonsService::update_person`]. Every mutable
/// field is overwritten; there is no partial patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonUpdateRequest {
  pub person_id:            Uuid,
  pub person_name:          Option<String>,
  pub email:                Option<String>,
  pub date_of_birth:        Option<NaiveDate>,
  pub gender:               Option<Gender>,
  pub country_id:           Option<Uuid>,
  pub address:              Option<String>,
  #[serde(default)]
  pub receive_news_letters: bool,
}

impl PersonUpdateRequest {
  /// Overwrite every mutable field of `person`. The id is left untouched.
  pub fn apply_to(self, person: &mut Person) {
    person.person_name = self.person_name;
    person.email = self.email;
    person.date_of_birth = self.date_of_birth;
    person.gender = self.gender;
    person.country_id = self.country_id;
    person.address = self.address;
    person.receive_news_letters = self.receive_news_letters;
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

/// Read-side projection of a [`Person`], enriched with the resolved country
/// name and the age computed at read time. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonResponse {
  pub person_id:            Uuid,
  pub person_name:          Option<String>,
  pub email:                Option<String>,
  pub date_of_birth:        Option<NaiveDate>,
  pub gender:               Option<Gender>,
  pub country_id:           Option<Uuid>,
  /// Display name of the referenced country, if it resolves.
  pub country:              Option<String>,
  pub address:              Option<String>,
  pub receive_news_letters: bool,
  /// Completed years between `date_of_birth` and the shaping date.
  pub age:                  Option<u32>,
}

impl PersonResponse {
  pub fn shape(person: Person, country: Option<String>, today: NaiveDate) -> Self {
    let age = person.date_of_birth.and_then(|dob| age_on(dob, today));
    Self {
      person_id: person.person_id,
      person_name: person.person_name,
      email: person.email,
      date_of_birth: person.date_of_birth,
      gender: person.gender,
      country_id: person.country_id,
      country,
      address: person.address,
      receive_news_letters: person.receive_news_letters,
      age,
    }
  }

  /// Pre-fill an update request from this response (edit forms).
  pub fn to_update_request(&self) -> PersonUpdateRequest {
    PersonUpdateRequest {
      person_id:            self.person_id,
      person_name:          self.person_name.clone(),
      email:                self.email.clone(),
      date_of_birth:        self.date_of_birth,
      gender:               self.gender,
      country_id:           self.country_id,
      address:              self.address.clone(),
      receive_news_letters: self.receive_news_letters,
    }
  }
}

/// Age in completed years on `today`; `None` for a birth date in the future.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> Option<u32> {
  today.years_since(date_of_birth)
}
