//! [`SqliteStore`], the SQLite implementation of [`CountryStore`] and
//! [`PersonStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, ffi};
use uuid::Uuid;

use census_core::{
  country::Country,
  person::Person,
  query::{PersonFilter, SearchField},
  store::{CountryStore, PersonStore},
};

use crate::{
  Error, Result,
  encode::{PERSON_COLUMNS, PersonParams, RawCountry, RawPerson, encode_uuid},
  schema::{DATE_OF_BIRTH_SEARCH_EXPR, SCHEMA, register_functions},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Census store backed by a single SQLite file.
///
/// Clones share one reference-counted connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a person SELECT whose only parameters are `params`.
  async fn query_persons(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }
}

/// The SQL expression compared by a filter on `field`. `persons` is aliased
/// `p`, the left-joined `countries` is `c`.
fn search_column(field: SearchField) -> &'static str {
  match field {
    SearchField::PersonName => "p.person_name",
    SearchField::Email => "p.email",
    SearchField::DateOfBirth => DATE_OF_BIRTH_SEARCH_EXPR,
    SearchField::Gender => "p.gender",
    SearchField::Country => "c.country_name",
    SearchField::Address => "p.address",
  }
}

fn has_extended_code(e: &rusqlite::Error, code: std::ffi::c_int) -> bool {
  matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.extended_code == code)
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  has_extended_code(e, ffi::SQLITE_CONSTRAINT_UNIQUE)
}

fn is_foreign_key_violation(e: &rusqlite::Error) -> bool {
  has_extended_code(e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

/// Only a write naming a country can trip the foreign key.
fn unknown_country(person: &Person) -> Error {
  Error::UnknownCountry(person.country_id.unwrap_or_default())
}

// ─── CountryStore impl ───────────────────────────────────────────────────────

impl CountryStore for SqliteStore {
  type Error = Error;

  async fn add_country(&self, country: Country) -> Result<Country> {
    let id_str = encode_uuid(country.country_id);
    let name = country.country_name.clone();

    let inserted: bool = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO countries (country_id, country_name) VALUES (?1, ?2)",
          rusqlite::params![id_str, name],
        ) {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateCountry(country.country_name));
    }
    Ok(country)
  }

  async fn list_countries(&self) -> Result<Vec<Country>> {
    let raws: Vec<RawCountry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT country_id, country_name FROM countries ORDER BY rowid")?;
        let rows = stmt
          .query_map([], RawCountry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCountry::into_country).collect()
  }

  async fn get_country(&self, id: Uuid) -> Result<Option<Country>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCountry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT country_id, country_name FROM countries WHERE country_id = ?1",
              rusqlite::params![id_str],
              RawCountry::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCountry::into_country).transpose()
  }

  async fn get_country_by_name(&self, name: &str) -> Result<Option<Country>> {
    let name = name.to_owned();

    let raw: Option<RawCountry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT country_id, country_name FROM countries WHERE country_name = ?1",
              rusqlite::params![name],
              RawCountry::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCountry::into_country).transpose()
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  async fn add_person(&self, person: Person) -> Result<Person> {
    let p = PersonParams::from(&person);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO persons (
             person_id, person_name, email, date_of_birth,
             gender, country_id, address, receive_news_letters
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            p.person_id,
            p.person_name,
            p.email,
            p.date_of_birth,
            p.gender,
            p.country_id,
            p.address,
            p.receive_news_letters,
          ],
        );
        match result {
          Ok(_) => Ok(true),
          Err(e) if is_foreign_key_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(unknown_country(&person));
    }
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM persons p WHERE p.person_id = ?1"),
              rusqlite::params![id_str],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    self
      .query_persons(
        format!("SELECT {PERSON_COLUMNS} FROM persons p ORDER BY p.rowid"),
        vec![],
      )
      .await
  }

  async fn filter_persons(&self, filter: &PersonFilter) -> Result<Vec<Person>> {
    // The needle is already lower-cased with the same Unicode folding.
    let column = search_column(filter.field);
    let sql = format!(
      "SELECT {PERSON_COLUMNS}
       FROM persons p
       LEFT JOIN countries c ON c.country_id = p.country_id
       WHERE {column} IS NULL OR instr(unicode_lower({column}), ?1) > 0
       ORDER BY p.rowid"
    );
    tracing::debug!(field = %filter.field, "filtering persons in sqlite");
    self.query_persons(sql, vec![filter.needle.clone()]).await
  }

  async fn update_person(&self, person: Person) -> Result<Person> {
    let p = PersonParams::from(&person);

    let changed: Option<usize> = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "UPDATE persons SET
             person_name = ?2, email = ?3, date_of_birth = ?4, gender = ?5,
             country_id = ?6, address = ?7, receive_news_letters = ?8
           WHERE person_id = ?1",
          rusqlite::params![
            p.person_id,
            p.person_name,
            p.email,
            p.date_of_birth,
            p.gender,
            p.country_id,
            p.address,
            p.receive_news_letters,
          ],
        );
        match result {
          Ok(n) => Ok(Some(n)),
          Err(e) if is_foreign_key_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    let Some(changed) = changed else {
      return Err(unknown_country(&person));
    };
    if changed == 0 {
      return Err(Error::PersonNotFound(person.person_id));
    }
    Ok(person)
  }

  async fn delete_person(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM persons WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
