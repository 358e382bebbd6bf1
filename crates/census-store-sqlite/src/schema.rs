//! SQL schema and custom SQL functions for the Census SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

use rusqlite::{Connection, functions::FunctionFlags};

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS countries (
    country_id    TEXT PRIMARY KEY,
    country_name  TEXT NOT NULL UNIQUE   -- exact (BINARY) comparison
);

CREATE TABLE IF NOT EXISTS persons (
    person_id             TEXT PRIMARY KEY,
    person_name           TEXT,
    email                 TEXT,
    date_of_birth         TEXT,            -- YYYY-MM-DD
    gender                TEXT,            -- 'Male' | 'Female' | 'Other'
    country_id            TEXT REFERENCES countries(country_id) ON DELETE SET NULL,
    address               TEXT,
    receive_news_letters  INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS persons_country_idx ON persons(country_id);

PRAGMA user_version = 1;
";

/// `persons.date_of_birth` rendered as `Mon D YYYY`, matching
/// `census_core::query::format_search_date`. NULL when the date is NULL.
pub const DATE_OF_BIRTH_SEARCH_EXPR: &str = "(
    CASE substr(p.date_of_birth, 6, 2)
      WHEN '01' THEN 'Jan' WHEN '02' THEN 'Feb' WHEN '03' THEN 'Mar'
      WHEN '04' THEN 'Apr' WHEN '05' THEN 'May' WHEN '06' THEN 'Jun'
      WHEN '07' THEN 'Jul' WHEN '08' THEN 'Aug' WHEN '09' THEN 'Sep'
      WHEN '10' THEN 'Oct' WHEN '11' THEN 'Nov' WHEN '12' THEN 'Dec'
    END
    || ' ' || CAST(substr(p.date_of_birth, 9, 2) AS INTEGER)
    || ' ' || substr(p.date_of_birth, 1, 4)
  )";

/// Register `unicode_lower(text)`, a Unicode-aware replacement for SQLite's
/// ASCII-only `lower()`. NULL in, NULL out.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "unicode_lower",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
  )
}
