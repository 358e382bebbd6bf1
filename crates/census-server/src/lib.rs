//! Runtime configuration and application assembly for the `census` binary.

use std::{path::{Path, PathBuf}, sync::Arc};

use axum::Router;
use census_core::store::{CountryStore, PersonStore};
use census_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Environment variables with this prefix override file settings, e.g.
/// `CENSUS_PORT=8080`.
pub const ENV_PREFIX: &str = "CENSUS";

/// Runtime server configuration, deserialised from `census.toml` and the
/// environment. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          5000,
      database_path: PathBuf::from("census.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Layer the optional TOML file at `path` under `CENSUS_*` variables.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix(ENV_PREFIX))
    .build()?
    .try_deserialize()
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Open the SQLite store named by `cfg`, or a throwaway in-memory one.
pub async fn open_store(
  cfg: &ServerConfig,
  in_memory: bool,
) -> census_store_sqlite::Result<SqliteStore> {
  if in_memory {
    tracing::warn!("using an in-memory database; data is lost on exit");
    SqliteStore::open_in_memory().await
  } else {
    SqliteStore::open(&cfg.database_path).await
  }
}

/// The API router with request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: CountryStore + PersonStore + 'static,
{
  census_api::api_router(store).layer(TraceLayer::new_for_http())
}
