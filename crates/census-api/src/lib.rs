//! JSON REST API for Census.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`CountryStore`] and [`PersonStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", census_api::api_router(store.clone()))
//! ```

pub mod countries;
pub mod error;
pub mod persons;
pub mod tabular;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use census_core::{
  service::{CountriesService, PersonsService},
  store::{CountryStore, PersonStore},
};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub countries: CountriesService<S>,
  pub persons:   PersonsService<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { countries: self.countries.clone(), persons: self.persons.clone() }
  }
}

impl<S> AppState<S>
where
  S: CountryStore + PersonStore,
{
  pub fn new(store: Arc<S>) -> Self {
    Self {
      countries: CountriesService::new(Arc::clone(&store)),
      persons:   PersonsService::new(store),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CountryStore + PersonStore + 'static,
{
  Router::new()
    // Countries
    .route("/countries", get(countries::list::<S>).post(countries::create::<S>))
    .route("/countries/import", post(countries::import::<S>))
    .route("/countries/{id}", get(countries::get_one::<S>))
    // Persons
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route("/persons/export.csv", get(persons::export_csv::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete::<S>),
    )
    .with_state(AppState::new(store))
}
