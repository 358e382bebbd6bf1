//! Handlers for `/countries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/countries` | Insertion order |
//! | `POST` | `/countries` | Body: `{"country_name":"Japan"}`; 409 on a taken name |
//! | `GET`  | `/countries/{id}` | 404 if not found |
//! | `POST` | `/countries/import` | CSV body, first column; returns `{"imported": n}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use census_core::{
  country::{CountryAddRequest, CountryResponse},
  store::{CountryStore, PersonStore},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, error::ApiError, tabular::country_names};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /countries`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<CountryResponse>>, ApiError>
where
  S: CountryStore + PersonStore,
{
  Ok(Json(state.countries.all_countries().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /countries`. A `null` body is rejected as a missing request.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Option<CountryAddRequest>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CountryStore + PersonStore,
{
  let country = state.countries.add_country(body).await?;
  Ok((StatusCode::CREATED, Json(country)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /countries/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<CountryResponse>, ApiError>
where
  S: CountryStore + PersonStore,
{
  let country = state
    .countries
    .country_by_id(Some(id))
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("country {id} not found")))?;
  Ok(Json(country))
}

// ─── Import ───────────────────────────────────────────────────────────────────

/// `POST /countries/import`, body: CSV with a header row.
pub async fn import<S>(
  State(state): State<AppState<S>>,
  body: String,
) -> Result<Json<Value>, ApiError>
where
  S: CountryStore + PersonStore,
{
  let names = country_names(&body)?;
  tracing::debug!(rows = names.len(), "parsed country upload");
  let imported = state.countries.import_countries(names).await?;
  Ok(Json(json!({ "imported": imported })))
}
