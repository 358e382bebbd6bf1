//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | `?search_by=&search_string=&sort_by=&sort_order=` |
//! | `POST`   | `/persons` | 201 with the shaped person |
//! | `GET`    | `/persons/{id}` | 404 if not found |
//! | `PUT`    | `/persons/{id}` | Full overwrite; the path id wins over any body id |
//! | `DELETE` | `/persons/{id}` | 204, or 404 if not found |
//! | `GET`    | `/persons/export.csv` | Every person as CSV |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use census_core::{
  person::{PersonAddRequest, PersonResponse},
  query::SortOrder,
  store::{CountryStore, PersonStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, tabular::persons_csv};

const DEFAULT_SORT_BY: &str = "PersonName";

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub search_by:     Option<String>,
  pub search_string: Option<String>,
  pub sort_by:       Option<String>,
  pub sort_order:    Option<SortOrder>,
}

/// `GET /persons`: filter, then sort.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PersonResponse>>, ApiError>
where
  S: CountryStore + PersonStore,
{
  let search_by = params.search_by.as_deref().unwrap_or_default();
  let sort_by = params.sort_by.as_deref().unwrap_or(DEFAULT_SORT_BY);
  let order = params.sort_order.unwrap_or_default();

  let filtered = state
    .persons
    .filtered_persons(search_by, params.search_string.as_deref())
    .await?;
  let sorted = state.persons.sorted_persons(filtered, sort_by, order);

  tracing::info!(search_by, sort_by, %order, count = sorted.len(), "listed persons");
  Ok(Json(sorted))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons`. A `null` body is rejected as a missing request.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Option<PersonAddRequest>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CountryStore + PersonStore,
{
  let person = state.persons.add_person(body).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PersonResponse>, ApiError>
where
  S: CountryStore + PersonStore,
{
  let person = state
    .persons
    .person_by_id(Some(id))
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /persons/{id}`. The body carries the full field set; unknown ids are 404.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<Option<PersonAddRequest>>,
) -> Result<Json<PersonResponse>, ApiError>
where
  S: CountryStore + PersonStore,
{
  let request = body.map(|b| b.into_update_request(id));
  Ok(Json(state.persons.update_person(request).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CountryStore + PersonStore,
{
  if state.persons.delete_person(Some(id)).await? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("person {id} not found")))
  }
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// `GET /persons/export.csv`
pub async fn export_csv<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CountryStore + PersonStore,
{
  let persons = state.persons.all_persons().await?;
  let body = persons_csv(&persons)?;
  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
      (header::CONTENT_DISPOSITION, "attachment; filename=\"persons.csv\""),
    ],
    body,
  ))
}
