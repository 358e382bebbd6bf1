//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use census_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e {
        CoreError::NullArgument(_)
        | CoreError::InvalidArgument(_)
        | CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::DuplicateCountry(_) => StatusCode::CONFLICT,
        CoreError::PersonNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::UnknownGender(_) | CoreError::Store(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
      ApiError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
