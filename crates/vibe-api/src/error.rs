//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message returned for any payload that fails validation.
pub const INVALID_RATING_MESSAGE: &str = "Invalid rating";
/// Message returned when the session has already rated.
pub const DUPLICATE_MESSAGE: &str = "You have already submitted a rating";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The detail is logged; clients only see [`INVALID_RATING_MESSAGE`].
  #[error("invalid rating: {0}")]
  InvalidRating(String),

  #[error("session has already submitted a rating")]
  DuplicateSubmission,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<vibe_core::Error> for ApiError {
  fn from(e: vibe_core::Error) -> Self {
    match e {
      vibe_core::Error::InvalidRating(detail) => ApiError::InvalidRating(detail),
      vibe_core::Error::DuplicateSubmission => ApiError::DuplicateSubmission,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::InvalidRating(_) => {
        (StatusCode::BAD_REQUEST, INVALID_RATING_MESSAGE.to_owned())
      }
      ApiError::DuplicateSubmission => {
        (StatusCode::BAD_REQUEST, DUPLICATE_MESSAGE.to_owned())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "rating store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
