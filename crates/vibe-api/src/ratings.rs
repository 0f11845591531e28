//! Handlers for `/ratings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/ratings` | Body: `{"rating": 1..=10}`; one per session |
//! | `GET`  | `/ratings/stats` | `{total, average}` |
//! | `GET`  | `/ratings/user-status` | `{hasRated}` for the caller's session |

use axum::{Json, body::Bytes, extract::State, response::IntoResponse};
use vibe_core::{
  rating::{RatingStats, UserStatus},
  store::RatingStore,
};

use crate::{AppState, error::ApiError, session::Session};

/// `GET /ratings/stats`
pub async fn stats<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<RatingStats>, ApiError>
where
  S: RatingStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(state.service.stats().await?))
}

/// `GET /ratings/user-status`
pub async fn user_status<S>(
  State(state): State<AppState<S>>,
  session: Session,
) -> impl IntoResponse
where
  S: RatingStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let status: Result<Json<UserStatus>, ApiError> =
    state.service.user_status(session.id()).await.map(Json);
  (session, status)
}

/// `POST /ratings` — returns `{rating, stats}`.
///
/// The body is taken raw so that a duplicate submission is reported even
/// when the payload itself would not parse.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  session: Session,
  body: Bytes,
) -> impl IntoResponse
where
  S: RatingStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let outcome = state.service.submit(session.id(), &body).await.map(Json);
  (session, outcome)
}
