//! JSON REST API for the vibe rating service.
//!
//! Exposes an axum [`Router`] backed by any [`vibe_core::store::RatingStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vibe_api::api_router(state))
//! ```

pub mod error;
pub mod ratings;
pub mod service;
pub mod session;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use vibe_core::store::RatingStore;

pub use error::ApiError;
pub use service::RatingService;
pub use session::{Session, SessionConfig};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RatingStore> {
  pub service: Arc<RatingService<S>>,
  pub session: Arc<SessionConfig>,
}

impl<S> AppState<S>
where
  S: RatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  pub fn new(store: Arc<S>, session: SessionConfig) -> Self {
    Self {
      service: Arc::new(RatingService::new(store)),
      session: Arc::new(session),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RatingStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/ratings", post(ratings::submit::<S>))
    .route("/ratings/stats", get(ratings::stats::<S>))
    .route("/ratings/user-status", get(ratings::user_status::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
