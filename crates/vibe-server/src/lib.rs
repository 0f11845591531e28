//! HTTP server assembly for the vibe rating service.
//!
//! Loads [`ServerConfig`], and mounts the JSON API from `vibe-api` under
//! `/api` with request tracing and a liveness probe.

use std::{path::Path, time::Duration};

use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vibe_api::{AppState, SessionConfig, api_router, session::DEFAULT_COOKIE_NAME};
use vibe_core::store::RatingStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Sources, lowest priority first: built-in defaults, the optional TOML
/// file, then `VIBE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  /// Name of the cookie carrying the session id.
  pub session_cookie:       String,
  /// Lifetime of newly issued session cookies.
  pub session_max_age_secs: u64,
}

impl ServerConfig {
  /// Rejects a `session_cookie` that cannot be sent in a `Set-Cookie` header.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    let cfg: Self = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 5000_i64)?
      .set_default("session_cookie", DEFAULT_COOKIE_NAME)?
      .set_default("session_max_age_secs", 30_i64 * 24 * 60 * 60)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("VIBE").try_parsing(true))
      .build()?
      .try_deserialize()?;
    cfg
      .session()
      .validate()
      .map_err(|e| config::ConfigError::Message(e.to_string()))?;
    Ok(cfg)
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub fn session(&self) -> SessionConfig {
    SessionConfig {
      cookie_name: self.session_cookie.clone(),
      max_age:     Duration::from_secs(self.session_max_age_secs),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level [`Router`]: `/api/...` plus `/health`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RatingStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
