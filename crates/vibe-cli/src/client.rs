//! Async HTTP client wrapping the vibe JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::Deserialize;
use serde_json::json;
use vibe_core::rating::{RatingStats, Submission, UserStatus};

/// Connection settings for the vibe API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url:    String,
  pub cookie_name: String,
}

/// Outcome of `POST /api/ratings`.
#[derive(Debug)]
pub enum RateOutcome {
  Accepted(Submission),
  /// The server refused the rating; carries its `message`.
  Rejected(String),
}

#[derive(Deserialize)]
struct ErrorBody {
  message: String,
}

/// Async HTTP client for the vibe JSON REST API.
///
/// Tracks the session cookie: any session the server issues is replayed on
/// later requests and exposed via [`ApiClient::session`] so callers can
/// persist it.
pub struct ApiClient {
  client:  Client,
  config:  ApiConfig,
  session: Option<String>,
}

impl ApiClient {
  pub fn new(config: ApiConfig, session: Option<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      config,
      session,
    })
  }

  /// The current session id, if the server has issued one.
  pub fn session(&self) -> Option<&str> {
    self.session.as_deref()
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn with_session(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.session {
      Some(id) => req.header(header::COOKIE, format!("{}={id}", self.config.cookie_name)),
      None => req,
    }
  }

  fn remember_session(&mut self, resp: &Response) {
    let issued = resp
      .headers()
      .get_all(header::SET_COOKIE)
      .iter()
      .filter_map(|v| v.to_str().ok())
      .find_map(|v| session_from_set_cookie(v, &self.config.cookie_name));
    if let Some(id) = issued {
      tracing::debug!(session = %id, "server issued session");
      self.session = Some(id);
    }
  }

  /// `GET /api/ratings/stats`
  pub async fn stats(&self) -> Result<RatingStats> {
    let resp = self
      .client
      .get(self.url("/ratings/stats"))
      .send()
      .await
      .context("GET /ratings/stats failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /ratings/stats → {}", resp.status()));
    }
    resp.json().await.context("deserialising stats")
  }

  /// `GET /api/ratings/user-status`
  pub async fn user_status(&mut self) -> Result<UserStatus> {
    let resp = self
      .with_session(self.client.get(self.url("/ratings/user-status")))
      .send()
      .await
      .context("GET /ratings/user-status failed")?;
    self.remember_session(&resp);

    if !resp.status().is_success() {
      return Err(anyhow!("GET /ratings/user-status → {}", resp.status()));
    }
    resp.json().await.context("deserialising user status")
  }

  /// `POST /api/ratings`
  pub async fn rate(&mut self, rating: i64) -> Result<RateOutcome> {
    let resp = self
      .with_session(self.client.post(self.url("/ratings")))
      .json(&json!({ "rating": rating }))
      .send()
      .await
      .context("POST /ratings failed")?;
    self.remember_session(&resp);

    match resp.status() {
      s if s.is_success() => Ok(RateOutcome::Accepted(
        resp.json().await.context("deserialising submission")?,
      )),
      StatusCode::BAD_REQUEST => {
        let body: ErrorBody = resp.json().await.context("deserialising error")?;
        Ok(RateOutcome::Rejected(body.message))
      }
      s => Err(anyhow!("POST /ratings → {s}")),
    }
  }
}

/// Extract the session id from one `Set-Cookie` value if it names `cookie`.
fn session_from_set_cookie(set_cookie: &str, cookie: &str) -> Option<String> {
  let (name, value) = set_cookie.split(';').next()?.trim().split_once('=')?;
  (name.trim() == cookie && !value.is_empty()).then(|| value.trim().to_owned())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use tokio::net::TcpListener;
  use vibe_api::{AppState, SessionConfig, api_router};
  use vibe_store_memory::MemoryStore;

  use super::*;

  #[test]
  fn parses_matching_set_cookie() {
    assert_eq!(
      session_from_set_cookie(
        "vibe_session=abc-123; Path=/; HttpOnly",
        "vibe_session"
      )
      .as_deref(),
      Some("abc-123")
    );
    assert_eq!(session_from_set_cookie("other=1; Path=/", "vibe_session"), None);
    assert_eq!(session_from_set_cookie("vibe_session=; Path=/", "vibe_session"), None);
    assert_eq!(session_from_set_cookie("garbage", "vibe_session"), None);
  }

  /// Serve the API on an ephemeral port and return its base URL.
  async fn spawn_server() -> String {
    let state = AppState::new(Arc::new(MemoryStore::new()), SessionConfig::default());
    let app = axum::Router::new().nest("/api", api_router(state));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
  }

  fn client(base_url: String, session: Option<String>) -> ApiClient {
    ApiClient::new(
      ApiConfig {
        base_url,
        cookie_name: "vibe_session".into(),
      },
      session,
    )
    .unwrap()
  }

  #[tokio::test]
  async fn rate_once_per_session() {
    let base = spawn_server().await;
    let mut c = client(base.clone(), None);

    assert!(!c.user_status().await.unwrap().has_rated);
    let session = c.session().map(str::to_owned).expect("session issued");

    match c.rate(8).await.unwrap() {
      RateOutcome::Accepted(sub) => {
        assert_eq!(sub.rating.rating.get(), 8);
        assert_eq!(sub.rating.session_id, session);
        assert_eq!(sub.stats.total, 1);
      }
      RateOutcome::Rejected(m) => panic!("rejected: {m}"),
    }

    // A new client restored from the saved session is still blocked.
    let mut restored = client(base, Some(session));
    assert!(restored.user_status().await.unwrap().has_rated);
    match restored.rate(3).await.unwrap() {
      RateOutcome::Rejected(m) => assert_eq!(m, "You have already submitted a rating"),
      RateOutcome::Accepted(_) => panic!("duplicate accepted"),
    }
    assert_eq!(restored.stats().await.unwrap().total, 1);
  }

  #[tokio::test]
  async fn out_of_range_is_rejected() {
    let base = spawn_server().await;
    let mut c = client(base, None);
    match c.rate(11).await.unwrap() {
      RateOutcome::Rejected(m) => assert_eq!(m, "Invalid rating"),
      RateOutcome::Accepted(_) => panic!("11 accepted"),
    }
    assert_eq!(c.stats().await.unwrap().total, 0);
  }
}
