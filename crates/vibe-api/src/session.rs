//! Cookie-backed session resolver.
//!
//! Every visitor carries an opaque session id in a cookie. The id is only
//! ever compared for equality; nothing parses or trusts its contents.

use std::{convert::Infallible, time::Duration};

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, HeaderValue, header, request::Parts},
  response::{IntoResponseParts, ResponseParts},
};
use thiserror::Error;
use uuid::Uuid;
use vibe_core::store::RatingStore;

use crate::AppState;

/// Default cookie name carrying the session id.
pub const DEFAULT_COOKIE_NAME: &str = "vibe_session";

/// How session cookies are named and how long browsers keep them.
#[derive(Debug, Clone)]
pub struct SessionConfig {
  pub cookie_name: String,
  pub max_age:     Duration,
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      cookie_name: DEFAULT_COOKIE_NAME.to_owned(),
      max_age:     Duration::from_secs(30 * 24 * 60 * 60),
    }
  }
}

/// The configured cookie name is not an RFC 6265 token.
#[derive(Debug, Error)]
#[error("invalid session cookie name {0:?}")]
pub struct InvalidCookieName(pub String);

impl SessionConfig {
  /// Reject cookie names that cannot appear in a `Set-Cookie` header.
  pub fn validate(&self) -> Result<(), InvalidCookieName> {
    let is_token = !self.cookie_name.is_empty()
      && self.cookie_name.bytes().all(|b| {
        b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
      });
    if is_token {
      Ok(())
    } else {
      Err(InvalidCookieName(self.cookie_name.clone()))
    }
  }

  fn set_cookie(&self, id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
      "{}={id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
      self.cookie_name,
      self.max_age.as_secs(),
    ))
    .inspect_err(|e| {
      tracing::warn!(error = %e, cookie = %self.cookie_name, "cannot encode session cookie");
    })
    .ok()
  }
}

/// The caller's session, read from the request cookie or freshly issued.
///
/// Returning a `Session` as part of a response re-issues the cookie when the
/// session is new; known sessions add no headers.
#[derive(Debug, Clone)]
pub struct Session {
  id:         String,
  is_new:     bool,
  set_cookie: Option<HeaderValue>,
}

impl Session {
  /// Read the session cookie from `headers`, or mint a new id if absent.
  pub fn resolve(headers: &HeaderMap, config: &SessionConfig) -> Self {
    if let Some(id) = cookie_value(headers, &config.cookie_name) {
      return Self {
        id:         id.to_owned(),
        is_new:     false,
        set_cookie: None,
      };
    }

    let id = Uuid::new_v4().to_string();
    let set_cookie = config.set_cookie(&id);
    tracing::debug!(session = %id, "issued new session");

    Self {
      id,
      is_new: true,
      set_cookie,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// `true` if this request arrived without a session cookie.
  pub fn is_new(&self) -> bool {
    self.is_new
  }
}

/// First non-empty value of the cookie `name` across all `Cookie` headers.
fn cookie_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .filter(|(k, _)| k.trim() == name)
    .map(|(_, v)| v.trim().trim_matches('"'))
    .find(|v| !v.is_empty())
}

impl<S> FromRequestParts<AppState<S>> for Session
where
  S: RatingStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Session::resolve(&parts.headers, &state.session))
  }
}

impl IntoResponseParts for Session {
  type Error = Infallible;

  fn into_response_parts(
    self,
    mut res: ResponseParts,
  ) -> Result<ResponseParts, Self::Error> {
    if let Some(cookie) = self.set_cookie {
      res.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(res)
  }
}
