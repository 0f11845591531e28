//! Business rules around rating submission.
//!
//! [`RatingService`] is the only caller of
//! [`RatingStore::create_rating`]. It rejects a session that has already
//! rated, validates the payload, records the rating and returns fresh stats.

use std::sync::Arc;

use tokio::sync::Mutex;
use vibe_core::{
  rating::{RatingStats, RatingValue, Submission, UserStatus},
  store::RatingStore,
};

use crate::error::ApiError;

/// Orchestrates store calls for the HTTP handlers.
pub struct RatingService<S> {
  store:       Arc<S>,
  /// Held across the duplicate check and the insert.
  submissions: Mutex<()>,
}

impl<S> RatingService<S>
where
  S: RatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      submissions: Mutex::new(()),
    }
  }

  /// Current `{total, average}`.
  pub async fn stats(&self) -> Result<RatingStats, ApiError> {
    self
      .store
      .get_rating_stats()
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))
  }

  pub async fn user_status(&self, session_id: &str) -> Result<UserStatus, ApiError> {
    let has_rated = self
      .store
      .has_user_rated(session_id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    Ok(UserStatus { has_rated })
  }

  /// Record the rating in `body` for `session_id`.
  ///
  /// The duplicate check runs before the payload is looked at, so a session
  /// that already rated gets [`ApiError::DuplicateSubmission`] whatever it
  /// sends.
  pub async fn submit(
    &self,
    session_id: &str,
    body: &[u8],
  ) -> Result<Submission, ApiError> {
    let _guard = self.submissions.lock().await;

    let already = self
      .store
      .has_user_rated(session_id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    if already {
      tracing::warn!(session = session_id, "duplicate rating submission");
      return Err(ApiError::DuplicateSubmission);
    }

    let value = RatingValue::from_submission(body).inspect_err(|e| {
      tracing::debug!(session = session_id, error = %e, "rejected rating payload");
    })?;

    let rating = self
      .store
      .create_rating(value, session_id.to_owned())
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    let stats = self
      .store
      .get_rating_stats()
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;

    tracing::info!(
      id = rating.id,
      rating = rating.rating.get(),
      total = stats.total,
      average = stats.average,
      "rating accepted"
    );
    Ok(Submission { rating, stats })
  }
}

#[cfg(test)]
mod tests {
  use vibe_store_memory::MemoryStore;

  use super::*;

  fn service() -> RatingService<MemoryStore> {
    RatingService::new(Arc::new(MemoryStore::new()))
  }

  #[tokio::test]
  async fn submit_then_status() {
    let svc = service();
    assert!(!svc.user_status("a").await.unwrap().has_rated);

    let sub = svc.submit("a", br#"{"rating": 7}"#).await.unwrap();
    assert_eq!(sub.rating.id, 1);
    assert_eq!(sub.rating.session_id, "a");
    assert_eq!((sub.stats.total, sub.stats.average), (1, 7.0));

    assert!(svc.user_status("a").await.unwrap().has_rated);
    assert!(!svc.user_status("b").await.unwrap().has_rated);
  }

  #[tokio::test]
  async fn second_submission_is_rejected_without_mutation() {
    let svc = service();
    svc.submit("a", br#"{"rating": 7}"#).await.unwrap();
    svc.submit("b", br#"{"rating": 5}"#).await.unwrap();

    let err = svc.submit("a", br#"{"rating": 9}"#).await.unwrap_err();
    assert!(matches!(err, ApiError::DuplicateSubmission));

    let stats = svc.stats().await.unwrap();
    assert_eq!((stats.total, stats.average), (2, 6.0));
  }

  #[tokio::test]
  async fn duplicate_is_reported_before_validation() {
    let svc = service();
    svc.submit("a", br#"{"rating": 7}"#).await.unwrap();

    let err = svc.submit("a", br#"{"rating": 42}"#).await.unwrap_err();
    assert!(matches!(err, ApiError::DuplicateSubmission));
    let err = svc.submit("a", b"not json").await.unwrap_err();
    assert!(matches!(err, ApiError::DuplicateSubmission));
  }

  #[tokio::test]
  async fn invalid_payloads_leave_store_untouched() {
    let svc = service();
    let bodies: [&[u8]; 6] = [
      br#"{"rating": 0}"#,
      br#"{"rating": 11}"#,
      br#"{"rating": 3.5}"#,
      br#"{"rating": null}"#,
      br#"{}"#,
      b"",
    ];
    for body in bodies {
      let err = svc.submit("a", body).await.unwrap_err();
      assert!(matches!(err, ApiError::InvalidRating(_)));
    }
    assert_eq!(svc.stats().await.unwrap().total, 0);
    // A rejected payload does not mark the session as rated.
    assert!(!svc.user_status("a").await.unwrap().has_rated);
  }

  #[tokio::test]
  async fn ids_stay_sequential_across_failures() {
    let svc = service();
    let first = svc.submit("a", br#"{"rating": 4}"#).await.unwrap();
    svc.submit("b", br#"{"rating": 99}"#).await.unwrap_err();
    svc.submit("a", br#"{"rating": 4}"#).await.unwrap_err();
    let second = svc.submit("b", br#"{"rating": 6}"#).await.unwrap();

    assert_eq!(first.rating.id, 1);
    assert_eq!(second.rating.id, 2);
    assert_eq!(svc.stats().await.unwrap().total, 2);
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn concurrent_submissions_from_one_session() {
    let svc = Arc::new(service());

    let handles: Vec<_> = (0..32)
      .map(|_| {
        let svc = svc.clone();
        tokio::spawn(async move { svc.submit("racer", br#"{"rating": 8}"#).await })
      })
      .collect();

    let mut accepted = 0;
    let mut duplicates = 0;
    for h in handles {
      match h.await.unwrap() {
        Ok(_) => accepted += 1,
        Err(ApiError::DuplicateSubmission) => duplicates += 1,
        Err(e) => panic!("unexpected error: {e}"),
      }
    }
    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 31);
    assert_eq!(svc.stats().await.unwrap().total, 1);
  }
}
