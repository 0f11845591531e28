//! The `RatingStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `vibe-store-memory`).
//! The service layer in `vibe-api` depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::rating::{Rating, RatingStats, RatingValue};

/// Abstraction over a rating store backend.
///
/// Ratings are append-only: there is no update or delete. The store does not
/// enforce one rating per session; callers check [`has_user_rated`] first.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
///
/// [`has_user_rated`]: RatingStore::has_user_rated
pub trait RatingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Record a rating under the next identifier and return it.
  ///
  /// Identifiers start at 1 and grow by one per call. They are never reused.
  fn create_rating(
    &self,
    value: RatingValue,
    session_id: String,
  ) -> impl Future<Output = Result<Rating, Self::Error>> + Send + '_;

  /// Every recorded rating, in insertion order.
  fn get_ratings(
    &self,
  ) -> impl Future<Output = Result<Vec<Rating>, Self::Error>> + Send + '_;

  /// Count and rounded mean over every recorded rating.
  fn get_rating_stats(
    &self,
  ) -> impl Future<Output = Result<RatingStats, Self::Error>> + Send + '_;

  /// `true` iff some recorded rating carries `session_id`.
  fn has_user_rated<'a>(
    &'a self,
    session_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
