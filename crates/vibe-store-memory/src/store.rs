//! [`MemoryStore`] — the in-memory implementation of [`RatingStore`].

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;

use vibe_core::{
  rating::{Rating, RatingStats, RatingValue},
  store::RatingStore,
};

use crate::{Error, Result};

// ─── State ───────────────────────────────────────────────────────────────────

struct Inner {
  /// Ratings in insertion order. Ids are assigned sequentially, so this is
  /// also ascending id order.
  ratings: Vec<Rating>,
  /// Every session id present in `ratings`.
  rated:   HashSet<String>,
  next_id: u64,
}

impl Default for Inner {
  fn default() -> Self {
    Self {
      ratings: Vec::new(),
      rated:   HashSet::new(),
      next_id: 1,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rating store held entirely in process memory.
///
/// Cloning is cheap — clones share the same underlying ratings.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of ratings recorded so far.
  pub async fn len(&self) -> usize {
    self.inner.read().await.ratings.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }
}

// ─── RatingStore impl ────────────────────────────────────────────────────────

impl RatingStore for MemoryStore {
  type Error = Error;

  async fn create_rating(
    &self,
    value: RatingValue,
    session_id: String,
  ) -> Result<Rating> {
    let mut inner = self.inner.write().await;

    let id = inner.next_id;
    inner.next_id = id.checked_add(1).ok_or(Error::IdsExhausted)?;

    let rating = Rating {
      id,
      rating: value,
      session_id,
      recorded_at: Utc::now(),
    };
    inner.rated.insert(rating.session_id.clone());
    inner.ratings.push(rating.clone());

    tracing::debug!(id, total = inner.ratings.len(), "rating stored");
    Ok(rating)
  }

  async fn get_ratings(&self) -> Result<Vec<Rating>> {
    Ok(self.inner.read().await.ratings.clone())
  }

  async fn get_rating_stats(&self) -> Result<RatingStats> {
    Ok(RatingStats::from_ratings(&self.inner.read().await.ratings))
  }

  async fn has_user_rated(&self, session_id: &str) -> Result<bool> {
    Ok(self.inner.read().await.rated.contains(session_id))
  }
}

#[cfg(test)]
impl MemoryStore {
  /// Start the id sequence at `next_id` instead of 1.
  pub(crate) fn with_next_id(next_id: u64) -> Self {
    let inner = Inner {
      next_id,
      ..Inner::default()
    };
    Self {
      inner: Arc::new(RwLock::new(inner)),
    }
  }
}
