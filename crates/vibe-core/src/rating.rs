//! Ratings, their validated score, and the statistics derived from them.
//!
//! A [`Rating`] is immutable once recorded. [`RatingStats`] is never stored;
//! it is recomputed from the full rating set whenever it is asked for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Lowest accepted score.
pub const MIN_RATING: u8 = 1;
/// Highest accepted score.
pub const MAX_RATING: u8 = 10;

// ─── Score ───────────────────────────────────────────────────────────────────

/// A score in `MIN_RATING..=MAX_RATING`.
///
/// The only ways to obtain one are [`RatingValue::new`] and the payload
/// parsers below, so holding a `RatingValue` means validation already ran.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct RatingValue(u8);

impl RatingValue {
  /// Validate an integer score.
  pub fn new(value: i64) -> Result<Self> {
    u8::try_from(value)
      .ok()
      .filter(|v| (MIN_RATING..=MAX_RATING).contains(v))
      .map(Self)
      .ok_or_else(|| {
        Error::InvalidRating(format!(
          "{value} is outside {MIN_RATING}..={MAX_RATING}"
        ))
      })
  }

  pub fn get(self) -> u8 {
    self.0
  }

  /// Coerce a JSON value into a score.
  ///
  /// Accepts JSON numbers that are integers, including floats with no
  /// fractional part (`7.0`). Strings, even numeric ones, are rejected.
  pub fn from_json(value: &Value) -> Result<Self> {
    match value {
      Value::Number(n) => {
        if let Some(i) = n.as_i64() {
          return Self::new(i);
        }
        match n.as_f64() {
          Some(f) if f.is_finite() && f.fract() == 0.0 => Self::new(f as i64),
          _ => Err(Error::InvalidRating(format!("{n} is not an integer"))),
        }
      }
      Value::Null => Err(Error::InvalidRating("rating is null".into())),
      other => Err(Error::InvalidRating(format!(
        "expected a number, got {other}"
      ))),
    }
  }

  /// Parse a raw submission body of the form `{"rating": <score>}`.
  pub fn from_submission(body: &[u8]) -> Result<Self> {
    let payload: Value = serde_json::from_slice(body)
      .map_err(|e| Error::InvalidRating(format!("malformed body: {e}")))?;
    let field = payload
      .as_object()
      .ok_or_else(|| Error::InvalidRating("body is not an object".into()))?
      .get("rating")
      .ok_or_else(|| Error::InvalidRating("missing `rating` field".into()))?;
    Self::from_json(field)
  }
}

impl TryFrom<i64> for RatingValue {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> {
    Self::new(value)
  }
}

impl From<RatingValue> for u8 {
  fn from(value: RatingValue) -> Self {
    value.0
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One recorded rating. The `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
  pub id:          u64,
  pub rating:      RatingValue,
  /// Opaque session identifier, compared for equality only.
  pub session_id:  String,
  pub recorded_at: DateTime<Utc>,
}

/// Aggregate over every recorded rating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingStats {
  pub total:   u64,
  /// Mean score rounded to one decimal place; `0` when `total == 0`.
  pub average: f64,
}

impl RatingStats {
  /// Compute stats from a running count and score sum.
  pub fn from_sum(total: u64, sum: u64) -> Self {
    if total == 0 {
      return Self::default();
    }
    let mean = sum as f64 / total as f64;
    Self {
      total,
      average: (mean * 10.0).round() / 10.0,
    }
  }

  pub fn from_ratings<'a>(ratings: impl IntoIterator<Item = &'a Rating>) -> Self {
    let (total, sum) = ratings
      .into_iter()
      .fold((0u64, 0u64), |(n, s), r| (n + 1, s + u64::from(r.rating.get())));
    Self::from_sum(total, sum)
  }
}

/// Whether a session has already rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
  pub has_rated: bool,
}

/// Result of a successful submission: the stored rating plus fresh stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
  pub rating: Rating,
  pub stats:  RatingStats,
}
