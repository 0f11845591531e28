//! Error types for `vibe-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The submitted payload is not an integer rating in range.
  #[error("invalid rating: {0}")]
  InvalidRating(String),

  /// The session has already recorded a rating.
  #[error("session has already submitted a rating")]
  DuplicateSubmission,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
