//! Error type for `vibe-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The `u64` identifier space has been used up.
  #[error("rating identifiers exhausted")]
  IdsExhausted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
