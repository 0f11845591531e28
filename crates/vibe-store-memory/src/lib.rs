//! In-process backend for the vibe rating store.
//!
//! Ratings live for the lifetime of the process behind an async `RwLock`, so
//! readers never block the runtime and writers never tear the id sequence.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
