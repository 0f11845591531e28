//! Core types and trait definitions for the vibe rating service.
//!
//! This crate is deliberately free of HTTP and runtime dependencies.
//! All other crates depend on it.

pub mod error;
pub mod rating;
pub mod store;

pub use error::{Error, Result};
