//! RateSmart Core
//!
//! Core types and error handling shared across RateSmart components.
//!
//! This crate provides:
//! - The review sentiment label and the analysis result stored with a review
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ReviewAnalysis, Sentiment};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ReviewAnalysis, Sentiment};
}
