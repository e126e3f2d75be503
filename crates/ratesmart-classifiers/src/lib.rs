//! RateSmart Classifiers
//!
//! The review-intake analysis pipeline: every review written to the platform
//! is scored for sentiment and checked for signs of fabrication.
//!
//! - [`TextNormalizer`] lowercases and tokenizes review text
//! - [`SentimentClassifier`] maps text to positive, neutral, or negative
//! - [`FakeReviewDetector`] applies ordered, independent suspicion rules
//! - [`ReviewAnalyzer`] runs both on every create and update
//!
//! Everything here is deterministic and infallible once constructed.

pub mod analyzer;
pub mod config;
pub mod fake_review;
pub mod lexicon;
pub mod normalizer;
pub mod sentiment;

pub use analyzer::{AnalysisReport, ReviewAnalyzer};
pub use config::{AnalysisConfig, FakeReviewConfig, SentimentConfig};
pub use fake_review::{FakeReviewDetector, FakeRule};
pub use lexicon::Lexicon;
pub use normalizer::{NormalizedText, TextNormalizer};
pub use sentiment::SentimentClassifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analyzer::ReviewAnalyzer;
    pub use crate::config::AnalysisConfig;
    pub use crate::fake_review::{FakeReviewDetector, FakeRule};
    pub use crate::normalizer::TextNormalizer;
    pub use crate::sentiment::SentimentClassifier;
    pub use ratesmart_core::{ReviewAnalysis, Sentiment};
}
