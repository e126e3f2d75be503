//! Review intake analysis
//!
//! Runs on every review write: the text is normalized once, then scored for
//! sentiment and checked against the fake-review rules. Both results are
//! stored with the review in the same write.

use crate::config::AnalysisConfig;
use crate::fake_review::{FakeReviewDetector, FakeRule};
use crate::normalizer::{NormalizedText, TextNormalizer};
use crate::sentiment::SentimentClassifier;
use ratesmart_core::{Result, ReviewAnalysis, Sentiment};
use std::time::Instant;
use tracing::debug;

/// Detailed outcome of a single analysis
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// The fields persisted with the review
    pub analysis: ReviewAnalysis,

    /// Raw polarity behind the sentiment label
    pub polarity: f64,

    /// Rule that flagged the review, if any
    pub flagged_by: Option<FakeRule>,

    /// Number of tokens in the normalized text
    pub token_count: usize,

    /// Latency in microseconds
    pub latency_us: u64,
}

/// Computes the derived fields of a review.
///
/// Holds only immutable state; share it behind an `Arc`.
pub struct ReviewAnalyzer {
    normalizer: TextNormalizer,
    sentiment: SentimentClassifier,
    fake_review: FakeReviewDetector,
}

impl ReviewAnalyzer {
    /// Create an analyzer with the default policy constants
    pub fn new() -> Result<Self> {
        Self::from_config(&AnalysisConfig::default())
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            normalizer: TextNormalizer::new()?,
            sentiment: SentimentClassifier::from_config(&config.sentiment),
            fake_review: FakeReviewDetector::from_config(config.fake_review.clone())?,
        })
    }

    /// Derive `sentiment` and `is_fake` for a review about to be saved
    pub fn analyze(&self, text: &str, rating: i64) -> ReviewAnalysis {
        self.report(text, rating).analysis
    }

    /// Same as [`analyze`](Self::analyze), keeping the intermediate values
    pub fn report(&self, text: &str, rating: i64) -> AnalysisReport {
        let start = Instant::now();

        let normalized = self.normalizer.normalize(text);
        let polarity = self.sentiment.polarity(&normalized);
        let sentiment = self.sentiment.label(polarity);
        let flagged_by = self.fake_review.first_triggered_rule(&normalized, rating);

        let latency_us = start.elapsed().as_micros() as u64;
        record_metrics(sentiment, flagged_by, latency_us);

        debug!(
            tokens = normalized.token_count(),
            polarity,
            sentiment = sentiment.as_str(),
            flagged_by = flagged_by.map(|r| r.as_str()),
            latency_us,
            "Review analyzed"
        );

        AnalysisReport {
            analysis: ReviewAnalysis {
                sentiment,
                is_fake: flagged_by.is_some(),
            },
            polarity,
            flagged_by,
            token_count: normalized.token_count(),
            latency_us,
        }
    }

    /// Sentiment of a text on its own
    pub fn sentiment_of(&self, text: &str) -> Sentiment {
        self.sentiment.classify(&self.normalizer.normalize(text))
    }

    /// Fake verdict for a text and rating on their own
    pub fn is_fake(&self, text: &str, rating: i64) -> bool {
        self.fake_review
            .is_fake(&self.normalizer.normalize(text), rating)
    }

    pub fn normalize(&self, text: &str) -> NormalizedText {
        self.normalizer.normalize(text)
    }

    pub fn sentiment_classifier(&self) -> &SentimentClassifier {
        &self.sentiment
    }

    pub fn fake_review_detector(&self) -> &FakeReviewDetector {
        &self.fake_review
    }
}

fn record_metrics(sentiment: Sentiment, flagged_by: Option<FakeRule>, latency_us: u64) {
    metrics::counter!("ratesmart_reviews_analyzed_total", "sentiment" => sentiment.as_str())
        .increment(1);
    if let Some(rule) = flagged_by {
        metrics::counter!("ratesmart_reviews_flagged_total", "rule" => rule.as_str()).increment(1);
    }
    metrics::histogram!("ratesmart_analysis_latency_us").record(latency_us as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FakeReviewConfig;

    #[test]
    fn test_analyze_sets_both_fields() {
        let analyzer = ReviewAnalyzer::new().unwrap();

        let analysis = analyzer.analyze("Terrible, a complete waste of money", 1);
        assert_eq!(analysis.sentiment, Sentiment::Negative);
        assert!(!analysis.is_fake);

        let analysis = analyzer.analyze("good good good good good", 3);
        assert_eq!(analysis.sentiment, Sentiment::Positive);
        assert!(analysis.is_fake);
    }

    #[test]
    fn test_report_details() {
        let analyzer = ReviewAnalyzer::new().unwrap();
        let report = analyzer.report("Contact me at test@example.com for a refund", 3);

        assert!(report.analysis.is_fake);
        assert_eq!(report.flagged_by, Some(FakeRule::ContactArtifact));
        assert_eq!(report.token_count, 9);
        assert!(report.latency_us < 10_000, "Latency too high: {}us", report.latency_us);
    }

    #[test]
    fn test_reanalysis_after_edit() {
        let analyzer = ReviewAnalyzer::new().unwrap();

        assert!(analyzer.analyze("ok", 5).is_fake);
        let edited = analyzer.analyze(
            "This product exceeded my expectations in every way and I would recommend it \
             to anyone looking for quality",
            5,
        );
        assert!(!edited.is_fake);
    }

    #[test]
    fn test_configured_thresholds_change_verdicts() {
        let config = AnalysisConfig {
            fake_review: FakeReviewConfig {
                min_tokens: 1,
                min_chars: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let analyzer = ReviewAnalyzer::from_config(&config).unwrap();

        // two distinct tokens, no longer below any minimum
        assert!(!analyzer.is_fake("fantastic product", 5));
        assert!(ReviewAnalyzer::new().unwrap().is_fake("fantastic product", 5));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalysisConfig::default();
        config.sentiment.polarity_threshold = f64::NAN;
        assert!(ReviewAnalyzer::from_config(&config).is_err());
    }
}
