//! Fake-review heuristics
//!
//! Each rule is an independent predicate over the normalized text and the
//! declared rating. Rules are checked in a fixed order and the first one that
//! fires decides the verdict; nothing is weighted or combined across rules.
//! Every review is judged on its own, without looking at other reviews.

use crate::config::FakeReviewConfig;
use crate::normalizer::NormalizedText;
use ratesmart_core::{Error, Result};
use regex::Regex;
use std::collections::HashMap;

/// The rule that flagged a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeRule {
    /// Very few tokens and very few characters
    TooShort,
    /// One token makes up almost the whole review
    Repetition,
    /// Extreme rating backed by almost no text
    ExtremeRating,
    /// Contains a link or an email address
    ContactArtifact,
}

impl FakeRule {
    /// All rules in evaluation order
    pub const ALL: [FakeRule; 4] = [
        FakeRule::TooShort,
        FakeRule::Repetition,
        FakeRule::ExtremeRating,
        FakeRule::ContactArtifact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::Repetition => "repetition",
            Self::ExtremeRating => "extreme_rating",
            Self::ContactArtifact => "contact_artifact",
        }
    }
}

/// Flags reviews that are likely spam, low-effort, or solicitation
pub struct FakeReviewDetector {
    config: FakeReviewConfig,
    url_regex: Regex,
    email_regex: Regex,
}

impl FakeReviewDetector {
    /// Create a detector with the default thresholds
    pub fn new() -> Result<Self> {
        Self::from_config(FakeReviewConfig::default())
    }

    pub fn from_config(config: FakeReviewConfig) -> Result<Self> {
        if !config.repetition_ratio.is_finite()
            || config.repetition_ratio <= 0.0
            || config.repetition_ratio > 1.0
        {
            return Err(Error::config(format!(
                "repetition_ratio must be in (0, 1], got {}",
                config.repetition_ratio
            )));
        }

        Ok(Self {
            config,
            url_regex: Regex::new(r"(?i)https?://\S+")
                .map_err(|e| Error::classifier(format!("Failed to compile URL regex: {e}")))?,
            email_regex: Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b")
                .map_err(|e| Error::classifier(format!("Failed to compile email regex: {e}")))?,
        })
    }

    pub fn config(&self) -> &FakeReviewConfig {
        &self.config
    }

    /// Fewer tokens than the configured minimum
    pub fn has_minimal_text(&self, normalized: &NormalizedText) -> bool {
        normalized.token_count() < self.config.min_tokens
    }

    /// Rating is one of the configured extremes. Out-of-range ratings never are.
    pub fn is_extreme_rating(&self, rating: i64) -> bool {
        self.config.extreme_ratings.contains(&rating)
    }

    /// Rule 1: few tokens and few characters
    pub fn is_too_short(&self, normalized: &NormalizedText) -> bool {
        self.has_minimal_text(normalized) && normalized.char_count() < self.config.min_chars
    }

    /// Rule 2: the most frequent token exceeds the repetition ratio.
    /// Never fires on text without tokens.
    pub fn is_repetitive(&self, normalized: &NormalizedText) -> bool {
        if normalized.is_empty() {
            return false;
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in &normalized.tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        let most_common = counts.values().copied().max().unwrap_or(0);

        most_common as f64 > normalized.token_count() as f64 * self.config.repetition_ratio
    }

    /// Rule 3: extreme rating and minimal text, two separate signals
    pub fn is_extreme_rating_with_minimal_text(
        &self,
        normalized: &NormalizedText,
        rating: i64,
    ) -> bool {
        self.is_extreme_rating(rating) && self.has_minimal_text(normalized)
    }

    /// Rule 4: a link or an email address anywhere in the text
    pub fn has_contact_artifact(&self, normalized: &NormalizedText) -> bool {
        self.url_regex.is_match(&normalized.text) || self.email_regex.is_match(&normalized.text)
    }

    /// Check a single rule
    pub fn rule_fires(&self, rule: FakeRule, normalized: &NormalizedText, rating: i64) -> bool {
        match rule {
            FakeRule::TooShort => self.is_too_short(normalized),
            FakeRule::Repetition => self.is_repetitive(normalized),
            FakeRule::ExtremeRating => self.is_extreme_rating_with_minimal_text(normalized, rating),
            FakeRule::ContactArtifact => self.has_contact_artifact(normalized),
        }
    }

    /// The first rule, in evaluation order, that flags the review
    pub fn first_triggered_rule(
        &self,
        normalized: &NormalizedText,
        rating: i64,
    ) -> Option<FakeRule> {
        FakeRule::ALL
            .into_iter()
            .find(|rule| self.rule_fires(*rule, normalized, rating))
    }

    /// Whether the review is likely fake
    pub fn is_fake(&self, normalized: &NormalizedText, rating: i64) -> bool {
        self.first_triggered_rule(normalized, rating).is_some()
    }
}
