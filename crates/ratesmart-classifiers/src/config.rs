//! Configuration for review analysis
//!
//! All policy constants used by the sentiment deadband and the fake-review
//! rules live here so operators can retune them from a YAML file.

use ratesmart_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration for the whole review-intake analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sentiment classifier settings
    #[serde(default)]
    pub sentiment: SentimentConfig,

    /// Fake-review heuristic settings
    #[serde(default)]
    pub fake_review: FakeReviewConfig,
}

impl AnalysisConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse analysis config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check every threshold for a usable value
    pub fn validate(&self) -> Result<()> {
        self.sentiment.validate()?;
        self.fake_review.validate()
    }
}

/// Sentiment classifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Half-width of the neutral band around zero polarity
    #[serde(default = "default_polarity_threshold")]
    pub polarity_threshold: f64,

    /// Extra or overriding lexicon entries (word -> valence in [-1, 1])
    #[serde(default)]
    pub lexicon: BTreeMap<String, f64>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            polarity_threshold: default_polarity_threshold(),
            lexicon: BTreeMap::new(),
        }
    }
}

impl SentimentConfig {
    fn validate(&self) -> Result<()> {
        if !self.polarity_threshold.is_finite() || !(0.0..1.0).contains(&self.polarity_threshold)
        {
            return Err(Error::config(format!(
                "sentiment.polarity_threshold must be in [0, 1), got {}",
                self.polarity_threshold
            )));
        }

        for (word, valence) in &self.lexicon {
            if word.trim().is_empty() {
                return Err(Error::config("sentiment.lexicon contains an empty word"));
            }
            if !valence.is_finite() || !(-1.0..=1.0).contains(valence) {
                return Err(Error::config(format!(
                    "sentiment.lexicon['{word}'] must be in [-1, 1], got {valence}"
                )));
            }
        }

        Ok(())
    }
}

/// Fake-review heuristic settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeReviewConfig {
    /// Reviews with fewer tokens than this count as minimal text
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,

    /// Reviews shorter than this many characters (after trimming) are sparse
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Share of all tokens the most frequent token may not exceed
    #[serde(default = "default_repetition_ratio")]
    pub repetition_ratio: f64,

    /// Ratings treated as extreme
    #[serde(default = "default_extreme_ratings")]
    pub extreme_ratings: Vec<i64>,
}

impl Default for FakeReviewConfig {
    fn default() -> Self {
        Self {
            min_tokens: default_min_tokens(),
            min_chars: default_min_chars(),
            repetition_ratio: default_repetition_ratio(),
            extreme_ratings: default_extreme_ratings(),
        }
    }
}

impl FakeReviewConfig {
    fn validate(&self) -> Result<()> {
        if !self.repetition_ratio.is_finite()
            || self.repetition_ratio <= 0.0
            || self.repetition_ratio > 1.0
        {
            return Err(Error::config(format!(
                "fake_review.repetition_ratio must be in (0, 1], got {}",
                self.repetition_ratio
            )));
        }
        Ok(())
    }
}

fn default_polarity_threshold() -> f64 {
    0.15
}

fn default_min_tokens() -> usize {
    3
}

fn default_min_chars() -> usize {
    10
}

fn default_repetition_ratio() -> f64 {
    0.8
}

fn default_extreme_ratings() -> Vec<i64> {
    vec![1, 5]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.sentiment.polarity_threshold, 0.15);
        assert_eq!(config.fake_review.min_tokens, 3);
        assert_eq!(config.fake_review.min_chars, 10);
        assert_eq!(config.fake_review.repetition_ratio, 0.8);
        assert_eq!(config.fake_review.extreme_ratings, vec![1, 5]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
fake_review:
  min_tokens: 5
sentiment:
  lexicon:
    meh: -0.2
"#;
        let config = AnalysisConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.fake_review.min_tokens, 5);
        assert_eq!(config.fake_review.min_chars, 10);
        assert_eq!(config.sentiment.polarity_threshold, 0.15);
        assert_eq!(config.sentiment.lexicon.get("meh"), Some(&-0.2));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AnalysisConfig::from_yaml("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_invalid_repetition_ratio() {
        let err = AnalysisConfig::from_yaml("fake_review:\n  repetition_ratio: 1.5\n").unwrap_err();
        assert!(err.to_string().contains("repetition_ratio"));

        let err = AnalysisConfig::from_yaml("fake_review:\n  repetition_ratio: 0\n").unwrap_err();
        assert!(err.to_string().contains("repetition_ratio"));
    }

    #[test]
    fn test_invalid_polarity_threshold() {
        let err =
            AnalysisConfig::from_yaml("sentiment:\n  polarity_threshold: -0.1\n").unwrap_err();
        assert!(err.to_string().contains("polarity_threshold"));
    }

    #[test]
    fn test_invalid_lexicon_entry() {
        let err =
            AnalysisConfig::from_yaml("sentiment:\n  lexicon:\n    superb: 2.0\n").unwrap_err();
        assert!(err.to_string().contains("superb"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sentiment:\n  polarity_threshold: 0.3").unwrap();

        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.sentiment.polarity_threshold, 0.3);
    }

    #[test]
    fn test_missing_file() {
        let err = AnalysisConfig::from_file("/nonexistent/analysis.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
