//! Core types for RateSmart

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment label derived from a review's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Wire name of the label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Map a polarity score onto a label using a symmetric deadband.
    ///
    /// Scores strictly above `threshold` are positive, strictly below
    /// `-threshold` are negative, everything else (including NaN) is neutral.
    pub fn from_polarity(polarity: f64, threshold: f64) -> Self {
        if polarity > threshold {
            Self::Positive
        } else if polarity < -threshold {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(crate::Error::internal(format!(
                "unknown sentiment label: {other}"
            ))),
        }
    }
}

/// Fields derived from a review's text and rating on every save.
///
/// Never accepted from clients; recomputed immediately before each write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewAnalysis {
    /// Sentiment label of the review text
    pub sentiment: Sentiment,

    /// Whether the review was flagged as likely fabricated
    pub is_fake: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_deadband() {
        assert_eq!(Sentiment::from_polarity(0.5, 0.15), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(0.15, 0.15), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(0.0, 0.15), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(-0.15, 0.15), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(-0.16, 0.15), Sentiment::Negative);
        assert_eq!(Sentiment::from_polarity(f64::NAN, 0.15), Sentiment::Neutral);
    }

    #[test]
    fn test_sentiment_wire_format() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");

        let parsed: Sentiment = serde_json::from_str("\"positive\"").unwrap();
        assert_eq!(parsed, Sentiment::Positive);
        assert_eq!("neutral".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert!("meh".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_analysis_serialization() {
        let analysis = ReviewAnalysis {
            sentiment: Sentiment::Positive,
            is_fake: false,
        };
        let value = serde_json::to_value(analysis).unwrap();
        assert_eq!(value["sentiment"], "positive");
        assert_eq!(value["is_fake"], false);
    }
}
