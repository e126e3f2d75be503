//! Lexicon-based review sentiment classifier
//!
//! Polarity is the mean valence of the sentiment-bearing words in a review,
//! after intensity modifiers and negation have been applied. A symmetric
//! deadband around zero maps polarity to a label.

use crate::config::SentimentConfig;
use crate::lexicon::Lexicon;
use crate::normalizer::NormalizedText;
use ratesmart_core::Sentiment;

/// A negator affects a sentiment word at most this many tokens later
const NEGATION_SCOPE: usize = 3;

/// Negated valence is flipped and damped ("not good" is milder than "bad")
const NEGATION_FACTOR: f64 = -0.5;

pub struct SentimentClassifier {
    lexicon: Lexicon,
    polarity_threshold: f64,
}

impl SentimentClassifier {
    pub fn new() -> Self {
        Self::from_config(&SentimentConfig::default())
    }

    pub fn from_config(config: &SentimentConfig) -> Self {
        Self {
            lexicon: Lexicon::builtin().with_overrides(&config.lexicon),
            polarity_threshold: config.polarity_threshold,
        }
    }

    /// Polarity of the text in [-1.0, 1.0]; 0.0 when no sentiment word occurs.
    pub fn polarity(&self, normalized: &NormalizedText) -> f64 {
        let mut total = 0.0;
        let mut assessments = 0usize;
        let mut multiplier = 1.0;
        let mut negation_left = 0usize;

        for token in &normalized.tokens {
            let token = token.as_str();

            if self.lexicon.is_negator(token) {
                negation_left = NEGATION_SCOPE;
                continue;
            }

            if let Some(intensity) = self.lexicon.intensity(token) {
                multiplier *= intensity;
                continue;
            }

            match self.lexicon.valence(token) {
                Some(valence) => {
                    let mut score = valence * multiplier;
                    if negation_left > 0 {
                        score *= NEGATION_FACTOR;
                    }
                    total += score.clamp(-1.0, 1.0);
                    assessments += 1;

                    multiplier = 1.0;
                    negation_left = 0;
                }
                None => {
                    // modifiers bind only to the word right after them
                    multiplier = 1.0;
                    negation_left = negation_left.saturating_sub(1);
                }
            }
        }

        if assessments == 0 {
            0.0
        } else {
            (total / assessments as f64).clamp(-1.0, 1.0)
        }
    }

    /// Map a polarity score to a label
    pub fn label(&self, polarity: f64) -> Sentiment {
        Sentiment::from_polarity(polarity, self.polarity_threshold)
    }

    /// Classify normalized review text
    pub fn classify(&self, normalized: &NormalizedText) -> Sentiment {
        self.label(self.polarity(normalized))
    }

    pub fn polarity_threshold(&self) -> f64 {
        self.polarity_threshold
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
