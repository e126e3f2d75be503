//! Text normalization shared by every review classifier

use ratesmart_core::{Error, Result};
use regex::Regex;

/// Lowercased review text together with its word tokens
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    /// Lowercased, trimmed copy of the original text
    pub text: String,

    /// Word tokens in order of appearance
    pub tokens: Vec<String>,
}

impl NormalizedText {
    /// Number of word tokens
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Length of the trimmed text in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// True when the text produced no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Lowercases and tokenizes review text.
///
/// A token is a maximal run of letters, digits, and underscores. Combining
/// marks and connector punctuation other than `_` separate tokens.
pub struct TextNormalizer {
    word_regex: Regex,
}

impl TextNormalizer {
    /// Create a new normalizer
    pub fn new() -> Result<Self> {
        Ok(Self {
            word_regex: Regex::new(r"[\p{L}\p{N}_]+")
                .map_err(|e| Error::classifier(format!("Failed to compile word regex: {e}")))?,
        })
    }

    /// Normalize a review text. Never fails; degenerate input yields no tokens.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let text = text.to_lowercase().trim().to_string();
        let tokens = self
            .word_regex
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect();

        NormalizedText { text, tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        let normalizer = TextNormalizer::new().unwrap();
        let normalized = normalizer.normalize("  Great Product!  ");

        assert_eq!(normalized.text, "great product!");
        assert_eq!(normalized.tokens, vec!["great", "product"]);
    }

    #[test]
    fn test_punctuation_separates_tokens() {
        let normalizer = TextNormalizer::new().unwrap();
        let normalized = normalizer.normalize("don't-stop,snake_case 42x");

        assert_eq!(normalized.tokens, vec!["don", "t", "stop", "snake_case", "42x"]);
    }

    #[test]
    fn test_degenerate_input() {
        let normalizer = TextNormalizer::new().unwrap();

        let empty = normalizer.normalize("");
        assert!(empty.is_empty());
        assert_eq!(empty.char_count(), 0);

        let punctuation = normalizer.normalize(" ?!... ");
        assert!(punctuation.is_empty());
        assert_eq!(punctuation.text, "?!...");
        assert_eq!(punctuation.char_count(), 5);
    }

    #[test]
    fn test_unicode_words() {
        let normalizer = TextNormalizer::new().unwrap();
        let normalized = normalizer.normalize("Très BIEN, café");

        assert_eq!(normalized.tokens, vec!["très", "bien", "café"]);
        assert_eq!(normalized.char_count(), 15);
    }

    #[test]
    fn test_marks_and_connectors_separate_tokens() {
        let normalizer = TextNormalizer::new().unwrap();

        let normalized = normalizer.normalize("e\u{301}e a\u{203F}b");
        assert_eq!(normalized.tokens, vec!["e", "e", "a", "b"]);

        let normalized = normalizer.normalize("a\u{203F}b\u{203F}c");
        assert_eq!(normalized.token_count(), 3);
    }
}
