//! Valence lexicon for review sentiment
//!
//! Word valences are in [-1.0, 1.0]. Intensity modifiers scale the valence of
//! the sentiment word that follows them; negators flip it.

use std::collections::{HashMap, HashSet};

const VALENCE: &[(&str, f64)] = &[
    // positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("outstanding", 0.9),
    ("superb", 1.0),
    ("wonderful", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("fantastic", 0.5),
    ("perfect", 1.0),
    ("perfectly", 0.8),
    ("best", 1.0),
    ("better", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("loves", 0.5),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("happy", 0.8),
    ("glad", 0.5),
    ("pleased", 0.5),
    ("satisfied", 0.5),
    ("delighted", 0.8),
    ("impressed", 0.6),
    ("impressive", 0.6),
    ("enjoy", 0.4),
    ("enjoyed", 0.5),
    ("friendly", 0.4),
    ("helpful", 0.5),
    ("beautiful", 0.85),
    ("comfortable", 0.4),
    ("reliable", 0.4),
    ("recommend", 0.3),
    ("recommended", 0.3),
    ("fast", 0.2),
    ("quick", 0.3),
    ("easy", 0.4),
    ("fresh", 0.3),
    ("clean", 0.35),
    ("tasty", 0.6),
    ("delicious", 1.0),
    ("affordable", 0.3),
    ("fine", 0.4),
    ("pleasant", 0.6),
    ("favorite", 0.5),
    ("favourite", 0.5),
    ("worth", 0.3),
    ("exceeded", 0.4),
    ("thanks", 0.2),
    ("thank", 0.2),
    // negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("poor", -0.4),
    ("poorly", -0.5),
    ("hate", -0.8),
    ("hated", -0.9),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("disappointment", -0.6),
    ("useless", -0.5),
    ("broken", -0.4),
    ("broke", -0.4),
    ("waste", -0.5),
    ("wasted", -0.6),
    ("rude", -0.3),
    ("slow", -0.3),
    ("dirty", -0.6),
    ("cheap", -0.1),
    ("overpriced", -0.5),
    ("expensive", -0.5),
    ("unhappy", -0.6),
    ("angry", -0.5),
    ("annoying", -0.8),
    ("sad", -0.5),
    ("fake", -0.5),
    ("scam", -0.8),
    ("defective", -0.6),
    ("faulty", -0.6),
    ("damaged", -0.5),
    ("wrong", -0.5),
    ("boring", -1.0),
    ("mediocre", -0.3),
    ("unreliable", -0.4),
    ("problem", -0.3),
    ("problems", -0.3),
    ("refund", -0.2),
    ("nasty", -0.9),
    ("bland", -0.4),
    ("stale", -0.5),
];

/// Multiplier applied to the next sentiment word's valence
const INTENSITY: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("utterly", 1.5),
    ("incredibly", 1.4),
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("super", 1.3),
    ("totally", 1.3),
    ("highly", 1.3),
    ("complete", 1.3),
    ("completely", 1.3),
    ("truly", 1.2),
    ("most", 1.2),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("fairly", 0.8),
    ("kinda", 0.7),
    ("somewhat", 0.6),
    ("slightly", 0.5),
    ("barely", 0.4),
];

/// Words that invert the valence of a sentiment word shortly after them.
///
/// Contractions tokenize into a stem and "t" ("didn't" -> "didn", "t").
const NEGATORS: &[&str] = &[
    "not", "no", "never", "nor", "neither", "nothing", "nobody", "none", "cannot", "without",
    "hardly", "t", "dont", "don", "didn", "doesn", "isn", "wasn", "aren", "weren", "wouldn",
    "couldn", "shouldn", "hasn", "haven", "hadn", "ain",
];

/// Word valences, intensity modifiers, and negators used by the sentiment
/// classifier.
#[derive(Debug, Clone)]
pub struct Lexicon {
    valence: HashMap<String, f64>,
    intensity: HashMap<String, f64>,
    negators: HashSet<String>,
}

impl Lexicon {
    /// The built-in English review lexicon
    pub fn builtin() -> Self {
        Self {
            valence: VALENCE.iter().map(|(w, v)| (w.to_string(), *v)).collect(),
            intensity: INTENSITY.iter().map(|(w, v)| (w.to_string(), *v)).collect(),
            negators: NEGATORS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Add or replace word valences. Words are lowercased.
    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a String, &'a f64)>,
    ) -> Self {
        for (word, valence) in overrides {
            self.valence
                .insert(word.trim().to_lowercase(), valence.clamp(-1.0, 1.0));
        }
        self
    }

    /// Valence of a sentiment-bearing word
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valence.get(word).copied()
    }

    /// Multiplier of an intensifier or diminisher
    pub fn intensity(&self, word: &str) -> Option<f64> {
        self.intensity.get(word).copied()
    }

    pub fn is_negator(&self, word: &str) -> bool {
        self.negators.contains(word)
    }

    /// Number of sentiment-bearing words
    pub fn len(&self) -> usize {
        self.valence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valence.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_builtin_valences_in_range() {
        for (word, valence) in VALENCE {
            assert!((-1.0..=1.0).contains(valence), "{word} out of range");
        }
    }

    #[test]
    fn test_word_classes_do_not_overlap() {
        let lexicon = Lexicon::builtin();
        for word in NEGATORS {
            assert!(lexicon.valence(word).is_none(), "{word} is both negator and valence");
            assert!(lexicon.intensity(word).is_none(), "{word} is both negator and modifier");
        }
        for (word, _) in INTENSITY {
            assert!(lexicon.valence(word).is_none(), "{word} is both modifier and valence");
        }
    }

    #[test]
    fn test_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Meh".to_string(), -0.2);
        overrides.insert("good".to_string(), 0.1);

        let lexicon = Lexicon::builtin().with_overrides(&overrides);
        assert_eq!(lexicon.valence("meh"), Some(-0.2));
        assert_eq!(lexicon.valence("good"), Some(0.1));
        assert_eq!(lexicon.len(), Lexicon::builtin().len() + 1);
    }

    #[test]
    fn test_lookups() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.valence("terrible"), Some(-1.0));
        assert_eq!(lexicon.intensity("very"), Some(1.3));
        assert!(lexicon.is_negator("not"));
        assert!(!lexicon.is_negator("tuesday"));
        assert!(lexicon.valence("tuesday").is_none());
    }
}
