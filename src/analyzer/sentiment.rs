//! Lexicon-based polarity and subjectivity scoring.
//!
//! Each lexicon word carries a polarity in `[-1, 1]`, a subjectivity in
//! `[0, 1]` and an intensity (`1.0` for plain words). Scoring walks the word
//! tokens:
//!
//! - a word with an intensity other than `1.0` is an intensifier (`very`,
//!   `extremely`, ...): it is not scored itself and scales both values of the
//!   next scored word;
//! - a negator (`not`, `never`, any `n't` form, ...) multiplies the polarity
//!   of the next scored word by `-0.5`;
//! - the document score is the mean over scored words, or `0.0 / 0.0` when
//!   nothing scored.
//!
//! Negation is cleared by sentence punctuation; intensity is cleared by any
//! content word in between.

use super::stopwords::is_stopword;
use super::tokenize::words;
use crate::error::ConfigError;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Output of a [`SentimentModel`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sentiment {
    /// Negative to positive, in `[-1, 1]`.
    pub polarity: f64,
    /// Objective to subjective, in `[0, 1]`.
    pub subjectivity: f64,
}

/// Scores a whole text for polarity and subjectivity.
pub trait SentimentModel {
    fn sentiment(&self, text: &str) -> Sentiment;
}

#[rustfmt::skip]
const LEXICON: &[(&str, f64, f64)] = &[
    ("able", 0.5, 0.625), ("afraid", -0.6, 0.9), ("amazing", 0.6, 0.9),
    ("angry", -0.5, 1.0), ("available", 0.4, 0.4), ("awesome", 1.0, 1.0),
    ("awful", -1.0, 1.0), ("bad", -0.7, 0.667), ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3), ("better", 0.5, 0.5), ("big", 0.0, 0.1),
    ("boring", -1.0, 1.0), ("brilliant", 0.9, 1.0), ("broken", -0.4, 0.4),
    ("certain", 0.214, 0.571), ("cheap", 0.4, 0.7), ("clean", 0.367, 0.683),
    ("clear", 0.1, 0.383), ("clever", 0.5, 0.5), ("common", -0.3, 0.5),
    ("complicated", -0.5, 1.0), ("crazy", -0.6, 0.9), ("critical", 0.0, 0.4),
    ("current", 0.0, 0.4), ("dangerous", -0.6, 0.9), ("difficult", -0.5, 1.0),
    ("dirty", -0.6, 0.8), ("disappointed", -0.75, 0.75), ("disappointing", -0.6, 0.7),
    ("easy", 0.433, 0.833), ("effective", 0.6, 0.8), ("enjoy", 0.4, 0.5),
    ("essential", 0.0, 0.3), ("excellent", 1.0, 1.0), ("excited", 0.375, 0.75),
    ("exciting", 0.3, 0.8), ("expensive", -0.5, 0.7), ("failed", -0.5, 0.3),
    ("fair", 0.7, 0.9), ("false", -0.4, 0.7), ("famous", 0.5, 1.0),
    ("fantastic", 0.4, 0.9), ("fast", 0.2, 0.6), ("fine", 0.417, 0.5),
    ("first", 0.25, 0.333), ("fortunate", 0.4, 0.8), ("free", 0.4, 0.8),
    ("fun", 0.3, 0.2), ("funny", 0.25, 1.0), ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6), ("great", 0.8, 0.75), ("happy", 0.8, 1.0),
    ("hard", -0.292, 0.542), ("hate", -0.8, 0.9), ("healthy", 0.5, 0.5),
    ("high", 0.16, 0.54), ("honest", 0.6, 0.9), ("horrible", -1.0, 1.0),
    ("important", 0.4, 1.0), ("impressive", 1.0, 1.0), ("incredible", 0.9, 0.9),
    ("interesting", 0.5, 0.5), ("large", 0.214, 0.429), ("last", 0.0, 0.067),
    ("little", -0.1875, 0.5), ("long", -0.05, 0.4), ("love", 0.5, 0.6),
    ("lovely", 0.5, 0.75), ("lucky", 0.333, 1.0), ("main", 0.167, 0.333),
    ("major", 0.062, 0.5), ("modern", 0.2, 0.3), ("necessary", 0.0, 1.0),
    ("negative", -0.3, 0.4), ("new", 0.136, 0.455), ("nice", 0.6, 1.0),
    ("old", 0.1, 0.2), ("perfect", 1.0, 1.0), ("pleasant", 0.733, 0.967),
    ("poor", -0.4, 0.6), ("popular", 0.6, 0.8), ("positive", 0.227, 0.545),
    ("possible", 0.0, 1.0), ("quick", 0.333, 0.5), ("rare", 0.3, 0.9),
    ("ready", 0.2, 0.5), ("real", 0.2, 0.3), ("recent", 0.0, 0.25),
    ("rich", 0.375, 0.5), ("right", 0.286, 0.536), ("sad", -0.5, 1.0),
    ("safe", 0.5, 0.5), ("serious", -0.333, 0.667), ("short", 0.0, 0.3),
    ("sick", -0.714, 0.857), ("significant", 0.375, 0.875), ("simple", 0.0, 0.357),
    ("slow", -0.3, 0.4), ("small", -0.25, 0.4), ("smart", 0.214, 0.643),
    ("special", 0.357, 0.571), ("strange", 0.0, 0.15), ("strong", 0.433, 0.733),
    ("stupid", -0.8, 1.0), ("successful", 0.75, 0.95), ("sure", 0.5, 0.889),
    ("terrible", -1.0, 1.0), ("traditional", 0.0, 0.75), ("true", 0.35, 0.65),
    ("ugly", -0.7, 1.0), ("unfair", -0.5, 0.9), ("unfortunate", -0.5, 1.0),
    ("unfortunately", -0.5, 1.0), ("unique", 0.375, 1.0), ("unpleasant", -0.5, 1.0),
    ("useful", 0.3, 0.0), ("weak", -0.375, 0.625), ("weird", -0.5, 1.0),
    ("wonderful", 1.0, 1.0), ("worse", -0.4, 0.6), ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

#[rustfmt::skip]
const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5), ("extremely", 1.5), ("incredibly", 1.5), ("highly", 1.3),
    ("really", 1.3), ("totally", 1.3), ("very", 1.3), ("most", 1.2), ("quite", 1.1),
    ("fairly", 0.9), ("rather", 0.9), ("somewhat", 0.8), ("slightly", 0.7),
];

const NEGATORS: &[&str] = &["not", "no", "never", "nor", "neither", "cannot", "without"];

/// Scores of one lexicon word.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WordScore {
    polarity: f64,
    subjectivity: f64,
    intensity: f64,
}

impl WordScore {
    fn is_intensifier(&self) -> bool {
        self.intensity != 1.0
    }
}

static DEFAULT_LEXICON: Lazy<HashMap<String, WordScore>> = Lazy::new(|| {
    let words = LEXICON.iter().map(|&(word, polarity, subjectivity)| {
        let score = WordScore {
            polarity,
            subjectivity,
            intensity: 1.0,
        };
        (word.to_string(), score)
    });
    let intensifiers = INTENSIFIERS.iter().map(|&(word, intensity)| {
        let score = WordScore {
            polarity: 0.0,
            subjectivity: 0.0,
            intensity,
        };
        (word.to_string(), score)
    });
    words.chain(intensifiers).collect()
});

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

fn ends_clause(token: &str) -> bool {
    matches!(token, "." | "!" | "?" | ";" | ":")
}

fn unit_intensity() -> f64 {
    1.0
}

/// One row of a lexicon CSV file. `intensity` may be omitted.
#[derive(Debug, Deserialize)]
struct LexiconEntry {
    word: String,
    polarity: f64,
    subjectivity: f64,
    #[serde(default = "unit_intensity")]
    intensity: f64,
}

/// Default [`SentimentModel`] backed by a word lexicon.
#[derive(Debug, Clone)]
pub struct LexiconSentiment {
    lexicon: HashMap<String, WordScore>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self {
            lexicon: DEFAULT_LEXICON.clone(),
        }
    }
}

impl LexiconSentiment {
    /// Built-in lexicon extended (or overridden) by a CSV file with
    /// `word,polarity,subjectivity[,intensity]` columns. A missing intensity
    /// means `1.0`; negative intensities are treated as `0.0`.
    pub fn with_overrides_from_path(path: &Path) -> Result<Self, ConfigError> {
        let lexicon_err = |source| ConfigError::Lexicon {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(lexicon_err)?;

        let mut model = Self::default();
        let mut loaded = 0usize;
        for entry in reader.deserialize::<LexiconEntry>() {
            let entry = entry.map_err(lexicon_err)?;
            let score = WordScore {
                polarity: entry.polarity.clamp(-1.0, 1.0),
                subjectivity: entry.subjectivity.clamp(0.0, 1.0),
                intensity: entry.intensity.max(0.0),
            };
            model.lexicon.insert(entry.word.to_lowercase(), score);
            loaded += 1;
        }
        info!(path = %path.display(), entries = loaded, "Loaded sentiment lexicon overrides");
        Ok(model)
    }
}

impl SentimentModel for LexiconSentiment {
    fn sentiment(&self, text: &str) -> Sentiment {
        let mut scored: Vec<(f64, f64)> = Vec::new();
        let mut negate = false;
        let mut factor = 1.0f64;

        for token in words(text) {
            if ends_clause(token) {
                negate = false;
                factor = 1.0;
                continue;
            }
            let word = token.to_lowercase();
            if is_negator(&word) {
                negate = true;
                continue;
            }
            match self.lexicon.get(&word) {
                Some(score) if score.is_intensifier() => factor *= score.intensity,
                Some(score) => {
                    let mut polarity = score.polarity * factor;
                    if negate {
                        polarity *= -0.5;
                    }
                    scored.push((polarity, score.subjectivity * factor));
                    negate = false;
                    factor = 1.0;
                }
                None if !is_stopword(&word) => factor = 1.0,
                None => {}
            }
        }

        if scored.is_empty() {
            return Sentiment::default();
        }
        let n = scored.len() as f64;
        let polarity = scored.iter().map(|(p, _)| p).sum::<f64>() / n;
        let subjectivity = scored.iter().map(|(_, s)| s).sum::<f64>() / n;
        Sentiment {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        }
    }
}
