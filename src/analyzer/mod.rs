//! Readability and sentiment metrics for one document.
//!
//! # Submodules
//!
//! - [`tokenize`]: sentence and word tokens
//! - [`stopwords`]: English stopword set used for complex-word filtering
//! - [`syllables`]: syllable estimation
//! - [`sentiment`]: polarity/subjectivity model
//!
//! # Metrics
//!
//! | Metric | Formula |
//! |--------|---------|
//! | positive / polarity score | model polarity |
//! | negative / subjectivity score | model subjectivity |
//! | avg sentence length, avg words per sentence | words / sentences |
//! | complex word count | tokens longer than 6 chars that are not stopwords |
//! | percentage of complex words | complex / words (a ratio, not scaled by 100) |
//! | fog index | 0.4 * (avg sentence length + percentage of complex words) |
//! | word count | all tokens, punctuation and contraction clitics included |
//! | syllable per word | syllables(text) / words |
//! | personal pronouns | tokens in {i, me, my, mine, myself, we, us, our, ours, ourselves} |
//! | avg word length | chars over all tokens / words |

pub mod sentiment;
pub mod stopwords;
pub mod syllables;
pub mod tokenize;

use crate::error::AnalyzeError;
use crate::models::MetricSet;
use sentiment::{LexiconSentiment, SentimentModel};

const PERSONAL_PRONOUNS: [&str; 10] = [
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves",
];

/// Minimum character length (exclusive) for a complex word.
const COMPLEX_WORD_MIN_CHARS: usize = 6;

fn is_complex(token: &str) -> bool {
    token.chars().count() > COMPLEX_WORD_MIN_CHARS && !stopwords::is_stopword(token)
}

fn is_personal_pronoun(token: &str) -> bool {
    PERSONAL_PRONOUNS.contains(&token.to_lowercase().as_str())
}

/// Computes a [`MetricSet`] from document text.
#[derive(Debug, Clone, Default)]
pub struct Analyzer<S = LexiconSentiment> {
    sentiment: S,
}

impl<S> Analyzer<S>
where
    S: SentimentModel,
{
    pub fn new(sentiment: S) -> Self {
        Self { sentiment }
    }

    /// Score `text`.
    ///
    /// # Errors
    ///
    /// [`AnalyzeError::DegenerateDocument`] when the text has no word tokens or
    /// no sentences, since every per-word and per-sentence ratio is undefined.
    pub fn analyze(&self, text: &str) -> Result<MetricSet, AnalyzeError> {
        let sentences = tokenize::sentences(text);
        let words = tokenize::words(text);
        if words.is_empty() || sentences.is_empty() {
            return Err(AnalyzeError::DegenerateDocument {
                words: words.len(),
                sentences: sentences.len(),
            });
        }

        let word_count = words.len();
        let n_words = word_count as f64;
        let n_sentences = sentences.len() as f64;

        let sentiment = self.sentiment.sentiment(text);

        let avg_sentence_length = n_words / n_sentences;
        let complex_word_count = words.iter().filter(|w| is_complex(w)).count();
        let percentage_of_complex_words = complex_word_count as f64 / n_words;
        let fog_index = 0.4 * (avg_sentence_length + percentage_of_complex_words);
        let syllable_per_word = syllables::count_text(text) as f64 / n_words;
        let personal_pronouns = words.iter().filter(|w| is_personal_pronoun(w)).count();
        let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let avg_word_length = total_chars as f64 / n_words;

        Ok(MetricSet {
            positive_score: sentiment.polarity,
            negative_score: sentiment.subjectivity,
            polarity_score: sentiment.polarity,
            subjectivity_score: sentiment.subjectivity,
            avg_sentence_length,
            percentage_of_complex_words,
            fog_index,
            avg_number_of_words_per_sentence: avg_sentence_length,
            complex_word_count,
            word_count,
            syllable_per_word,
            personal_pronouns,
            avg_word_length,
        })
    }
}
