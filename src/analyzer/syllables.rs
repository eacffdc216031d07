//! Vowel-group syllable estimation.
//!
//! Words of three letters or fewer count as one syllable. Longer words drop a
//! silent trailing `e`/`es`/`ed` and a leading `y`, then every run of one or
//! two vowels counts as a syllable, with a floor of one.

use super::tokenize::{is_alphabetic_token, is_clitic, words};
use once_cell::sync::Lazy;
use regex::Regex;

static SILENT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").unwrap());
static LEADING_Y: Lazy<Regex> = Lazy::new(|| Regex::new(r"^y").unwrap());
static VOWEL_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]{1,2}").unwrap());

/// Estimated syllables in a single word. Non-letters are ignored; a word with
/// no letters has zero syllables.
pub fn count_word(word: &str) -> usize {
    let letters: String = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    match letters.chars().count() {
        0 => 0,
        1..=3 => 1,
        _ => {
            let stripped = SILENT_SUFFIX.replace(&letters, "");
            let stripped = LEADING_Y.replace(&stripped, "");
            VOWEL_GROUP.find_iter(&stripped).count().max(1)
        }
    }
}

/// Estimated syllables across every alphabetic token of `text`. Contraction
/// clitics add nothing, so `don't` counts like `dont`.
pub fn count_text(text: &str) -> usize {
    words(text)
        .into_iter()
        .filter(|t| is_alphabetic_token(t) && !is_clitic(t))
        .map(count_word)
        .sum()
}
