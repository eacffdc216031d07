//! Sentence and word tokenization on Unicode text segmentation boundaries.
//!
//! Word tokens follow UAX #29 word boundaries with whitespace dropped, then
//! get Treebank-style adjustments:
//!
//! - punctuation marks are tokens of their own (`cats.` is `cats` + `.`);
//! - contraction clitics split off (`I'm` is `I` + `'m`, `don't` is `do` + `n't`);
//! - hyphenated compounds written without spaces stay whole (`well-documented`).
//!
//! Sentences are segmented with line breaks read as spaces, so a title line
//! without terminal punctuation runs into the first body sentence.

use itertools::Itertools;
use unicode_segmentation::UnicodeSegmentation;

const CLITICS: [&str; 6] = ["s", "m", "d", "re", "ve", "ll"];

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Sentences of `text`, with all whitespace runs collapsed to one space.
pub fn sentences(text: &str) -> Vec<String> {
    let flat = text.split_whitespace().join(" ");
    flat.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word and punctuation tokens of `text`.
pub fn words(text: &str) -> Vec<&str> {
    let spans: Vec<(usize, usize)> = text
        .split_word_bound_indices()
        .filter(|(_, t)| !t.trim().is_empty())
        .map(|(start, t)| (start, start + t.len()))
        .collect();

    let mut tokens = Vec::with_capacity(spans.len());
    let mut i = 0;
    while i < spans.len() {
        let (start, mut end) = spans[i];
        i += 1;
        if is_wordlike(&text[start..end]) {
            while i + 1 < spans.len() && joins_hyphen(text, end, spans[i], spans[i + 1]) {
                end = spans[i + 1].1;
                i += 2;
            }
        }
        let (stem, clitic) = split_clitic(&text[start..end]);
        tokens.push(stem);
        tokens.extend(clitic);
    }
    tokens
}

fn is_wordlike(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric)
}

/// `word` `-` `word` with nothing in between.
fn joins_hyphen(text: &str, end: usize, hyphen: (usize, usize), next: (usize, usize)) -> bool {
    hyphen.0 == end
        && &text[hyphen.0..hyphen.1] == "-"
        && next.0 == hyphen.1
        && is_wordlike(&text[next.0..next.1])
}

/// Split a trailing contraction clitic off `token`.
fn split_clitic(token: &str) -> (&str, Option<&str>) {
    let Some((idx, apostrophe)) = token.char_indices().rev().find(|&(_, c)| is_apostrophe(c))
    else {
        return (token, None);
    };
    if idx == 0 {
        return (token, None);
    }
    let tail = token[idx + apostrophe.len_utf8()..].to_lowercase();
    if CLITICS.contains(&tail.as_str()) {
        return (&token[..idx], Some(&token[idx..]));
    }
    if tail == "t" && idx > 1 && token[..idx].ends_with(['n', 'N']) {
        return (&token[..idx - 1], Some(&token[idx - 1..]));
    }
    (token, None)
}

/// Whether `token` is a clitic split off by [`words`] (`'s`, `'m`, `n't`, ...).
pub fn is_clitic(token: &str) -> bool {
    let lower = token.to_lowercase().replace('\u{2019}', "'");
    lower == "n't" || lower.strip_prefix('\'').is_some_and(|t| CLITICS.contains(&t))
}

/// Whether a token carries any letter (used for syllable counting).
pub fn is_alphabetic_token(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_split_punctuation() {
        let tokens = words("I love cats. Cats are wonderful animals that purr.");
        assert_eq!(
            tokens,
            vec![
                "I", "love", "cats", ".", "Cats", "are", "wonderful", "animals", "that", "purr",
                "."
            ]
        );
    }

    #[test]
    fn test_words_split_contraction_clitics() {
        assert_eq!(words("don't stop"), vec!["do", "n't", "stop"]);
        assert_eq!(
            words("I'm sure we're fine."),
            vec!["I", "'m", "sure", "we", "'re", "fine", "."]
        );
        assert_eq!(words("We\u{2019}ll see"), vec!["We", "\u{2019}ll", "see"]);
        assert_eq!(words("John's o'clock"), vec!["John", "'s", "o'clock"]);
    }

    #[test]
    fn test_words_keep_hyphenated_compounds() {
        assert_eq!(
            words("A well-documented approach."),
            vec!["A", "well-documented", "approach", "."]
        );
        assert_eq!(words("state-of-the-art"), vec!["state-of-the-art"]);
        assert_eq!(words("before - after"), vec!["before", "-", "after"]);
        assert_eq!(words("pre-"), vec!["pre", "-"]);
    }

    #[test]
    fn test_is_clitic() {
        assert!(is_clitic("'m"));
        assert!(is_clitic("n't"));
        assert!(is_clitic("\u{2019}LL"));
        assert!(!is_clitic("o'clock"));
        assert!(!is_clitic("'"));
    }

    #[test]
    fn test_sentences_basic() {
        let s = sentences("I love cats. Cats are wonderful animals that purr.");
        assert_eq!(s.len(), 2);
        assert_eq!(s[0], "I love cats.");
    }

    #[test]
    fn test_title_line_joins_first_sentence() {
        let s = sentences("A Headline\n\nThe body starts here. It ends here.");
        assert_eq!(s, vec!["A Headline The body starts here.", "It ends here."]);
    }

    #[test]
    fn test_empty_text() {
        assert!(sentences("").is_empty());
        assert!(sentences("  \n\n ").is_empty());
        assert!(words(" \n ").is_empty());
    }

    #[test]
    fn test_alphabetic_token() {
        assert!(is_alphabetic_token("cats"));
        assert!(!is_alphabetic_token("."));
        assert!(!is_alphabetic_token("2024"));
    }
}
