//! Text Normalizer: lowercase, lemmatized, stopword-free, alphabetic-only tokens.

use crate::screening::lemmatizer::Lemmatizer;
use crate::screening::stopwords::Stopwords;

/// Characters split off the edges of a whitespace-delimited chunk.
const EDGE_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '`', '*', '•', '·',
    '–', '—', '‘', '’', '“', '”', '<', '>',
];

/// Separators split out of the middle of a chunk (`full-stack`, `ci/cd`, `python,sql`).
const INFIX_SEPARATORS: &[char] = &['-', '/', ',', ';', '|'];

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    stopwords: Stopwords,
    lemmatizer: Lemmatizer,
}

impl Normalizer {
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Lower-cases `text`, drops stopwords and non-alphabetic tokens, and joins the
    /// lemmas of what is left with single spaces, preserving source order.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let mut lemmas: Vec<String> = Vec::new();

        for token in tokenize(&lowered) {
            if !is_alphabetic(token) || self.stopwords.contains(token) {
                continue;
            }
            lemmas.push(self.lemmatizer.lemmatize(token).into_owned());
        }

        lemmas.join(" ")
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .flat_map(|chunk| chunk.split(INFIX_SEPARATORS))
        .map(|piece| {
            let piece = piece.trim_matches(EDGE_PUNCTUATION);
            piece
                .strip_suffix("'s")
                .or_else(|| piece.strip_suffix("’s"))
                .unwrap_or(piece)
        })
        .filter(|token| !token.is_empty())
}

fn is_alphabetic(token: &str) -> bool {
    token.chars().all(char::is_alphabetic)
}
