//! English stopword list (the NLTK `english` corpus, via the `stop-words` crate).

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// A fixed, lowercase stopword set.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

impl Stopwords {
    pub fn english() -> Self {
        Self {
            words: get(LANGUAGE::English)
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Membership test on the surface form; callers pass lowercase tokens.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_list_is_loaded() {
        let sw = Stopwords::english();
        assert!(sw.len() > 100);
        for w in ["i", "me", "ourselves", "haven", "wouldn"] {
            assert!(sw.contains(w), "{w} should be a stopword");
        }
    }

    #[test]
    fn test_common_words_are_stopwords() {
        let sw = Stopwords::default();
        for w in ["the", "and", "with", "during", "is", "of"] {
            assert!(sw.contains(w), "{w} should be a stopword");
        }
        for w in ["python", "experience", "year", "skill", "team"] {
            assert!(!sw.contains(w), "{w} should not be a stopword");
        }
        assert!(!sw.contains("The"), "lookup is on lowercase surface forms");
    }
}
