//! Rule-based English lemmatizer.
//!
//! No POS tagging: an irregular-form table is consulted first, then plural, past and
//! progressive suffixes are stripped conservatively. The output only has to be a stable
//! base form shared by the resume and the job description, so every rule is deterministic.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("doing", "do"),
    ("goes", "go"),
    ("going", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("led", "lead"),
    ("built", "build"),
    ("wrote", "write"),
    ("written", "write"),
    ("writing", "write"),
    ("taught", "teach"),
    ("ran", "run"),
    ("made", "make"),
    ("began", "begin"),
    ("begun", "begin"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("thought", "think"),
    ("sought", "seek"),
    ("caught", "catch"),
    ("held", "hold"),
    ("kept", "keep"),
    ("met", "meet"),
    ("sent", "send"),
    ("spent", "spend"),
    ("fed", "feed"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("gave", "give"),
    ("given", "give"),
    ("took", "take"),
    ("taken", "take"),
    ("saw", "see"),
    ("seen", "see"),
    ("knew", "know"),
    ("known", "know"),
    ("found", "find"),
    ("got", "get"),
    ("gotten", "get"),
    ("became", "become"),
    ("came", "come"),
    ("paid", "pay"),
    ("said", "say"),
    ("told", "tell"),
    ("understood", "understand"),
    ("oversaw", "oversee"),
    ("overseen", "oversee"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("criteria", "criterion"),
    ("indices", "index"),
    ("analyses", "analysis"),
    ("used", "use"),
    ("uses", "use"),
    ("using", "use"),
    ("created", "create"),
    ("creating", "create"),
    ("synced", "sync"),
    ("syncing", "sync"),
    ("stored", "store"),
    ("storing", "store"),
    ("explored", "explore"),
    ("exploring", "explore"),
    ("scored", "score"),
    ("scoring", "score"),
    ("restored", "restore"),
    ("restoring", "restore"),
    ("ignored", "ignore"),
    ("ignoring", "ignore"),
    ("caches", "cache"),
    ("cookies", "cookie"),
    ("movies", "movie"),
];

/// Words whose surface form is already the lemma even though a suffix rule would fire.
const PROTECTED: &[&str] = &[
    "always",
    "perhaps",
    "towards",
    "afterwards",
    "whereas",
    "thus",
    "yes",
    "news",
    "series",
    "species",
    "kubernetes",
    "pandas",
    "devops",
    "postgres",
    "canvas",
    "atlas",
    "bias",
    "alias",
    "lens",
    "status",
    "bonus",
    "focus",
    "campus",
    "corpus",
    "virus",
    "census",
    "consensus",
    "radius",
    "genius",
    "nexus",
    "syllabus",
    "stimulus",
    "apparatus",
    "versus",
    "surplus",
    "plus",
    "minus",
    "calculus",
    "modulus",
    "prometheus",
    "redis",
    "axis",
    "tennis",
    "analytics",
    "physics",
    "economics",
    "mathematics",
    "statistics",
    "robotics",
    "electronics",
    "logistics",
    "ethics",
    "genetics",
    "linguistics",
    "informatics",
    "bioinformatics",
    "semantics",
    "graphics",
    "mechanics",
    "dynamics",
    "ergonomics",
    "forensics",
    "hundred",
    "nothing",
    "something",
    "anything",
    "everything",
    "sibling",
    "ceiling",
    "wedding",
    "morning",
    "evening",
];

/// Stem endings that take back a silent `e` once `-ed`/`-ing` is removed.
/// The flag requires a consonant right before the ending (`manag-` but not `treat-`).
const E_RESTORING_ENDINGS: &[(&str, bool)] = &[
    ("uir", false),
    ("hang", false),
    ("rang", false),
    ("iz", false),
    ("yp", false),
    ("dg", false),
    ("rg", false),
    ("uc", false),
    ("rc", false),
    ("nc", false),
    ("ic", false),
    ("bl", false),
    ("pl", false),
    ("gl", false),
    ("dl", false),
    ("tl", false),
    ("kl", false),
    ("fl", false),
    ("v", false),
    ("z", false),
    ("u", false),
    ("at", true),
    ("ag", true),
    ("il", true),
    ("ul", true),
    ("al", true),
    ("id", true),
    ("ad", true),
    ("ud", true),
    ("od", true),
    ("ir", true),
    ("ur", true),
    ("in", true),
    ("am", true),
    ("um", true),
    ("im", true),
    ("om", true),
    ("ak", true),
    ("ik", true),
    ("ok", true),
    ("ut", true),
];

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
    protected: HashSet<&'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Lemmatizer {
    pub fn english() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
            protected: PROTECTED.iter().copied().collect(),
        }
    }

    /// Returns the base form of a lowercase alphabetic word.
    pub fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if let Some(&lemma) = self.irregular.get(word) {
            return Cow::Borrowed(lemma);
        }
        if word.len() <= 3 || self.protected.contains(word) {
            return Cow::Borrowed(word);
        }
        if let Some(lemma) = strip_plural(word) {
            return lemma;
        }
        if let Some(stem) = word.strip_suffix("ied") {
            if word.len() > 4 {
                return Cow::Owned(format!("{stem}y"));
            }
            return Cow::Borrowed(word);
        }
        if word.ends_with("eed") {
            return Cow::Borrowed(word);
        }
        let stem = word
            .strip_suffix("ed")
            .or_else(|| word.strip_suffix("ing"));
        match stem {
            Some(stem) if stem.len() >= 3 && has_vowel(stem) => restore_stem(stem),
            _ => Cow::Borrowed(word),
        }
    }
}

fn strip_plural(word: &str) -> Option<Cow<'_, str>> {
    if !word.ends_with('s') {
        return None;
    }
    // class, analysis, various
    if word.ends_with("ss") || word.ends_with("sis") || word.ends_with("ous") {
        return Some(Cow::Borrowed(word));
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if word.len() > 4 {
            return Some(Cow::Owned(format!("{stem}y")));
        }
    }
    for suffix in ["sses", "ches", "shes", "xes", "zzes"] {
        if word.ends_with(suffix) {
            return Some(Cow::Borrowed(&word[..word.len() - 2]));
        }
    }
    Some(Cow::Borrowed(&word[..word.len() - 1]))
}

fn restore_stem(stem: &str) -> Cow<'_, str> {
    let bytes = stem.as_bytes();
    let last = bytes[bytes.len() - 1];
    let prev = bytes[bytes.len() - 2];

    // planned -> plan, running -> run; install and pass keep their doubled letter
    if last == prev && is_consonant(last) && !matches!(last, b'l' | b's' | b'z') {
        return Cow::Borrowed(&stem[..stem.len() - 1]);
    }

    for &(ending, needs_consonant) in E_RESTORING_ENDINGS {
        if let Some(head) = stem.strip_suffix(ending) {
            let consonant_before = head.as_bytes().last().is_some_and(|&b| is_consonant(b));
            if !needs_consonant || consonant_before {
                return Cow::Owned(format!("{stem}e"));
            }
        }
    }

    // based, released, parsed; focus stays focus
    if last == b's' && prev != b's' {
        let consonant_us = prev == b'u' && bytes.len() >= 3 && is_consonant(bytes[bytes.len() - 3]);
        if !consonant_us {
            return Cow::Owned(format!("{stem}e"));
        }
    }

    Cow::Borrowed(stem)
}

fn is_consonant(b: u8) -> bool {
    b.is_ascii_alphabetic() && !matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn has_vowel(stem: &str) -> bool {
    stem.bytes()
        .enumerate()
        .any(|(i, b)| matches!(b, b'a' | b'e' | b'i' | b'o' | b'u') || (b == b'y' && i > 0))
}
