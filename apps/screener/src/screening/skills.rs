use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

const BUILTIN_SKILLS: &[&str] = &[
    "python", "java", "javascript", "c", "c++", "c#", "sql", "html", "css", "react", "angular",
    "vue", "django", "flask", "node", "express", "aws", "azure", "gcp", "docker", "kubernetes",
    "git", "tensorflow", "pytorch",
];

/// Word-like runs, with `+` and `#` kept so `c++` and `c#` survive.
static SKILL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w+#]+").expect("valid skill token regex"));

/// True when `token` is something `extract` can match: 2+ chars, all in `[a-z0-9+#]`.
fn is_matchable(token: &str) -> bool {
    token.chars().count() >= 2
        && token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '+' || c == '#')
}

/// Fixed set of known skill keywords (lowercase).
#[derive(Debug, Clone)]
pub struct SkillDatabase {
    skills: BTreeSet<String>,
}

impl Default for SkillDatabase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillDatabase {
    pub fn builtin() -> Self {
        Self {
            skills: BUILTIN_SKILLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Built-in keywords plus `extra`, lowercased. Only called at startup.
    ///
    /// Entries that can never come out of `extract` (`node.js`, `ci/cd`, anything with a
    /// space) are dropped with a warning.
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut db = Self::builtin();
        for skill in extra.iter().map(|s| s.as_ref().trim().to_lowercase()) {
            if skill.is_empty() {
                continue;
            }
            if is_matchable(&skill) {
                db.skills.insert(skill);
            } else {
                warn!("Ignoring extra skill '{skill}': only letters, digits, '+' and '#' can match");
            }
        }
        db
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Keyword intersection between `text` and the database, sorted and unique.
    /// Exact membership only: `node.js` yields `node` (and `js`), never a fuzzy match.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let found: BTreeSet<&str> = SKILL_TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| is_matchable(token) && self.contains(token))
            .collect();
        found.into_iter().map(str::to_string).collect()
    }
}
