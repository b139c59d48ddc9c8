use tracing::info;

use crate::screening::normalizer::Normalizer;
use crate::screening::skills::SkillDatabase;

/// Read-only language resources shared by every screening session.
///
/// Built once in `main` and handed to handlers through `AppState`; nothing mutates it
/// after construction.
#[derive(Debug, Clone, Default)]
pub struct ScreeningContext {
    pub skills: SkillDatabase,
    pub normalizer: Normalizer,
}

impl ScreeningContext {
    pub fn with_extra_skills(extra: &[String]) -> Self {
        let context = Self {
            skills: SkillDatabase::with_extra(extra),
            normalizer: Normalizer::default(),
        };
        info!(
            "Screening context ready: {} skills, {} stopwords",
            context.skills.len(),
            context.normalizer.stopword_count()
        );
        context
    }
}
