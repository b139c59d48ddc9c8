use std::sync::Arc;

use crate::config::Config;
use crate::screening::context::ScreeningContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Skill database and language analysis, built once at startup and read-only afterwards.
    pub context: Arc<ScreeningContext>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let context = Arc::new(ScreeningContext::with_extra_skills(&config.extra_skills));
        AppState { config, context }
    }
}
