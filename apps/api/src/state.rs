use std::sync::Arc;

use crate::llm_client::GenerationProvider;
use crate::matching::ranker::Ranker;
use crate::matching::skill_matcher::SkillMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Used directly by job parsing and outreach drafting.
    pub llm: Arc<dyn GenerationProvider>,
    /// Dispatches to database or local mode per request.
    pub ranker: Arc<dyn Ranker>,
    pub skill_matcher: Arc<SkillMatcher>,
}
