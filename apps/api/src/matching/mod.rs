// Candidate matching: the two-stage retrieval pipeline.
// Skill Matcher -> skill-target query -> candidate scoring -> dense ranking.
// All model calls go through llm_client, all index access through vector_store.

pub mod chunk;
pub mod extraction;
pub mod handlers;
pub mod normalize;
pub mod prompts;
pub mod ranker;
pub mod skill_matcher;
