use anyhow::{bail, Context, Result};

use crate::llm_client::embedding::DEFAULT_EMBEDDING_DIMENSION;

pub const DEFAULT_SKILLS_INDEX: &str = "skills-index";
pub const DEFAULT_DOCS_INDEX: &str = "recruitment-docs";

/// Which vector store backs the skills and docs indexes.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorStoreBackend {
    Pinecone { api_key: String },
    /// Process-local. Anything indexed is lost on exit.
    Memory,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub google_api_key: String,
    pub vector_store: VectorStoreBackend,
    pub skills_index: String,
    pub docs_index: String,
    pub embedding_dimension: usize,
    /// Pause between corpus uploads, in milliseconds.
    pub corpus_delay_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| require_var(&lookup, key);
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let vector_store = match or_default("VECTOR_STORE", "pinecone").to_lowercase().as_str() {
            "pinecone" => VectorStoreBackend::Pinecone {
                api_key: require("PINECONE_API_KEY")?,
            },
            "memory" => VectorStoreBackend::Memory,
            other => bail!("VECTOR_STORE must be 'pinecone' or 'memory', got '{other}'"),
        };

        Ok(Config {
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            google_api_key: require("GOOGLE_API_KEY")?,
            vector_store,
            skills_index: or_default("SKILLS_INDEX_NAME", DEFAULT_SKILLS_INDEX),
            docs_index: or_default("DOCS_INDEX_NAME", DEFAULT_DOCS_INDEX),
            embedding_dimension: or_default(
                "EMBEDDING_DIMENSION",
                &DEFAULT_EMBEDDING_DIMENSION.to_string(),
            )
            .parse::<usize>()
            .context("EMBEDDING_DIMENSION must be a positive integer")?,
            corpus_delay_ms: or_default("CORPUS_DELAY_MS", "1000")
                .parse::<u64>()
                .context("CORPUS_DELAY_MS must be a whole number of milliseconds")?,
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

fn require_var<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let env = vars(pairs);
        Config::from_lookup(|key| env.get(key).cloned())
    }

    const KEYS: [(&str, &str); 3] = [
        ("ANTHROPIC_API_KEY", "sk-ant"),
        ("GOOGLE_API_KEY", "g-key"),
        ("PINECONE_API_KEY", "pc-key"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&KEYS).unwrap();
        assert_eq!(
            config.vector_store,
            VectorStoreBackend::Pinecone {
                api_key: "pc-key".to_string()
            }
        );
        assert_eq!(config.skills_index, "skills-index");
        assert_eq!(config.docs_index, "recruitment-docs");
        assert_eq!(config.embedding_dimension, 3072);
        assert_eq!(config.corpus_delay_ms, 1000);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_memory_store_needs_no_pinecone_key() {
        let config = load(&[
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("GOOGLE_API_KEY", "g-key"),
            ("VECTOR_STORE", "Memory"),
        ])
        .unwrap();
        assert_eq!(config.vector_store, VectorStoreBackend::Memory);
    }

    #[test]
    fn test_missing_key_is_named() {
        let err = load(&[("GOOGLE_API_KEY", "g"), ("PINECONE_API_KEY", "p")]).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("GOOGLE_API_KEY", "   "));
        let env: HashMap<String, String> = vars(&pairs);
        let err = Config::from_lookup(|key| env.get(key).cloned()).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_rejects_unknown_backend_and_bad_port() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("VECTOR_STORE", "redis"));
        assert!(load(&pairs).is_err());

        let mut pairs = KEYS.to_vec();
        pairs.push(("PORT", "not-a-port"));
        assert!(load(&pairs).is_err());
    }
}
