mod config;
mod corpus;
mod errors;
mod llm_client;
mod matching;
mod outreach;
mod parsing;
mod routes;
mod state;
mod vector_store;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, VectorStoreBackend};
use crate::corpus::documents::{build_document_corpus, load_documents, DEFAULT_DOCUMENT_LIMIT};
use crate::corpus::skills::build_skill_corpus;
use crate::corpus::taxonomy::SKILL_TAXONOMY;
use crate::llm_client::embedding::{verify_dimension, EmbeddingProvider, GeminiEmbedder};
use crate::llm_client::{AnthropicClient, GenerationProvider};
use crate::matching::ranker::{CandidateRanker, DatabaseRanker, LocalRanker};
use crate::matching::skill_matcher::SkillMatcher;
use crate::parsing::cv_parser::LlmCvParser;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vector_store::{DistanceMetric, MemoryStore, PineconeStore, VectorStore};

#[derive(Parser, Debug)]
#[command(author, version, about = "Candidate ranking and skill matching service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Embed the built-in skill taxonomy into the skills index
    BuildSkills,

    /// Parse, augment and index résumés from a CSV or JSON Lines file into the docs index
    BuildDocuments {
        /// Path to a .csv file (with a header row) or a .jsonl file
        path: PathBuf,

        /// Field (or CSV column) holding the document id
        #[arg(long, default_value = "id")]
        id_field: String,

        /// Field (or CSV column) holding the raw résumé text
        #[arg(long, default_value = "text")]
        text_field: String,

        /// Maximum number of records to read
        #[arg(long, default_value_t = DEFAULT_DOCUMENT_LIMIT)]
        limit: usize,
    },

    /// Delete every record from an index
    ClearIndex {
        /// Index name, e.g. skills-index
        index: String,
    },
}

/// Provider and store handles shared by every command.
struct Services {
    llm: Arc<dyn GenerationProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl Services {
    async fn connect(config: &Config) -> Result<Self> {
        let llm = Arc::new(AnthropicClient::new(config.anthropic_api_key.clone())?);
        info!("LLM client initialized (model: {})", llm_client::MODEL);

        let embedder = Arc::new(GeminiEmbedder::new(
            config.google_api_key.clone(),
            config.embedding_dimension,
        )?);
        info!(
            "Embedding client initialized (model: {}, dimension: {})",
            llm_client::embedding::EMBEDDING_MODEL,
            embedder.dimension()
        );
        verify_dimension(embedder.as_ref(), config.embedding_dimension)
            .await
            .context("Embedding provider does not produce EMBEDDING_DIMENSION-sized vectors")?;

        let store: Arc<dyn VectorStore> = match &config.vector_store {
            VectorStoreBackend::Pinecone { api_key } => {
                info!("Vector store: Pinecone");
                Arc::new(PineconeStore::new(api_key.clone())?)
            }
            VectorStoreBackend::Memory => {
                warn!("Vector store: in-memory; indexed data is lost on exit");
                Arc::new(MemoryStore::new())
            }
        };

        for index in [&config.skills_index, &config.docs_index] {
            store
                .ensure_index(index, config.embedding_dimension, DistanceMetric::Cosine)
                .await?;
        }

        Ok(Self {
            llm,
            embedder,
            store,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruiter v{}", env!("CARGO_PKG_VERSION"));

    let services = Services::connect(&config).await?;
    let delay = Duration::from_millis(config.corpus_delay_ms);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, services).await,
        Commands::BuildSkills => {
            let report = build_skill_corpus(
                SKILL_TAXONOMY,
                services.embedder.as_ref(),
                services.store.as_ref(),
                &config.skills_index,
                delay,
            )
            .await;
            info!("Skill corpus: {report:?}");
            if report.indexed == 0 && report.failed > 0 {
                bail!("no skills were indexed");
            }
            Ok(())
        }
        Commands::BuildDocuments {
            path,
            id_field,
            text_field,
            limit,
        } => {
            let documents = load_documents(&path, &id_field, &text_field, limit).await?;
            let parser = LlmCvParser::new(services.llm.clone());
            let report = build_document_corpus(
                &documents,
                &parser,
                services.embedder.as_ref(),
                services.store.as_ref(),
                &config.docs_index,
                delay,
            )
            .await;
            info!("Document corpus: {report:?}");
            Ok(())
        }
        Commands::ClearIndex { index } => {
            services.store.clear(&index).await?;
            info!("Cleared index '{index}'");
            Ok(())
        }
    }
}

async fn serve(config: Config, services: Services) -> Result<()> {
    if config.vector_store == VectorStoreBackend::Memory {
        // Nothing persists between runs, so the taxonomy is seeded on every start.
        let report = build_skill_corpus(
            SKILL_TAXONOMY,
            services.embedder.as_ref(),
            services.store.as_ref(),
            &config.skills_index,
            Duration::ZERO,
        )
        .await;
        info!("Seeded in-memory skill corpus: {report:?}");
    }

    let skill_matcher = Arc::new(SkillMatcher::new(
        services.embedder.clone(),
        services.store.clone(),
        config.skills_index.clone(),
    ));
    let ranker = CandidateRanker::new(
        DatabaseRanker::new(
            skill_matcher.clone(),
            services.embedder.clone(),
            services.store.clone(),
            config.docs_index.clone(),
        ),
        LocalRanker::new(services.llm.clone(), services.embedder.clone()),
    );

    // Build app state
    let state = AppState {
        llm: services.llm,
        ranker: Arc::new(ranker),
        skill_matcher,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the recruiter UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
