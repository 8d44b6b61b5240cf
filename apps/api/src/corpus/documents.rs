//! Document corpus builder.
//!
//! Raw résumé records (CSV or JSON Lines) → CV parser → augmented chunk → embedding →
//! candidate documents index. Records that are too short or cannot be parsed are
//! skipped; the build never aborts on a single record.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::corpus::{index_document, CorpusReport};
use crate::llm_client::embedding::EmbeddingProvider;
use crate::matching::chunk::AugmentedChunk;
use crate::parsing::cv_parser::CvParser;
use crate::vector_store::{Metadata, VectorStore};

pub const DEFAULT_DOCUMENT_LIMIT: usize = 20;
/// Texts shorter than this are not worth a parse call.
pub const MIN_DOCUMENT_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub id: String,
    pub text: String,
}

fn field_as_string(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Reads up to `limit` records from a JSON Lines file. Blank lines are ignored.
/// A record without `id_field` gets `unknown_id_<n>` (n = 0-based record number).
pub async fn load_jsonl(
    path: &Path,
    id_field: &str,
    text_field: &str,
    limit: usize,
) -> Result<Vec<RawDocument>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut documents = Vec::new();
    for (line_no, line) in raw.lines().enumerate() {
        if documents.len() >= limit {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let record: Value = serde_json::from_str(line)
            .with_context(|| format!("{}:{} is not valid JSON", path.display(), line_no + 1))?;

        let index = documents.len();
        documents.push(RawDocument {
            id: field_as_string(&record, id_field).unwrap_or_else(|| format!("unknown_id_{index}")),
            text: field_as_string(&record, text_field).unwrap_or_default(),
        });
    }
    Ok(documents)
}

/// Reads up to `limit` rows from a CSV file with a header row. `id_field` and
/// `text_field` name columns; the text column must exist. A row with no (or an
/// empty) id gets `unknown_id_<n>` like the JSON Lines loader.
pub async fn load_csv(
    path: &Path,
    id_field: &str,
    text_field: &str,
    limit: usize,
) -> Result<Vec<RawDocument>> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw.as_slice());

    let headers = reader
        .headers()
        .with_context(|| format!("{} has no header row", path.display()))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let id_column = column(id_field);
    let Some(text_column) = column(text_field) else {
        bail!("{} has no '{text_field}' column", path.display());
    };

    let mut documents = Vec::new();
    for (row_no, row) in reader.records().enumerate() {
        if documents.len() >= limit {
            break;
        }
        let row = row.with_context(|| format!("{}: bad CSV row {}", path.display(), row_no + 1))?;

        let index = documents.len();
        let id = id_column
            .and_then(|c| row.get(c))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("unknown_id_{index}"));
        documents.push(RawDocument {
            id,
            text: row.get(text_column).unwrap_or_default().to_string(),
        });
    }
    Ok(documents)
}

/// Picks the loader from the file extension: `.csv` is CSV, anything else JSON Lines.
pub async fn load_documents(
    path: &Path,
    id_field: &str,
    text_field: &str,
    limit: usize,
) -> Result<Vec<RawDocument>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_csv(path, id_field, text_field, limit).await
    } else {
        load_jsonl(path, id_field, text_field, limit).await
    }
}

pub async fn build_document_corpus(
    documents: &[RawDocument],
    parser: &dyn CvParser,
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
    index: &str,
    delay: Duration,
) -> CorpusReport {
    let total = documents.len();
    info!("Processing {total} résumés into '{index}'");

    let mut report = CorpusReport::default();
    for (i, document) in documents.iter().enumerate() {
        if document.text.trim().chars().count() < MIN_DOCUMENT_CHARS {
            info!("Skipping {}: text too short", document.id);
            report.skipped += 1;
            continue;
        }

        let Some(cv) = parser.parse(&document.text).await else {
            info!("Skipping {}: extraction failed", document.id);
            report.skipped += 1;
            continue;
        };

        let content = AugmentedChunk::from_cv(&cv).encode();
        match index_document(embedder, store, index, &document.id, content, Metadata::new()).await
        {
            Ok(()) => {
                report.indexed += 1;
                info!("[{}/{total}] Indexed {}", i + 1, document.id);
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                report.failed += 1;
                warn!("Error indexing {}: {e}", document.id);
            }
        }
    }

    info!(
        "Document corpus build complete: {} indexed, {} skipped, {} failed",
        report.indexed, report.skipped, report.failed
    );
    report
}
