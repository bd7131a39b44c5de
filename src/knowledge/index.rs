//! Vector index over the knowledge base.
//!
//! A thin consumer of the Ollama HTTP API: document text is split into
//! paragraph chunks, each chunk is embedded via `/api/embeddings`, and the
//! resulting vectors are persisted as JSON next to the documents. Queries
//! embed the question, rank chunks by cosine similarity, and hand the top
//! matches to `/api/generate` for an answer — falling back to printing the
//! raw excerpts when the generation endpoint is unavailable.
//!
//! Everything is synchronous (reqwest blocking) and bounded by the HTTP
//! timeout; failures surface as tagged in-band messages, never as panics.

use crate::config::Config;
use crate::plan::excerpt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

/// Target size of one indexed chunk, in characters.
const CHUNK_CHARS: usize = 1200;

/// How many chunks are retrieved for a query.
const TOP_K: usize = 3;

/// One embedded document chunk.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct IndexEntry {
    /// Source file, relative to the knowledge-base root.
    pub source: String,
    pub category: String,
    pub chunk: String,
    pub embedding: Vec<f32>,
}

/// The JSON-persisted vector index.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct VectorIndex {
    /// Embedding model the vectors were produced with.
    pub model: String,
    pub entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn path(config: &Config) -> PathBuf {
        config.paths.knowledge_base.join("index.json")
    }

    pub fn load(config: &Config) -> Result<VectorIndex, String> {
        let path = Self::path(config);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read index {}: {e}", path.display()))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse index {}: {e}", path.display()))
    }

    pub fn save(&self, config: &Config) -> Result<PathBuf, String> {
        let path = Self::path(config);
        let content =
            serde_json::to_string(self).map_err(|e| format!("Failed to encode index: {e}"))?;
        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write index {}: {e}", path.display()))?;
        Ok(path)
    }

    /// Entries ranked by cosine similarity to `query`, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<&IndexEntry> {
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query, &e.embedding), e))
            .collect();
        // Descending by similarity; ties keep index order for determinism.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(k).map(|(_, e)| e).collect()
    }
}

/// Cosine similarity of two vectors; 0.0 when either has no magnitude or the
/// dimensions disagree.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Splits text into paragraph-aligned chunks of roughly [`CHUNK_CHARS`].
///
/// Paragraph boundaries (blank lines) are preserved; a single oversized
/// paragraph becomes its own chunk rather than being split mid-sentence.
pub fn chunk_text(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        if !current.is_empty() && current.len() + paragraph.len() > CHUNK_CHARS {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn http_client(config: &Config) -> Result<reqwest::blocking::Client, String> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeouts.http_secs))
        .build()
        .map_err(|e| format!("HTTP client: {e}"))
}

/// Embeds `text` via the Ollama embeddings endpoint.
fn embed(
    client: &reqwest::blocking::Client,
    config: &Config,
    text: &str,
) -> Result<Vec<f32>, String> {
    let url = format!("{}/api/embeddings", config.ollama.base_url);
    let body = serde_json::json!({
        "model": config.ollama.embed_model,
        "prompt": text,
    });
    let response: serde_json::Value = client
        .post(&url)
        .json(&body)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| format!("Ollama embeddings request failed: {e}"))?
        .json()
        .map_err(|e| format!("Ollama embeddings response unreadable: {e}"))?;

    let Some(values) = response["embedding"].as_array() else {
        return Err("Ollama embeddings response missing `embedding`".to_string());
    };
    Ok(values
        .iter()
        .filter_map(|v| v.as_f64())
        .map(|v| v as f32)
        .collect())
}

/// Reads the indexable text of one knowledge-base file.
///
/// Markdown and plain text are read as-is; PDFs go through text extraction.
/// `None` means the file kind is not indexable (or yielded no text).
fn document_text(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let text = match ext.as_str() {
        "md" | "txt" => std::fs::read_to_string(path).ok()?,
        "pdf" => pdf_extract::extract_text(path).ok()?,
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Builds (or rebuilds) the vector index over every document under the
/// knowledge-base root and saves it as `index.json`.
///
/// Unreadable documents are skipped with a warning. Returns `Err` only when
/// the embeddings endpoint is unreachable or nothing could be indexed.
pub fn build_index(config: &Config) -> Result<VectorIndex, String> {
    let root = &config.paths.knowledge_base;
    let client = http_client(config)?;
    let mut entries = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.file_name().is_some_and(|n| n == "index.json") {
            continue;
        }
        let Some(text) = document_text(path) else {
            continue;
        };

        let source = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        let category = path
            .parent()
            .and_then(|p| p.strip_prefix(root).ok())
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        for chunk in chunk_text(&text) {
            let embedding = embed(&client, config, &chunk)?;
            entries.push(IndexEntry {
                source: source.clone(),
                category: category.clone(),
                chunk,
                embedding,
            });
        }
        tracing::info!("indexed {}", source);
    }

    if entries.is_empty() {
        return Err(format!(
            "No indexable documents under {} — run fetch-docs first",
            root.display()
        ));
    }

    let index = VectorIndex {
        model: config.ollama.embed_model.clone(),
        entries,
    };
    index.save(config)?;
    Ok(index)
}

/// Answers `query` against the knowledge base.
///
/// Never fails outward: a missing index, unreachable embeddings endpoint, or
/// failed generation all produce tagged in-band text. When generation is
/// unavailable the top-ranked excerpts are returned instead, so retrieval
/// alone still gives a useful answer.
pub fn ask(query: &str, config: &Config) -> String {
    let index = match VectorIndex::load(config) {
        Ok(i) => i,
        Err(e) => return format!("[Knowledge base index unavailable: {e}. Run fetch-docs first]"),
    };

    let client = match http_client(config) {
        Ok(c) => c,
        Err(e) => return format!("[{e}]"),
    };

    let query_embedding = match embed(&client, config, query) {
        Ok(v) => v,
        Err(e) => return format!("[{e}]"),
    };

    let top = index.search(&query_embedding, TOP_K);
    if top.is_empty() {
        return "[Knowledge base index is empty. Run fetch-docs first]".to_string();
    }

    let context: String = top
        .iter()
        .map(|e| format!("--- {} ---\n{}\n", e.source, e.chunk))
        .collect();

    match generate(&client, config, query, &context) {
        Ok(answer) => answer,
        Err(e) => {
            // Retrieval already worked; degrade to the raw excerpts.
            let mut out = format!("[{e} — showing the most relevant excerpts instead]\n\n");
            out.push_str(&context);
            out
        }
    }
}

fn generate(
    client: &reqwest::blocking::Client,
    config: &Config,
    query: &str,
    context: &str,
) -> Result<String, String> {
    let url = format!("{}/api/generate", config.ollama.base_url);
    let prompt = format!(
        "Answer the question using only the reference excerpts below.\n\n\
         Excerpts:\n{}\n\nQuestion: {query}\nAnswer:",
        excerpt(context, 6000),
    );
    let body = serde_json::json!({
        "model": config.ollama.chat_model,
        "prompt": prompt,
        "stream": false,
    });
    let response: serde_json::Value = client
        .post(&url)
        .json(&body)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| format!("Ollama generation failed: {e}"))?
        .json()
        .map_err(|e| format!("Ollama generation response unreadable: {e}"))?;

    response["response"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| "Ollama generation response missing `response`".to_string())
}
