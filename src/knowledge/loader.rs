//! Reference-document downloads.
//!
//! Fetches every catalogue entry into `<knowledge_base>/<category>/<name>.<ext>`.
//! Files that already exist are skipped, each request is bounded by the HTTP
//! timeout, and per-document failures are recorded in the returned outcomes —
//! one bad URL never aborts the rest of the batch.

use crate::config::Config;
use crate::knowledge::catalogue::{catalogue, DocSource};
use std::path::PathBuf;
use std::time::Duration;

/// What happened to one catalogue entry.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Downloaded,
    AlreadyPresent,
    Failed(String),
}

/// Per-document download outcome.
#[derive(Debug)]
pub struct FetchOutcome {
    pub name: &'static str,
    pub path: PathBuf,
    pub status: FetchStatus,
}

/// Destination path for a catalogue entry under the configured root.
pub fn destination(config: &Config, source: &DocSource) -> PathBuf {
    config
        .paths
        .knowledge_base
        .join(source.category)
        .join(source.file_name())
}

/// Downloads the whole catalogue, returning one outcome per entry.
pub fn download_all(config: &Config) -> Vec<FetchOutcome> {
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeouts.http_secs))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            // Without a client nothing can be fetched; report the same
            // failure for every entry rather than panicking.
            return catalogue()
                .iter()
                .map(|s| FetchOutcome {
                    name: s.name,
                    path: destination(config, s),
                    status: FetchStatus::Failed(format!("HTTP client: {e}")),
                })
                .collect();
        }
    };

    catalogue()
        .iter()
        .map(|source| {
            let path = destination(config, source);
            let status = fetch_one(&client, source, &path);
            FetchOutcome {
                name: source.name,
                path,
                status,
            }
        })
        .collect()
}

fn fetch_one(
    client: &reqwest::blocking::Client,
    source: &DocSource,
    path: &std::path::Path,
) -> FetchStatus {
    if path.exists() {
        tracing::info!("already present: {}", path.display());
        return FetchStatus::AlreadyPresent;
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return FetchStatus::Failed(format!("create {}: {e}", parent.display()));
        }
    }

    tracing::info!("downloading {} from {}", source.name, source.url);
    let response = match client.get(source.url).send().and_then(|r| r.error_for_status()) {
        Ok(r) => r,
        Err(e) => return FetchStatus::Failed(e.to_string()),
    };
    let bytes = match response.bytes() {
        Ok(b) => b,
        Err(e) => return FetchStatus::Failed(e.to_string()),
    };
    match std::fs::write(path, &bytes) {
        Ok(()) => FetchStatus::Downloaded,
        Err(e) => FetchStatus::Failed(format!("write {}: {e}", path.display())),
    }
}
