//! Bounded-concurrency artifact loading.
//!
//! The load pool is sized independently of the generation pool: its bound
//! is sink connection capacity, not CPU. Artifacts of one table load in any
//! order, concurrently; dependency order across tables is the
//! orchestrator's job. Every artifact is released on completion, whether
//! the load committed or failed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use omniseed_core::TableSpec;
use omniseed_synth::Artifact;

use crate::error::LoadError;
use crate::sink::Sink;

/// Stream the payload in 1 MiB chunks.
const STREAM_CHUNK_BYTES: usize = 1 << 20;

/// Options for the load pool.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Concurrent load sessions (bounded by sink connection capacity).
    pub workers: usize,
}

/// Outcome of loading one artifact.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub table: String,
    pub partition: u32,
    pub rows: u64,
    pub error: Option<String>,
}

impl LoadResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Load every artifact of one table into the sink. Failures are reported
/// per artifact and never retried implicitly; in-flight siblings run to
/// completion.
pub async fn load_table(
    spec: &TableSpec,
    artifacts: Vec<Artifact>,
    sink: Arc<dyn Sink>,
    options: &LoadOptions,
) -> Vec<LoadResult> {
    let started = Instant::now();
    let total = artifacts.len();
    info!(
        table = spec.name,
        artifacts = total,
        workers = options.workers,
        "loading table"
    );

    let semaphore = Arc::new(Semaphore::new(options.workers.max(1)));
    let completed = Arc::new(AtomicUsize::new(0));
    let columns: Arc<Vec<&'static str>> = Arc::new(spec.column_names());

    let mut tasks = FuturesUnordered::new();
    for artifact in artifacts {
        let semaphore = Arc::clone(&semaphore);
        let completed = Arc::clone(&completed);
        let columns = Arc::clone(&columns);
        let sink = Arc::clone(&sink);
        let table = spec.name;

        tasks.push(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => load_artifact(sink.as_ref(), table, &columns, &artifact).await,
                Err(_) => Err(LoadError::Rejected {
                    table: table.to_string(),
                    detail: "load pool closed".to_string(),
                }),
            };

            // Release the artifact on all exit paths; a leftover file is a
            // storage leak, not a retry opportunity.
            if let Err(error) = tokio::fs::remove_file(&artifact.path).await {
                warn!(
                    table,
                    path = %artifact.path.display(),
                    %error,
                    "failed to release artifact"
                );
            }

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done == total || done.is_multiple_of(10) {
                info!(table, completed = done, total, "load progress");
            } else {
                debug!(table, completed = done, total, "load progress");
            }

            match outcome {
                Ok(rows) => LoadResult {
                    table: table.to_string(),
                    partition: artifact.seq,
                    rows,
                    error: None,
                },
                Err(error) => {
                    warn!(
                        table,
                        partition = artifact.seq,
                        %error,
                        "artifact load failed"
                    );
                    LoadResult {
                        table: table.to_string(),
                        partition: artifact.seq,
                        rows: 0,
                        error: Some(error.to_string()),
                    }
                }
            }
        });
    }

    let mut results = Vec::with_capacity(total);
    while let Some(result) = tasks.next().await {
        results.push(result);
    }
    results.sort_by_key(|result| result.partition);

    let loaded = results.iter().filter(|result| result.is_success()).count();
    info!(
        table = spec.name,
        loaded,
        failed = total - loaded,
        duration_ms = started.elapsed().as_millis() as u64,
        "table load finished"
    );

    results
}

/// Stream one artifact through a fresh sink session: read, stream in
/// chunks, commit. The session is aborted if streaming fails.
async fn load_artifact(
    sink: &dyn Sink,
    table: &str,
    columns: &[&'static str],
    artifact: &Artifact,
) -> Result<u64, LoadError> {
    let payload = tokio::fs::read(&artifact.path).await?;
    let mut session = sink.begin_bulk_load(table, columns).await?;

    for chunk in payload.chunks(STREAM_CHUNK_BYTES) {
        if let Err(error) = session.stream(chunk).await {
            if let Err(abort_error) = session.abort().await {
                debug!(table, %abort_error, "session abort failed");
            }
            return Err(error);
        }
    }

    session.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniseed_core::Catalog;
    use omniseed_synth::artifact_path;

    fn roles_artifact(dir: &std::path::Path, seq: u32, body: &str) -> Artifact {
        let path = artifact_path(dir, "roles", seq);
        std::fs::write(&path, body).unwrap();
        Artifact {
            table: "roles".to_string(),
            seq,
            path,
            rows: body.lines().count() as u64 - 1,
            bytes: body.len() as u64,
        }
    }

    #[tokio::test]
    async fn artifacts_load_and_are_released() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = vec![
            roles_artifact(dir.path(), 0, "role_name,description\nrole_0,Role 0\n"),
            roles_artifact(dir.path(), 1, "role_name,description\nrole_1,Role 1\n"),
        ];
        let paths: Vec<_> = artifacts.iter().map(|a| a.path.clone()).collect();

        let catalog = Catalog::builtin();
        let spec = catalog.get("roles").unwrap();
        let sink = Arc::new(crate::sink::MemorySink::new());
        let results = load_table(spec, artifacts, sink.clone(), &LoadOptions { workers: 2 }).await;

        assert!(results.iter().all(LoadResult::is_success));
        assert_eq!(sink.row_count("roles"), 2);
        for path in paths {
            assert!(!path.exists(), "artifact not released: {}", path.display());
        }
    }

    #[tokio::test]
    async fn failed_artifact_is_reported_and_released() {
        let dir = tempfile::tempdir().unwrap();
        // Second record is missing a field; the memory sink rejects it.
        let artifacts = vec![roles_artifact(
            dir.path(),
            0,
            "role_name,description\nrole_0\n",
        )];
        let path = artifacts[0].path.clone();

        let catalog = Catalog::builtin();
        let spec = catalog.get("roles").unwrap();
        let sink = Arc::new(crate::sink::MemorySink::new());
        let results = load_table(spec, artifacts, sink.clone(), &LoadOptions { workers: 1 }).await;

        assert_eq!(results.len(), 1);
        assert!(!results[0].is_success());
        assert_eq!(sink.row_count("roles"), 0);
        assert!(!path.exists(), "failed artifact must still be released");
    }
}
