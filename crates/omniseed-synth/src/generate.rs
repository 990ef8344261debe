//! Bounded-parallelism partition generation.
//!
//! Each partition is synthesized and written by an independent blocking
//! worker; a semaphore caps concurrency at the configured CPU-bound pool
//! size. Workers share no mutable state, and a failed partition is caught
//! at the worker boundary and reported alongside the partitions that
//! succeeded.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use omniseed_core::{Partition, SizingMap, SynthStrategy, TableSpec, plan_partitions};

use crate::artifact::{Artifact, PartitionWriter, artifact_path};
use crate::error::SynthError;
use crate::row::{RowPlan, table_seed};

/// Options for the generation pool.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory where partition artifacts are written.
    pub out_dir: PathBuf,
    /// Concurrent generation workers (CPU-bound pool).
    pub workers: usize,
    pub strategy: SynthStrategy,
    pub run_seed: u64,
}

impl GenerateOptions {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            workers: default_workers(),
            strategy: SynthStrategy::Indexed,
            run_seed: 0,
        }
    }
}

/// Default pool size: one worker per logical core, capped at eight.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(4)
        .min(8)
}

/// A partition whose synthesis or artifact write failed.
#[derive(Debug, Clone)]
pub struct PartitionFailure {
    pub seq: u32,
    pub start: u64,
    pub end: u64,
    pub error: String,
}

/// Outcome of generating one table: the artifacts that materialized plus
/// any partition failures.
#[derive(Debug)]
pub struct TableGeneration {
    pub table: String,
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<PartitionFailure>,
}

impl TableGeneration {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn rows(&self) -> u64 {
        self.artifacts.iter().map(|artifact| artifact.rows).sum()
    }

    /// Release every artifact that did materialize. Used when the table is
    /// aborted so partial output never leaks intermediate storage.
    pub fn release_artifacts(&self) {
        for artifact in &self.artifacts {
            if let Err(error) = artifact.release() {
                warn!(
                    table = %self.table,
                    path = %artifact.path.display(),
                    %error,
                    "failed to release artifact"
                );
            }
        }
    }
}

/// Generate every partition of `spec` into CSV artifacts.
pub async fn generate_table(
    spec: &TableSpec,
    sizing: &SizingMap,
    options: &GenerateOptions,
) -> Result<TableGeneration, SynthError> {
    let entry = sizing.get(spec.name).ok_or_else(|| {
        SynthError::Synthesis(format!("no sizing entry for table '{}'", spec.name))
    })?;
    let partitions = plan_partitions(spec.name, entry.rows, entry.partition_size)?;
    let plan = RowPlan::new(
        spec,
        sizing,
        options.strategy,
        table_seed(options.run_seed, spec.name),
    )?;

    std::fs::create_dir_all(&options.out_dir)?;

    let started = Instant::now();
    let total = partitions.len();
    info!(
        table = spec.name,
        rows = entry.rows,
        partitions = total,
        partition_size = entry.partition_size,
        workers = options.workers,
        "generating table"
    );

    let semaphore = Arc::new(Semaphore::new(options.workers.max(1)));
    let completed = Arc::new(AtomicUsize::new(0));
    let columns: Arc<Vec<&'static str>> = Arc::new(spec.column_names());

    let mut tasks = FuturesUnordered::new();
    for partition in partitions {
        let semaphore = Arc::clone(&semaphore);
        let completed = Arc::clone(&completed);
        let columns = Arc::clone(&columns);
        let plan = plan.clone();
        let path = artifact_path(&options.out_dir, spec.name, partition.seq);
        let table = spec.name;

        tasks.push(async move {
            let (seq, start, end) = (partition.seq, partition.start, partition.end);
            let permit = semaphore.acquire_owned().await;
            let outcome = match permit {
                Ok(_permit) => {
                    let joined = tokio::task::spawn_blocking(move || {
                        write_partition(&plan, &columns, &partition, &path)
                    })
                    .await;
                    match joined {
                        Ok(Ok(artifact)) => Ok(artifact),
                        Ok(Err(error)) => Err(PartitionFailure {
                            seq,
                            start,
                            end,
                            error: error.to_string(),
                        }),
                        Err(join_error) => Err(PartitionFailure {
                            seq,
                            start,
                            end,
                            error: format!("generation worker panicked: {join_error}"),
                        }),
                    }
                }
                Err(_) => Err(PartitionFailure {
                    seq,
                    start,
                    end,
                    error: "generation pool closed".to_string(),
                }),
            };

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done == total || done.is_multiple_of(10) {
                info!(table, completed = done, total, "generation progress");
            } else {
                debug!(table, completed = done, total, "generation progress");
            }
            outcome
        });
    }

    let mut artifacts = Vec::new();
    let mut failures = Vec::new();
    while let Some(result) = tasks.next().await {
        match result {
            Ok(artifact) => artifacts.push(artifact),
            Err(failure) => {
                warn!(
                    table = spec.name,
                    partition = failure.seq,
                    error = %failure.error,
                    "partition generation failed"
                );
                failures.push(failure);
            }
        }
    }

    artifacts.sort_by_key(|artifact| artifact.seq);
    failures.sort_by_key(|failure| failure.seq);

    info!(
        table = spec.name,
        artifacts = artifacts.len(),
        failed = failures.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "table generated"
    );

    Ok(TableGeneration {
        table: spec.name.to_string(),
        artifacts,
        failures,
    })
}

/// Synthesize one partition into its artifact file. Runs on a blocking
/// worker; a failure removes the partial file before returning.
fn write_partition(
    plan: &RowPlan,
    columns: &[&str],
    partition: &Partition,
    path: &Path,
) -> Result<Artifact, SynthError> {
    let result = (|| {
        let mut writer = PartitionWriter::create(path, columns)?;
        for index in partition.start..partition.end {
            writer.write_row(&plan.row(index))?;
        }
        writer.finish()
    })();

    match result {
        Ok((rows, bytes)) => Ok(Artifact {
            table: partition.table.clone(),
            seq: partition.seq,
            path: path.to_path_buf(),
            rows,
            bytes,
        }),
        Err(error) => {
            let _ = std::fs::remove_file(path);
            Err(error)
        }
    }
}
