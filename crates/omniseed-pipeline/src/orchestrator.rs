//! The orchestrator: tables move through
//! `Pending -> Generating -> Generated -> Loading -> Loaded` (or `Failed`)
//! in the catalog's declared order. Validation of that order against the
//! dependency graph happens before any work; a failed table halts its
//! descendants while independent tables continue, unless fail-fast mode
//! stops the whole run.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use omniseed_core::{Catalog, SizingMap, SynthStrategy, TableSpec, validate_catalog};
use omniseed_load::{LoadOptions, Sink, load_table};
use omniseed_synth::{GenerateOptions, TableGeneration, generate_table};

use crate::error::RunError;
use crate::report::{RunReport, Stage, TableRun, TableStatus};

/// Options for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub out_dir: PathBuf,
    /// CPU-bound generation pool size.
    pub gen_workers: usize,
    /// Sink-bound load pool size; independent of `gen_workers`.
    pub load_workers: usize,
    pub run_seed: u64,
    /// Per-table synthesis strategy overrides; unlisted tables run indexed.
    pub strategies: BTreeMap<String, SynthStrategy>,
    /// Truncate all catalog tables (dependents first) before loading.
    pub truncate_first: bool,
    /// Stop scheduling further tables after the first failure.
    pub fail_fast: bool,
}

impl PipelineOptions {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            gen_workers: omniseed_synth::default_workers(),
            load_workers: omniseed_synth::default_workers(),
            run_seed: 0,
            strategies: BTreeMap::new(),
            truncate_first: false,
            fail_fast: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableState {
    Pending,
    Generating,
    Generated,
    Loading,
    Loaded,
    Failed,
    Skipped,
}

/// Drives the catalog through generation and load against one sink.
pub struct Pipeline {
    catalog: Catalog,
    sizing: SizingMap,
    sink: Arc<dyn Sink>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        catalog: Catalog,
        sizing: SizingMap,
        sink: Arc<dyn Sink>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            catalog,
            sizing,
            sink,
            options,
        }
    }

    /// Generate and load every table in dependency order.
    pub async fn run(&self) -> Result<RunReport, RunError> {
        validate_catalog(&self.catalog)?;
        std::fs::create_dir_all(&self.options.out_dir)?;

        if self.options.truncate_first {
            self.sink.truncate(&self.catalog.reverse_order()).await?;
        }

        let started = Instant::now();
        let mut states: BTreeMap<&str, TableState> = self
            .catalog
            .tables()
            .iter()
            .map(|table| (table.name, TableState::Pending))
            .collect();
        let mut tables = Vec::with_capacity(self.catalog.load_order().len());
        let mut halted_by: Option<String> = None;

        for name in self.catalog.load_order() {
            let spec = self
                .catalog
                .get(name)
                .ok_or_else(|| omniseed_core::CatalogError::UnknownTable((*name).to_string()))?;

            if let Some(source) = &halted_by {
                states.insert(spec.name, TableState::Skipped);
                tables.push(skipped(spec.name, source.clone()));
                continue;
            }

            if let Some(upstream) = spec
                .predecessors
                .iter()
                .find(|predecessor| states.get(**predecessor) != Some(&TableState::Loaded))
            {
                warn!(table = spec.name, upstream, "skipping table, upstream not loaded");
                states.insert(spec.name, TableState::Skipped);
                tables.push(skipped(spec.name, (*upstream).to_string()));
                continue;
            }

            let run = self.run_table(spec, &mut states).await;
            let failed = matches!(run.status, TableStatus::Failed { .. });
            tables.push(run);

            if failed && self.options.fail_fast {
                warn!(table = spec.name, "fail-fast: halting run");
                halted_by = Some(spec.name.to_string());
            }
        }

        let report = self.finish_report(tables, started)?;
        Ok(report)
    }

    /// Generate every table without loading; artifacts are kept on disk.
    pub async fn generate_only(&self) -> Result<RunReport, RunError> {
        validate_catalog(&self.catalog)?;
        std::fs::create_dir_all(&self.options.out_dir)?;

        let started = Instant::now();
        let mut tables = Vec::with_capacity(self.catalog.load_order().len());

        for name in self.catalog.load_order() {
            let spec = self
                .catalog
                .get(name)
                .ok_or_else(|| omniseed_core::CatalogError::UnknownTable((*name).to_string()))?;
            let table_started = Instant::now();

            match self.generate(spec).await {
                Ok(generation) => {
                    let completed = generation.artifacts.len() as u32;
                    let planned = completed + generation.failures.len() as u32;
                    let status = if generation.is_complete() {
                        TableStatus::Generated
                    } else {
                        TableStatus::Failed {
                            stage: Stage::Generate,
                            detail: failure_detail(&generation),
                        }
                    };
                    tables.push(TableRun {
                        table: spec.name.to_string(),
                        status,
                        partitions: planned,
                        partitions_completed: completed,
                        rows: generation.rows(),
                        duration_ms: table_started.elapsed().as_millis() as u64,
                    });
                }
                Err(error) => tables.push(TableRun {
                    table: spec.name.to_string(),
                    status: TableStatus::Failed {
                        stage: Stage::Generate,
                        detail: error.to_string(),
                    },
                    partitions: 0,
                    partitions_completed: 0,
                    rows: 0,
                    duration_ms: table_started.elapsed().as_millis() as u64,
                }),
            }
        }

        let report = self.finish_report(tables, started)?;
        Ok(report)
    }

    /// Generate then load one table, tracking its state transitions.
    async fn run_table(&self, spec: &TableSpec, states: &mut BTreeMap<&str, TableState>) -> TableRun {
        let table_started = Instant::now();
        states.insert(spec.name, TableState::Generating);
        debug!(table = spec.name, "state -> generating");

        let generation = match self.generate(spec).await {
            Ok(generation) => generation,
            Err(error) => {
                states.insert(spec.name, TableState::Failed);
                return TableRun {
                    table: spec.name.to_string(),
                    status: TableStatus::Failed {
                        stage: Stage::Generate,
                        detail: error.to_string(),
                    },
                    partitions: 0,
                    partitions_completed: 0,
                    rows: 0,
                    duration_ms: table_started.elapsed().as_millis() as u64,
                };
            }
        };

        let completed = generation.artifacts.len() as u32;
        let planned = completed + generation.failures.len() as u32;

        if !generation.is_complete() {
            // Dependents assume full predecessor counts; partial data is
            // released, not loaded.
            generation.release_artifacts();
            states.insert(spec.name, TableState::Failed);
            return TableRun {
                table: spec.name.to_string(),
                status: TableStatus::Failed {
                    stage: Stage::Generate,
                    detail: failure_detail(&generation),
                },
                partitions: planned,
                partitions_completed: completed,
                rows: 0,
                duration_ms: table_started.elapsed().as_millis() as u64,
            };
        }

        states.insert(spec.name, TableState::Generated);
        states.insert(spec.name, TableState::Loading);
        debug!(table = spec.name, "state -> loading");

        let results = load_table(
            spec,
            generation.artifacts,
            Arc::clone(&self.sink),
            &LoadOptions {
                workers: self.options.load_workers,
            },
        )
        .await;

        let loaded = results.iter().filter(|result| result.is_success()).count() as u32;
        let rows: u64 = results.iter().map(|result| result.rows).sum();
        let first_error = results
            .iter()
            .find_map(|result| result.error.clone());

        if let Some(detail) = first_error {
            states.insert(spec.name, TableState::Failed);
            TableRun {
                table: spec.name.to_string(),
                status: TableStatus::Failed {
                    stage: Stage::Load,
                    detail,
                },
                partitions: planned,
                partitions_completed: loaded,
                rows,
                duration_ms: table_started.elapsed().as_millis() as u64,
            }
        } else {
            states.insert(spec.name, TableState::Loaded);
            info!(
                table = spec.name,
                rows,
                duration_ms = table_started.elapsed().as_millis() as u64,
                "table loaded"
            );
            TableRun {
                table: spec.name.to_string(),
                status: TableStatus::Loaded,
                partitions: planned,
                partitions_completed: loaded,
                rows,
                duration_ms: table_started.elapsed().as_millis() as u64,
            }
        }
    }

    async fn generate(&self, spec: &TableSpec) -> Result<TableGeneration, omniseed_synth::SynthError> {
        let strategy = self
            .options
            .strategies
            .get(spec.name)
            .copied()
            .unwrap_or_default();
        let options = GenerateOptions {
            out_dir: self.options.out_dir.clone(),
            workers: self.options.gen_workers,
            strategy,
            run_seed: self.options.run_seed,
        };
        generate_table(spec, &self.sizing, &options).await
    }

    fn finish_report(
        &self,
        tables: Vec<TableRun>,
        started: Instant,
    ) -> Result<RunReport, RunError> {
        let report = RunReport {
            seed: self.options.run_seed,
            rows_total: tables.iter().map(|table| table.rows).sum(),
            duration_ms: started.elapsed().as_millis() as u64,
            tables,
        };

        report.write_json(&self.options.out_dir.join("run_report.json"))?;

        let loaded = count_status(&report, |status| {
            matches!(status, TableStatus::Loaded | TableStatus::Generated)
        });
        let failed = count_status(&report, |status| matches!(status, TableStatus::Failed { .. }));
        let skipped = count_status(&report, |status| matches!(status, TableStatus::Skipped { .. }));
        info!(
            seed = report.seed,
            loaded,
            failed,
            skipped,
            rows = report.rows_total,
            duration_ms = report.duration_ms,
            "run finished"
        );
        Ok(report)
    }
}

fn count_status(report: &RunReport, matches: impl Fn(&TableStatus) -> bool) -> usize {
    report
        .tables
        .iter()
        .filter(|table| matches(&table.status))
        .count()
}

fn skipped(table: &str, upstream: String) -> TableRun {
    TableRun {
        table: table.to_string(),
        status: TableStatus::Skipped { upstream },
        partitions: 0,
        partitions_completed: 0,
        rows: 0,
        duration_ms: 0,
    }
}

fn failure_detail(generation: &TableGeneration) -> String {
    let first = generation
        .failures
        .first()
        .map(|failure| failure.error.clone())
        .unwrap_or_else(|| "unknown partition failure".to_string());
    format!(
        "{} of {} partitions failed; first: {first}",
        generation.failures.len(),
        generation.failures.len() + generation.artifacts.len()
    )
}
