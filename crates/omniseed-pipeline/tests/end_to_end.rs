use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use omniseed_core::{Catalog, CatalogError, ColumnSpec, SizingMap, TableSizing, TableSpec, ValueSpec};
use omniseed_load::{LoadError, LoadSession, MemorySink, Sink};
use omniseed_pipeline::{Pipeline, PipelineOptions, RunError, Stage, TableStatus};

/// Shrink every table so a full-catalog run stays fast, then apply the
/// scenario-specific sizes.
fn tiny_sizing(catalog: &Catalog) -> SizingMap {
    catalog
        .tables()
        .iter()
        .map(|table| {
            (
                table.name.to_string(),
                TableSizing {
                    rows: table.default_rows.min(12),
                    partition_size: 5,
                },
            )
        })
        .collect()
}

fn pipeline_options(out_dir: std::path::PathBuf) -> PipelineOptions {
    let mut options = PipelineOptions::new(out_dir);
    options.gen_workers = 4;
    options.load_workers = 2;
    options
}

#[tokio::test]
async fn roles_load_as_a_single_partition_with_unique_names() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin();
    let mut sizing = tiny_sizing(&catalog);
    sizing.insert(
        "roles".to_string(),
        TableSizing {
            rows: 5,
            partition_size: 5,
        },
    );

    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::new(
        catalog,
        sizing,
        sink.clone(),
        pipeline_options(dir.path().to_path_buf()),
    );
    let report = pipeline.run().await.unwrap();

    let roles = report.table("roles").unwrap();
    assert_eq!(roles.status, TableStatus::Loaded);
    assert_eq!(roles.partitions, 1);
    assert_eq!(roles.rows, 5);

    let names: Vec<String> = sink
        .rows("roles")
        .iter()
        .map(|row| row[0].clone())
        .collect();
    assert_eq!(
        names,
        vec!["role_0", "role_1", "role_2", "role_3", "role_4"]
    );
}

#[tokio::test]
async fn orderitems_split_into_three_partitions_with_bounded_variant_ids() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin();
    let mut sizing = tiny_sizing(&catalog);
    sizing.insert(
        "orderitems".to_string(),
        TableSizing {
            rows: 13,
            partition_size: 5,
        },
    );
    let variant_rows = sizing.get("productvariants").unwrap().rows;

    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::new(
        catalog,
        sizing,
        sink.clone(),
        pipeline_options(dir.path().to_path_buf()),
    );
    let report = pipeline.run().await.unwrap();

    let orderitems = report.table("orderitems").unwrap();
    assert_eq!(orderitems.status, TableStatus::Loaded);
    assert_eq!(orderitems.partitions, 3);
    assert_eq!(orderitems.rows, 13);

    for row in sink.rows("orderitems") {
        let variant_id: u64 = row[1].parse().unwrap();
        assert!(
            (1..=variant_rows).contains(&variant_id),
            "variant_id {variant_id} outside [1, {variant_rows}]"
        );
    }
}

#[tokio::test]
async fn run_releases_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin();
    let sizing = tiny_sizing(&catalog);

    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::new(
        catalog,
        sizing,
        sink,
        pipeline_options(dir.path().to_path_buf()),
    );
    let report = pipeline.run().await.unwrap();
    assert!(report.is_success());

    let leftover: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|extension| extension == "csv")
        })
        .collect();
    assert!(leftover.is_empty(), "artifacts leaked: {leftover:?}");
}

#[tokio::test]
async fn rerun_after_truncate_yields_identical_row_counts() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin();
    let sizing = tiny_sizing(&catalog);
    let sink = Arc::new(MemorySink::new());

    let mut options = pipeline_options(dir.path().to_path_buf());
    options.truncate_first = true;

    let pipeline = Pipeline::new(catalog, sizing, sink.clone(), options);
    let first = pipeline.run().await.unwrap();
    let first_count = sink.row_count("orders");
    assert!(first.is_success());
    assert!(first_count > 0);

    // Re-running without truncation would duplicate rows; the pipeline
    // truncates dependents-first and lands on the same counts.
    let second = pipeline.run().await.unwrap();
    assert!(second.is_success());
    assert_eq!(sink.row_count("orders"), first_count);
    assert_eq!(first.rows_total, second.rows_total);
}

#[tokio::test]
async fn cyclic_catalog_fails_before_any_work() {
    const ID_ONLY: &[ColumnSpec] = &[ColumnSpec::new(
        "name",
        ValueSpec::Sequence {
            prefix: "row",
            width: 0,
        },
    )];
    let catalog = Catalog::new(
        vec![
            TableSpec {
                name: "a",
                columns: ID_ONLY,
                default_rows: 1,
                default_partition_size: 1,
                predecessors: &["b"],
            },
            TableSpec {
                name: "b",
                columns: ID_ONLY,
                default_rows: 1,
                default_partition_size: 1,
                predecessors: &["a"],
            },
        ],
        vec!["a", "b"],
    );
    let sizing = catalog.sizing();

    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::new(
        catalog,
        sizing,
        sink.clone(),
        pipeline_options(dir.path().to_path_buf()),
    );

    match pipeline.run().await {
        Err(RunError::Catalog(CatalogError::DependencyCycle(_))) => {}
        other => panic!("expected dependency cycle error, got {other:?}"),
    }
    assert_eq!(sink.row_count("a"), 0);
    assert_eq!(sink.row_count("b"), 0);
}

/// Sink wrapper that fails the nth session opened for one table.
#[derive(Clone)]
struct FailingSink {
    inner: MemorySink,
    fail_table: &'static str,
    fail_session: usize,
    sessions: Arc<AtomicUsize>,
}

impl FailingSink {
    fn new(inner: MemorySink, fail_table: &'static str, fail_session: usize) -> Self {
        Self {
            inner,
            fail_table,
            fail_session,
            sessions: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Sink for FailingSink {
    async fn begin_bulk_load(
        &self,
        table: &str,
        columns: &[&str],
    ) -> Result<Box<dyn LoadSession>, LoadError> {
        if table == self.fail_table {
            let session = self.sessions.fetch_add(1, Ordering::SeqCst) + 1;
            if session == self.fail_session {
                return Ok(Box::new(RejectingSession {
                    table: table.to_string(),
                }));
            }
        }
        self.inner.begin_bulk_load(table, columns).await
    }

    async fn truncate(&self, tables: &[String]) -> Result<(), LoadError> {
        self.inner.truncate(tables).await
    }
}

struct RejectingSession {
    table: String,
}

#[async_trait]
impl LoadSession for RejectingSession {
    async fn stream(&mut self, _chunk: &[u8]) -> Result<(), LoadError> {
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<u64, LoadError> {
        Err(LoadError::Rejected {
            table: self.table,
            detail: "injected load failure".to_string(),
        })
    }

    async fn abort(self: Box<Self>) -> Result<(), LoadError> {
        Ok(())
    }
}

#[tokio::test]
async fn orders_load_failure_skips_dependents_but_not_independents() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin();
    let sizing = tiny_sizing(&catalog);

    let memory = MemorySink::new();
    let sink = Arc::new(FailingSink::new(memory.clone(), "orders", 2));

    let mut options = pipeline_options(dir.path().to_path_buf());
    options.load_workers = 1;

    let pipeline = Pipeline::new(catalog, sizing, sink, options);
    let report = pipeline.run().await.unwrap();

    let orders = report.table("orders").unwrap();
    assert!(
        matches!(
            &orders.status,
            TableStatus::Failed {
                stage: Stage::Load,
                ..
            }
        ),
        "orders should fail at load: {:?}",
        orders.status
    );

    let payments = report.table("payments").unwrap();
    assert_eq!(
        payments.status,
        TableStatus::Skipped {
            upstream: "orders".to_string()
        }
    );

    let deliveries = report.table("deliveryshipments").unwrap();
    assert!(matches!(&deliveries.status, TableStatus::Skipped { .. }));

    // Tables independent of orders complete normally.
    let warehouses = report.table("warehouses").unwrap();
    assert_eq!(warehouses.status, TableStatus::Loaded);
    assert_eq!(memory.row_count("warehouses"), 10);
    let qualitychecks = report.table("qualitychecks").unwrap();
    assert_eq!(qualitychecks.status, TableStatus::Loaded);
}

#[tokio::test]
async fn fail_fast_halts_remaining_tables() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin();
    let sizing = tiny_sizing(&catalog);

    let memory = MemorySink::new();
    let sink = Arc::new(FailingSink::new(memory.clone(), "categories", 1));

    let mut options = pipeline_options(dir.path().to_path_buf());
    options.fail_fast = true;

    let pipeline = Pipeline::new(catalog, sizing, sink, options);
    let report = pipeline.run().await.unwrap();

    let categories = report.table("categories").unwrap();
    assert!(matches!(&categories.status, TableStatus::Failed { .. }));

    // Everything after the failure is reported skipped, even tables that do
    // not depend on categories.
    let users = report.table("users").unwrap();
    assert!(matches!(&users.status, TableStatus::Skipped { .. }));
    assert_eq!(memory.row_count("users"), 0);
}

#[tokio::test]
async fn generate_only_keeps_artifacts_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin();
    let mut sizing = tiny_sizing(&catalog);
    sizing.insert(
        "roles".to_string(),
        TableSizing {
            rows: 5,
            partition_size: 5,
        },
    );

    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::new(
        catalog,
        sizing,
        sink,
        pipeline_options(dir.path().to_path_buf()),
    );
    let report = pipeline.generate_only().await.unwrap();
    assert!(report.is_success());

    let roles = report.table("roles").unwrap();
    assert_eq!(roles.status, TableStatus::Generated);
    assert!(dir.path().join("roles_000.csv").exists());
}
