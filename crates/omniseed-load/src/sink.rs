//! The sink seam: bulk-ingest target consumed by the loader.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::LoadError;

/// Destination store for bulk loads. One session per concurrent load
/// operation; sessions commit or reject atomically per partition.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Open a bulk-load session for `table` with the given column list.
    async fn begin_bulk_load(
        &self,
        table: &str,
        columns: &[&str],
    ) -> Result<Box<dyn LoadSession>, LoadError>;

    /// Remove existing rows from `tables`, dependents first.
    async fn truncate(&self, tables: &[String]) -> Result<(), LoadError>;
}

/// One in-flight bulk-load session.
#[async_trait]
pub trait LoadSession: Send {
    /// Stream a chunk of header-described, delimiter-separated records.
    async fn stream(&mut self, chunk: &[u8]) -> Result<(), LoadError>;

    /// Commit the streamed rows; returns the number of rows ingested.
    async fn commit(self: Box<Self>) -> Result<u64, LoadError>;

    /// Abandon the session, discarding everything streamed so far.
    async fn abort(self: Box<Self>) -> Result<(), LoadError>;
}

/// In-memory sink: parses committed CSV payloads and keeps the records per
/// table. Backs `--dry-run` and the test suites.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: Arc<Mutex<BTreeMap<String, Vec<Vec<String>>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self, table: &str) -> u64 {
        self.tables
            .lock()
            .ok()
            .and_then(|tables| tables.get(table).map(|rows| rows.len() as u64))
            .unwrap_or(0)
    }

    pub fn rows(&self, table: &str) -> Vec<Vec<String>> {
        self.tables
            .lock()
            .ok()
            .and_then(|tables| tables.get(table).cloned())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn begin_bulk_load(
        &self,
        table: &str,
        columns: &[&str],
    ) -> Result<Box<dyn LoadSession>, LoadError> {
        Ok(Box::new(MemorySession {
            tables: Arc::clone(&self.tables),
            table: table.to_string(),
            column_count: columns.len(),
            buffer: Vec::new(),
        }))
    }

    async fn truncate(&self, tables: &[String]) -> Result<(), LoadError> {
        let mut state = self
            .tables
            .lock()
            .map_err(|_| poisoned("truncate"))?;
        for table in tables {
            state.remove(table);
        }
        Ok(())
    }
}

struct MemorySession {
    tables: Arc<Mutex<BTreeMap<String, Vec<Vec<String>>>>>,
    table: String,
    column_count: usize,
    buffer: Vec<u8>,
}

#[async_trait]
impl LoadSession for MemorySession {
    async fn stream(&mut self, chunk: &[u8]) -> Result<(), LoadError> {
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<u64, LoadError> {
        let session = *self;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(session.buffer.as_slice());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|error| LoadError::Rejected {
                table: session.table.clone(),
                detail: error.to_string(),
            })?;
            if record.len() != session.column_count {
                return Err(LoadError::Rejected {
                    table: session.table.clone(),
                    detail: format!(
                        "expected {} fields, found {}",
                        session.column_count,
                        record.len()
                    ),
                });
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        let count = rows.len() as u64;
        let mut state = session
            .tables
            .lock()
            .map_err(|_| poisoned(&session.table))?;
        state.entry(session.table).or_default().extend(rows);
        Ok(count)
    }

    async fn abort(self: Box<Self>) -> Result<(), LoadError> {
        Ok(())
    }
}

fn poisoned(table: &str) -> LoadError {
    LoadError::Rejected {
        table: table.to_string(),
        detail: "sink state poisoned".to_string(),
    }
}
