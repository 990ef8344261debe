use std::path::Path;

use serde::Serialize;

/// Pipeline stage a table failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Generate,
    Load,
}

/// Final status of one table in a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableStatus {
    /// Generated and fully loaded.
    Loaded,
    /// Generated without loading (generate-only runs).
    Generated,
    Failed { stage: Stage, detail: String },
    /// Not attempted because `upstream` did not load.
    Skipped { upstream: String },
}

/// Per-table run outcome.
#[derive(Debug, Clone, Serialize)]
pub struct TableRun {
    pub table: String,
    #[serde(flatten)]
    pub status: TableStatus,
    pub partitions: u32,
    pub partitions_completed: u32,
    pub rows: u64,
    pub duration_ms: u64,
}

/// Aggregated outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub tables: Vec<TableRun>,
    pub rows_total: u64,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn table(&self, name: &str) -> Option<&TableRun> {
        self.tables.iter().find(|table| table.table == name)
    }

    pub fn is_success(&self) -> bool {
        self.tables.iter().all(|table| {
            matches!(table.status, TableStatus::Loaded | TableStatus::Generated)
        })
    }

    pub fn write_json(&self, path: &Path) -> Result<(), crate::error::RunError> {
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}
