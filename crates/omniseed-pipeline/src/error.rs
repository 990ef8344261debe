use thiserror::Error;

use omniseed_core::CatalogError;
use omniseed_load::LoadError;

/// Run-level failures: static validation, sink setup, report output.
/// Per-table failures are reported in the run report, not here.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("sink error: {0}")]
    Sink(#[from] LoadError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
