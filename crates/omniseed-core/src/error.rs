use thiserror::Error;

/// Errors raised by static catalog validation and partition planning.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The declared dependency graph contains a cycle; reported before any
    /// generation or load work starts.
    #[error("dependency cycle among tables: {0:?}")]
    DependencyCycle(Vec<String>),
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("load order places '{table}' before its predecessor '{predecessor}'")]
    OrderViolation { table: String, predecessor: String },
    #[error("table '{0}' is missing from the load order")]
    MissingFromOrder(String),
    #[error("partition size must be positive for table '{0}'")]
    InvalidPartitionSize(String),
}
