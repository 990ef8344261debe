use thiserror::Error;

/// Errors emitted while loading artifacts into the sink.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A load session could not be established.
    #[error("sink connection failed: {0}")]
    Connection(#[source] sqlx::Error),
    /// The sink rejected a streamed batch (constraint violation, malformed
    /// record).
    #[error("sink rejected batch for '{table}': {detail}")]
    Rejected { table: String, detail: String },
    #[error("artifact io error: {0}")]
    ArtifactIo(#[from] std::io::Error),
}
