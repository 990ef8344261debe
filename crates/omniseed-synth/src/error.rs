use thiserror::Error;

use omniseed_core::CatalogError;

/// Errors emitted while synthesizing rows or writing artifacts.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("artifact io error: {0}")]
    ArtifactIo(#[from] std::io::Error),
    #[error("artifact csv error: {0}")]
    ArtifactCsv(#[from] csv::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
