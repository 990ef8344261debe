//! Row synthesis and parallel artifact generation.
//!
//! One configurable synthesizer covers every catalog table: column values
//! derive from the global row index (indexed strategy) or from a seeded
//! value source (sampled strategy). Partitions are generated concurrently
//! into CSV artifacts by a bounded worker pool.

pub mod artifact;
pub mod error;
pub mod generate;
pub mod row;
mod sampled;

pub use artifact::{Artifact, artifact_path};
pub use error::SynthError;
pub use generate::{
    GenerateOptions, PartitionFailure, TableGeneration, default_workers, generate_table,
};
pub use row::{RowPlan, table_seed};
