//! Core contracts for Omniseed.
//!
//! This crate defines the table catalog, the partition planner, the
//! dependency graph, and the value model shared by the synthesizer and the
//! loader.

pub mod catalog;
pub mod error;
pub mod graph;
pub mod partition;
pub mod spec;
pub mod value;

pub use catalog::{Catalog, SizingMap, TableSizing};
pub use error::CatalogError;
pub use graph::validate_catalog;
pub use partition::{Partition, plan_partitions};
pub use spec::{ColumnSpec, Sampled, SynthStrategy, TableSpec, ValueSpec};
pub use value::Value;
