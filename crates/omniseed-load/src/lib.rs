//! Bulk loading of generated artifacts into a destination sink.
//!
//! The sink is consumed at its interface only: one session per concurrent
//! load operation, streaming ingestion, atomic commit or abort per
//! partition. PostgreSQL `COPY FROM STDIN` is the production sink; an
//! in-memory sink backs tests and dry runs.

pub mod error;
pub mod loader;
pub mod postgres;
pub mod sink;

pub use error::LoadError;
pub use loader::{LoadOptions, LoadResult, load_table};
pub use postgres::PostgresSink;
pub use sink::{LoadSession, MemorySink, Sink};
