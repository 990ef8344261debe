//! PostgreSQL sink: `COPY <table> FROM STDIN` over a bounded connection
//! pool, one pooled connection per concurrent load session.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgCopyIn, PgPoolCopyExt, PgPoolOptions};
use sqlx::{PgPool, Postgres};
use tracing::info;

use crate::error::LoadError;
use crate::sink::{LoadSession, Sink};

#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with at most `max_connections` pooled connections; sized to
    /// the load worker count so every session can hold one.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, LoadError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(LoadError::Connection)?;
        Ok(Self::new(pool))
    }
}

fn copy_statement(table: &str, columns: &[&str]) -> String {
    format!(
        "COPY {table}({}) FROM STDIN WITH (FORMAT csv, HEADER true)",
        columns.join(",")
    )
}

#[async_trait]
impl Sink for PostgresSink {
    async fn begin_bulk_load(
        &self,
        table: &str,
        columns: &[&str],
    ) -> Result<Box<dyn LoadSession>, LoadError> {
        let copy = self
            .pool
            .copy_in_raw(&copy_statement(table, columns))
            .await
            .map_err(LoadError::Connection)?;
        Ok(Box::new(PostgresSession {
            table: table.to_string(),
            copy,
        }))
    }

    async fn truncate(&self, tables: &[String]) -> Result<(), LoadError> {
        for table in tables {
            sqlx::query(&format!("TRUNCATE TABLE {table} RESTART IDENTITY CASCADE"))
                .execute(&self.pool)
                .await
                .map_err(|error| LoadError::Rejected {
                    table: table.clone(),
                    detail: error.to_string(),
                })?;
            info!(table = %table, "truncated");
        }
        Ok(())
    }
}

struct PostgresSession {
    table: String,
    copy: PgCopyIn<PoolConnection<Postgres>>,
}

#[async_trait]
impl LoadSession for PostgresSession {
    async fn stream(&mut self, chunk: &[u8]) -> Result<(), LoadError> {
        self.copy
            .send(chunk)
            .await
            .map(|_| ())
            .map_err(|error| LoadError::Rejected {
                table: self.table.clone(),
                detail: error.to_string(),
            })
    }

    async fn commit(self: Box<Self>) -> Result<u64, LoadError> {
        let session = *self;
        session
            .copy
            .finish()
            .await
            .map_err(|error| LoadError::Rejected {
                table: session.table,
                detail: error.to_string(),
            })
    }

    async fn abort(self: Box<Self>) -> Result<(), LoadError> {
        let session = *self;
        session
            .copy
            .abort("bulk load aborted")
            .await
            .map_err(|error| LoadError::Rejected {
                table: session.table,
                detail: error.to_string(),
            })
    }
}
