//! CSV artifacts: one file per generated partition, staged for bulk load.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use omniseed_core::Value;

use crate::error::SynthError;

/// The materialized rows of one partition, owned by the producing worker
/// until handed to the loader, which releases it when the load finishes.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub table: String,
    pub seq: u32,
    pub path: PathBuf,
    pub rows: u64,
    pub bytes: u64,
}

impl Artifact {
    /// Delete the backing file. Called exactly once by the final owner, on
    /// success and failure paths alike.
    pub fn release(&self) -> std::io::Result<()> {
        std::fs::remove_file(&self.path)
    }
}

/// Artifact file path for a table partition, named by table and sequence
/// number.
pub fn artifact_path(out_dir: &Path, table: &str, seq: u32) -> PathBuf {
    out_dir.join(format!("{table}_{seq:03}.csv"))
}

/// Streaming CSV writer for one partition: header row first, then one
/// record per row, with byte accounting for the run report.
pub struct PartitionWriter {
    writer: csv::Writer<CountingWriter<BufWriter<File>>>,
    rows: u64,
}

impl PartitionWriter {
    pub fn create(path: &Path, columns: &[&str]) -> Result<Self, SynthError> {
        let file = File::create(path)?;
        let counting = CountingWriter::new(BufWriter::new(file));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(counting);
        writer.write_record(columns)?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_row(&mut self, values: &[Value]) -> Result<(), SynthError> {
        self.writer
            .write_record(values.iter().map(Value::to_field))?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and return `(rows, bytes)` written.
    pub fn finish(self) -> Result<(u64, u64), SynthError> {
        let rows = self.rows;
        let mut counting = self
            .writer
            .into_inner()
            .map_err(|err| err.into_error())?;
        counting.flush()?;
        Ok((rows, counting.bytes_written()))
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_emits_header_and_counts_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = artifact_path(dir.path(), "roles", 0);

        let mut writer = PartitionWriter::create(&path, &["role_name", "description"]).unwrap();
        writer
            .write_row(&[
                Value::Text("role_0".to_string()),
                Value::Text("Role 0".to_string()),
            ])
            .unwrap();
        let (rows, bytes) = writer.finish().unwrap();

        assert_eq!(rows, 1);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "role_name,description\nrole_0,Role 0\n");
        assert_eq!(bytes, contents.len() as u64);
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = artifact_path(dir.path(), "notes", 0);

        let mut writer = PartitionWriter::create(&path, &["text"]).unwrap();
        writer
            .write_row(&[Value::Text("line one\nwith, comma".to_string())])
            .unwrap();
        writer.finish().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "text\n\"line one\nwith, comma\"\n");
    }

    #[test]
    fn release_removes_the_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = artifact_path(dir.path(), "roles", 1);
        let writer = PartitionWriter::create(&path, &["role_name"]).unwrap();
        writer.finish().unwrap();

        let artifact = Artifact {
            table: "roles".to_string(),
            seq: 1,
            path: path.clone(),
            rows: 0,
            bytes: 0,
        };
        artifact.release().unwrap();
        assert!(!path.exists());
    }
}
