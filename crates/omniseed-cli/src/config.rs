//! Run configuration: a TOML file overlaid by command-line flags.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use omniseed_core::SynthStrategy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Optional TOML configuration; every field can also be set by a flag, and
/// flags win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub gen_workers: Option<usize>,
    pub load_workers: Option<usize>,
    pub truncate_first: Option<bool>,
    pub fail_fast: Option<bool>,
    #[serde(default)]
    pub tables: BTreeMap<String, TableConfig>,
}

/// Per-table overrides.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    pub rows: Option<u64>,
    pub partition_size: Option<u64>,
    pub strategy: Option<SynthStrategy>,
}

pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_overrides() {
        let config: FileConfig = toml::from_str(
            r#"
            out_dir = "chunks"
            seed = 7

            [tables.orders]
            rows = 1000
            partition_size = 100
            strategy = "sampled"
            "#,
        )
        .unwrap();

        assert_eq!(config.out_dir, Some(PathBuf::from("chunks")));
        assert_eq!(config.seed, Some(7));
        let orders = config.tables.get("orders").unwrap();
        assert_eq!(orders.rows, Some(1000));
        assert_eq!(orders.partition_size, Some(100));
        assert_eq!(orders.strategy, Some(SynthStrategy::Sampled));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("chunk_dir = \"x\"").is_err());
    }
}
