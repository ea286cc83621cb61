// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;

/// Where a lookup table comes from. Default paths may be absent on disk;
/// paths given on the command line must exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableSource {
    Default(PathBuf),
    Explicit(PathBuf),
}

impl TableSource {
    pub fn path(&self) -> &PathBuf {
        match self {
            TableSource::Default(p) | TableSource::Explicit(p) => p,
        }
    }

    pub fn required(&self) -> bool {
        matches!(self, TableSource::Explicit(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub config_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Only process the measure with this name (config file stem).
    pub only: Option<String>,
    pub cross_reference: bool,
    pub ipip_table: TableSource,
    pub remap_table: TableSource,
    pub split_table: TableSource,
    /// Abort the batch on the first failing measure instead of reporting and moving on.
    pub fail_fast: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(CONFIG_DIR),
            out_dir: PathBuf::from(KEYS_DIR),
            only: None,
            cross_reference: CROSS_REFERENCE,
            ipip_table: TableSource::Default(PathBuf::from(DEFAULT_IPIP_TABLE)),
            remap_table: TableSource::Default(PathBuf::from(DEFAULT_REMAP_TABLE)),
            split_table: TableSource::Default(PathBuf::from(DEFAULT_SPLIT_TABLE)),
            fail_fast: false,
        }
    }
}

impl RunOptions {
    pub fn default_config_path(&self) -> PathBuf {
        self.config_dir.join(DEFAULT_CONFIG)
    }

    pub fn key_path(&self, measure: &str) -> PathBuf {
        self.out_dir.join(join!(measure, ".", KEY_EXT))
    }
}
