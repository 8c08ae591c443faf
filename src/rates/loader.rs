//! Loading the rate table from JSON with a built-in fallback
//!
//! A missing or broken rate file never stops the calculator: the lenient
//! loader logs the problem and continues with [`RateTable::builtin`].

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use super::RateTable;

/// Location of the rate file relative to the working directory
pub const DEFAULT_RATES_PATH: &str = "data/rates.json";

/// Configuration errors raised while loading a rate table
#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("failed to read rate table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rate table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rate table defines no tiers")]
    EmptyTable,

    #[error("tier `{0}` is defined more than once")]
    DuplicateTier(String),

    #[error("partner perk `{0}` is defined more than once")]
    DuplicatePartner(String),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Where the active rate table came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateSource {
    File(PathBuf),
    Builtin,
}

impl RateTable {
    /// Parse and validate a rate table from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, RateTableError> {
        let table: RateTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a rate table file, failing on any configuration problem
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RateTableError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| RateTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load a rate table file, falling back to the built-in table
    pub fn load_or_builtin(path: impl AsRef<Path>) -> (Self, RateSource) {
        let path = path.as_ref();
        if !path.exists() {
            info!("No rate file at {}, using built-in rates", path.display());
            return (Self::builtin(), RateSource::Builtin);
        }

        match Self::load(path) {
            Ok(table) => {
                info!("Loaded {} tiers from {}", table.tiers.len(), path.display());
                (table, RateSource::File(path.to_path_buf()))
            }
            Err(e) => {
                warn!("Ignoring rate file {}: {}; using built-in rates", path.display(), e);
                (Self::builtin(), RateSource::Builtin)
            }
        }
    }
}
