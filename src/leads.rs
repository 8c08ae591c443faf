//! Append-only CSV log of contacts who requested a report or guide

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use log::{error, info};
use thiserror::Error;

pub const DEFAULT_LEADS_PATH: &str = "leads.csv";

/// Origin tag used when the request carries none
pub const DEFAULT_ORIGIN: &str = "direct";

const HEADER: [&str; 3] = ["timestamp", "contact", "origin"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("lead log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("lead log CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("not a valid contact address: {0:?}")]
    InvalidContact(String),
}

/// CSV file of `(timestamp, contact, origin)` rows
#[derive(Debug, Clone)]
pub struct LeadLog {
    path: PathBuf,
}

impl LeadLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a lead stamped with the current local time
    pub fn append(&self, contact: &str, origin: &str) -> Result<(), LeadError> {
        self.append_at(contact, origin, Local::now().naive_local())
    }

    /// Append a lead, writing the header first if the file is new
    pub fn append_at(&self, contact: &str, origin: &str, at: NaiveDateTime) -> Result<(), LeadError> {
        let contact = contact.trim();
        if contact.is_empty() || !contact.contains('@') {
            return Err(LeadError::InvalidContact(contact.to_string()));
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let is_new = !self.path.is_file();
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
        }

        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        writer.write_record([timestamp.as_str(), contact, origin])?;
        writer.flush()?;
        Ok(())
    }

    /// Append a lead without failing the caller
    ///
    /// Returns whether the lead was stored; failures are only logged.
    pub fn record(&self, contact: &str, origin: &str) -> bool {
        match self.append(contact, origin) {
            Ok(()) => {
                info!("Recorded lead from {} in {}", origin, self.path.display());
                true
            }
            Err(e) => {
                error!("Could not record lead in {}: {}", self.path.display(), e);
                false
            }
        }
    }
}
