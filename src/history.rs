use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnuvadError, Result};

/// One completed translation, as persisted in the history CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub source_lang: String,
    pub target_lang: String,
    pub src_text: String,
    pub ref_text: String,
    pub our_translation: String,
}

/// Append-only translation history backed by a CSV file.
///
/// Appends read the whole file and rewrite it; records are never mutated or
/// deleted by the application.
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn append(&self, record: HistoryRecord) -> Result<()> {
        let mut records = if self.path.exists() {
            self.read_all()?
        } else {
            Vec::new()
        };
        records.push(record);

        let mut writer = csv::Writer::from_path(&self.path)?;
        for r in &records {
            writer.serialize(r)?;
        }
        writer.flush()?;

        debug!("Logged translation to {}", self.path.display());
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Err(AnuvadError::FileNotFound(self.path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for result in reader.deserialize() {
            records.push(result?);
        }
        Ok(records)
    }
}
