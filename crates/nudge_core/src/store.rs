use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::platform::PromptedStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PromptedRecord {
    prompted: bool,
    first_prompted_at: Option<DateTime<Utc>>,
}

/// File-backed prompted flag: a small JSON record in the app's state
/// directory. A missing file reads as never-prompted; the first transition
/// stamps the time it happened.
pub struct FilePromptedStore {
    path: PathBuf,
}

impl FilePromptedStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_record(&self) -> Result<PromptedRecord> {
        if !self.path.exists() {
            return Ok(PromptedRecord::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed prompted record at {}", self.path.display()))
    }

    fn write_record(&self, record: &PromptedRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl PromptedStore for FilePromptedStore {
    fn load(&self) -> Result<bool> {
        Ok(self.read_record()?.prompted)
    }

    fn mark_prompted(&self) -> Result<()> {
        let mut record = self.read_record()?;
        if record.prompted {
            return Ok(());
        }
        record.prompted = true;
        record.first_prompted_at = Some(Utc::now());
        self.write_record(&record)
    }
}

/// In-process prompted flag for tests and the demo shell.
#[derive(Default)]
pub struct MemoryPromptedStore {
    prompted: Mutex<bool>,
}

impl MemoryPromptedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PromptedStore for MemoryPromptedStore {
    fn load(&self) -> Result<bool> {
        Ok(*self.prompted.lock())
    }

    fn mark_prompted(&self) -> Result<()> {
        *self.prompted.lock() = true;
        Ok(())
    }
}
