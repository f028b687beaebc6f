use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::records::FeedbackEntry;
use crate::stats::{compute_stats, FeedbackStats};

/// Feedback for the interactive front end: a JSON array on disk, rewritten in
/// full on every append.
#[derive(Debug)]
pub struct FeedbackFile {
    path: PathBuf,
    entries: Vec<FeedbackEntry>,
}

impl FeedbackFile {
    /// A missing file starts empty. An unreadable or corrupt file also starts
    /// empty, with a warning; it is overwritten on the next append.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not load feedback data from {}: {}", path.display(), e);
                Vec::new()
            }
        };
        debug!("Loaded {} feedback entries from {}", entries.len(), path.display());
        Self { path, entries }
    }

    fn read_entries(path: &Path) -> Result<Vec<FeedbackEntry>, AppError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    /// Keep the entry in memory and rewrite the file. The in-memory copy is
    /// kept even when the write fails.
    pub fn append(&mut self, entry: FeedbackEntry) -> Result<(), AppError> {
        self.entries.push(entry);
        self.save()
    }

    fn save(&self) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn stats(&self) -> Option<FeedbackStats> {
        compute_stats(&self.entries)
    }
}
