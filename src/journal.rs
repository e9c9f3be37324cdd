//! File-backed dream journal.
//!
//! The whole journal is one JSON array of [`JournalEntry`], newest first.
//! The analyzer never assigns ids or timestamps; this layer does.

use std::path::{Path, PathBuf};

use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use dream_types::{Analysis, JournalEntry};

use crate::error::JournalError;

#[derive(Debug)]
pub struct JournalStore {
    path: PathBuf,
    max_entries: Option<usize>,
    entries: Vec<JournalEntry>,
}

impl JournalStore {
    /// Load the journal at `path`. A missing file is an empty journal; an
    /// unreadable one is logged and treated as empty.
    pub fn open(
        path: impl Into<PathBuf>,
        max_entries: Option<usize>,
    ) -> Result<Self, JournalError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<JournalEntry>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Journal file unreadable, starting empty"
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(JournalError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Journal opened");
        Ok(Self {
            path,
            max_entries,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Newest first.
    pub fn list(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Record an analysis with a fresh id and the current time.
    pub fn add(
        &mut self,
        text: impl Into<String>,
        analysis: Analysis,
    ) -> Result<JournalEntry, JournalError> {
        if let Some(limit) = self.max_entries {
            if self.entries.len() >= limit {
                return Err(JournalError::QuotaExceeded { limit });
            }
        }

        // Stored with millisecond precision
        let created_at = Utc::now().trunc_subsecs(3);
        let entry = JournalEntry::new(Uuid::new_v4(), text, created_at, analysis);
        self.entries.insert(0, entry.clone());
        if let Err(e) = self.save() {
            self.entries.remove(0);
            return Err(e);
        }

        tracing::info!(id = %entry.id, "Journal entry added");
        Ok(entry)
    }

    pub fn delete(&mut self, id: Uuid) -> Result<JournalEntry, JournalError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(JournalError::NotFound(id))?;
        let removed = self.entries.remove(index);
        if let Err(e) = self.save() {
            self.entries.insert(index, removed);
            return Err(e);
        }

        tracing::info!(id = %id, "Journal entry deleted");
        Ok(removed)
    }

    fn save(&self) -> Result<(), JournalError> {
        let io_err = |source| JournalError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json).map_err(io_err)
    }
}
