// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Stores for result ids that have already been shown, used to de-duplicate
//! hits across pages.

use crate::error::Result;
use crate::models::search::ResultRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key-value store of seen result ids
pub trait SeenStore {
    fn has(&self, id: &str) -> bool;

    /// Remember a record under its id
    fn put(&mut self, id: &str, record: &ResultRecord) -> Result<()>;

    /// Running insertion counter; returns the ordinal for the next record.
    /// Durable stores persist the counter with the following `put`.
    fn next_ordinal(&mut self) -> Result<u64>;
}

/// In-memory store, forgotten when the view is dropped
#[derive(Debug, Default)]
pub struct MemorySeenStore {
    records: HashMap<String, ResultRecord>,
    ordinal: u64,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SeenStore for MemorySeenStore {
    fn has(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    fn put(&mut self, id: &str, record: &ResultRecord) -> Result<()> {
        self.records.insert(id.to_string(), record.clone());
        Ok(())
    }

    fn next_ordinal(&mut self) -> Result<u64> {
        self.ordinal += 1;
        Ok(self.ordinal)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SeenFile {
    records: HashMap<String, ResultRecord>,
    ordinal: u64,
    updated_at: Option<DateTime<Utc>>,
}

/// JSON file-backed store that survives restarts
#[derive(Debug)]
pub struct FileSeenStore {
    path: PathBuf,
    state: SeenFile,
}

impl FileSeenStore {
    /// Open the store at `path`. A missing file starts empty; so does an
    /// unreadable one, after a warning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let state = if path.exists() {
            Self::load(&path).unwrap_or_else(|e| {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Seen-result store unreadable, starting empty"
                );
                SeenFile::default()
            })
        } else {
            SeenFile::default()
        };

        debug!(
            path = %path.display(),
            records = state.records.len(),
            "Opened seen-result store"
        );

        Ok(Self { path, state })
    }

    fn load(path: &Path) -> Result<SeenFile> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn len(&self) -> usize {
        self.state.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.records.is_empty()
    }

    // Written to a sibling file and renamed over the store, so a reader
    // sees either the old or the new contents.
    fn persist(&mut self) -> Result<()> {
        self.state.updated_at = Some(Utc::now());
        let raw = serde_json::to_string_pretty(&self.state)?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, raw)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl SeenStore for FileSeenStore {
    fn has(&self, id: &str) -> bool {
        self.state.records.contains_key(id)
    }

    fn put(&mut self, id: &str, record: &ResultRecord) -> Result<()> {
        self.state.records.insert(id.to_string(), record.clone());
        self.persist()
    }

    fn next_ordinal(&mut self) -> Result<u64> {
        self.state.ordinal += 1;
        Ok(self.state.ordinal)
    }
}
