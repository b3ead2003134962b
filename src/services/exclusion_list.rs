//! Reporters that never trigger a notification.
//!
//! The list lives in memory behind a lock and is persisted to a properties
//! file as a comma-joined value under [`EXCLUDES_KEY`]. Every mutation
//! rewrites the whole file.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::utils::properties;

pub const EXCLUDES_KEY: &str = "excludes";

/// File-backed persistence for the exclusion list
#[derive(Debug, Clone)]
pub struct PropertiesStore {
    path: PathBuf,
}

impl PropertiesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted identifiers. A missing file, missing key, or blank
    /// value is an empty list.
    pub async fn load(&self) -> Result<Vec<String>> {
        let entries = self.read_entries().await?;

        let ids = match entries.get(EXCLUDES_KEY) {
            Some(value) if !value.trim().is_empty() => {
                let mut ids = Vec::new();
                for id in split_ids(value) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                ids
            }
            _ => Vec::new(),
        };

        Ok(ids)
    }

    /// Rewrite the file with `ids`. Unrelated keys already in the file are
    /// kept when the file can still be read.
    pub async fn save(&self, ids: &[String]) -> Result<()> {
        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Rewriting exclusion list without its other keys: {:#}", e);
                BTreeMap::new()
            }
        };
        entries.insert(EXCLUDES_KEY.to_string(), ids.join(","));

        let text = properties::render("Excluded issue reporters", &entries);
        tokio::fs::write(&self.path, text)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(properties::parse(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }
}

/// Shared handle to the in-memory exclusion list
#[derive(Debug, Clone)]
pub struct ExclusionList {
    entries: Arc<RwLock<Vec<String>>>,
    store: PropertiesStore,
}

impl ExclusionList {
    /// Load the persisted list. Never fails: unreadable storage starts empty.
    pub async fn load(store: PropertiesStore) -> Self {
        let ids = match store.load().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(
                    "Could not load exclusion list from {}: {:#}. Starting empty.",
                    store.path().display(),
                    e
                );
                Vec::new()
            }
        };

        info!(
            "Exclusion list loaded from {} ({} entries)",
            store.path().display(),
            ids.len()
        );

        Self {
            entries: Arc::new(RwLock::new(ids)),
            store,
        }
    }

    pub async fn list(&self) -> Vec<String> {
        self.entries.read().await.clone()
    }

    pub async fn contains(&self, reporter: &str) -> bool {
        self.entries.read().await.iter().any(|id| id == reporter)
    }

    /// Add every identifier in a comma-separated batch that is not already
    /// listed, persist, and return the resulting list.
    pub async fn add(&self, batch: &str) -> Vec<String> {
        let mut entries = self.entries.write().await;

        for id in split_ids(batch) {
            if !entries.contains(&id) {
                debug!(reporter = %id, "Adding reporter to exclusion list");
                entries.push(id);
            }
        }

        self.persist(&entries).await;
        entries.clone()
    }

    /// Remove every identifier in a comma-separated batch, persist, and
    /// return the resulting list. Unknown identifiers are ignored.
    pub async fn remove(&self, batch: &str) -> Vec<String> {
        let mut entries = self.entries.write().await;
        let removals = split_ids(batch);

        entries.retain(|id| !removals.contains(id));

        self.persist(&entries).await;
        entries.clone()
    }

    async fn persist(&self, ids: &[String]) {
        if let Err(e) = self.store.save(ids).await {
            error!("Failed to persist exclusion list: {:#}", e);
        }
    }
}

/// Split on commas and trim. Empty segments are kept.
fn split_ids(batch: &str) -> Vec<String> {
    batch.split(',').map(|id| id.trim().to_string()).collect()
}
