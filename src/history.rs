// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Bounded history of past analyses
//!
//! The whole history is one JSON array stored under a single key, newest
//! entry first, capped at [`MAX_HISTORY_ENTRIES`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analysis::{Analysis, HealthStatus};
use crate::storage::KeyValueStore;
use crate::{PlantVisionError, Result};

/// Key the history blob is stored under
pub const HISTORY_KEY: &str = "plant-vision-history";

/// Oldest entries beyond this count are evicted
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// Aggregate figures over the stored history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total: usize,
    pub healthy_count: usize,
    pub attention_count: usize,
    pub critical_count: usize,
    pub average_confidence: f64,
    pub most_recent_timestamp: Option<DateTime<Utc>>,
    pub unique_species_count: usize,
}

/// History manager over a key-value substrate.
///
/// Every mutation is a read-modify-write of the whole blob with no locking,
/// so two concurrent `save` calls against the same substrate can lose one
/// of the updates. Callers share one history per user session.
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl HistoryStore {
    /// Create a history under the default key
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, HISTORY_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Prepend an analysis, evicting the oldest beyond the cap.
    ///
    /// An entry with the same id is replaced rather than duplicated.
    pub fn save(&self, analysis: &Analysis) -> Result<()> {
        let mut entries = self.load()?;
        entries.retain(|e| e.id != analysis.id);
        entries.insert(0, analysis.clone());
        if entries.len() > MAX_HISTORY_ENTRIES {
            debug!("Evicting {} old entries", entries.len() - MAX_HISTORY_ENTRIES);
            entries.truncate(MAX_HISTORY_ENTRIES);
        }
        self.write(&entries)?;
        debug!("Saved analysis {} ({} in history)", analysis.id, entries.len());
        Ok(())
    }

    /// All entries, newest first. Missing or unreadable data yields an empty list.
    pub fn list(&self) -> Vec<Analysis> {
        self.load().unwrap_or_else(|e| {
            warn!("Failed to read history: {}", e);
            Vec::new()
        })
    }

    /// Look up a single entry
    pub fn get(&self, id: &str) -> Option<Analysis> {
        self.list().into_iter().find(|e| e.id == id)
    }

    /// Remove the entry with `id`; unknown ids are ignored
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            debug!("No history entry with id {}", id);
            return Ok(());
        }
        self.write(&entries)
    }

    /// Drop the whole history
    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)?;
        info!("History cleared");
        Ok(())
    }

    /// Pretty-printed JSON of the current history, re-importable
    pub fn export_as_text(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.list())?)
    }

    /// Replace the history with `text`; false when the data was rejected.
    ///
    /// Rejected imports leave the stored history untouched.
    pub fn import_from_text(&self, text: &str) -> bool {
        match self.try_import(text) {
            Ok(count) => {
                info!("Imported {} history entries", count);
                true
            }
            Err(e) => {
                warn!("History import rejected: {}", e);
                false
            }
        }
    }

    /// Validate and store `text`, returning the number of entries kept
    pub fn try_import(&self, text: &str) -> Result<usize> {
        let mut entries = parse_import(text)?;
        if entries.len() > MAX_HISTORY_ENTRIES {
            warn!(
                "Import has {} entries, keeping the newest {}",
                entries.len(),
                MAX_HISTORY_ENTRIES
            );
            entries.truncate(MAX_HISTORY_ENTRIES);
        }
        self.write(&entries)?;
        Ok(entries.len())
    }

    /// Aggregate the current history
    pub fn statistics(&self) -> HistoryStats {
        compute_stats(&self.list())
    }

    /// Current entries for a read-modify-write. A failed read is an error so
    /// the caller never overwrites data it could not see; a corrupt blob
    /// still reads as empty.
    fn load(&self) -> Result<Vec<Analysis>> {
        let stored = match self.store.get(&self.key) {
            Ok(Some(s)) => s,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => {
                return Err(PlantVisionError::Storage(format!(
                    "Failed to read history: {}",
                    e
                )))
            }
        };

        match serde_json::from_str(&stored) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Failed to parse history, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    fn write(&self, entries: &[Analysis]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.store.set(&self.key, &json)
    }
}

fn parse_import(text: &str) -> Result<Vec<Analysis>> {
    let entries: Vec<Analysis> = serde_json::from_str(text)
        .map_err(|e| PlantVisionError::Validation(format!("Invalid history format: {}", e)))?;

    let mut seen = HashSet::new();
    for (i, entry) in entries.iter().enumerate() {
        let missing = [
            ("id", &entry.id),
            ("commonName", &entry.common_name),
            ("scientificName", &entry.scientific_name),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty());

        if let Some((field, _)) = missing {
            return Err(PlantVisionError::Validation(format!(
                "Entry {} has an empty {}",
                i, field
            )));
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(PlantVisionError::Validation(format!(
                "Duplicate id {} at entry {}",
                entry.id, i
            )));
        }
    }
    Ok(entries)
}

fn compute_stats(entries: &[Analysis]) -> HistoryStats {
    let count = |status: HealthStatus| entries.iter().filter(|e| e.health_status == status).count();
    let average_confidence = if entries.is_empty() {
        0.0
    } else {
        entries.iter().map(|e| e.confidence).sum::<f64>() / entries.len() as f64
    };
    let species: HashSet<&str> = entries.iter().map(|e| e.scientific_name.as_str()).collect();

    HistoryStats {
        total: entries.len(),
        healthy_count: count(HealthStatus::Healthy),
        attention_count: count(HealthStatus::Attention),
        critical_count: count(HealthStatus::Critical),
        average_confidence,
        most_recent_timestamp: entries.first().map(|e| e.timestamp),
        unique_species_count: species.len(),
    }
}
