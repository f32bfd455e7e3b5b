// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Composition root: wires catalog, classifier and history from configuration

use std::sync::Arc;
use tracing::info;

use crate::analysis::Analysis;
use crate::catalog::Catalog;
use crate::classifier::{Classifier, PlantAnalyzer};
use crate::config::AppConfig;
use crate::history::HistoryStore;
use crate::random::RandomSource;
use crate::storage::{open_store, MemoryStore};
use crate::Result;

/// The services a presentation layer talks to
#[derive(Clone)]
pub struct PlantVision {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub analyzer: Arc<dyn PlantAnalyzer>,
    pub history: HistoryStore,
}

impl PlantVision {
    /// Build every service from configuration. Catalog and storage problems
    /// surface here, at startup.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let catalog = Arc::new(Catalog::load(config.catalog.path_buf().as_deref())?);
        let classifier = Classifier::from_config(&config.classifier, catalog.clone());
        let store = open_store(&config.storage)?;
        let history = HistoryStore::with_key(store, config.storage.key.clone());

        info!(
            "PlantVision ready: {} plants, {} analyzer",
            catalog.len(),
            classifier.name()
        );

        Ok(Self {
            config,
            catalog,
            analyzer: Arc::new(classifier),
            history,
        })
    }

    /// Built-in catalog, in-memory history, no latency
    pub fn in_memory(random: Arc<dyn RandomSource>) -> Self {
        let catalog = Arc::new(Catalog::builtin());
        let classifier = Classifier::new(catalog.clone(), random);
        Self {
            config: AppConfig::default(),
            catalog,
            analyzer: Arc::new(classifier),
            history: HistoryStore::new(Arc::new(MemoryStore::new())),
        }
    }

    /// Analyze a photo and optionally record it. A failed save is an error
    /// even though the analysis itself succeeded.
    pub async fn analyze(&self, image_data: &[u8], save: bool) -> Result<Analysis> {
        let analysis = self.analyzer.analyze(image_data).await;
        if save {
            self.history.save(&analysis)?;
        }
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use crate::random::SequenceRandom;

    #[tokio::test]
    async fn test_analyze_and_save() {
        let app = PlantVision::in_memory(Arc::new(SequenceRandom::new([0.0, 0.1, 0.5])));
        let analysis = app.analyze(b"AB", true).await.unwrap();
        assert_eq!(app.history.list()[0].id, analysis.id);

        app.analyze(b"AB", false).await.unwrap();
        assert_eq!(app.history.list().len(), 1);
    }

    #[tokio::test]
    async fn test_from_config_with_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::File;
        config.storage.path = dir.path().join("history").to_string_lossy().to_string();
        config.classifier.min_delay_ms = 0;
        config.classifier.jitter_ms = 0;

        let app = PlantVision::from_config(config).unwrap();
        let analysis = app.analyze(b"some photo", true).await.unwrap();
        assert_eq!(app.history.get(&analysis.id).unwrap().id, analysis.id);
        assert!(dir.path().join("history/plant-vision-history.json").exists());
    }

    #[test]
    fn test_from_config_rejects_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("plants.json");
        std::fs::write(&catalog_path, "[]").unwrap();

        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.catalog.path = Some(catalog_path.to_string_lossy().to_string());
        assert!(PlantVision::from_config(config).is_err());
    }
}
