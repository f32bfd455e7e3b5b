// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Plant classifier
//!
//! Hash-bucketed pseudo-identification: the image bytes pick a deterministic
//! feature bucket, then a catalog record and a health verdict are drawn from
//! an injected random source.

pub mod features;
pub mod health;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::{Analysis, CareTips};
use crate::catalog::{Catalog, PlantCategory, PlantRecord};
use crate::config::ClassifierConfig;
use crate::random::{RandomSource, ThreadRandom};

pub use features::{extract_features, image_hash, ExtractedFeatures, SizeClass};
pub use health::{assess_health, HealthVerdict};

/// Categories tried when neither category nor leaf shape finds a match
pub const FALLBACK_CATEGORIES: [PlantCategory; 3] = [
    PlantCategory::Climber,
    PlantCategory::Succulent,
    PlantCategory::Tree,
];

pub const MIN_CONFIDENCE: f64 = 0.65;
pub const MAX_CONFIDENCE: f64 = 0.98;

/// Anything that can turn a plant photo into an analysis.
///
/// Implementations are total: every input yields an analysis.
#[async_trait]
pub trait PlantAnalyzer: Send + Sync {
    /// Name of this analyzer
    fn name(&self) -> &'static str;

    /// Analyze raw image bytes
    async fn analyze(&self, image_data: &[u8]) -> Analysis;

    /// Analyze an inline `data:` URI as produced by a capture device
    async fn analyze_data_url(&self, data_url: &str) -> Analysis;
}

/// Artificial inference delay: `base` plus up to `jitter`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Latency {
    pub base: Duration,
    pub jitter: Duration,
}

impl Latency {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            base: Duration::from_millis(config.min_delay_ms),
            jitter: Duration::from_millis(config.jitter_ms),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.base.is_zero() && self.jitter.is_zero()
    }
}

/// The hash-bucket plant classifier
pub struct Classifier {
    catalog: Arc<Catalog>,
    random: Arc<dyn RandomSource>,
    latency: Latency,
}

impl Classifier {
    /// Create a classifier with no artificial latency
    pub fn new(catalog: Arc<Catalog>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            catalog,
            random,
            latency: Latency::none(),
        }
    }

    /// Create a classifier from configuration, backed by the thread RNG
    pub fn from_config(config: &ClassifierConfig, catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, Arc::new(ThreadRandom)).with_latency(Latency::from_config(config))
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Classify raw image bytes without the artificial delay
    pub fn classify(&self, image_data: &[u8]) -> Analysis {
        self.classify_with_photo(image_data, encode_data_url(image_data))
    }

    /// Classify a `data:` URI without the artificial delay.
    ///
    /// Text that is not a decodable base64 data URI is hashed as-is.
    pub fn classify_data_url(&self, data_url: &str) -> Analysis {
        match decode_data_url(data_url) {
            Some(bytes) => self.classify_with_photo(&bytes, data_url.to_string()),
            None => {
                debug!("Input is not a base64 data URI, hashing raw text");
                self.classify_with_photo(data_url.as_bytes(), data_url.to_string())
            }
        }
    }

    fn classify_with_photo(&self, image_data: &[u8], photo: String) -> Analysis {
        let features = extract_features(image_data);
        debug!(
            "Features: category={} leaf={} quality={:.2}",
            features.category, features.leaf_shape, features.image_quality
        );

        let record = self.select_candidate(&features);
        let verdict = assess_health(&features, self.random.as_ref());
        let confidence = compute_confidence(&features, record, self.random.next_f64());

        let mut care_tips = CareTips::from(&record.care_tips);
        health::annotate_care_tips(&mut care_tips, verdict.status);

        info!(
            "Identified {} ({:.0}% confidence, {})",
            record.scientific_name,
            confidence * 100.0,
            verdict.status
        );

        Analysis {
            id: Uuid::new_v4().to_string(),
            common_name: record.common_name.clone(),
            scientific_name: record.scientific_name.clone(),
            description: record.description.clone(),
            health_status: verdict.status,
            confidence,
            care_tips,
            issues: verdict.issues,
            photo,
            timestamp: Utc::now(),
        }
    }

    /// Narrow the catalog by category, then leaf shape, then the fallback set,
    /// then everything; pick uniformly from the first non-empty tier.
    pub fn select_candidate(&self, features: &ExtractedFeatures) -> &PlantRecord {
        let mut candidates = self.catalog.by_category(features.category);
        if candidates.is_empty() {
            candidates = self.catalog.by_leaf_shape(features.leaf_shape);
        }
        if candidates.is_empty() {
            candidates = self.catalog.by_categories(&FALLBACK_CATEGORIES);
        }
        if candidates.is_empty() {
            candidates = self.catalog.records().iter().collect();
        }
        debug!("{} candidate plants", candidates.len());

        // Catalog construction guarantees at least one record
        candidates[self.random.pick_index(candidates.len())]
    }

    async fn simulate_latency(&self) {
        if self.latency.is_zero() {
            return;
        }
        let extra = if self.latency.jitter.is_zero() {
            Duration::ZERO
        } else {
            self.latency.jitter.mul_f64(self.random.next_f64())
        };
        let delay = self.latency.base + extra;
        debug!("Simulating inference latency of {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl PlantAnalyzer for Classifier {
    fn name(&self) -> &'static str {
        "hash-bucket"
    }

    async fn analyze(&self, image_data: &[u8]) -> Analysis {
        self.simulate_latency().await;
        self.classify(image_data)
    }

    async fn analyze_data_url(&self, data_url: &str) -> Analysis {
        self.simulate_latency().await;
        self.classify_data_url(data_url)
    }
}

/// Confidence from feature agreement and image quality, with `jitter_draw`
/// in `[0, 1)` mapped to ±0.025; clamped to 0.65 - 0.98.
pub fn compute_confidence(
    features: &ExtractedFeatures,
    record: &PlantRecord,
    jitter_draw: f64,
) -> f64 {
    let mut confidence = 0.70;
    if record.category == features.category {
        confidence += 0.15;
    }
    if record.leaf_shape == features.leaf_shape {
        confidence += 0.10;
    }
    confidence += (features.image_quality - 0.6) * 0.25;
    confidence += (jitter_draw - 0.5) * 0.05;
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Inline an image as a `data:` URI, sniffing the MIME type from its header
pub fn encode_data_url(image_data: &[u8]) -> String {
    let mime = image::guess_format(image_data)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(image_data))
}

/// Decode a `data:<mime>;base64,<payload>` URI
pub fn decode_data_url(data_url: &str) -> Option<Vec<u8>> {
    let rest = data_url.trim().strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    general_purpose::STANDARD.decode(payload.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{HealthStatus, TipSeverity};
    use crate::catalog::LeafShape;
    use crate::random::SequenceRandom;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn classifier_with(values: &[f64]) -> Classifier {
        Classifier::new(
            Arc::new(Catalog::builtin()),
            Arc::new(SequenceRandom::new(values.to_vec())),
        )
    }

    fn record_named(name: &str) -> PlantRecord {
        Catalog::builtin()
            .records()
            .iter()
            .find(|r| r.common_name == name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_classify_exact_branch() {
        // b"AB": flowering / fleshy / quality 0.61
        // draws: candidate 0 (Flamingo Flower), r=0.1 healthy, jitter 0.5 -> none
        let classifier = classifier_with(&[0.0, 0.1, 0.5]);
        let analysis = classifier.classify(b"AB");

        assert_eq!(analysis.common_name, "Flamingo Flower");
        assert_eq!(analysis.health_status, HealthStatus::Healthy);
        assert!(analysis.issues.is_empty());
        assert!((analysis.confidence - 0.8525).abs() < 1e-9);
        assert!(analysis.care_tips.iter().all(|(_, t)| t.severity == TipSeverity::Normal));
    }

    #[test]
    fn test_classify_critical_annotates_tips() {
        let classifier = classifier_with(&[0.0, 0.95, 0.0, 0.0, 0.5]);
        let analysis = classifier.classify(b"AB");

        assert_eq!(analysis.health_status, HealthStatus::Critical);
        assert_eq!(analysis.issues.len(), 1);
        assert_eq!(analysis.care_tips.watering.severity, TipSeverity::Urgent);
        assert_eq!(analysis.care_tips.lighting.severity, TipSeverity::Urgent);
    }

    #[test]
    fn test_same_bytes_same_bucket_different_draws() {
        let data = b"identical photo bytes";
        let bucket = extract_features(data).category;
        let catalog = Catalog::builtin();

        let a = classifier_with(&[0.0, 0.1, 0.5]).classify(data);
        let b = classifier_with(&[0.99, 0.99, 0.0, 0.0, 0.5]).classify(data);

        for analysis in [&a, &b] {
            let record = catalog
                .records()
                .iter()
                .find(|r| r.scientific_name == analysis.scientific_name)
                .unwrap();
            assert_eq!(record.category, bucket);
        }
        assert_eq!(a.health_status, HealthStatus::Healthy);
        assert_eq!(b.health_status, HealthStatus::Attention);
        assert_ne!(a.health_status, b.health_status);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_leaf_shape_tier_used_when_category_empty() {
        let mut odd = record_named("Moth Orchid");
        odd.leaf_shape = LeafShape::Fleshy;
        odd.category = PlantCategory::Aquatic;
        let catalog = Catalog::new(vec![record_named("Weeping Fig"), odd.clone()]).unwrap();
        let classifier = Classifier::new(Arc::new(catalog), Arc::new(SequenceRandom::new([0.0])));

        let picked = classifier.select_candidate(&extract_features(b"AB"));
        assert_eq!(picked, &odd);
    }

    #[test]
    fn test_fallback_categories_tier() {
        let catalog =
            Catalog::new(vec![record_named("Moth Orchid"), record_named("Weeping Fig")]).unwrap();
        let classifier = Classifier::new(Arc::new(catalog), Arc::new(SequenceRandom::new([0.0])));

        let picked = classifier.select_candidate(&extract_features(b"AB"));
        assert_eq!(picked.common_name, "Weeping Fig");
    }

    #[test]
    fn test_full_catalog_tier() {
        let catalog = Catalog::new(vec![record_named("Moth Orchid")]).unwrap();
        let classifier = Classifier::new(Arc::new(catalog), Arc::new(SequenceRandom::new([0.7])));

        let picked = classifier.select_candidate(&extract_features(b"AB"));
        assert_eq!(picked.common_name, "Moth Orchid");
    }

    #[test]
    fn test_confidence_bonuses_and_clamp() {
        let features = extract_features(b"AB");
        let mut record = record_named("Flamingo Flower");
        assert!((compute_confidence(&features, &record, 0.5) - 0.8525).abs() < 1e-9);

        record.leaf_shape = LeafShape::Fleshy;
        assert!((compute_confidence(&features, &record, 0.5) - 0.9525).abs() < 1e-9);

        let mut sharp = features;
        sharp.image_quality = 0.99;
        assert_eq!(compute_confidence(&sharp, &record, 0.999), MAX_CONFIDENCE);

        record.category = PlantCategory::Tree;
        record.leaf_shape = LeafShape::Heart;
        let low = compute_confidence(&features, &record, 0.0);
        assert!((low - 0.6775).abs() < 1e-9);
        assert!(low >= MIN_CONFIDENCE);
    }

    #[test]
    fn test_confidence_always_in_range() {
        let classifier = Classifier::new(Arc::new(Catalog::builtin()), Arc::new(ThreadRandom));
        for i in 0..500u32 {
            let data = i.to_le_bytes();
            let c = classifier.classify(&data).confidence;
            assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&c), "confidence {}", c);
        }
    }

    #[test]
    fn test_empty_input_still_classified() {
        let analysis = classifier_with(&[0.0, 0.1, 0.5]).classify(&[]);
        assert_eq!(analysis.common_name, "Golden Pothos");
        assert_eq!(analysis.photo, "data:application/octet-stream;base64,");
    }

    #[test]
    fn test_photo_mime_sniffed() {
        let mut data = PNG_HEADER.to_vec();
        data.extend_from_slice(&[0u8; 16]);
        let analysis = classifier_with(&[0.0, 0.1, 0.5]).classify(&data);
        assert!(analysis.photo.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_data_url_hashes_decoded_bytes() {
        let url = format!("data:image/jpeg;base64,{}", general_purpose::STANDARD.encode(b"AB"));
        assert_eq!(decode_data_url(&url).unwrap(), b"AB");

        let analysis = classifier_with(&[0.0, 0.1, 0.5]).classify_data_url(&url);
        assert_eq!(analysis.common_name, "Flamingo Flower");
        assert_eq!(analysis.photo, url);
    }

    #[test]
    fn test_malformed_data_url_is_total() {
        assert!(decode_data_url("data:image/png,not-base64").is_none());
        assert!(decode_data_url("plain text").is_none());

        let analysis = classifier_with(&[0.0, 0.1, 0.5]).classify_data_url("plain text");
        assert_eq!(analysis.photo, "plain text");
    }

    #[tokio::test]
    async fn test_analyze_without_latency() {
        let classifier = classifier_with(&[0.0, 0.1, 0.5]);
        assert!(classifier.latency().is_zero());
        let analysis = classifier.analyze(b"AB").await;
        assert_eq!(analysis.common_name, "Flamingo Flower");
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_waits_for_latency() {
        // first draw goes to the latency jitter
        let classifier = classifier_with(&[0.5, 0.0, 0.1, 0.5]).with_latency(Latency {
            base: Duration::from_secs(2),
            jitter: Duration::from_secs(3),
        });
        let start = tokio::time::Instant::now();
        let analysis = classifier.analyze(b"AB").await;
        assert!(start.elapsed() >= Duration::from_millis(3500));
        assert_eq!(analysis.common_name, "Flamingo Flower");
    }

    #[test]
    fn test_analyzer_usable_from_sync_context() {
        let analyzer: Arc<dyn PlantAnalyzer> = Arc::new(classifier_with(&[0.0, 0.1, 0.5]));
        let analysis = tokio_test::block_on(analyzer.analyze(b"AB"));
        assert_eq!(analyzer.name(), "hash-bucket");
        assert_eq!(analysis.scientific_name, "Anthurium andraeanum");
    }

    #[test]
    fn test_latency_from_config() {
        let latency = Latency::from_config(&ClassifierConfig::default());
        assert_eq!(latency.base, Duration::from_millis(2000));
        assert_eq!(latency.jitter, Duration::from_millis(3000));
    }
}
